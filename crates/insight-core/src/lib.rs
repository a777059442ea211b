pub mod document;
pub mod error;
pub mod language;
pub mod messaging;
pub mod settings;
pub mod storage;

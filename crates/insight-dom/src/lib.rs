pub mod document;
pub mod page;
pub mod serialize;

pub use document::MemoryDocument;

pub mod style;
pub mod types;

pub use types::*;

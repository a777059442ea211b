pub mod classifier;
pub mod frequency;

pub use classifier::is_word_like;
pub use frequency::FrequencyModel;

pub mod loaders;
pub mod types;

pub use loaders::json::{load_lemma_file, load_rank_file, load_translation_file};
pub use types::{LemmaData, LemmaGroup, LoadError, RankList, TranslationData};

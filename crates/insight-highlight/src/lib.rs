pub mod matcher;
pub mod splicer;
pub mod walker;

pub use matcher::{Token, find_matches, should_scan, tokenize};
pub use splicer::{build_replacement, highlight_element};
pub use walker::{Highlighter, ScanReport};

/// `data-*` key holding the percentile of a highlight
pub const DATA_PERCENT: &str = "percent";
/// `data-*` key holding the lemma of a highlight
pub const DATA_LEMMA: &str = "lemma";

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::style::default_style;

/// Extension-wide switch chosen in the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalMode {
    #[default]
    Enable,
    Disable,
    /// Never highlight, whatever the site says
    Forbidden,
}

/// Per-hostname override of the global mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteMode {
    #[default]
    Follow,
    Include,
    Exclude,
}

impl GlobalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalMode::Enable => "enable",
            GlobalMode::Disable => "disable",
            GlobalMode::Forbidden => "forbidden",
        }
    }
}

impl SiteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteMode::Follow => "follow",
            SiteMode::Include => "include",
            SiteMode::Exclude => "exclude",
        }
    }
}

impl fmt::Display for GlobalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SiteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlobalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enable" => Ok(GlobalMode::Enable),
            "disable" => Ok(GlobalMode::Disable),
            "forbidden" => Ok(GlobalMode::Forbidden),
            other => Err(format!("unknown global mode: {other}")),
        }
    }
}

impl FromStr for SiteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(SiteMode::Follow),
            "include" => Ok(SiteMode::Include),
            "exclude" => Ok(SiteMode::Exclude),
            other => Err(format!("unknown site mode: {other}")),
        }
    }
}

/// Whether highlighting is active for a page with the given modes.
pub fn is_supported(mode: GlobalMode, site_mode: SiteMode) -> bool {
    matches!(
        (mode, site_mode),
        (GlobalMode::Enable, SiteMode::Follow | SiteMode::Include)
            | (GlobalMode::Disable, SiteMode::Include)
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    /// Full CSS rule applied to highlighted words
    pub highlight: String,
}

impl Default for Preference {
    fn default() -> Self {
        Self {
            highlight: default_style(),
        }
    }
}

/// Handle to a node owned by a document implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A located, classified occurrence of a qualifying word within one text run.
///
/// Offsets are byte offsets into the scanned string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    /// Original-case text of the token
    pub text: String,
    pub percentile: u8,
    pub lemma: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Pointer events raised by highlight elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    Enter(NodeId),
    Leave(NodeId),
    Click(NodeId),
}

/// What the presentation layer should do in response to hover events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent {
    Show {
        node: NodeId,
        text: String,
        lemma: String,
    },
    Hide,
    OpenUrl(String),
}

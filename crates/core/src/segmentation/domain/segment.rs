use serde::{Deserialize, Serialize};

/// One resolved unit of a translation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    /// A dictionary phrase (one to four words) and its relative media path.
    Sign { phrase: String, media_path: String },
    /// An input token with no dictionary entry.
    Unmatched { token: String },
}

impl Segment {
    pub fn media_path(&self) -> Option<&str> {
        match self {
            Segment::Sign { media_path, .. } => Some(media_path),
            Segment::Unmatched { .. } => None,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, Segment::Unmatched { .. })
    }
}

/// What happens to tokens that match no dictionary phrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Silently skip them.
    #[default]
    Drop,
    /// Keep a gap marker in their place.
    Placeholder,
    /// Spell them out with single-letter signs, skipping letters with no sign.
    Fingerspell,
}

impl UnmatchedPolicy {
    pub const ALL: &[UnmatchedPolicy] = &[
        UnmatchedPolicy::Drop,
        UnmatchedPolicy::Placeholder,
        UnmatchedPolicy::Fingerspell,
    ];
}

impl std::fmt::Display for UnmatchedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmatchedPolicy::Drop => write!(f, "Skip"),
            UnmatchedPolicy::Placeholder => write!(f, "Show gap"),
            UnmatchedPolicy::Fingerspell => write!(f, "Fingerspell"),
        }
    }
}

impl std::str::FromStr for UnmatchedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(UnmatchedPolicy::Drop),
            "placeholder" => Ok(UnmatchedPolicy::Placeholder),
            "fingerspell" => Ok(UnmatchedPolicy::Fingerspell),
            other => Err(format!(
                "unmatched policy must be one of: drop, placeholder, fingerspell, got '{other}'"
            )),
        }
    }
}

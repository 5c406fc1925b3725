//! Tag handling.
//!
//! Tags are persisted as one flat, comma-separated string per post. `TagSet` is the
//! parsed view of that string: terms are trimmed, empty terms are dropped, case is kept.

use std::fmt;
use std::str::FromStr;

/// How a tag filter term is matched against a post's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMatchMode {
    /// A term matches when it occurs anywhere in the raw tags string
    /// (case-sensitive), so `art` matches `chart`.
    #[default]
    Substring,
    /// A term matches only an identical tag in the parsed set.
    Exact,
}

impl FromStr for TagMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(TagMatchMode::Substring),
            "exact" => Ok(TagMatchMode::Exact),
            other => Err(format!("unknown tag match mode '{other}'")),
        }
    }
}

impl fmt::Display for TagMatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagMatchMode::Substring => f.write_str("substring"),
            TagMatchMode::Exact => f.write_str("exact"),
        }
    }
}

/// Ordered, de-duplicated set of tag terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagSet {
    terms: Vec<String>,
}

impl TagSet {
    pub fn parse(raw: &str) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for term in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !terms.iter().any(|t| t == term) {
                terms.push(term.to_string());
            }
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    /// True when at least one term of `other` is in this set.
    pub fn intersects(&self, other: &TagSet) -> bool {
        other.terms.iter().any(|t| self.contains(t))
    }

    /// Whether a post's raw tags string matches any of these terms under `mode`.
    pub fn matches(&self, raw_tags: &str, mode: TagMatchMode) -> bool {
        match mode {
            TagMatchMode::Substring => self.terms.iter().any(|t| raw_tags.contains(t.as_str())),
            TagMatchMode::Exact => TagSet::parse(raw_tags).intersects(self),
        }
    }
}

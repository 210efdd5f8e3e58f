use std::fmt;

/// Canonical instrument identifier, e.g. `eur-usd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol(String);

impl Symbol {
    /// Trims and lowercases `raw`. Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let slug = raw.trim();
        if slug.is_empty() {
            return None;
        }
        Some(Self(slug.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Income-tax jurisdictions that carry a bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    Federal,
    California,
    Oklahoma,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 3] = [Self::Federal, Self::California, Self::Oklahoma];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "federal",
            Self::California => "california",
            Self::Oklahoma => "oklahoma",
        }
    }

    /// Accepts the long name or the postal abbreviation (`"CA"`, `"OK"`,
    /// `"US"` for federal).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "federal" | "fed" | "us" => Some(Self::Federal),
            "california" | "ca" => Some(Self::California),
            "oklahoma" | "ok" => Some(Self::Oklahoma),
            _ => None,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_names_and_abbreviations() {
        assert_eq!(Jurisdiction::parse("Federal"), Some(Jurisdiction::Federal));
        assert_eq!(Jurisdiction::parse("US"), Some(Jurisdiction::Federal));
        assert_eq!(Jurisdiction::parse("ca"), Some(Jurisdiction::California));
        assert_eq!(Jurisdiction::parse(" oklahoma "), Some(Jurisdiction::Oklahoma));
        assert_eq!(Jurisdiction::parse("TX"), None);
    }
}

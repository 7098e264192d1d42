use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Brand context a record or user originates from.
///
/// Selects theme and navigation on the client. It tags records and can be
/// used as a filter; it never restricts which data a user may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Veerix,
    Fishman,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Veerix, Source::Fishman];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Veerix => "veerix",
            Self::Fishman => "fishman",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "veerix" => Ok(Self::Veerix),
            "fishman" => Ok(Self::Fishman),
            other => Err(format!("unknown source: {:?}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Fishman".parse::<Source>().unwrap(), Source::Fishman);
        assert_eq!(" veerix ".parse::<Source>().unwrap(), Source::Veerix);
        assert!("acme".parse::<Source>().is_err());
    }

    #[test]
    fn wire_format_is_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Fishman).unwrap(), "\"fishman\"");
    }
}

use serde::{Deserialize, Serialize};

/// Which persisted list an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKey {
    /// Recently played tracks, most recent first, capacity-bounded
    Recent,
    /// Saved (favorited) tracks, most recently saved first, unbounded
    Saved,
}

impl ListKey {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Saved => "saved",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "recent" => Some(Self::Recent),
            "saved" => Some(Self::Saved),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_names() {
        assert_eq!(ListKey::from_str("recent"), Some(ListKey::Recent));
        assert_eq!(ListKey::from_str("saved"), Some(ListKey::Saved));
        assert_eq!(ListKey::from_str("popular"), None);
        assert_eq!(ListKey::Saved.to_string(), "saved");
    }
}

use core::fmt;
use serde::{Serialize, Serializer};

/// Where a derived value came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// A dotted path into the raw item
    Path(String),

    /// Another metric computed earlier for the same item
    Metric(String),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "path:{path}"),
            Self::Metric(key) => write!(f, "metric:{key}"),
        }
    }
}

impl Serialize for Provenance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

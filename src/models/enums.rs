use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a stored or configured category string does not name a
/// known knowledge category.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown knowledge category: {0}")]
pub struct UnknownCategory(pub String);

/// Knowledge-base category. Closed set: extending it means adding a
/// variant here plus a source reader in `pipeline::ingest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Medicine,
    Remedy,
    LabTest,
    Disease,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medicine => "medicine",
            Self::Remedy => "remedy",
            Self::LabTest => "lab_test",
            Self::Disease => "disease",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medicine" => Ok(Self::Medicine),
            "remedy" => Ok(Self::Remedy),
            "lab_test" => Ok(Self::LabTest),
            "disease" => Ok(Self::Disease),
            _ => Err(UnknownCategory(s.into())),
        }
    }
}

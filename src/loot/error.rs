use crate::loot::types::ContainerKind;
use std::fmt;
use thiserror::Error;

/// Profile a roll asked for that the catalog does not have.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MissingProfile {
    ShipTier(u8),
    Container(ContainerKind),
    Faction(String),
}

impl fmt::Display for MissingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingProfile::ShipTier(tier) => write!(f, "no ship profile for tier {tier}"),
            MissingProfile::Container(kind) => write!(f, "no container profile for {kind}"),
            MissingProfile::Faction(code) => write!(f, "no faction profile for code {code:?}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LootError {
    /// A roll referenced content that was never authored.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(MissingProfile),
    /// Authored catalog data breaks a load-time rule.
    #[error("catalog config: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LootError>;

//! Identifiers carried through assessments
//!
//! Assets are owned by the surrounding system and arrive as UUID strings;
//! comparison records are minted here. Fresh ids are UUID v7, so records
//! sort by creation time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Asset under assessment
///
/// The nil UUID marks an asset the caller never identified; assessments
/// still run, but validation flags the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Placeholder for an asset without an id
    pub fn unassigned() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_assigned(&self) -> bool {
        !self.0.is_nil()
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for AssetId {
    type Err = uuid::Error;

    /// Parse an id handed over by the asset inventory
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Model comparison record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonId(Uuid);

impl ComparisonId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ComparisonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComparisonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_assigned_v7() {
        let id = AssetId::new();
        assert!(id.is_assigned());
        assert_eq!(id.0.get_version_num(), 7);
        assert_ne!(ComparisonId::new(), ComparisonId::new());
    }

    #[test]
    fn test_unassigned_asset() {
        assert!(!AssetId::unassigned().is_assigned());
        assert_eq!(
            AssetId::unassigned().to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_parse_inventory_id() {
        let raw = " 0190f5a8-3c2e-7b4d-9a11-2f6c8e0d4b57 ";
        let id: AssetId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw.trim());
        assert!("asset-42".parse::<AssetId>().is_err());
    }

    #[test]
    fn test_asset_id_serializes_as_plain_string() {
        let id = AssetId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        assert_eq!(serde_json::from_str::<AssetId>(&json).unwrap(), id);
    }
}

//! Schemas of the reference metadata embedded in saved objects as JSON strings

use crate::Result;
use serde::{Deserialize, Serialize};

/// Decoded `kibanaSavedObjectMeta.searchSourceJSON`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchSourceRef {
    /// Id of the index-pattern the search runs against
    #[serde(default)]
    pub index: Option<String>,
}

impl SearchSourceRef {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// One element of a dashboard's decoded `panelsJSON`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PanelEntry {
    #[serde(rename = "type", default)]
    pub panel_type: Option<String>,

    #[serde(default)]
    pub id: Option<String>,
}

impl PanelEntry {
    /// Parse a whole `panelsJSON` array
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(raw)?)
    }
}

/* Azure Resource Manager `resources` list payload */

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcesResponse {
    #[serde(default)]
    pub value: Vec<ResourceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub location: String,
}

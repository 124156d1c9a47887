//! Read-only model of the JSON emitted by `terraform show -json <planfile>`.
//!
//! Only the fields needed to find pending creations are modelled; everything
//! else in the document is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceChange {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub change: Change,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    pub actions: Vec<Action>,
    #[serde(default)]
    pub after: Option<serde_json::Value>,
    #[serde(default)]
    pub after_unknown: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    NoOp,
    Create,
    Read,
    Update,
    Delete,
    Forget,
    #[serde(other)]
    Unknown,
}

impl Plan {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resource changes that will create something, in plan order.
    ///
    /// Replacements (`["delete", "create"]` and `["create", "delete"]`) count
    /// as creations.
    pub fn creations(&self) -> impl Iterator<Item = &ResourceChange> {
        self.resource_changes.iter().filter(|rc| rc.is_creation())
    }
}

impl ResourceChange {
    pub fn is_creation(&self) -> bool {
        self.change.actions.contains(&Action::Create)
    }

    /// A string attribute of the planned resource.
    ///
    /// Returns `None` when the attribute is absent, null or not a string.
    pub fn after_str(&self, key: &str) -> Option<&str> {
        self.change
            .after
            .as_ref()
            .and_then(|after| after.get(key))
            .and_then(|value| value.as_str())
    }

    /// Whether Terraform marks the attribute as known only after apply.
    pub fn is_unknown(&self, key: &str) -> bool {
        self.change
            .after_unknown
            .as_ref()
            .and_then(|unknown| unknown.get(key))
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }
}

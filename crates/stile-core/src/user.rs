//! The member record returned by the portal.
//!
//! The portal sends the user object as free-form JSON; only a handful of
//! fields are meaningful to stile. Everything else is carried through
//! untouched so the persisted record stays byte-for-byte faithful to what
//! the server sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A member record as the portal returns it.
///
/// `id` is kept as raw JSON because the portal is inconsistent about whether
/// it sends a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Member identifier, number or string depending on the endpoint.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Any other fields the portal sent, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UserRecord {
    /// The identifier rendered as a plain string, `None` when the portal
    /// sent no id.
    ///
    /// Numbers lose their JSON quoting, strings come through as-is, anything
    /// else falls back to compact JSON text.
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Best available human name: full name, then username, then the id.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.full_name.as_deref().filter(|s| !s.is_empty()) {
            return name.to_string();
        }
        if let Some(name) = self.username.as_deref().filter(|s| !s.is_empty()) {
            return name.to_string();
        }
        self.id_string().unwrap_or_else(|| "member".to_string())
    }
}

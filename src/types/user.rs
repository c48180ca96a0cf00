use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of the authenticated principal, as returned next to the token.
///
/// The exchange does not interpret it, so every attribute the server sends is
/// kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Map<String, Value>);

impl User {
    /// Get a raw attribute of the user.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }
}

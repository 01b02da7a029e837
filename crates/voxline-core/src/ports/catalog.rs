//! Voice catalog port: read-only list of voices for selection UIs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::BackendError;

/// A selectable voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSummary {
    pub voice_id: String,
    pub display_name: String,
    /// Provider category (e.g. `"premade"`, `"cloned"`), when known.
    pub category: Option<String>,
}

/// Source of the voice list.
#[async_trait]
pub trait VoiceCatalog: Send + Sync {
    async fn list_voices(&self, api_key: &str) -> Result<Vec<VoiceSummary>, BackendError>;
}

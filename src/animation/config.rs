//! Animation runtime configuration

use serde::{Deserialize, Serialize};

use super::debug_draw::DebugDrawStyle;
use crate::core::types::Result;

/// Which take becomes active after loading an animation file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TakeSelection {
    /// The last loaded take becomes active
    #[default]
    Last,
    /// Keep the active take; only select a loaded take when none is active
    Keep,
}

/// Animator and debug visualization settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub take_selection: TakeSelection,
    pub debug_draw: DebugDrawStyle,
}

impl AnimationConfig {
    /// Parse from JSON, filling unspecified fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

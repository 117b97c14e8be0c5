//! Avatar Settings
//!
//! Configuration for [`Avatar`](crate::avatar::Avatar): which clip drives the
//! model, where playback starts, how fast the model turns under key input, and
//! which bones accept keyframe overrides.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use kinect_avatar::settings::{AvatarSettings, MaskMode};
//!
//! // Defaults: clip "Take 001", frame 0, torso-only overrides
//! let settings = AvatarSettings::default();
//!
//! // Every bone follows the clip
//! let settings = AvatarSettings {
//!     mask: MaskMode::All,
//!     ..Default::default()
//! };
//!
//! // From a JSON document; missing fields fall back to the defaults
//! let settings = AvatarSettings::from_json_str(r#"{ "start_frame": 4 }"#)?;
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;

/// Clip name exported by the humanoid rig.
pub const DEFAULT_CLIP_NAME: &str = "Take 001";

/// Selects which bones accept keyframe overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskMode {
    /// Direct torso children of `Pelvis` and `Spine`, derived from bone names.
    #[default]
    Torso,
    /// Every bone of the skeleton.
    All,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    /// Name of the clip started when the avatar is created.
    pub clip_name: String,
    /// Frame selected until the input source picks another.
    pub start_frame: usize,
    /// Yaw speed in radians per second while a turn key is held.
    pub turn_speed: f32,
    pub mask: MaskMode,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            clip_name: DEFAULT_CLIP_NAME.to_string(),
            start_frame: 0,
            turn_speed: 1.0,
            mask: MaskMode::default(),
        }
    }
}

impl AvatarSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

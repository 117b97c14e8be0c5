//! Kinect Avatar
//!
//! Frame-indexed pose resolution for a skinned humanoid avatar. A gesture or key
//! input source picks an animation frame each tick; [`AnimationPlayer`] turns
//! that frame into per-bone skin matrices for the renderer.
//!
//! # Modules
//!
//! - [`animation`]: clips, keyframes, bone masks, skinning data and the pose resolver
//! - [`avatar`]: the per-model controller combining the resolver with input state
//! - [`assets`]: JSON loading of skinning data
//! - [`input`]: platform-agnostic key state
//! - [`settings`]: avatar configuration
//! - [`errors`]: the crate error type

pub mod animation;
pub mod assets;
pub mod avatar;
pub mod errors;
pub mod input;
pub mod settings;

pub use animation::{AnimationClip, AnimationPlayer, BoneMask, FrameTable, Keyframe, SkinningData};
pub use avatar::Avatar;
pub use errors::{AvatarError, Result};
pub use input::{ButtonState, Input, Key};
pub use settings::{AvatarSettings, MaskMode};

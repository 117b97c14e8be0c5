//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`AvatarError`] covers all failure modes including:
//! - Malformed or incomplete skinning data
//! - Missing clips and bones
//! - Out-of-range frame selection
//! - Content loading (I/O and JSON) errors
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, AvatarError>`.
//!
//! ```rust,ignore
//! use kinect_avatar::errors::{AvatarError, Result};
//!
//! fn select(player: &mut AnimationPlayer, frame: usize) -> Result<()> {
//!     player.update_bone_transforms(frame)
//! }
//! ```

use thiserror::Error;

/// The main error type for the avatar crate.
///
/// Construction-time failures (skinning data, masks) and start-time failures
/// (clips) surface immediately; per-frame failures are limited to frame range
/// validation.
#[derive(Error, Debug)]
pub enum AvatarError {
    // ========================================================================
    // Skinning Data Errors
    // ========================================================================
    /// The model carries no skinning metadata (empty bind pose).
    #[error("Model does not contain skinning data")]
    MissingSkinningData,

    /// Two per-bone tables disagree on the bone count.
    #[error("Skinning table `{table}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending table
        table: &'static str,
        /// Bone count implied by the bind pose
        expected: usize,
        /// Length of the offending table
        actual: usize,
    },

    /// The skeleton hierarchy is not a root-first topological order.
    #[error("Invalid skeleton hierarchy at bone {bone}: parent {parent}")]
    InvalidHierarchy {
        /// Bone whose parent entry is invalid
        bone: usize,
        /// The parent id found in the hierarchy
        parent: i32,
    },

    /// Bone names were required but the skinning data carries none.
    #[error("Skinning data has no bone names")]
    MissingBoneNames,

    /// A named bone does not exist in the skeleton.
    #[error("Bone not found: {0}")]
    BoneNotFound(String),

    /// A bone id exceeds the skeleton's bone count.
    #[error("Bone {bone} out of range ({context}, bone count: {bone_count})")]
    BoneOutOfRange {
        /// Description of where the id came from
        context: String,
        /// The invalid bone id
        bone: usize,
        /// Number of bones in the skeleton
        bone_count: usize,
    },

    /// A bone mask references bones the skeleton does not have.
    #[error("Bone mask references bone {bone}, skeleton has {bone_count} bones")]
    InvalidBoneMask {
        /// The first invalid bone id found in the mask
        bone: usize,
        /// Number of bones in the skeleton
        bone_count: usize,
    },

    // ========================================================================
    // Playback Errors
    // ========================================================================
    /// The requested animation clip does not exist.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),

    /// The clip contains no keyframes, so it has no frames to select.
    #[error("Animation clip `{0}` has no keyframes")]
    EmptyClip(String),

    /// A frame was requested before any clip was started.
    #[error("No animation clip has been started")]
    NoActiveClip,

    /// The requested frame index is outside the active clip.
    #[error("Frame {frame} out of range (frame count: {frame_count})")]
    FrameOutOfRange {
        /// The rejected frame index
        frame: usize,
        /// Number of distinct frames in the active clip
        frame_count: usize,
    },

    // ========================================================================
    // Content Loading Errors
    // ========================================================================
    /// A keyframe time is negative, infinite or NaN.
    #[error("Invalid keyframe time {time} in clip `{clip}`")]
    InvalidKeyframeTime {
        /// Clip containing the keyframe
        clip: String,
        /// The rejected time, in seconds
        time: f64,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, AvatarError>`.
pub type Result<T> = std::result::Result<T, AvatarError>;

//! Pose Resolver
//!
//! [`AnimationPlayer`] decodes bone matrices from an animation clip at an
//! externally chosen frame index. There is no clock and no interpolation: the
//! caller (gesture recognition, key input) picks the frame every tick.
//!
//! # Data Flow
//!
//! ```text
//! frame ──► bone transforms (bind pose + masked keyframe overrides)
//!       ──► world transforms (root transform, then parent chain)
//!       ──► skin transforms  (world * inverse bind pose) ──► renderer
//! ```
//!
//! Matrices follow glam's column-vector convention, so "apply `A`, then `B`"
//! is written `B * A`.

use std::sync::Arc;
use std::time::Duration;

use glam::Mat4;

use crate::animation::bone_mask::BoneMask;
use crate::animation::clip::{AnimationClip, FrameTable};
use crate::animation::skinning::SkinningData;
use crate::errors::{AvatarError, Result};

/// Resolves local, world and skin transforms for one skinned model.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    skinning: Arc<SkinningData>,
    mask: BoneMask,

    // === Current Clip ===
    current_clip: Option<Arc<AnimationClip>>,
    current_frame: usize,
    frames: FrameTable,

    // === Live Pose ===
    // All three always hold exactly `skinning.bone_count()` entries.
    bone_transforms: Vec<Mat4>,
    world_transforms: Vec<Mat4>,
    skin_transforms: Vec<Mat4>,
}

impl AnimationPlayer {
    /// Creates a player for `skinning`; only bones in `mask` accept keyframe overrides.
    pub fn new(skinning: Arc<SkinningData>, mask: BoneMask) -> Result<Self> {
        let bone_count = skinning.bone_count();
        mask.validate(bone_count)?;

        Ok(Self {
            bone_transforms: skinning.bind_pose().to_vec(),
            world_transforms: vec![Mat4::IDENTITY; bone_count],
            skin_transforms: vec![Mat4::IDENTITY; bone_count],
            skinning,
            mask,
            current_clip: None,
            current_frame: 0,
            frames: FrameTable::default(),
        })
    }

    /// Creates a player whose keyframes may override every bone.
    pub fn unmasked(skinning: Arc<SkinningData>) -> Result<Self> {
        let mask = BoneMask::all(skinning.bone_count());
        Self::new(skinning, mask)
    }

    // ========================================================================
    // Clip Control
    // ========================================================================

    /// Starts decoding `clip`, positioned at `start_frame`.
    ///
    /// Keyframes are grouped by distinct time into dense frame indices and the
    /// bone transforms are reset to the bind pose. On error nothing changes.
    pub fn start_clip(&mut self, clip: Arc<AnimationClip>, start_frame: usize) -> Result<()> {
        self.skinning.check_clip(&clip)?;

        let frames = FrameTable::from_clip(&clip);
        if frames.is_empty() {
            return Err(AvatarError::EmptyClip(clip.name.clone()));
        }
        if start_frame >= frames.len() {
            return Err(AvatarError::FrameOutOfRange {
                frame: start_frame,
                frame_count: frames.len(),
            });
        }

        if !clip.keyframes.iter().any(|k| self.mask.contains(k.bone)) {
            log::warn!(
                "Clip `{}` has no keyframes for the {} masked bones; pose will stay at bind pose",
                clip.name,
                self.mask.len()
            );
        }
        log::debug!(
            "Starting clip `{}`: {} keyframes in {} frames, start frame {}",
            clip.name,
            clip.keyframes.len(),
            frames.len(),
            start_frame
        );

        self.bone_transforms
            .copy_from_slice(self.skinning.bind_pose());
        self.frames = frames;
        self.current_frame = start_frame;
        self.current_clip = Some(clip);
        Ok(())
    }

    /// Looks up `name` in the skinning data and starts it.
    pub fn start_clip_named(&mut self, name: &str, start_frame: usize) -> Result<()> {
        let clip = self.skinning.clip(name)?;
        self.start_clip(clip, start_frame)
    }

    // ========================================================================
    // Per-tick Update
    // ========================================================================

    /// Resolves the full pose for `frame` under `root_transform`.
    ///
    /// The frame is validated before any transform is touched.
    pub fn update(&mut self, root_transform: Mat4, frame: usize) -> Result<()> {
        self.update_bone_transforms(frame)?;
        self.update_world_transforms(root_transform);
        self.update_skin_transforms();
        Ok(())
    }

    /// Applies the keyframes of `frame` to the bone transforms.
    ///
    /// Keyframes targeting bones outside the mask are ignored.
    pub fn update_bone_transforms(&mut self, frame: usize) -> Result<()> {
        self.check_frame(frame)?;

        for keyframe in self.frames.frame(frame).unwrap_or_default() {
            if self.mask.contains(keyframe.bone) {
                self.bone_transforms[keyframe.bone] = keyframe.transform;
            }
        }
        self.current_frame = frame;
        Ok(())
    }

    /// Propagates bone transforms down the hierarchy.
    pub fn update_world_transforms(&mut self, root_transform: Mat4) {
        let hierarchy = self.skinning.skeleton_hierarchy();

        // Root bone.
        self.world_transforms[0] = root_transform * self.bone_transforms[0];

        // Child bones. Parents precede children, so each parent is already resolved.
        for bone in 1..self.world_transforms.len() {
            let parent = hierarchy[bone] as usize;
            self.world_transforms[bone] = self.world_transforms[parent] * self.bone_transforms[bone];
        }
    }

    /// Combines world transforms with the inverse bind pose.
    pub fn update_skin_transforms(&mut self) {
        let inverse_bind_pose = self.skinning.inverse_bind_pose();
        for ((skin, world), inverse_bind) in self
            .skin_transforms
            .iter_mut()
            .zip(&self.world_transforms)
            .zip(inverse_bind_pose)
        {
            *skin = *world * *inverse_bind;
        }
    }

    fn check_frame(&self, frame: usize) -> Result<()> {
        if self.current_clip.is_none() {
            return Err(AvatarError::NoActiveClip);
        }
        let frame_count = self.frames.len();
        if frame >= frame_count {
            return Err(AvatarError::FrameOutOfRange { frame, frame_count });
        }
        Ok(())
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Bone transforms relative to their parent bones.
    #[inline]
    #[must_use]
    pub fn bone_transforms(&self) -> &[Mat4] {
        &self.bone_transforms
    }

    /// Bone transforms in model (or root) space.
    #[inline]
    #[must_use]
    pub fn world_transforms(&self) -> &[Mat4] {
        &self.world_transforms
    }

    /// Bone transforms relative to the skinning bind pose.
    #[inline]
    #[must_use]
    pub fn skin_transforms(&self) -> &[Mat4] {
        &self.skin_transforms
    }

    /// Skin transforms as raw bytes, ready for a GPU storage buffer upload.
    #[inline]
    #[must_use]
    pub fn skin_transforms_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.skin_transforms)
    }

    #[inline]
    #[must_use]
    pub fn current_clip(&self) -> Option<&Arc<AnimationClip>> {
        self.current_clip.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Time value of the current frame; zero before any clip is started.
    #[must_use]
    pub fn current_time(&self) -> Duration {
        self.frames
            .time(self.current_frame)
            .unwrap_or(Duration::ZERO)
    }

    /// Number of distinct frames in the current clip.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    #[must_use]
    pub fn skinning(&self) -> &Arc<SkinningData> {
        &self.skinning
    }

    #[inline]
    #[must_use]
    pub fn bone_mask(&self) -> &BoneMask {
        &self.mask
    }
}

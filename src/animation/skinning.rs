use std::sync::Arc;

use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::animation::bone_mask::BoneMask;
use crate::animation::clip::AnimationClip;
use crate::errors::{AvatarError, Result};

/// Parent id stored in the hierarchy for the root bone.
pub const ROOT_PARENT: i32 = -1;

/// Bind pose, skeleton hierarchy, inverse bind pose and the animation clips of a
/// skinned model.
///
/// All per-bone tables are validated on construction and immutable afterwards:
/// - every table has one entry per bone
/// - bone 0 is the root
/// - every other bone's parent id is smaller than its own id
#[derive(Debug, Clone)]
pub struct SkinningData {
    bind_pose: Vec<Mat4>,
    inverse_bind_pose: Vec<Mat4>,
    skeleton_hierarchy: Vec<i32>,
    bone_names: Option<Vec<String>>,
    clips: FxHashMap<String, Arc<AnimationClip>>,
}

impl SkinningData {
    pub fn new(
        bind_pose: Vec<Mat4>,
        inverse_bind_pose: Vec<Mat4>,
        skeleton_hierarchy: Vec<i32>,
    ) -> Result<Self> {
        let bone_count = bind_pose.len();
        if bone_count == 0 {
            return Err(AvatarError::MissingSkinningData);
        }

        check_len("inverse_bind_pose", bone_count, inverse_bind_pose.len())?;
        check_len("skeleton_hierarchy", bone_count, skeleton_hierarchy.len())?;
        validate_hierarchy(&skeleton_hierarchy)?;

        Ok(Self {
            bind_pose,
            inverse_bind_pose,
            skeleton_hierarchy,
            bone_names: None,
            clips: FxHashMap::default(),
        })
    }

    pub fn with_bone_names(mut self, names: Vec<String>) -> Result<Self> {
        check_len("bone_names", self.bone_count(), names.len())?;
        self.bone_names = Some(names);
        Ok(self)
    }

    /// Registers a clip under its own name, replacing any clip of the same name.
    pub fn with_clip(mut self, clip: AnimationClip) -> Result<Self> {
        self.insert_clip(clip)?;
        Ok(self)
    }

    pub fn insert_clip(&mut self, clip: AnimationClip) -> Result<Arc<AnimationClip>> {
        self.check_clip(&clip)?;
        let clip = Arc::new(clip);
        if self
            .clips
            .insert(clip.name.clone(), Arc::clone(&clip))
            .is_some()
        {
            log::warn!("Animation clip `{}` replaced", clip.name);
        }
        Ok(clip)
    }

    /// Ensures every keyframe of `clip` targets a bone of this skeleton.
    pub fn check_clip(&self, clip: &AnimationClip) -> Result<()> {
        let bone_count = self.bone_count();
        match clip.max_bone() {
            Some(bone) if bone >= bone_count => Err(AvatarError::BoneOutOfRange {
                context: format!("clip `{}`", clip.name),
                bone,
                bone_count,
            }),
            _ => Ok(()),
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bind_pose.len()
    }

    #[inline]
    #[must_use]
    pub fn bind_pose(&self) -> &[Mat4] {
        &self.bind_pose
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_pose(&self) -> &[Mat4] {
        &self.inverse_bind_pose
    }

    #[inline]
    #[must_use]
    pub fn skeleton_hierarchy(&self) -> &[i32] {
        &self.skeleton_hierarchy
    }

    /// Parent of `bone`, `None` for the root or an unknown bone.
    #[must_use]
    pub fn parent(&self, bone: usize) -> Option<usize> {
        let parent = *self.skeleton_hierarchy.get(bone)?;
        usize::try_from(parent).ok()
    }

    #[inline]
    #[must_use]
    pub fn bone_names(&self) -> Option<&[String]> {
        self.bone_names.as_deref()
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_names.as_ref()?.iter().position(|n| n == name)
    }

    pub fn clip(&self, name: &str) -> Result<Arc<AnimationClip>> {
        self.clips
            .get(name)
            .cloned()
            .ok_or_else(|| AvatarError::ClipNotFound(name.to_string()))
    }

    pub fn clips(&self) -> impl Iterator<Item = &Arc<AnimationClip>> {
        self.clips.values()
    }

    /// The torso mask derived from this skeleton's bone names.
    pub fn torso_mask(&self) -> Result<BoneMask> {
        let names = self.bone_names().ok_or(AvatarError::MissingBoneNames)?;
        BoneMask::torso(names, &self.skeleton_hierarchy)
    }
}

fn check_len(table: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(AvatarError::LengthMismatch {
            table,
            expected,
            actual,
        })
    }
}

fn validate_hierarchy(hierarchy: &[i32]) -> Result<()> {
    for (bone, &parent) in hierarchy.iter().enumerate() {
        let valid = if bone == 0 {
            parent == ROOT_PARENT
        } else {
            usize::try_from(parent).is_ok_and(|p| p < bone)
        };
        if !valid {
            return Err(AvatarError::InvalidHierarchy { bone, parent });
        }
    }
    Ok(())
}

use std::time::Duration;

use glam::Mat4;
use serde::Deserialize;

use crate::animation::skinning::ROOT_PARENT;
use crate::animation::{AnimationClip, Keyframe, SkinningData};
use crate::errors::{AvatarError, Result};

/// On-disk description of a skinned model's skeleton and clips.
///
/// Matrices are 16 floats in column-major order. Bones are listed in id order;
/// `parent` is omitted (or `null`) for the root.
#[derive(Debug, Clone, Deserialize)]
pub struct SkinningAsset {
    pub bones: Vec<BoneAsset>,
    #[serde(default)]
    pub clips: Vec<ClipAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoneAsset {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
    pub bind_pose: [f32; 16],
    pub inverse_bind_pose: [f32; 16],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipAsset {
    pub name: String,
    pub keyframes: Vec<KeyframeAsset>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct KeyframeAsset {
    pub time_secs: f64,
    pub bone: usize,
    pub transform: [f32; 16],
}

impl SkinningAsset {
    /// Validates the document and converts it into runtime skinning data.
    pub fn into_skinning_data(self) -> Result<SkinningData> {
        let bone_count = self.bones.len();
        let mut bind_pose = Vec::with_capacity(bone_count);
        let mut inverse_bind_pose = Vec::with_capacity(bone_count);
        let mut hierarchy = Vec::with_capacity(bone_count);
        let mut names = Vec::with_capacity(bone_count);

        for bone in self.bones {
            bind_pose.push(Mat4::from_cols_array(&bone.bind_pose));
            inverse_bind_pose.push(Mat4::from_cols_array(&bone.inverse_bind_pose));
            // Ids beyond i32 can never be a valid parent; saturate so validation rejects them.
            hierarchy.push(bone.parent.map_or(ROOT_PARENT, |p| {
                i32::try_from(p).unwrap_or(i32::MAX)
            }));
            names.push(bone.name);
        }

        let mut data =
            SkinningData::new(bind_pose, inverse_bind_pose, hierarchy)?.with_bone_names(names)?;

        for clip in self.clips {
            data.insert_clip(clip.into_clip()?)?;
        }
        Ok(data)
    }
}

impl ClipAsset {
    pub fn into_clip(self) -> Result<AnimationClip> {
        let keyframes = self
            .keyframes
            .iter()
            .map(|k| {
                let time = Duration::try_from_secs_f64(k.time_secs).map_err(|_| {
                    AvatarError::InvalidKeyframeTime {
                        clip: self.name.clone(),
                        time: k.time_secs,
                    }
                })?;
                Ok(Keyframe::new(time, k.bone, Mat4::from_cols_array(&k.transform)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AnimationClip::new(self.name, keyframes))
    }
}

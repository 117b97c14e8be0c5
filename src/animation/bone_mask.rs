//! Bone masks restrict which bones accept keyframe overrides.
//!
//! The resolver consults the mask on every frame lookup; bones outside the
//! mask keep whatever local transform they already have (the bind pose unless
//! an earlier frame touched them).

use crate::errors::{AvatarError, Result};

/// Name of the bone whose direct children form the lower torso.
pub const PELVIS_BONE: &str = "Pelvis";
/// Name of the bone whose direct children form the upper torso.
pub const SPINE_BONE: &str = "Spine";
/// Children of [`SPINE_BONE`] that are never part of the torso mask.
pub const SPINE_EXCLUDED_BONES: [&str; 5] = ["Pelvis", "LShoulder", "RShoulder", "LChest", "RChest"];

/// An explicit set of bone ids allowed to receive keyframe overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoneMask {
    // Sorted, deduplicated.
    bones: Vec<usize>,
}

impl BoneMask {
    /// A mask admitting every bone of a skeleton with `bone_count` bones.
    #[must_use]
    pub fn all(bone_count: usize) -> Self {
        Self {
            bones: (0..bone_count).collect(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = usize>) -> Self {
        let mut bones: Vec<usize> = ids.into_iter().collect();
        bones.sort_unstable();
        bones.dedup();
        Self { bones }
    }

    /// Derives the torso mask from bone names and the skeleton hierarchy.
    ///
    /// The mask holds the direct children of [`PELVIS_BONE`] plus the direct
    /// children of [`SPINE_BONE`] whose names are not in
    /// [`SPINE_EXCLUDED_BONES`]. Names are compared as exact strings.
    pub fn torso<S: AsRef<str>>(names: &[S], hierarchy: &[i32]) -> Result<Self> {
        let find = |name: &str| {
            names
                .iter()
                .position(|n| AsRef::<str>::as_ref(n) == name)
                .ok_or_else(|| AvatarError::BoneNotFound(name.to_string()))
        };
        let pelvis = find(PELVIS_BONE)?;
        let spine = find(SPINE_BONE)?;

        let children_of = move |parent: usize| {
            hierarchy
                .iter()
                .enumerate()
                .filter(move |&(_, &p)| usize::try_from(p).ok() == Some(parent))
                .map(|(bone, _)| bone)
        };

        let lower = children_of(pelvis);
        let upper = children_of(spine).filter(|&bone| {
            names
                .get(bone)
                .is_none_or(|name| !SPINE_EXCLUDED_BONES.contains(&AsRef::<str>::as_ref(name)))
        });

        Ok(Self::from_ids(lower.chain(upper)))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, bone: usize) -> bool {
        self.bones.binary_search(&bone).is_ok()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones.iter().copied()
    }

    /// Checks every id against a skeleton with `bone_count` bones.
    pub fn validate(&self, bone_count: usize) -> Result<()> {
        // Sorted, so the last id is the largest.
        match self.bones.last() {
            Some(&bone) if bone >= bone_count => {
                Err(AvatarError::InvalidBoneMask { bone, bone_count })
            }
            _ => Ok(()),
        }
    }
}

impl FromIterator<usize> for BoneMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

pub mod bone_mask;
pub mod clip;
pub mod keyframe;
pub mod player;
pub mod skinning;

pub use bone_mask::BoneMask;
pub use clip::{AnimationClip, FrameTable};
pub use keyframe::Keyframe;
pub use player::AnimationPlayer;
pub use skinning::SkinningData;

use std::time::Duration;

use glam::Mat4;

/// A single bone override: at `time`, bone `bone` takes the local transform `transform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: Duration,
    pub bone: usize,
    pub transform: Mat4,
}

impl Keyframe {
    #[must_use]
    pub fn new(time: Duration, bone: usize, transform: Mat4) -> Self {
        Self {
            time,
            bone,
            transform,
        }
    }
}

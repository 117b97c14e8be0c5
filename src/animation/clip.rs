use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::animation::keyframe::Keyframe;

/// An unordered collection of bone keyframes, loaded once and treated as read-only.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: Duration,
    pub keyframes: Vec<Keyframe>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, keyframes: Vec<Keyframe>) -> Self {
        let duration = keyframes
            .iter()
            .map(|k| k.time)
            .max()
            .unwrap_or(Duration::ZERO);

        Self {
            name: name.into(),
            duration,
            keyframes,
        }
    }

    /// Largest bone id referenced by any keyframe.
    #[must_use]
    pub fn max_bone(&self) -> Option<usize> {
        self.keyframes.iter().map(|k| k.bone).max()
    }
}

/// Keyframes of a clip grouped by distinct time value.
///
/// Each distinct time gets a dense frame index in first-seen order, so frame
/// indices follow the clip's storage order rather than chronological order.
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    times: Vec<Duration>,
    frames: Vec<Vec<Keyframe>>,
}

impl FrameTable {
    #[must_use]
    pub fn from_keyframes(keyframes: &[Keyframe]) -> Self {
        let mut index_of: FxHashMap<Duration, usize> = FxHashMap::default();
        let mut times = Vec::new();
        let mut frames: Vec<Vec<Keyframe>> = Vec::new();

        for keyframe in keyframes {
            let index = *index_of.entry(keyframe.time).or_insert_with(|| {
                times.push(keyframe.time);
                frames.push(Vec::new());
                times.len() - 1
            });
            frames[index].push(*keyframe);
        }

        Self { times, frames }
    }

    #[must_use]
    pub fn from_clip(clip: &AnimationClip) -> Self {
        Self::from_keyframes(&clip.keyframes)
    }

    /// Number of distinct frames.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Keyframes sharing the time of `frame`.
    #[inline]
    #[must_use]
    pub fn frame(&self, frame: usize) -> Option<&[Keyframe]> {
        self.frames.get(frame).map(Vec::as_slice)
    }

    /// The time value that `frame` was assigned to.
    #[inline]
    #[must_use]
    pub fn time(&self, frame: usize) -> Option<Duration> {
        self.times.get(frame).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Duration, &[Keyframe])> {
        self.times
            .iter()
            .copied()
            .zip(self.frames.iter().map(Vec::as_slice))
    }
}

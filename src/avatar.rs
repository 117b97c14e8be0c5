//! Avatar Controller
//!
//! Owns the pose resolver of a humanoid model together with the state the
//! input source drives: the selected frame and the model's yaw.
//!
//! Per tick the host calls, in order:
//! 1. [`Avatar::change_frame`] with the frame chosen by gesture recognition (optional)
//! 2. [`Avatar::update`] with the elapsed time and current key state
//! 3. the renderer reads [`Avatar::world_matrix`] and [`Avatar::skin_transforms`]

use std::sync::Arc;
use std::time::Duration;

use glam::Mat4;

use crate::animation::{AnimationPlayer, BoneMask, SkinningData};
use crate::errors::{AvatarError, Result};
use crate::input::{Input, Key};
use crate::settings::{AvatarSettings, MaskMode};

#[derive(Debug, Clone)]
pub struct Avatar {
    player: AnimationPlayer,
    settings: AvatarSettings,
    frame: usize,
    /// Yaw around +Y, in radians.
    rotation: f32,
}

impl Avatar {
    /// Builds the bone mask, then starts the configured clip at the configured frame.
    pub fn new(skinning: Arc<SkinningData>, settings: AvatarSettings) -> Result<Self> {
        let mask = match settings.mask {
            MaskMode::Torso => skinning.torso_mask()?,
            MaskMode::All => BoneMask::all(skinning.bone_count()),
        };

        let mut player = AnimationPlayer::new(skinning, mask)?;
        player.start_clip_named(&settings.clip_name, settings.start_frame)?;

        log::info!(
            "Avatar ready: clip `{}`, {} frames, {} bones, {} masked",
            settings.clip_name,
            player.frame_count(),
            player.skinning().bone_count(),
            player.bone_mask().len()
        );

        Ok(Self {
            player,
            frame: settings.start_frame,
            settings,
            rotation: 0.0,
        })
    }

    /// Selects the frame resolved by the next [`update`](Self::update).
    pub fn change_frame(&mut self, frame: usize) -> Result<()> {
        let frame_count = self.player.frame_count();
        if frame >= frame_count {
            return Err(AvatarError::FrameOutOfRange { frame, frame_count });
        }
        self.frame = frame;
        Ok(())
    }

    /// Applies key input for this tick and resolves the pose.
    ///
    /// Left/right arrows turn the model while held. A number key pressed this
    /// tick selects that frame when the clip has it.
    pub fn update(&mut self, dt: Duration, input: &Input) -> Result<()> {
        if let Some(digit) = input.digit_down() {
            if self.change_frame(digit).is_err() {
                log::debug!("Ignoring frame key {digit}: clip has {} frames", self.frame_count());
            }
        }

        let step = dt.as_secs_f32() * self.settings.turn_speed;
        if input.get_key(Key::ArrowLeft) {
            self.rotation += step;
        }
        if input.get_key(Key::ArrowRight) {
            self.rotation -= step;
        }

        self.player.update(Mat4::IDENTITY, self.frame)
    }

    /// Model-to-world matrix for the draw step.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation)
    }

    #[inline]
    #[must_use]
    pub fn skin_transforms(&self) -> &[Mat4] {
        self.player.skin_transforms()
    }

    #[inline]
    #[must_use]
    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.player.frame_count()
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AvatarSettings {
        &self.settings
    }
}

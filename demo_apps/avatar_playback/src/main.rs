//! Headless avatar playback.
//!
//! Usage: `avatar_playback [skinning.json] [settings.json]`
//!
//! Without arguments a small synthetic humanoid rig is used. The demo stands in
//! for the sensor loop: it picks a new frame every quarter second, holds the
//! left arrow for the first half of the run, and logs the resulting pose.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use glam::{Mat4, Quat, Vec3};
use kinect_avatar::animation::{AnimationClip, Keyframe, SkinningData};
use kinect_avatar::assets::load_skinning_file;
use kinect_avatar::input::{ButtonState, Input, Key};
use kinect_avatar::settings::{AvatarSettings, DEFAULT_CLIP_NAME};
use kinect_avatar::Avatar;

const TICK: Duration = Duration::from_millis(16);
const TICKS: usize = 120;
const TICKS_PER_FRAME: usize = 15;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let skinning = match args.next() {
        Some(path) => load_skinning_file(&path)
            .with_context(|| format!("Failed to load skinning data from {path}"))?,
        None => synthetic_rig()?,
    };
    let settings = match args.next() {
        Some(path) => AvatarSettings::from_path(&path)
            .with_context(|| format!("Failed to load settings from {path}"))?,
        None => AvatarSettings::default(),
    };

    let mut avatar = Avatar::new(Arc::new(skinning), settings)?;
    let mut input = Input::new();
    input.inject_key(Key::ArrowLeft, ButtonState::Pressed);

    for tick in 0..TICKS {
        input.start_frame();
        if tick == TICKS / 2 {
            input.inject_key(Key::ArrowLeft, ButtonState::Released);
        }
        if tick % TICKS_PER_FRAME == 0 {
            let frame = (tick / TICKS_PER_FRAME) % avatar.frame_count();
            avatar.change_frame(frame)?;
        }

        avatar.update(TICK, &input)?;

        if tick % TICKS_PER_FRAME == 0 {
            let player = avatar.player();
            let (_, _, head) = player
                .world_transforms()
                .last()
                .copied()
                .unwrap_or(Mat4::IDENTITY)
                .to_scale_rotation_translation();
            log::info!(
                "tick {tick:3}: frame {} ({:?}), yaw {:.3} rad, last bone at {head}",
                player.current_frame(),
                player.current_time(),
                avatar.rotation(),
            );
        }
    }

    Ok(())
}

/// A seven-bone upper body with a four-frame torso sway clip.
fn synthetic_rig() -> anyhow::Result<SkinningData> {
    let names = ["Root", "Pelvis", "Belly", "Spine", "Chest", "LShoulder", "Head"];
    let hierarchy = vec![-1, 0, 1, 1, 3, 3, 3];

    let bind_pose: Vec<Mat4> = (0..names.len())
        .map(|bone| {
            let height = if bone == 0 { 0.0 } else { 0.25 };
            Mat4::from_translation(Vec3::new(0.0, height, 0.0))
        })
        .collect();

    let mut world: Vec<Mat4> = Vec::with_capacity(bind_pose.len());
    for (bone, local) in bind_pose.iter().enumerate() {
        let parent = usize::try_from(hierarchy[bone]).ok().map(|p| world[p]);
        world.push(parent.unwrap_or(Mat4::IDENTITY) * *local);
    }
    let inverse_bind_pose = world.iter().map(Mat4::inverse).collect();

    let keyframes = (0..4_u64)
        .flat_map(|frame| {
            let angle = (frame as f32 - 1.5) * 0.2;
            [2_usize, 3, 4].into_iter().map(move |bone| {
                Keyframe::new(
                    Duration::from_millis(frame * 250),
                    bone,
                    Mat4::from_rotation_translation(
                        Quat::from_rotation_z(angle),
                        Vec3::new(0.0, 0.25, 0.0),
                    ),
                )
            })
        })
        .collect();

    let data = SkinningData::new(bind_pose, inverse_bind_pose, hierarchy)?
        .with_bone_names(names.iter().map(ToString::to_string).collect())?
        .with_clip(AnimationClip::new(DEFAULT_CLIP_NAME, keyframes))?;
    Ok(data)
}

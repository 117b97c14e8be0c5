//! Animation System Tests
//!
//! Tests for:
//! - FrameTable grouping of keyframes by distinct time
//! - AnimationPlayer clip start (validation, bind pose reset)
//! - Bone transform overrides under a bone mask
//! - World transform propagation down the hierarchy
//! - Skin transform derivation from the inverse bind pose
//! - Frame range validation and error-path state preservation

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;
use std::time::Duration;

use glam::{Mat4, Quat, Vec3};

use kinect_avatar::animation::{
    AnimationClip, AnimationPlayer, BoneMask, FrameTable, Keyframe, SkinningData,
};
use kinect_avatar::errors::AvatarError;

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

const BONE_NAMES: [&str; 7] = [
    "Root",
    "Pelvis",
    "LowerTummy",
    "Spine",
    "UpperTummy",
    "LShoulder",
    "LArm",
];
const HIERARCHY: [i32; 7] = [-1, 0, 1, 1, 3, 3, 5];

fn mat4_approx(a: Mat4, b: Mat4) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn bind_pose() -> Vec<Mat4> {
    (0..BONE_NAMES.len())
        .map(|i| Mat4::from_translation(Vec3::new(0.0, 1.0, i as f32 * 0.1)))
        .collect()
}

/// Inverse of each bone's bind-pose world matrix.
fn inverse_bind_pose(bind: &[Mat4]) -> Vec<Mat4> {
    let mut world: Vec<Mat4> = Vec::with_capacity(bind.len());
    for (bone, local) in bind.iter().enumerate() {
        let parent = HIERARCHY[bone];
        let w = if parent < 0 {
            *local
        } else {
            world[parent as usize] * *local
        };
        world.push(w);
    }
    world.iter().map(Mat4::inverse).collect()
}

fn key(secs: u64, bone: usize, transform: Mat4) -> Keyframe {
    Keyframe::new(Duration::from_secs(secs), bone, transform)
}

fn pose_for(bone: usize, frame: usize) -> Mat4 {
    Mat4::from_rotation_translation(
        Quat::from_rotation_z(0.1 * (frame + 1) as f32),
        Vec3::new(bone as f32, frame as f32, 1.0),
    )
}

/// Three frames (times 0s, 1s, 2s), each overriding every bone.
fn full_clip(name: &str) -> AnimationClip {
    let keyframes = (0..3)
        .flat_map(|frame| {
            (0..BONE_NAMES.len()).map(move |bone| key(frame as u64, bone, pose_for(bone, frame)))
        })
        .collect();
    AnimationClip::new(name, keyframes)
}

fn skinning() -> Arc<SkinningData> {
    let bind = bind_pose();
    let inverse = inverse_bind_pose(&bind);
    let data = SkinningData::new(bind, inverse, HIERARCHY.to_vec())
        .and_then(|d| d.with_bone_names(BONE_NAMES.iter().map(ToString::to_string).collect()))
        .and_then(|d| d.with_clip(full_clip("Take 001")))
        .and_then(|d| d.with_clip(full_clip("Other")))
        .expect("valid skinning data");
    Arc::new(data)
}

fn torso_player() -> AnimationPlayer {
    let skinning = skinning();
    let mask = skinning.torso_mask().expect("torso mask");
    AnimationPlayer::new(skinning, mask).expect("player")
}

// ============================================================================
// FrameTable
// ============================================================================

#[test]
fn frame_table_groups_duplicate_times() {
    let keyframes = [
        key(0, 1, Mat4::IDENTITY),
        key(5, 2, Mat4::IDENTITY),
        key(5, 3, Mat4::IDENTITY),
        key(12, 4, Mat4::IDENTITY),
    ];
    let table = FrameTable::from_keyframes(&keyframes);

    assert_eq!(table.len(), 3);
    assert_eq!(table.time(0), Some(Duration::from_secs(0)));
    assert_eq!(table.time(1), Some(Duration::from_secs(5)));
    assert_eq!(table.time(2), Some(Duration::from_secs(12)));

    let frame1: Vec<usize> = table.frame(1).unwrap().iter().map(|k| k.bone).collect();
    assert_eq!(frame1, vec![2, 3]);
    assert_eq!(table.frame(0).unwrap().len(), 1);
    assert_eq!(table.frame(2).unwrap().len(), 1);
}

#[test]
fn start_clip_assigns_dense_frame_indices() {
    let mut player = AnimationPlayer::unmasked(skinning()).unwrap();
    let clip = AnimationClip::new(
        "sparse",
        vec![
            key(0, 1, Mat4::IDENTITY),
            key(5, 2, Mat4::IDENTITY),
            key(5, 3, Mat4::IDENTITY),
            key(12, 4, Mat4::IDENTITY),
        ],
    );

    player.start_clip(Arc::new(clip), 0).unwrap();
    assert_eq!(player.frame_count(), 3);
    assert!(player.update_bone_transforms(2).is_ok());
    assert!(matches!(
        player.update_bone_transforms(3),
        Err(AvatarError::FrameOutOfRange { frame: 3, frame_count: 3 })
    ));
}

#[test]
fn clip_duration_is_latest_keyframe() {
    let clip = full_clip("walk");
    assert_eq!(clip.duration, Duration::from_secs(2));
    assert_eq!(clip.max_bone(), Some(BONE_NAMES.len() - 1));
}

// ============================================================================
// Clip Start
// ============================================================================

#[test]
fn new_player_starts_at_bind_pose_without_clip() {
    let player = torso_player();
    let skinning = Arc::clone(player.skinning());

    assert_eq!(player.bone_transforms(), skinning.bind_pose());
    assert_eq!(player.world_transforms().len(), skinning.bone_count());
    assert_eq!(player.skin_transforms().len(), skinning.bone_count());
    assert!(player.current_clip().is_none());
    assert_eq!(player.frame_count(), 0);
    assert_eq!(player.current_time(), Duration::ZERO);
}

#[test]
fn start_clip_resets_to_bind_pose() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();
    player.update(Mat4::IDENTITY, 2).unwrap();
    assert_ne!(player.bone_transforms(), player.skinning().bind_pose());

    player.start_clip_named("Other", 1).unwrap();
    assert_eq!(player.bone_transforms(), player.skinning().bind_pose());
    assert_eq!(player.current_clip().unwrap().name, "Other");
    assert_eq!(player.current_frame(), 1);
    assert_eq!(player.current_time(), Duration::from_secs(1));
}

#[test]
fn missing_clip_leaves_state_untouched() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();
    player.update(Mat4::IDENTITY, 1).unwrap();
    let before = player.clone();

    let err = player.start_clip_named("Missing", 0).unwrap_err();
    assert!(matches!(err, AvatarError::ClipNotFound(ref name) if name == "Missing"));

    assert_eq!(player.current_clip().unwrap().name, "Take 001");
    assert_eq!(player.current_frame(), before.current_frame());
    assert_eq!(player.frame_count(), before.frame_count());
    assert_eq!(player.bone_transforms(), before.bone_transforms());
    assert_eq!(player.world_transforms(), before.world_transforms());
    assert_eq!(player.skin_transforms(), before.skin_transforms());
}

#[test]
fn start_frame_out_of_range_leaves_state_untouched() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 1).unwrap();
    player.update(Mat4::IDENTITY, 1).unwrap();
    let bones = player.bone_transforms().to_vec();

    let err = player.start_clip_named("Other", 3).unwrap_err();
    assert!(matches!(err, AvatarError::FrameOutOfRange { frame: 3, frame_count: 3 }));
    assert_eq!(player.current_clip().unwrap().name, "Take 001");
    assert_eq!(player.bone_transforms(), bones.as_slice());
}

#[test]
fn empty_clip_is_rejected() {
    let mut player = torso_player();
    let err = player
        .start_clip(Arc::new(AnimationClip::new("empty", Vec::new())), 0)
        .unwrap_err();
    assert!(matches!(err, AvatarError::EmptyClip(ref name) if name == "empty"));
    assert!(player.current_clip().is_none());
}

#[test]
fn clip_with_unknown_bone_is_rejected() {
    let mut player = torso_player();
    let clip = AnimationClip::new("broken", vec![key(0, 1, Mat4::IDENTITY), key(0, 99, Mat4::IDENTITY)]);

    let err = player.start_clip(Arc::new(clip), 0).unwrap_err();
    assert!(matches!(err, AvatarError::BoneOutOfRange { bone: 99, .. }));
    assert!(player.current_clip().is_none());
}

#[test]
fn mask_with_unknown_bone_is_rejected() {
    let err = AnimationPlayer::new(skinning(), BoneMask::from_ids([1, 42])).unwrap_err();
    assert!(matches!(
        err,
        AvatarError::InvalidBoneMask { bone: 42, bone_count: 7 }
    ));
}

// ============================================================================
// Bone Transforms
// ============================================================================

#[test]
fn update_before_start_is_rejected() {
    let mut player = torso_player();
    assert!(matches!(
        player.update(Mat4::IDENTITY, 0),
        Err(AvatarError::NoActiveClip)
    ));
    assert_eq!(player.bone_transforms(), player.skinning().bind_pose());
}

#[test]
fn masked_out_bones_keep_bind_pose_for_every_frame() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();
    let bind = player.skinning().bind_pose().to_vec();
    let mask = player.bone_mask().clone();

    for frame in 0..player.frame_count() {
        player.update_bone_transforms(frame).unwrap();
        for bone in (0..bind.len()).filter(|&b| !mask.contains(b)) {
            assert_eq!(
                player.bone_transforms()[bone], bind[bone],
                "bone {bone} changed at frame {frame}"
            );
        }
    }
}

#[test]
fn masked_bones_take_keyframe_transform() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();

    player.update_bone_transforms(2).unwrap();
    for bone in player.bone_mask().clone().iter() {
        assert_eq!(player.bone_transforms()[bone], pose_for(bone, 2));
    }
    assert_eq!(player.current_frame(), 2);
}

#[test]
fn unmasked_player_overrides_every_bone() {
    let mut player = AnimationPlayer::unmasked(skinning()).unwrap();
    player.start_clip_named("Take 001", 0).unwrap();
    player.update_bone_transforms(1).unwrap();

    for (bone, transform) in player.bone_transforms().iter().enumerate() {
        assert_eq!(*transform, pose_for(bone, 1));
    }
}

#[test]
fn overrides_persist_for_bones_absent_from_later_frames() {
    let mut player = AnimationPlayer::unmasked(skinning()).unwrap();
    let first = pose_for(2, 0);
    let clip = AnimationClip::new(
        "partial",
        vec![key(0, 2, first), key(1, 4, pose_for(4, 1))],
    );
    player.start_clip(Arc::new(clip), 0).unwrap();

    player.update_bone_transforms(0).unwrap();
    player.update_bone_transforms(1).unwrap();
    assert_eq!(player.bone_transforms()[2], first);
    assert_eq!(player.bone_transforms()[4], pose_for(4, 1));
}

#[test]
fn out_of_range_update_changes_nothing() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();
    player.update(Mat4::IDENTITY, 1).unwrap();
    let before = player.clone();

    let root = Mat4::from_translation(Vec3::X);
    let err = player.update(root, 7).unwrap_err();
    assert!(matches!(err, AvatarError::FrameOutOfRange { frame: 7, frame_count: 3 }));

    assert_eq!(player.current_frame(), 1);
    assert_eq!(player.bone_transforms(), before.bone_transforms());
    assert_eq!(player.world_transforms(), before.world_transforms());
    assert_eq!(player.skin_transforms(), before.skin_transforms());
}

// ============================================================================
// World Transforms
// ============================================================================

#[test]
fn root_world_is_root_transform_times_local() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();

    for root in [
        Mat4::IDENTITY,
        Mat4::from_rotation_y(FRAC_PI_2),
        Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_x(0.3),
            Vec3::new(1.0, -2.0, 3.0),
        ),
    ] {
        player.update(root, 0).unwrap();
        assert_eq!(player.world_transforms()[0], root * player.bone_transforms()[0]);
    }
}

#[test]
fn child_world_is_parent_world_times_local() {
    let mut player = AnimationPlayer::unmasked(skinning()).unwrap();
    player.start_clip_named("Take 001", 0).unwrap();
    player
        .update(Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)), 2)
        .unwrap();

    let local = player.bone_transforms();
    let world = player.world_transforms();
    for bone in 1..world.len() {
        let parent = HIERARCHY[bone] as usize;
        assert_eq!(world[bone], world[parent] * local[bone], "bone {bone}");
    }
}

#[test]
fn world_transforms_accumulate_translations() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();
    // No frame applied yet, so bone transforms are still the bind pose.
    player.update_world_transforms(Mat4::IDENTITY);

    let world = player.world_transforms();
    let (_, _, root_t) = world[0].to_scale_rotation_translation();
    assert!(root_t.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), EPSILON));
    let (_, _, pelvis_t) = world[1].to_scale_rotation_translation();
    assert!(pelvis_t.abs_diff_eq(Vec3::new(0.0, 2.0, 0.1), EPSILON));
}

// ============================================================================
// Skin Transforms
// ============================================================================

#[test]
fn skin_matches_recomputation_exactly() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();
    let root = Mat4::from_rotation_y(0.7);

    for frame in [0, 2, 1] {
        player.update(root, frame).unwrap();
        let inverse = player.skinning().inverse_bind_pose();
        for (bone, skin) in player.skin_transforms().iter().enumerate() {
            let expected = player.world_transforms()[bone] * inverse[bone];
            assert_eq!(skin.to_cols_array(), expected.to_cols_array(), "bone {bone}");
        }
    }
}

#[test]
fn bind_pose_skins_to_identity() {
    let skinning = skinning();
    let mut player = AnimationPlayer::new(Arc::clone(&skinning), BoneMask::empty()).unwrap();
    player.start_clip_named("Take 001", 0).unwrap();
    player.update(Mat4::IDENTITY, 0).unwrap();

    for skin in player.skin_transforms() {
        assert!(mat4_approx(*skin, Mat4::IDENTITY), "{skin:?}");
    }
}

#[test]
fn skin_bytes_cover_every_bone() {
    let mut player = torso_player();
    player.start_clip_named("Take 001", 0).unwrap();
    player.update(Mat4::IDENTITY, 0).unwrap();

    assert_eq!(
        player.skin_transforms_bytes().len(),
        player.skinning().bone_count() * std::mem::size_of::<Mat4>()
    );
}

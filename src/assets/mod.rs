//! Content loading for skinned models.
//!
//! The only format handled here is a JSON skinning document (see
//! [`SkinningAsset`]); model meshes and textures belong to the renderer.

pub mod skinning_asset;

use std::path::Path;

pub use skinning_asset::{BoneAsset, ClipAsset, KeyframeAsset, SkinningAsset};

use crate::animation::SkinningData;
use crate::errors::Result;

pub fn load_skinning_json(json: &str) -> Result<SkinningData> {
    let asset: SkinningAsset = serde_json::from_str(json)?;
    asset.into_skinning_data()
}

pub fn load_skinning_file(path: impl AsRef<Path>) -> Result<SkinningData> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let data = load_skinning_json(&json)?;
    log::info!(
        "Loaded skinning data from {}: {} bones, {} clips",
        path.display(),
        data.bone_count(),
        data.clips().count()
    );
    Ok(data)
}

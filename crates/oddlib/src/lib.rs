//! Oddlib - Oddworld game asset decoding library.
//!
//! This crate bundles the Oddlib crates behind one dependency.
//!
//! # Crates
//!
//! - [`oddlib_common`] - Byte cursor, CRC32C, colour conversion
//! - [`oddlib_lvl`] - LVL resource archives
//! - [`oddlib_anim`] - Animation sets and frame codecs
//! - [`oddlib_path`] - Collision line graphs and ray casting
//! - [`oddlib_audio`] - VAB sound banks and ADSR envelopes
//!
//! # Example
//!
//! ```no_run
//! use oddlib::prelude::*;
//!
//! let archive = LvlArchive::open("R1.LVL")?;
//! let set = oddlib::load_animation_set(&archive, "ABEBLOW.BAN", 10)?;
//! println!("{} animations, {} frames", set.animation_count(), set.frame_count());
//! # Ok::<(), oddlib::Error>(())
//! ```

use thiserror::Error;

pub use oddlib_anim as anim;
pub use oddlib_audio as audio;
pub use oddlib_common as common;
pub use oddlib_lvl as lvl;
pub use oddlib_path as path;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use oddlib_anim::{AnimVariant, AnimationCache, AnimationSet, Compression, Frame, Palette};
    pub use oddlib_audio::{SoundBank, Vab, VolumeEnvelope};
    pub use oddlib_common::ByteCursor;
    pub use oddlib_lvl::{LvlArchive, LvlChunk, LvlFile, ResourceType};
    pub use oddlib_path::{CollisionLines, LineMask, LineType, Point, RayHit};
}

/// Any error from the Oddlib crates.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Common(#[from] oddlib_common::Error),

    #[error(transparent)]
    Lvl(#[from] oddlib_lvl::Error),

    #[error(transparent)]
    Anim(#[from] oddlib_anim::Error),

    #[error(transparent)]
    Path(#[from] oddlib_path::Error),

    #[error(transparent)]
    Audio(#[from] oddlib_audio::Error),
}

/// Result type using the combined error.
pub type Result<T> = std::result::Result<T, Error>;

/// Read an `Anim` chunk from an archive file and parse it.
pub fn load_animation_set(
    archive: &lvl::LvlArchive,
    file_name: &str,
    id: u32,
) -> Result<anim::AnimationSet> {
    let chunk = archive
        .file_by_name(file_name)?
        .chunk_by_type_and_id(lvl::ResourceType::ANIM, id)?;
    let data = archive.read_data(chunk)?;
    Ok(anim::AnimationSet::parse(&data)?)
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

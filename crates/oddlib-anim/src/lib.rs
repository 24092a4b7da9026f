//! Animation set decoder for Oddworld game files.
//!
//! `Anim` chunks hold every sprite animation of one character or object: a
//! small header, a 15-bit palette, frame data compressed with one of several
//! codecs, per-frame placement records and a table of animation groups.
//!
//! The group table has no explicit count. Groups are found by walking from
//! the frame table offset and following the layout quirks of the two games
//! until the walk arrives back where it started.
//!
//! # Example
//!
//! ```no_run
//! use oddlib_anim::AnimationSet;
//!
//! let data = std::fs::read("ABEBLOW.ANIM")?;
//! let set = AnimationSet::parse(&data)?;
//!
//! for animation in set.animations() {
//!     println!("{} frames at {} fps", animation.frame_count, animation.fps);
//! }
//!
//! for frame in set.frames() {
//!     let frame = frame?;
//!     let rgba = set.palette().to_rgba8(&frame);
//!     println!("{}x{}: {} bytes", frame.actual_width, frame.height, rgba.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bits;
mod cache;
pub mod codec;
mod error;
mod frame;
mod palette;
mod set;

pub use cache::{AnimationCache, CacheStats};
pub use codec::Compression;
pub use error::{Error, Result};
pub use frame::{ColourDepth, Frame, FrameHeader};
pub use palette::{Palette, PaletteEntry};
pub use set::{
    AnimHeader, AnimVariant, AnimationHeader, AnimationSet, CollisionRect, FrameInfo,
    MAX_DISCOVERY_STEPS,
};

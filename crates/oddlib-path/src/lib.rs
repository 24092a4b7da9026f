//! Collision lines of Oddworld level paths.
//!
//! A `Path` chunk stores the level's collision geometry as a flat table of
//! segments whose neighbours are given as indices into the same table. This
//! crate turns that table into an index-stable graph ([`CollisionLines`])
//! that can be traced chain by chain and ray cast against.
//!
//! # Example
//!
//! ```no_run
//! use oddlib_path::{parse_collision_items, CollisionLines, LineMask, LineType, Point};
//!
//! let data = std::fs::read("S1.PTH")?;
//! let items = parse_collision_items(&data, 0x400, 120)?;
//! let lines = CollisionLines::build(&items);
//!
//! let floor = LineMask::of(LineType::Floor) | LineType::BackgroundFloor;
//! if let Some(hit) = lines.ray_cast(Point::new(100.0, 0.0), Point::new(100.0, 480.0), floor) {
//!     println!("floor at {:?} (line {})", hit.point, hit.line);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod graph;
mod line;
mod raw;
mod raycast;

pub use error::{Error, Result};
pub use graph::CollisionLines;
pub use line::{CollisionLine, LineId, LineMask, LineType, Link, Point};
pub use raw::{parse_collision_items, RawCollisionItem, RawLink};
pub use raycast::RayHit;

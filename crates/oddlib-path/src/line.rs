//! Collision line types.

use std::fmt;
use std::ops::BitOr;

/// A point in level space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Index of a line slot in a [`crate::CollisionLines`] arena.
///
/// Slots never move, so an id stays valid for as long as the arena lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LineId(pub usize);

impl LineId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification of a collision line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LineType {
    Floor,
    WallLeft,
    WallRight,
    Ceiling,
    BackgroundFloor,
    BackgroundWallLeft,
    BackgroundWallRight,
    BackgroundCeiling,
    /// Chains of these are expected to join end to start.
    TrackLine,
    Art,
    BulletWall,
    MineCarFloor,
    MineCarWall,
    MineCarCeiling,
    FlyingSligCeiling,
    Unknown(u16),
}

impl LineType {
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Floor,
            1 => Self::WallLeft,
            2 => Self::WallRight,
            3 => Self::Ceiling,
            4 => Self::BackgroundFloor,
            5 => Self::BackgroundWallLeft,
            6 => Self::BackgroundWallRight,
            7 => Self::BackgroundCeiling,
            8 => Self::TrackLine,
            9 => Self::Art,
            10 => Self::BulletWall,
            11 => Self::MineCarFloor,
            12 => Self::MineCarWall,
            13 => Self::MineCarCeiling,
            17 => Self::FlyingSligCeiling,
            other => Self::Unknown(other),
        }
    }

    pub const fn raw(self) -> u16 {
        match self {
            Self::Floor => 0,
            Self::WallLeft => 1,
            Self::WallRight => 2,
            Self::Ceiling => 3,
            Self::BackgroundFloor => 4,
            Self::BackgroundWallLeft => 5,
            Self::BackgroundWallRight => 6,
            Self::BackgroundCeiling => 7,
            Self::TrackLine => 8,
            Self::Art => 9,
            Self::BulletWall => 10,
            Self::MineCarFloor => 11,
            Self::MineCarWall => 12,
            Self::MineCarCeiling => 13,
            Self::FlyingSligCeiling => 17,
            Self::Unknown(raw) => raw,
        }
    }
}

/// Set of line types, one bit per raw type code.
///
/// Codes of 32 and above cannot be represented and never match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LineMask(pub u32);

impl LineMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    pub const fn of(line_type: LineType) -> Self {
        let raw = line_type.raw();
        if raw < 32 {
            Self(1 << raw)
        } else {
            Self::NONE
        }
    }

    pub const fn contains(self, line_type: LineType) -> bool {
        let bit = Self::of(line_type).0;
        bit != 0 && self.0 & bit != 0
    }
}

impl BitOr for LineMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<LineType> for LineMask {
    type Output = Self;

    fn bitor(self, rhs: LineType) -> Self {
        self | Self::of(rhs)
    }
}

impl From<LineType> for LineMask {
    fn from(line_type: LineType) -> Self {
        Self::of(line_type)
    }
}

/// Resolved neighbours of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Link {
    pub previous: Option<LineId>,
    pub next: Option<LineId>,
}

/// One collision segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CollisionLine {
    pub p1: Point,
    pub p2: Point,
    pub line_type: LineType,
    pub link: Link,
    /// Secondary link used by junctions.
    pub optional_link: Link,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        for raw in 0..40 {
            assert_eq!(LineType::from_raw(raw).raw(), raw);
        }
        assert_eq!(LineType::from_raw(8), LineType::TrackLine);
        assert_eq!(LineType::from_raw(14), LineType::Unknown(14));
    }

    #[test]
    fn test_mask() {
        let mask = LineMask::of(LineType::Floor) | LineType::Ceiling;
        assert!(mask.contains(LineType::Floor));
        assert!(mask.contains(LineType::Ceiling));
        assert!(!mask.contains(LineType::WallLeft));
        assert!(LineMask::ALL.contains(LineType::FlyingSligCeiling));
        assert!(!LineMask::ALL.contains(LineType::Unknown(40)));
        assert!(!LineMask::NONE.contains(LineType::Floor));
    }
}

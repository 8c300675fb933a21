//! Quadrant broad phase
//!
//! The table is split into four quadrants around its center. Each quadrant
//! names exactly one bumper, at most one flipper and one border sub-chain that
//! a ball inside it can touch. This is a static lookup tuned to the table
//! layout, not a spatial index: it assumes the classic two-ball table and
//! does not generalize to arbitrary geometry.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::FlipperSide;

/// One quarter of the table (y axis points down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Classify a position relative to the table center
    ///
    /// Points exactly on a split line belong to the left/top side.
    pub fn classify(pos: Vec2, center: Vec2) -> Self {
        match (pos.x > center.x, pos.y > center.y) {
            (false, false) => Quadrant::TopLeft,
            (true, false) => Quadrant::TopRight,
            (false, true) => Quadrant::BottomLeft,
            (true, true) => Quadrant::BottomRight,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a ball in one quadrant is tested against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Index into `PhysicsScene::obstacles`
    pub obstacle: usize,
    #[serde(default)]
    pub flipper: Option<FlipperSide>,
    /// Border vertex indices forming the chain to test, in order
    pub border: Vec<usize>,
}

/// Quadrant → region lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    pub top_left: Region,
    pub top_right: Region,
    pub bottom_left: Region,
    pub bottom_right: Region,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::classic()
    }
}

impl RegionTable {
    /// Mapping for the classic eight-point table
    ///
    /// Top quadrants wrap around the end of the border array.
    pub fn classic() -> Self {
        Self {
            top_left: Region {
                obstacle: 0,
                flipper: None,
                border: vec![7, 0, 1],
            },
            top_right: Region {
                obstacle: 1,
                flipper: None,
                border: vec![6, 7, 0],
            },
            bottom_left: Region {
                obstacle: 3,
                flipper: Some(FlipperSide::Left),
                border: vec![0, 1, 2, 3, 4],
            },
            bottom_right: Region {
                obstacle: 2,
                flipper: Some(FlipperSide::Right),
                border: vec![3, 4, 5, 6, 7],
            },
        }
    }

    pub fn region(&self, quadrant: Quadrant) -> &Region {
        match quadrant {
            Quadrant::TopLeft => &self.top_left,
            Quadrant::TopRight => &self.top_right,
            Quadrant::BottomLeft => &self.bottom_left,
            Quadrant::BottomRight => &self.bottom_right,
        }
    }

    /// Find the quadrant and region for a ball position
    pub fn lookup(&self, pos: Vec2, center: Vec2) -> (Quadrant, &Region) {
        let quadrant = Quadrant::classify(pos, center);
        (quadrant, self.region(quadrant))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, &Region)> {
        Quadrant::ALL.into_iter().map(move |q| (q, self.region(q)))
    }
}

//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by ball index)
//! - No rendering or platform dependencies

pub mod broad_phase;
pub mod collision;
pub mod geometry;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use broad_phase::{Quadrant, Region, RegionTable};
pub use collision::{
    handle_ball_ball_collision, handle_ball_border_chain_collision, handle_ball_border_collision,
    handle_ball_circle_obstacle_collision, handle_ball_flipper_collision, reflect_velocity,
};
pub use geometry::{closest_point_on_segment, length, rotate_polygon};
pub use snapshot::{CircleSnapshot, FlipperSnapshot, SceneSnapshot};
pub use state::{Ball, Border, CircleObstacle, Flipper, FlipperSide, PhysicsScene};
pub use tick::{TickInput, tick};

//! Scene state and core simulation types
//!
//! Everything the fixed-step tick reads or mutates lives here.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::broad_phase::RegionTable;
use super::geometry::{length, rotate_polygon};
use crate::config::{BallConfig, FlipperConfig, ObstacleConfig, SceneConfig};
use crate::consts::*;
use crate::error::SceneError;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Energy kept in ball-ball contacts (0 = inelastic, 1 = elastic)
    pub restitution: f32,
}

impl Ball {
    /// Create a ball whose mass follows its area (π·r²)
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, restitution: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass: std::f32::consts::PI * radius * radius,
            restitution,
        }
    }

    pub fn from_config(config: &BallConfig) -> Self {
        let mut ball = Self::new(config.pos, config.vel, config.radius, config.restitution);
        if let Some(mass) = config.mass {
            ball.mass = mass;
        }
        ball
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity
    #[inline]
    pub fn integrate(&mut self, dt: f32, gravity: Vec2) {
        self.vel += gravity * dt;
        self.pos += self.vel * dt;
    }
}

/// A static circular bumper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleObstacle {
    pub pos: Vec2,
    pub radius: f32,
    /// Outward normal speed given to a ball on contact
    pub push_vel: f32,
}

impl CircleObstacle {
    pub fn new(pos: Vec2, radius: f32, push_vel: f32) -> Self {
        Self {
            pos,
            radius,
            push_vel,
        }
    }

    pub fn from_config(config: &ObstacleConfig) -> Self {
        Self::new(config.pos, config.radius, config.push_vel)
    }
}

/// Which of the two flippers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipperSide {
    Left,
    Right,
}

impl FlipperSide {
    pub const ALL: [FlipperSide; 2] = [FlipperSide::Left, FlipperSide::Right];

    /// Slot in `PhysicsScene::flippers`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            FlipperSide::Left => 0,
            FlipperSide::Right => 1,
        }
    }

    /// Horizontal direction the paddle extends from its pivot
    #[inline]
    pub fn extent_dir(self) -> f32 {
        match self {
            FlipperSide::Left => 1.0,
            FlipperSide::Right => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlipperSide::Left => "left",
            FlipperSide::Right => "right",
        }
    }
}

impl fmt::Display for FlipperSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player-controlled paddle pivoting about one end
///
/// The stored polygon is the unrotated rest shape. The live shape is always
/// recomputed from it, see [`Flipper::live_polygon`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flipper {
    /// Rest polygon; vertex 5 is the pivot, vertex 2 the tip
    pub polygon: [Vec2; 6],
    pub length: f32,
    /// End-cap radius (half the paddle thickness)
    pub radius: f32,
    /// Table-design orientation (degrees)
    pub rest_angle: f32,
    /// Maximum swing magnitude (degrees)
    pub max_rotation: f32,
    /// Swing direction, +1 or -1
    pub sign: f32,
    /// Swing rate (degrees/second)
    pub angular_vel: f32,
    /// Current swing in [0, max_rotation]
    pub rotation: f32,
    /// Signed swing rate measured over the last tick
    pub current_angular_vel: f32,
    pub pressed: bool,
}

impl Flipper {
    /// `max_rotation` is signed: its sign picks the swing direction
    pub fn new(
        polygon: [Vec2; 6],
        length: f32,
        radius: f32,
        rest_angle: f32,
        max_rotation: f32,
        angular_vel: f32,
    ) -> Self {
        Self {
            polygon,
            length,
            radius,
            rest_angle,
            max_rotation: max_rotation.abs(),
            sign: if max_rotation < 0.0 { -1.0 } else { 1.0 },
            angular_vel,
            rotation: 0.0,
            current_angular_vel: 0.0,
            pressed: false,
        }
    }

    pub fn from_config(side: FlipperSide, config: &FlipperConfig) -> Self {
        let polygon = Self::paddle_polygon(config.anchor, config.length, config.radius, side);
        Self::new(
            polygon,
            config.length,
            config.radius,
            config.rest_angle,
            config.max_rotation,
            config.angular_vel,
        )
    }

    /// Build the rest polygon from the paddle's top anchor corner
    ///
    /// The paddle extends `length` toward the table center and is `2·radius`
    /// thick. Vertex 5 (pivot) and vertex 2 (tip) sit on the center line.
    pub fn paddle_polygon(anchor: Vec2, length: f32, radius: f32, side: FlipperSide) -> [Vec2; 6] {
        let (x, y) = (anchor.x, anchor.y);
        let tip_x = x + side.extent_dir() * length;
        [
            Vec2::new(x, y + 2.0 * radius),
            Vec2::new(tip_x, y + 2.0 * radius),
            Vec2::new(tip_x, y + radius),
            Vec2::new(tip_x, y),
            Vec2::new(x, y),
            Vec2::new(x, y + radius),
        ]
    }

    /// Advance the swing by one step toward the pressed/released target
    pub fn simulate(&mut self, dt: f32) {
        let prev_rotation = self.rotation;

        if self.pressed {
            self.rotation = (self.rotation + dt * self.angular_vel).min(self.max_rotation);
        } else {
            self.rotation = (self.rotation - dt * self.angular_vel).max(0.0);
        }

        self.current_angular_vel = self.sign * (self.rotation - prev_rotation) / dt;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Rest polygon rotated about the pivot by `angle` degrees
    pub fn rotate(&self, angle: f32) -> [Vec2; 6] {
        rotate_polygon(&self.polygon, FLIPPER_PIVOT, angle)
    }

    /// Current total orientation (degrees)
    #[inline]
    pub fn angle(&self) -> f32 {
        self.rest_angle + self.sign * self.rotation
    }

    /// Paddle shape at its current rotation
    pub fn live_polygon(&self) -> [Vec2; 6] {
        self.rotate(self.angle())
    }

    #[inline]
    pub fn pivot(&self) -> Vec2 {
        self.polygon[FLIPPER_PIVOT]
    }

    /// Hit-test helper: distance from the pivot minus the paddle length
    pub fn select(&self, pos: Vec2) -> f32 {
        length(self.pivot() - pos) - self.length
    }
}

/// Static table walls, wound counter-clockwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub vertices: Vec<Vec2>,
}

impl Border {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Complete scene state for one game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsScene {
    pub border: Border,
    pub balls: Vec<Ball>,
    pub obstacles: Vec<CircleObstacle>,
    /// Indexed by [`FlipperSide::index`]
    pub flippers: [Flipper; 2],
    pub gravity: Vec2,
    pub dt: f32,
    /// Quadrant split point
    pub center: Vec2,
    /// Broad-phase quadrant lookup
    pub regions: RegionTable,
    pub score: u64,
    /// Starts `false`: a new scene runs until a pause toggle arrives
    pub paused: bool,
    /// Simulation tick counter
    pub tick_count: u64,
}

impl PhysicsScene {
    /// Validate `config` and build a ready-to-run scene from it
    pub fn new(config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let scene = Self {
            border: Border::new(config.border.clone()),
            balls: config.balls.iter().map(Ball::from_config).collect(),
            obstacles: config
                .obstacles
                .iter()
                .map(CircleObstacle::from_config)
                .collect(),
            flippers: [
                Flipper::from_config(FlipperSide::Left, &config.left_flipper),
                Flipper::from_config(FlipperSide::Right, &config.right_flipper),
            ],
            gravity: config.gravity,
            dt: config.dt,
            center: Vec2::new(config.table.width / 2.0, config.table.height / 2.0),
            regions: config.regions.clone(),
            score: 0,
            paused: false,
            tick_count: 0,
        };

        log::info!(
            "Scene built: {} balls, {} obstacles, {} border points, dt={}",
            scene.balls.len(),
            scene.obstacles.len(),
            scene.border.len(),
            scene.dt
        );

        Ok(scene)
    }

    /// Replace this scene with a freshly built one
    ///
    /// On error the current scene is left as it was.
    pub fn restart(&mut self, config: &SceneConfig) -> Result<(), SceneError> {
        *self = Self::new(config)?;
        log::info!("Scene restarted");
        Ok(())
    }

    pub fn flipper(&self, side: FlipperSide) -> &Flipper {
        &self.flippers[side.index()]
    }

    pub fn flipper_mut(&mut self, side: FlipperSide) -> &mut Flipper {
        &mut self.flippers[side.index()]
    }
}

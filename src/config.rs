//! Scene configuration
//!
//! Everything a scene is built from: table size, border, balls, bumpers,
//! flippers and the broad-phase region table. The default is the classic
//! 540×900 table. Configurations can also be loaded from JSON.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SceneError};
use crate::sim::{FlipperSide, Quadrant, RegionTable};

/// Playfield size; its center splits the broad-phase quadrants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: TABLE_WIDTH,
            height: TABLE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallConfig {
    pub pos: Vec2,
    #[serde(default)]
    pub vel: Vec2,
    pub radius: f32,
    /// Defaults to π·radius²
    #[serde(default)]
    pub mass: Option<f32>,
    pub restitution: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub pos: Vec2,
    pub radius: f32,
    pub push_vel: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipperConfig {
    /// Top corner of the paddle at its pivot end
    pub anchor: Vec2,
    pub length: f32,
    /// End-cap radius
    pub radius: f32,
    /// Degrees
    pub rest_angle: f32,
    /// Signed: the sign picks the swing direction (degrees)
    pub max_rotation: f32,
    /// Degrees per second
    pub angular_vel: f32,
    /// Input identifier that holds this flipper up
    pub key: String,
}

/// Full scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub table: TableConfig,
    /// Counter-clockwise wall polyline
    pub border: Vec<Vec2>,
    pub balls: Vec<BallConfig>,
    pub obstacles: Vec<ObstacleConfig>,
    pub left_flipper: FlipperConfig,
    pub right_flipper: FlipperConfig,
    #[serde(default)]
    pub regions: RegionTable,
    #[serde(default = "default_gravity")]
    pub gravity: Vec2,
    #[serde(default = "default_dt")]
    pub dt: f32,
}

fn default_gravity() -> Vec2 {
    Vec2::from(GRAVITY)
}

fn default_dt() -> f32 {
    SIM_DT
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl SceneConfig {
    /// The classic two-ball, four-bumper table
    pub fn classic() -> Self {
        let (w, h) = (TABLE_WIDTH, TABLE_HEIGHT);

        let border = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, h * 0.7),
            Vec2::new(w * 0.3, h * 0.9),
            Vec2::new(w * 0.3, h),
            Vec2::new(w * 0.7, h),
            Vec2::new(w * 0.7, h * 0.9),
            Vec2::new(w, h * 0.7),
            Vec2::new(w, 0.0),
        ];

        let balls = vec![
            BallConfig {
                pos: Vec2::new(w * 0.25, h * 0.05),
                vel: Vec2::new(-1500.0, 0.0),
                radius: 10.0,
                mass: None,
                restitution: 1.0,
            },
            BallConfig {
                pos: Vec2::new(w * 0.8, h * 0.6),
                vel: Vec2::ZERO,
                radius: 10.0,
                mass: None,
                restitution: 1.0,
            },
        ];

        let obstacle = |x: f32, y: f32, radius: f32| ObstacleConfig {
            pos: Vec2::new(x * w, y * h),
            radius,
            push_vel: 200.0,
        };
        let obstacles = vec![
            obstacle(0.25, 0.2, 70.0),
            obstacle(0.75, 0.4, 50.0),
            obstacle(0.65, 0.7, 40.0),
            obstacle(0.2, 0.61, 50.0),
        ];

        let flipper_radius = (w * 0.02).floor();
        let flipper_length = (w * 0.15).floor();
        let flipper = |x: f32, rest_angle: f32, max_rotation: f32, key: &str| FlipperConfig {
            anchor: Vec2::new(x, h * 0.9),
            length: flipper_length,
            radius: flipper_radius,
            rest_angle,
            max_rotation,
            angular_vel: 1000.0,
            key: key.to_string(),
        };

        Self {
            table: TableConfig {
                width: w,
                height: h,
            },
            border,
            balls,
            obstacles,
            left_flipper: flipper(w * 0.3, 30.0, -80.0, "a"),
            right_flipper: flipper(w * 0.7, -30.0, 80.0, "d"),
            regions: RegionTable::classic(),
            gravity: default_gravity(),
            dt: SIM_DT,
        }
    }

    /// Parse a configuration from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn flipper(&self, side: FlipperSide) -> &FlipperConfig {
        match side {
            FlipperSide::Left => &self.left_flipper,
            FlipperSide::Right => &self.right_flipper,
        }
    }

    /// Check every construction precondition
    pub fn validate(&self) -> Result<(), SceneError> {
        let TableConfig { width, height } = self.table;
        if !is_positive(width) || !is_positive(height) {
            return Err(SceneError::InvalidTable { width, height });
        }
        if !is_positive(self.dt) {
            return Err(SceneError::InvalidTimeStep(self.dt));
        }
        if !self.gravity.is_finite() {
            return Err(SceneError::InvalidGravity {
                x: self.gravity.x,
                y: self.gravity.y,
            });
        }

        if self.border.len() < 3 {
            return Err(SceneError::BorderTooShort(self.border.len()));
        }
        if let Some(i) = self.border.iter().position(|p| !p.is_finite()) {
            return Err(SceneError::InvalidBorderPoint(i));
        }
        if let Some(index) = self.border.windows(2).position(|e| e[0] == e[1]) {
            return Err(SceneError::DegenerateBorderEdge {
                index,
                next: index + 1,
            });
        }

        for (index, ball) in self.balls.iter().enumerate() {
            ball.validate(index)?;
        }
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            obstacle.validate(index)?;
        }
        for side in FlipperSide::ALL {
            self.flipper(side).validate(side)?;
        }

        self.validate_regions()
    }

    fn validate_regions(&self) -> Result<(), SceneError> {
        for (quadrant, region) in self.regions.iter() {
            if region.obstacle >= self.obstacles.len() {
                return Err(SceneError::UnknownObstacle {
                    quadrant,
                    index: region.obstacle,
                    count: self.obstacles.len(),
                });
            }
            if region.border.len() < 2 {
                return Err(SceneError::BorderChainTooShort {
                    quadrant,
                    len: region.border.len(),
                });
            }
            check_chain(quadrant, &region.border, &self.border)?;
        }
        Ok(())
    }
}

/// Every index must exist and every edge must have length
fn check_chain(quadrant: Quadrant, chain: &[usize], border: &[Vec2]) -> Result<(), SceneError> {
    if let Some(&index) = chain.iter().find(|&&i| i >= border.len()) {
        return Err(SceneError::UnknownBorderPoint {
            quadrant,
            index,
            count: border.len(),
        });
    }
    match chain
        .windows(2)
        .find(|e| border[e[0]] == border[e[1]])
    {
        Some(e) => Err(SceneError::DegenerateChainEdge {
            quadrant,
            from: e[0],
            to: e[1],
        }),
        None => Ok(()),
    }
}

impl BallConfig {
    fn validate(&self, index: usize) -> Result<(), SceneError> {
        if !self.pos.is_finite() || !self.vel.is_finite() {
            return Err(SceneError::NonFiniteBall { index });
        }
        if !is_positive(self.radius) {
            return Err(SceneError::InvalidBall {
                index,
                field: "radius",
                value: self.radius,
            });
        }
        if let Some(mass) = self.mass.filter(|&m| !is_positive(m)) {
            return Err(SceneError::InvalidBall {
                index,
                field: "mass",
                value: mass,
            });
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(SceneError::InvalidRestitution {
                index,
                value: self.restitution,
            });
        }
        Ok(())
    }
}

impl ObstacleConfig {
    fn validate(&self, index: usize) -> Result<(), SceneError> {
        if !self.pos.is_finite() {
            return Err(SceneError::InvalidObstacle {
                index,
                field: "position",
                value: f32::NAN,
            });
        }
        if !is_positive(self.radius) {
            return Err(SceneError::InvalidObstacle {
                index,
                field: "radius",
                value: self.radius,
            });
        }
        if !self.push_vel.is_finite() {
            return Err(SceneError::InvalidObstacle {
                index,
                field: "push_vel",
                value: self.push_vel,
            });
        }
        Ok(())
    }
}

impl FlipperConfig {
    fn validate(&self, side: FlipperSide) -> Result<(), SceneError> {
        let invalid = |field: &'static str, value: f32| SceneError::InvalidFlipper {
            side,
            field,
            value,
        };

        if !self.anchor.is_finite() {
            return Err(invalid("anchor", f32::NAN));
        }
        if !is_positive(self.length) {
            return Err(invalid("length", self.length));
        }
        if !is_positive(self.radius) {
            return Err(invalid("radius", self.radius));
        }
        if !self.rest_angle.is_finite() {
            return Err(invalid("rest_angle", self.rest_angle));
        }
        if !self.max_rotation.is_finite() {
            return Err(invalid("max_rotation", self.max_rotation));
        }
        if !(self.angular_vel.is_finite() && self.angular_vel >= 0.0) {
            return Err(invalid("angular_vel", self.angular_vel));
        }
        Ok(())
    }
}

#[inline]
fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

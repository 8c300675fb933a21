//! Fixed timestep simulation tick
//!
//! Advances the scene by one step: flippers, ball integration, per-quadrant
//! narrow phase, then ball-ball contacts.

use super::collision::{
    handle_ball_ball_collision, handle_ball_border_chain_collision,
    handle_ball_circle_obstacle_collision, handle_ball_flipper_collision,
};
use super::state::{FlipperSide, PhysicsScene};

/// Input for a single tick, sampled once before the step begins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left_pressed: bool,
    pub right_pressed: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn pressed(&self, side: FlipperSide) -> bool {
        match side {
            FlipperSide::Left => self.left_pressed,
            FlipperSide::Right => self.right_pressed,
        }
    }
}

/// Advance the scene by one fixed timestep
///
/// Returns `false` when the scene is paused and nothing moved.
pub fn tick(scene: &mut PhysicsScene, input: &TickInput) -> bool {
    if input.pause {
        scene.paused = !scene.paused;
        log::debug!("Simulation {}", if scene.paused { "paused" } else { "resumed" });
    }

    if scene.paused {
        return false;
    }

    let dt = scene.dt;

    for side in FlipperSide::ALL {
        let flipper = scene.flipper_mut(side);
        flipper.set_pressed(input.pressed(side));
        flipper.simulate(dt);
    }

    for ball in &mut scene.balls {
        ball.integrate(dt, scene.gravity);
    }

    // Broad phase + narrow phase against static geometry
    for ball in &mut scene.balls {
        let (quadrant, region) = scene.regions.lookup(ball.pos, scene.center);
        log::trace!("ball at {:?} in {}", ball.pos, quadrant);

        if let Some(obstacle) = scene.obstacles.get(region.obstacle) {
            handle_ball_circle_obstacle_collision(ball, obstacle);
        }
        if let Some(side) = region.flipper {
            handle_ball_flipper_collision(ball, &scene.flippers[side.index()]);
        }
        handle_ball_border_chain_collision(ball, &scene.border.vertices, &region.border);
    }

    // Every unordered pair once, i < j
    for i in 0..scene.balls.len() {
        let (head, tail) = scene.balls.split_at_mut(i + 1);
        let ball = &mut head[i];
        for other in tail.iter_mut() {
            handle_ball_ball_collision(ball, other);
        }
    }

    scene.tick_count += 1;
    true
}

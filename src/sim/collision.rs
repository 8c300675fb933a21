//! Narrow-phase collision resolution
//!
//! Each resolver detects contact, pushes the ball out of penetration and then
//! corrects its velocity along the contact normal. Non-touching pairs are
//! left untouched.
//!
//! Bumpers and flippers *set* the ball's normal speed (they are active
//! surfaces) while the border *reflects* and damps it.

use glam::Vec2;

use super::geometry::{closest_point_on_segment, length};
use super::state::{Ball, CircleObstacle, Flipper};
use crate::consts::*;

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Resolve contact between two balls
///
/// Both balls move half the penetration apart, then exchange momentum along
/// the contact normal using the smaller of the two restitutions.
pub fn handle_ball_ball_collision(ball1: &mut Ball, ball2: &mut Ball) {
    let restitution = ball1.restitution.min(ball2.restitution);
    let dir = ball2.pos - ball1.pos;
    let dist = length(dir);
    if dist == 0.0 || dist > ball1.radius + ball2.radius {
        return;
    }

    let dir = dir / dist;

    let corr = (ball1.radius + ball2.radius - dist) / 2.0;
    ball1.pos -= dir * corr;
    ball2.pos += dir * corr;

    let v1 = ball1.vel.dot(dir);
    let v2 = ball2.vel.dot(dir);

    let m1 = ball1.mass;
    let m2 = ball2.mass;

    let new_v1 = (m1 * v1 + m2 * v2 - m2 * (v1 - v2) * restitution) / (m1 + m2);
    let new_v2 = (m1 * v1 + m2 * v2 - m1 * (v2 - v1) * restitution) / (m1 + m2);

    ball1.vel += dir * (new_v1 - v1);
    ball2.vel += dir * (new_v2 - v2);
}

/// Resolve contact between a ball and a bumper
///
/// The bumper does not move; the ball leaves with exactly `push_vel` along
/// the normal.
pub fn handle_ball_circle_obstacle_collision(ball: &mut Ball, obstacle: &CircleObstacle) {
    let dir = ball.pos - obstacle.pos;
    let dist = length(dir);
    if dist == 0.0 || dist > ball.radius + obstacle.radius {
        return;
    }

    let dir = dir / dist;

    let corr = ball.radius + obstacle.radius - dist;
    ball.pos += dir * corr;

    let vel = ball.vel.dot(dir);
    ball.vel += dir * (obstacle.push_vel - vel);

    log::trace!("bumper hit at {:?}", obstacle.pos);
}

/// Resolve contact between a ball and a flipper
///
/// The paddle is treated as a capsule around its pivot→tip center line. The
/// ball's normal speed is set to the paddle surface speed at the contact.
pub fn handle_ball_flipper_collision(ball: &mut Ball, flipper: &Flipper) {
    let live = flipper.live_polygon();
    let closest = closest_point_on_segment(ball.pos, live[FLIPPER_PIVOT], live[FLIPPER_TIP]);

    let dir = ball.pos - closest;
    let dist = length(dir);
    if dist == 0.0 || dist > ball.radius + flipper.radius {
        return;
    }

    let dir = dir / dist;

    let corr = ball.radius + flipper.radius - dist;
    ball.pos += dir * corr;

    // Surface velocity at the contact point on the paddle rim
    let radius = closest + dir * flipper.radius - flipper.pivot();
    let surface_vel = radius.perp() * (flipper.current_angular_vel / FLIPPER_KICK_DIVISOR);

    let v = ball.vel.dot(dir);
    let new_v = surface_vel.dot(dir);
    ball.vel += dir * (new_v - v);

    log::trace!(
        "flipper hit: angular_vel={}, normal speed {} -> {}",
        flipper.current_angular_vel,
        v,
        new_v
    );
}

/// Resolve contact between a ball and a border chain
///
/// Tests the chain's `n - 1` edges (the closing edge is not part of the
/// chain). The nearest edge's left normal points into the playfield for a
/// counter-clockwise winding. A ball outside the playfield or closer than its
/// radius is put back on the inside at exactly `radius` from the wall.
pub fn handle_ball_border_collision(ball: &mut Ball, border: &[Vec2]) {
    resolve_border_contact(ball, border.iter().copied());
}

/// Same as [`handle_ball_border_collision`] for a chain given as indices
/// into `vertices`
///
/// Indices must be in range; scene validation guarantees this for region
/// chains.
pub fn handle_ball_border_chain_collision(ball: &mut Ball, vertices: &[Vec2], chain: &[usize]) {
    resolve_border_contact(ball, chain.iter().map(|&i| vertices[i]));
}

fn resolve_border_contact(ball: &mut Ball, chain: impl IntoIterator<Item = Vec2>) {
    let Some((closest, normal)) = nearest_edge(ball.pos, chain) else {
        return;
    };

    let d = ball.pos - closest;
    let dist = length(d);

    if d.dot(normal) >= 0.0 && dist > ball.radius {
        return;
    }

    let unit_normal = normal / length(normal);

    ball.pos = closest + unit_normal * ball.radius;

    ball.vel = reflect_velocity(ball.vel, unit_normal) * BORDER_DAMPING;
}

/// Closest point over all edges of a chain, with that edge's left normal
///
/// Zero-length edges have no normal and are skipped.
fn nearest_edge(pos: Vec2, chain: impl IntoIterator<Item = Vec2>) -> Option<(Vec2, Vec2)> {
    let mut best: Option<(f32, Vec2, Vec2)> = None;
    let mut points = chain.into_iter();
    let mut a = points.next()?;

    for b in points {
        let ab = a - b;
        if length(ab) > 0.0 {
            let c = closest_point_on_segment(pos, a, b);
            let dist = length(pos - c);
            if best.is_none_or(|(min_dist, _, _)| dist < min_dist) {
                best = Some((dist, c, Vec2::new(-ab.y, ab.x)));
            }
        }
        a = b;
    }

    best.map(|(_, closest, normal)| (closest, normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FlipperSide;
    use proptest::prelude::*;

    fn ball_at(pos: Vec2, vel: Vec2) -> Ball {
        Ball::new(pos, vel, 10.0, 1.0)
    }

    /// Square playfield 0..100, wound counter-clockwise in y-down screen space
    fn square_border() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_ball_ball_head_on_elastic_swap() {
        let mut a = ball_at(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0));
        let mut b = ball_at(Vec2::new(15.0, 0.0), Vec2::new(-5.0, 0.0));
        a.mass = 100.0;
        b.mass = 100.0;

        handle_ball_ball_collision(&mut a, &mut b);

        assert!((a.vel - Vec2::new(-5.0, 0.0)).length() < 1e-4);
        assert!((b.vel - Vec2::new(5.0, 0.0)).length() < 1e-4);
        // Pushed apart symmetrically to exactly touching
        assert!((a.pos.x - (-2.5)).abs() < 1e-4);
        assert!((b.pos.x - 17.5).abs() < 1e-4);
    }

    #[test]
    fn test_ball_ball_keeps_tangential_velocity() {
        let mut a = ball_at(Vec2::new(0.0, 0.0), Vec2::new(5.0, 3.0));
        let mut b = ball_at(Vec2::new(15.0, 0.0), Vec2::new(-5.0, -2.0));

        handle_ball_ball_collision(&mut a, &mut b);

        assert!((a.vel.y - 3.0).abs() < 1e-4);
        assert!((b.vel.y - (-2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_ball_ball_uses_lower_restitution() {
        let mut a = ball_at(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0));
        let mut b = ball_at(Vec2::new(15.0, 0.0), Vec2::new(-5.0, 0.0));
        b.restitution = 0.0;

        handle_ball_ball_collision(&mut a, &mut b);

        // Perfectly inelastic with equal masses: both stop
        assert!(a.vel.length() < 1e-4);
        assert!(b.vel.length() < 1e-4);
    }

    #[test]
    fn test_ball_ball_no_contact() {
        let mut a = ball_at(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0));
        let mut b = ball_at(Vec2::new(25.0, 0.0), Vec2::new(-5.0, 0.0));
        let (a0, b0) = (a.clone(), b.clone());

        handle_ball_ball_collision(&mut a, &mut b);

        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_ball_ball_coincident_centers_ignored() {
        let mut a = ball_at(Vec2::new(3.0, 3.0), Vec2::new(5.0, 0.0));
        let mut b = ball_at(Vec2::new(3.0, 3.0), Vec2::new(-5.0, 0.0));
        let (a0, b0) = (a.clone(), b.clone());

        handle_ball_ball_collision(&mut a, &mut b);

        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_obstacle_deep_overlap_pushes_out_and_sets_speed() {
        let obstacle = CircleObstacle::new(Vec2::new(100.0, 100.0), 70.0, 200.0);
        let mut ball = ball_at(Vec2::new(105.0, 100.0), Vec2::new(-50.0, 30.0));

        handle_ball_circle_obstacle_collision(&mut ball, &obstacle);

        assert!(((ball.pos - obstacle.pos).length() - 80.0).abs() < 1e-3);
        let normal = (ball.pos - obstacle.pos).normalize();
        assert!((ball.vel.dot(normal) - 200.0).abs() < 1e-3);
        // Tangential component untouched
        assert!((ball.vel.y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_obstacle_no_contact() {
        let obstacle = CircleObstacle::new(Vec2::new(0.0, 0.0), 50.0, 200.0);
        let mut ball = ball_at(Vec2::new(61.0, 0.0), Vec2::new(-1.0, 0.0));
        let before = ball.clone();
        handle_ball_circle_obstacle_collision(&mut ball, &obstacle);
        assert_eq!(ball, before);
    }

    #[test]
    fn test_border_reflects_and_damps() {
        let border = square_border();
        // Penetrating the left wall (x = 0) while moving left
        let mut ball = ball_at(Vec2::new(4.0, 50.0), Vec2::new(-100.0, 20.0));

        handle_ball_border_collision(&mut ball, &border);

        assert!((ball.pos - Vec2::new(10.0, 50.0)).length() < 1e-4);
        assert!((ball.vel - Vec2::new(80.0, 16.0)).length() < 1e-3);
    }

    #[test]
    fn test_border_brings_tunneled_ball_back_inside() {
        let border = square_border();
        let mut ball = ball_at(Vec2::new(50.0, 130.0), Vec2::new(0.0, 300.0));

        handle_ball_border_collision(&mut ball, &border);

        assert!((ball.pos - Vec2::new(50.0, 90.0)).length() < 1e-4);
        assert!((ball.vel - Vec2::new(0.0, -240.0)).length() < 1e-3);
    }

    #[test]
    fn test_border_no_contact_inside() {
        let border = square_border();
        let mut ball = ball_at(Vec2::new(50.0, 50.0), Vec2::new(7.0, 7.0));
        let before = ball.clone();
        handle_ball_border_collision(&mut ball, &border);
        assert_eq!(ball, before);
    }

    #[test]
    fn test_border_closing_edge_not_tested() {
        // Open chain: the edge (100,0) -> (0,0) is missing
        let border = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 0.0),
        ];
        let mut ball = ball_at(Vec2::new(50.0, 5.0), Vec2::new(0.0, -10.0));
        let before = ball.clone();
        handle_ball_border_collision(&mut ball, &border);
        assert_eq!(ball, before);
    }

    #[test]
    fn test_border_short_chain_is_noop() {
        let mut ball = ball_at(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let before = ball.clone();
        handle_ball_border_collision(&mut ball, &[Vec2::ZERO]);
        handle_ball_border_collision(&mut ball, &[]);
        assert_eq!(ball, before);
    }

    #[test]
    fn test_border_skips_zero_length_edge() {
        // Repeated corner point: the duplicate edge must not be picked
        let border = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 100.0),
        ];
        let mut ball = ball_at(Vec2::new(5.0, 5.0), Vec2::new(-10.0, 0.0));

        handle_ball_border_collision(&mut ball, &border);

        assert!(ball.pos.is_finite());
        assert!((ball.pos - Vec2::new(10.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn test_border_only_degenerate_edges_is_noop() {
        let mut ball = ball_at(Vec2::new(5.0, 5.0), Vec2::new(-10.0, 0.0));
        let before = ball.clone();
        handle_ball_border_collision(&mut ball, &[Vec2::ZERO, Vec2::ZERO]);
        assert_eq!(ball, before);
    }

    #[test]
    fn test_border_chain_by_index_matches_slice() {
        let border = square_border();
        let mut by_slice = ball_at(Vec2::new(50.0, 130.0), Vec2::new(0.0, 300.0));
        let mut by_index = by_slice.clone();

        handle_ball_border_collision(&mut by_slice, &border[1..3]);
        handle_ball_border_chain_collision(&mut by_index, &border, &[1, 2]);

        assert_eq!(by_slice, by_index);
        assert!((by_index.pos - Vec2::new(50.0, 90.0)).length() < 1e-4);
    }

    fn resting_flipper() -> Flipper {
        // Horizontal paddle: pivot (100, 510), tip (180, 510)
        let polygon = Flipper::paddle_polygon(Vec2::new(100.0, 500.0), 80.0, 10.0, FlipperSide::Left);
        Flipper::new(polygon, 80.0, 10.0, 0.0, -80.0, 1000.0)
    }

    #[test]
    fn test_flipper_at_rest_stops_normal_motion() {
        let flipper = resting_flipper();
        let mut ball = ball_at(Vec2::new(150.0, 495.0), Vec2::new(30.0, 200.0));

        handle_ball_flipper_collision(&mut ball, &flipper);

        assert!((ball.pos - Vec2::new(150.0, 490.0)).length() < 1e-3);
        // No rotation: surface speed zero, normal component cleared
        assert!(ball.vel.y.abs() < 1e-3);
        assert!((ball.vel.x - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_swinging_flipper_flicks_ball_upward() {
        let mut flipper = resting_flipper();
        flipper.set_pressed(true);
        flipper.simulate(SIM_DT);
        // sign -1: swings counter-clockwise, tip moves up the screen
        assert!(flipper.current_angular_vel < 0.0);

        let live = flipper.live_polygon();
        let contact = closest_point_on_segment(
            Vec2::new(160.0, 480.0),
            live[FLIPPER_PIVOT],
            live[FLIPPER_TIP],
        );
        let normal = (Vec2::new(160.0, 480.0) - contact).normalize();
        let mut ball = ball_at(contact + normal * 15.0, Vec2::new(0.0, 100.0));

        handle_ball_flipper_collision(&mut ball, &flipper);

        assert!(ball.vel.y < 0.0);
        let gap = (ball.pos - closest_point_on_segment(ball.pos, live[FLIPPER_PIVOT], live[FLIPPER_TIP])).length();
        assert!((gap - 20.0).abs() < 1e-2);
    }

    #[test]
    fn test_flipper_sets_normal_speed_to_surface_speed() {
        let mut flipper = resting_flipper();
        flipper.current_angular_vel = -1000.0;
        let mut ball = ball_at(Vec2::new(150.0, 495.0), Vec2::new(30.0, 200.0));

        handle_ball_flipper_collision(&mut ball, &flipper);

        // Contact (150, 510), normal (0, -1), rim point (150, 500)
        // r = (50, -10), perp(r) = (10, 50), scaled by -1000 / 35
        let normal = Vec2::new(0.0, -1.0);
        let expected = 50.0 * 1000.0 / 35.0;
        assert!((ball.vel.dot(normal) - expected).abs() < 1e-3);
        // Tangential component is kept
        assert!((ball.vel.x - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_flipper_kick_grows_toward_tip() {
        let mut flipper = resting_flipper();
        flipper.current_angular_vel = -1000.0;
        let mut near_tip = ball_at(Vec2::new(170.0, 495.0), Vec2::ZERO);

        handle_ball_flipper_collision(&mut near_tip, &flipper);

        // r = (70, -10): normal speed 70 * 1000 / 35
        assert!((near_tip.vel.y - (-2000.0)).abs() < 1e-3);
        assert!(near_tip.vel.x.abs() < 1e-3);
    }

    #[test]
    fn test_flipper_no_contact() {
        let flipper = resting_flipper();
        let mut ball = ball_at(Vec2::new(150.0, 400.0), Vec2::new(0.0, 10.0));
        let before = ball.clone();
        handle_ball_flipper_collision(&mut ball, &flipper);
        assert_eq!(ball, before);
    }

    proptest! {
        #[test]
        fn prop_ball_ball_symmetric_corrections(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0,
            dx in -19.0f32..19.0, dy in -19.0f32..19.0,
            v1x in -500.0f32..500.0, v1y in -500.0f32..500.0,
            v2x in -500.0f32..500.0, v2y in -500.0f32..500.0,
        ) {
            prop_assume!(Vec2::new(dx, dy).length() > 0.1);
            let mut a = ball_at(Vec2::new(ax, ay), Vec2::new(v1x, v1y));
            let mut b = ball_at(Vec2::new(ax + dx, ay + dy), Vec2::new(v2x, v2y));
            let (a0, b0) = (a.clone(), b.clone());
            let touching = Vec2::new(dx, dy).length() <= 20.0;

            handle_ball_ball_collision(&mut a, &mut b);

            // Equal and opposite positional corrections
            let da = a.pos - a0.pos;
            let db = b.pos - b0.pos;
            prop_assert!((da + db).length() < 1e-2);

            // Momentum conserved with equal masses and restitution 1
            let p0 = a0.vel * a0.mass + b0.vel * b0.mass;
            let p1 = a.vel * a.mass + b.vel * b.mass;
            prop_assert!((p0 - p1).length() / a.mass < 1e-2);

            if touching {
                prop_assert!((a.pos - b.pos).length() >= 20.0 - 1e-2);
            }
        }

        #[test]
        fn prop_obstacle_leaves_no_penetration(
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            vx in -500.0f32..500.0, vy in -500.0f32..500.0,
            radius in 5.0f32..80.0,
        ) {
            let obstacle = CircleObstacle::new(Vec2::ZERO, radius, 200.0);
            let mut ball = ball_at(Vec2::new(bx, by), Vec2::new(vx, vy));
            prop_assume!(ball.pos.length() > 0.0);

            handle_ball_circle_obstacle_collision(&mut ball, &obstacle);

            prop_assert!(ball.pos.length() >= ball.radius + radius - 1e-2);
        }

        #[test]
        fn prop_flipper_leaves_no_penetration(
            bx in 60.0f32..220.0, by in 470.0f32..550.0,
            rotation in 0.0f32..80.0,
        ) {
            let mut flipper = resting_flipper();
            flipper.rotation = rotation;
            let mut ball = ball_at(Vec2::new(bx, by), Vec2::new(0.0, 50.0));

            handle_ball_flipper_collision(&mut ball, &flipper);

            let live = flipper.live_polygon();
            let c = closest_point_on_segment(ball.pos, live[FLIPPER_PIVOT], live[FLIPPER_TIP]);
            let dist = (ball.pos - c).length();
            // A center exactly on the paddle line is the ignored degenerate case
            prop_assert!(dist >= ball.radius + flipper.radius - 1e-2 || dist == 0.0);
        }

        #[test]
        fn prop_border_leaves_ball_inside_or_touching(
            bx in -50.0f32..150.0, by in -50.0f32..150.0,
        ) {
            let border = square_border();
            let mut ball = ball_at(Vec2::new(bx, by), Vec2::new(10.0, -10.0));

            handle_ball_border_collision(&mut ball, &border);

            let (closest, normal) = nearest_edge(ball.pos, border.iter().copied()).unwrap();
            let d = ball.pos - closest;
            prop_assert!(d.dot(normal) >= -1e-3 || (d.length() - ball.radius).abs() < 1e-3);
        }
    }
}

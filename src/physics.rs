//! Force and contact primitives applied to [`Body`] records.
//!
//! Every function here skips the interaction when two centers coincide, so no
//! normal is ever computed from a zero-length vector.

use crate::body::{Body, Viewport};
use ultraviolet::Vec2;

/// Outcome of [`resolve_collision`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contact {
    /// Discs are apart (or share a center).
    None,
    /// Discs overlapped and were separated, but were already moving apart.
    Separating,
    /// Discs overlapped while converging; carries the applied impulse magnitude.
    Impulse(f32),
}

/// Pushes `body` away from `pointer` with a `force / (d * 100)` falloff.
/// Returns true if an impulse was applied.
pub fn repel(body: &mut Body, pointer: Vec2, force: f32, range: f32) -> bool {
    let d = body.pos - pointer;
    let dist_sq = d.mag_sq();

    // Far bodies never pay for the square root.
    if dist_sq >= range * range || dist_sq == 0.0 {
        return false;
    }

    let dist = dist_sq.sqrt();
    body.vel += d / dist * (force / (dist * 100.0));
    true
}

/// Resolves an overlap or contact between two discs.
///
/// The bodies are moved apart along the collision normal, weighted by the
/// other body's share of the total mass, until they are exactly touching.
/// If they are converging, an impulse with coefficient `restitution` is
/// exchanged along the normal.
pub fn resolve_collision(a: &mut Body, b: &mut Body, restitution: f32) -> Contact {
    let d = b.pos - a.pos;
    let r = a.radius + b.radius;
    let dist_sq = d.mag_sq();

    // Exactly touching still counts, so a closing pair at contact exchanges an impulse.
    if dist_sq > r * r || dist_sq == 0.0 {
        return Contact::None;
    }

    let dist = dist_sq.sqrt();
    let normal = d / dist;
    let overlap = r - dist;

    let total_mass = a.mass + b.mass;
    a.pos -= normal * (overlap * b.mass / total_mass);
    b.pos += normal * (overlap * a.mass / total_mass);

    let closing = (b.vel - a.vel).dot(normal);
    if closing > 0.0 {
        return Contact::Separating;
    }

    let impulse = -(1.0 + restitution) * closing / (1.0 / a.mass + 1.0 / b.mass);
    a.vel -= normal * (impulse / a.mass);
    b.vel += normal * (impulse / b.mass);

    Contact::Impulse(impulse)
}

/// Keeps `body` inside `viewport`, reflecting the velocity component of each
/// edge it touches and scaling it by `damping`. Returns true on any wall hit.
pub fn bounce(body: &mut Body, viewport: Viewport, damping: f32) -> bool {
    let mut hit = false;

    if body.pos.x < body.radius {
        body.pos.x = body.radius;
        body.vel.x = body.vel.x.abs() * damping;
        hit = true;
    } else if body.pos.x > viewport.width - body.radius {
        body.pos.x = viewport.width - body.radius;
        body.vel.x = -body.vel.x.abs() * damping;
        hit = true;
    }

    if body.pos.y < body.radius {
        body.pos.y = body.radius;
        body.vel.y = body.vel.y.abs() * damping;
        hit = true;
    } else if body.pos.y > viewport.height - body.radius {
        body.pos.y = viewport.height - body.radius;
        body.vel.y = -body.vel.y.abs() * damping;
        hit = true;
    }

    hit
}

/// One-sided push: `target` is shoved away from `source` when it comes within
/// `reach * (source.radius + target.radius)`. `source` is never modified.
///
/// The push scales linearly from `strength` at contact to zero at the edge of
/// the reach, and never leaves `target` faster than its max speed.
pub fn push_away(source: &Body, target: &mut Body, reach: f32, strength: f32) -> bool {
    let d = target.pos - source.pos;
    let range = reach * (source.radius + target.radius);
    let dist_sq = d.mag_sq();

    if dist_sq >= range * range || dist_sq == 0.0 {
        return false;
    }

    let dist = dist_sq.sqrt();
    target.vel += d / dist * (strength * (1.0 - dist / range));
    target.clamp_speed();
    true
}

/// With probability `chance`, nudges the velocity by up to `strength` on each axis.
pub fn jitter(body: &mut Body, rng: &mut fastrand::Rng, chance: f32, strength: f32) -> bool {
    if rng.f32() >= chance {
        return false;
    }

    body.vel += Vec2::new(
        (rng.f32() - 0.5) * 2.0 * strength,
        (rng.f32() - 0.5) * 2.0 * strength,
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::SizeClass;

    fn body(x: f32, y: f32, vx: f32, vy: f32, mass: f32, radius: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(vx, vy), mass, radius, 10.0)
    }

    #[test]
    fn repel_points_away_from_pointer() {
        let mut b = body(110.0, 100.0, 0.0, 0.0, 1.0, 15.0);
        assert!(repel(&mut b, Vec2::new(100.0, 100.0), 300.0, 120.0));
        // 300 / (10 * 100)
        assert!((b.vel.x - 0.3).abs() < 1e-6);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn repel_ignores_far_and_coincident_pointers() {
        let mut b = body(300.0, 100.0, 0.0, 0.0, 1.0, 15.0);
        assert!(!repel(&mut b, Vec2::new(100.0, 100.0), 300.0, 120.0));
        assert!(!repel(&mut b, Vec2::new(300.0, 100.0), 300.0, 120.0));
        assert_eq!(b.vel, Vec2::zero());
    }

    #[test]
    fn converging_collision_exchanges_restitution_scaled_velocity() {
        let mut a = body(100.0, 100.0, 1.0, 0.0, 2.0, 20.0);
        let mut b = body(144.0, 100.0, -1.0, 0.0, 4.0, 25.0);
        let momentum = a.vel * a.mass + b.vel * b.mass;

        let contact = resolve_collision(&mut a, &mut b, 0.8);
        assert!(matches!(contact, Contact::Impulse(j) if (j - 4.8).abs() < 1e-4));

        assert!(((b.pos - a.pos).mag() - 45.0).abs() < 1e-4);
        assert!((a.vel.x + 1.4).abs() < 1e-5);
        assert!((b.vel.x - 0.2).abs() < 1e-5);

        let closing_after = (b.vel - a.vel).x;
        assert!((closing_after - 0.8 * 2.0).abs() < 1e-5);

        let after = a.vel * a.mass + b.vel * b.mass;
        assert!((after - momentum).mag() < 1e-5);
    }

    #[test]
    fn touching_bodies_closing_head_on_exchange_impulse() {
        let mut a = body(100.0, 100.0, 1.0, 0.0, 2.0, 20.0);
        let mut b = body(145.0, 100.0, -1.0, 0.0, 4.0, 25.0);

        let contact = resolve_collision(&mut a, &mut b, 0.8);
        assert!(matches!(contact, Contact::Impulse(j) if (j - 4.8).abs() < 1e-4));

        assert_eq!(a.pos, Vec2::new(100.0, 100.0));
        assert_eq!(b.pos, Vec2::new(145.0, 100.0));
        assert!((a.vel.x + 1.4).abs() < 1e-5);
        assert!((b.vel.x - 0.2).abs() < 1e-5);
    }

    #[test]
    fn touching_bodies_moving_apart_are_left_alone() {
        let mut a = body(100.0, 100.0, -1.0, 0.0, 2.0, 20.0);
        let mut b = body(145.0, 100.0, 1.0, 0.0, 4.0, 25.0);

        assert_eq!(resolve_collision(&mut a, &mut b, 0.8), Contact::Separating);
        assert_eq!(a.vel, Vec2::new(-1.0, 0.0));
        assert_eq!(b.vel, Vec2::new(1.0, 0.0));
        assert_eq!(a.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn separating_collision_only_moves_bodies_apart() {
        let mut a = body(100.0, 100.0, -1.0, 0.0, 2.0, 20.0);
        let mut b = body(140.0, 100.0, 1.0, 0.0, 4.0, 25.0);

        assert_eq!(resolve_collision(&mut a, &mut b, 0.8), Contact::Separating);
        assert_eq!(a.vel, Vec2::new(-1.0, 0.0));
        assert_eq!(b.vel, Vec2::new(1.0, 0.0));
        assert!(((b.pos - a.pos).mag() - 45.0).abs() < 1e-4);
        // The lighter body takes two thirds of the correction.
        assert!((a.pos.x - (100.0 - 5.0 * 4.0 / 6.0)).abs() < 1e-4);
    }

    #[test]
    fn coincident_bodies_are_skipped() {
        let mut a = body(50.0, 50.0, 1.0, 0.0, 1.0, 15.0);
        let mut b = body(50.0, 50.0, -1.0, 0.0, 1.0, 15.0);
        assert_eq!(resolve_collision(&mut a, &mut b, 0.8), Contact::None);
        assert_eq!(a.pos, b.pos);
    }

    #[test]
    fn bounce_reflects_and_damps() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut b = Body::with_class(Vec2::new(290.0, 5.0), Vec2::new(1.0, -1.0), SizeClass::Small);
        assert!(bounce(&mut b, viewport, 0.9));
        assert_eq!(b.pos, Vec2::new(285.0, 15.0));
        assert!((b.vel.x + 0.9).abs() < 1e-6);
        assert!((b.vel.y - 0.9).abs() < 1e-6);
    }

    #[test]
    fn push_away_is_one_sided() {
        let source = body(100.0, 100.0, 0.3, 0.3, 10.0, 35.0);
        let mut target = body(150.0, 100.0, 0.0, 0.0, 1.0, 15.0);
        let before = source;

        assert!(push_away(&source, &mut target, 1.5, 1.5));
        assert!(target.vel.x > 0.0);
        assert_eq!(target.vel.y, 0.0);
        assert_eq!(source, before);
    }

    #[test]
    fn jitter_never_fires_with_zero_chance() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut b = body(0.0, 0.0, 0.0, 0.0, 1.0, 1.0);
        for _ in 0..1000 {
            assert!(!jitter(&mut b, &mut rng, 0.0, 0.5));
        }
        assert_eq!(b.vel, Vec2::zero());
    }
}

use crate::body::{SizeClass, Viewport};
use ultraviolet::Vec2;

/// Picks a uniformly random point at least `margin` away from every edge.
/// Axes too small to honor the margin collapse to their midpoint.
pub fn spawn_point(rng: &mut fastrand::Rng, viewport: Viewport, margin: f32) -> Vec2 {
    let axis = |rng: &mut fastrand::Rng, extent: f32| {
        let span = extent - 2.0 * margin;
        if span > 0.0 {
            margin + rng.f32() * span
        } else {
            extent * 0.5
        }
    };

    let x = axis(rng, viewport.width);
    let y = axis(rng, viewport.height);
    Vec2::new(x, y)
}

/// Random direction with a speed of up to half of `max_speed`.
pub fn spawn_velocity(rng: &mut fastrand::Rng, max_speed: f32) -> Vec2 {
    let a = rng.f32() * std::f32::consts::TAU;
    let (sin, cos) = a.sin_cos();
    Vec2::new(cos, sin) * (rng.f32() * max_speed * 0.5)
}

pub fn random_class(rng: &mut fastrand::Rng) -> SizeClass {
    SizeClass::ALL[rng.usize(..SizeClass::ALL.len())]
}

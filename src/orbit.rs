use crate::body::{Body, Viewport};
use serde::Deserialize;
use ultraviolet::Vec2;

use std::f32::consts::{PI, TAU};

/// Category of link an interactive body stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Repository,
    Community,
    Leaderboard,
    SubmitScore,
}

impl LinkKind {
    pub const ALL: [LinkKind; 4] = [
        LinkKind::Repository,
        LinkKind::Community,
        LinkKind::Leaderboard,
        LinkKind::SubmitScore,
    ];
}

/// Locomotion mode of an interactive body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrbitState {
    /// Slow wandering drift.
    #[default]
    Idle,
    /// Closing in on the orbit center.
    MovingToCenter,
    /// Circling a center that follows the pointer.
    Orbiting,
    /// Circling a frozen center until released to `Idle`.
    LockedOrbiting,
}

impl OrbitState {
    pub fn is_orbiting(self) -> bool {
        !matches!(self, OrbitState::Idle)
    }
}

/// Orbit state and drift heading of one link body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interactive {
    pub link: LinkKind,
    pub state: OrbitState,
    pub center: Vec2,
    pub orbit_radius: f32,
    /// Radians per tick; the sign gives the direction of travel.
    pub angular_speed: f32,
    pub orbit_angle: f32,
    /// Heading used while idle, in radians.
    pub drift_angle: f32,
}

impl Interactive {
    pub const MASS: f32 = 10.0;
    pub const RADIUS: f32 = 35.0;
    /// Caps both the drift speed and every tracking step.
    pub const MAX_SPEED: f32 = 25.0;
    pub const DRIFT_SPEED: f32 = 0.6;
    pub const DRIFT_TURN: f32 = 0.01;
    /// Fraction of the remaining distance covered per tick while tracking a target.
    pub const APPROACH: f32 = 0.1;
    /// Distance beyond the orbit radius at which approach switches to orbiting.
    pub const ARRIVAL_MARGIN: f32 = 20.0;
    /// Neighbors within this multiple of the summed radii get pushed.
    pub const PUSH_REACH: f32 = 1.5;
    pub const PUSH_STRENGTH: f32 = 1.5;
    pub const ORBIT_RADIUS_RANGE: (f32, f32) = (80.0, 160.0);
    pub const ANGULAR_SPEED_RANGE: (f32, f32) = (0.01, 0.03);

    /// Creates an idle link body with a randomized orbit and drift heading.
    pub fn new(link: LinkKind, rng: &mut fastrand::Rng) -> Self {
        let (r_min, r_max) = Self::ORBIT_RADIUS_RANGE;
        let (w_min, w_max) = Self::ANGULAR_SPEED_RANGE;
        let direction = if rng.bool() { 1.0 } else { -1.0 };

        Self {
            link,
            state: OrbitState::Idle,
            center: Vec2::zero(),
            orbit_radius: r_min + rng.f32() * (r_max - r_min),
            angular_speed: direction * (w_min + rng.f32() * (w_max - w_min)),
            orbit_angle: 0.0,
            drift_angle: rng.f32() * TAU,
        }
    }

    /// Kinematic record for a link body centered at `pos`.
    pub fn body(&self, pos: Vec2) -> Body {
        Body::new(
            pos,
            drift_velocity(self.drift_angle),
            Self::MASS,
            Self::RADIUS,
            Self::MAX_SPEED,
        )
    }

    pub fn start_orbiting(&mut self, center: Vec2) {
        self.center = center;
        self.state = OrbitState::MovingToCenter;
    }

    /// Retargets an unlocked orbit. Returns false if the center is frozen or the body is idle.
    pub fn set_orbit_center(&mut self, center: Vec2) -> bool {
        match self.state {
            OrbitState::MovingToCenter | OrbitState::Orbiting => {
                self.center = center;
                true
            }
            OrbitState::Idle | OrbitState::LockedOrbiting => false,
        }
    }

    /// Freezes the current center. Returns false if the body was idle.
    pub fn lock_orbit_center(&mut self) -> bool {
        match self.state {
            OrbitState::Idle => false,
            _ => {
                self.state = OrbitState::LockedOrbiting;
                true
            }
        }
    }

    /// Returns to drifting along the current direction of travel.
    pub fn stop_orbiting(&mut self) {
        self.state = OrbitState::Idle;
    }

    /// Moves `body` one tick according to the current state.
    pub fn advance(&mut self, body: &mut Body, viewport: Viewport) {
        match self.state {
            OrbitState::Idle => self.drift(body, viewport),
            OrbitState::MovingToCenter => {
                let offset = body.pos - self.center;
                let dist = offset.mag();

                if dist > self.orbit_radius + Self::ARRIVAL_MARGIN {
                    self.track(body, self.center, viewport);
                } else {
                    log::trace!("{:?} reached orbit around {:?}", self.link, self.center);
                    self.state = OrbitState::Orbiting;
                    self.orbit_angle = if dist > 0.0 { offset.y.atan2(offset.x) } else { 0.0 };
                    self.circle(body, viewport);
                }
            }
            OrbitState::Orbiting | OrbitState::LockedOrbiting => self.circle(body, viewport),
        }
    }

    fn drift(&mut self, body: &mut Body, viewport: Viewport) {
        self.drift_angle = (self.drift_angle + Self::DRIFT_TURN) % TAU;
        body.vel = drift_velocity(self.drift_angle);
        body.pos += body.vel;

        let r = body.radius;
        if body.pos.x < r || body.pos.x > viewport.width - r {
            self.drift_angle = PI - self.drift_angle;
        }
        if body.pos.y < r || body.pos.y > viewport.height - r {
            self.drift_angle = -self.drift_angle;
        }

        if body.contain(viewport) {
            body.vel = drift_velocity(self.drift_angle);
        }
    }

    fn circle(&mut self, body: &mut Body, viewport: Viewport) {
        self.orbit_angle += self.angular_speed;
        let (sin, cos) = self.orbit_angle.sin_cos();
        let target = self.center + Vec2::new(cos, sin) * self.orbit_radius;
        self.track(body, target, viewport);
    }

    fn track(&mut self, body: &mut Body, target: Vec2, viewport: Viewport) {
        body.vel = (target - body.pos) * Self::APPROACH;
        body.clamp_speed();
        body.pos += body.vel;
        body.contain(viewport);

        if body.vel != Vec2::zero() {
            self.drift_angle = body.vel.y.atan2(body.vel.x);
        }
    }
}

fn drift_velocity(angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos, sin) * Interactive::DRIFT_SPEED
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    fn link_at(pos: Vec2) -> (Interactive, Body) {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut link = Interactive::new(LinkKind::Leaderboard, &mut rng);
        link.orbit_radius = 100.0;
        link.angular_speed = 0.02;
        let body = link.body(pos);
        (link, body)
    }

    #[test]
    fn idle_drift_keeps_constant_speed() {
        let (mut link, mut body) = link_at(Vec2::new(500.0, 400.0));
        for _ in 0..500 {
            link.advance(&mut body, VIEWPORT);
            assert_eq!(link.state, OrbitState::Idle);
            assert!((body.speed() - Interactive::DRIFT_SPEED).abs() < 1e-4);
            assert!(body.is_inside(VIEWPORT));
        }
    }

    #[test]
    fn idle_drift_reflects_heading_at_walls() {
        let (mut link, mut body) = link_at(Vec2::new(35.2, 400.0));
        link.drift_angle = PI - Interactive::DRIFT_TURN;
        link.advance(&mut body, VIEWPORT);
        assert!(body.vel.x > 0.0);
        assert_eq!(body.pos.x, 35.0);
    }

    #[test]
    fn approach_covers_a_tenth_of_the_distance() {
        let (mut link, mut body) = link_at(Vec2::new(100.0, 100.0));
        link.start_orbiting(Vec2::new(300.0, 100.0));
        link.advance(&mut body, VIEWPORT);

        assert_eq!(link.state, OrbitState::MovingToCenter);
        assert!((body.pos.x - 120.0).abs() < 1e-4);
        assert_eq!(body.pos.y, 100.0);
    }

    #[test]
    fn approach_switches_to_orbiting_near_the_center() {
        let (mut link, mut body) = link_at(Vec2::new(400.0, 300.0));
        link.start_orbiting(Vec2::new(300.0, 300.0));
        link.advance(&mut body, VIEWPORT);

        assert_eq!(link.state, OrbitState::Orbiting);
        assert!((link.orbit_angle - 0.02).abs() < 1e-5);
    }

    #[test]
    fn approach_step_is_capped() {
        let (mut link, mut body) = link_at(Vec2::new(40.0, 40.0));
        link.start_orbiting(Vec2::new(960.0, 760.0));
        link.advance(&mut body, VIEWPORT);
        assert!(body.speed() <= Interactive::MAX_SPEED + 1e-4);
    }

    #[test]
    fn orbit_settles_near_the_circle() {
        let (mut link, mut body) = link_at(Vec2::new(100.0, 100.0));
        let center = Vec2::new(500.0, 400.0);
        link.start_orbiting(center);
        for _ in 0..400 {
            link.advance(&mut body, VIEWPORT);
        }
        assert_eq!(link.state, OrbitState::Orbiting);
        let r = (body.pos - center).mag();
        assert!((r - 100.0).abs() < 25.0, "radius {r}");
    }

    #[test]
    fn locked_center_ignores_retargeting() {
        let (mut link, _) = link_at(Vec2::new(100.0, 100.0));
        assert!(!link.lock_orbit_center());
        assert!(!link.set_orbit_center(Vec2::new(5.0, 5.0)));

        link.start_orbiting(Vec2::new(200.0, 200.0));
        assert!(link.set_orbit_center(Vec2::new(250.0, 250.0)));
        assert!(link.lock_orbit_center());
        assert_eq!(link.state, OrbitState::LockedOrbiting);
        assert!(!link.set_orbit_center(Vec2::new(10.0, 10.0)));
        assert_eq!(link.center, Vec2::new(250.0, 250.0));

        link.stop_orbiting();
        assert_eq!(link.state, OrbitState::Idle);
    }
}

use ultraviolet::Vec2;

/// Kinematic state shared by every floating element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Center position in viewport pixels.
    pub pos: Vec2,
    /// Velocity in pixels per tick.
    pub vel: Vec2,
    /// Mass used by collision impulses.
    pub mass: f32,
    /// Collision and containment radius.
    pub radius: f32,
    /// Upper bound on `vel.mag()` at the end of every update.
    pub max_speed: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, mass: f32, radius: f32, max_speed: f32) -> Self {
        Self {
            pos,
            vel,
            mass,
            radius,
            max_speed,
        }
    }

    /// Creates a body with the mass, radius and speed limit of `class`.
    pub fn with_class(pos: Vec2, vel: Vec2, class: SizeClass) -> Self {
        let profile = class.profile();
        Self::new(pos, vel, profile.mass, profile.radius, profile.max_speed)
    }

    pub fn speed(&self) -> f32 {
        self.vel.mag()
    }

    /// Rescales the velocity to `max_speed` if it is faster, keeping its direction.
    pub fn clamp_speed(&mut self) {
        let speed_sq = self.vel.mag_sq();
        if speed_sq > self.max_speed * self.max_speed {
            self.vel *= self.max_speed / speed_sq.sqrt();
        }
    }

    /// Moves the body back inside `viewport`, leaving velocity untouched.
    /// Returns true if the position changed.
    ///
    /// When the viewport is narrower than the body the left/top edge wins.
    pub fn contain(&mut self, viewport: Viewport) -> bool {
        let before = self.pos;
        self.pos.x = self.pos.x.min(viewport.width - self.radius).max(self.radius);
        self.pos.y = self.pos.y.min(viewport.height - self.radius).max(self.radius);
        self.pos != before
    }

    /// True if the whole disc lies within `viewport`.
    pub fn is_inside(&self, viewport: Viewport) -> bool {
        self.pos.x >= self.radius
            && self.pos.x <= viewport.width - self.radius
            && self.pos.y >= self.radius
            && self.pos.y <= viewport.height - self.radius
    }
}

/// Size of the drawable area in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Size bucket of a decorative body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

/// Physical parameters derived from a [`SizeClass`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeProfile {
    pub mass: f32,
    pub radius: f32,
    pub max_speed: f32,
    /// Numerator of the pointer repulsion impulse.
    pub repulsion_force: f32,
    /// Pointer distance beyond which repulsion is skipped.
    pub repulsion_range: f32,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    pub const fn profile(self) -> SizeProfile {
        match self {
            SizeClass::Small => SizeProfile {
                mass: 1.0,
                radius: 15.0,
                max_speed: 2.0,
                repulsion_force: 300.0,
                repulsion_range: 120.0,
            },
            SizeClass::Medium => SizeProfile {
                mass: 2.0,
                radius: 20.0,
                max_speed: 1.5,
                repulsion_force: 400.0,
                repulsion_range: 140.0,
            },
            SizeClass::Large => SizeProfile {
                mass: 4.0,
                radius: 25.0,
                max_speed: 1.0,
                repulsion_force: 500.0,
                repulsion_range: 160.0,
            },
        }
    }
}

use crate::{
    body::{Body, Viewport},
    config::{HotZone, SimulationConfig},
    element::{Element, Neighbors, TickContext},
    error::SimulationError,
    orbit::{Interactive, LinkKind},
    render::{NodeSpec, Stage, Visual},
    utils,
};

use ultraviolet::Vec2;

/// Pointer bookkeeping driven by host events.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Last reported position; `None` until the host reports one.
    pub pos: Option<Vec2>,
    pub is_down: bool,
    /// Timestamp of the current press.
    pub down_since: Option<f64>,
    /// Set when the hold delay elapses, cleared when the grace period ends.
    pub is_orbit_active: bool,
}

/// State a step operates on.
#[derive(Debug)]
pub struct SimulationContext {
    pub viewport: Viewport,
    pub pointer: PointerState,
    pub bodies: Vec<Element>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerEvent {
    Hold,
    Grace,
}

/// Pending deadlines, in host milliseconds.
#[derive(Clone, Copy, Debug, Default)]
struct Timers {
    hold: Option<f64>,
    grace: Option<f64>,
}

impl Timers {
    /// Removes and returns the earliest deadline at or before `now`.
    fn next_due(&mut self, now: f64) -> Option<TimerEvent> {
        let hold = self.hold.filter(|&t| t <= now);
        let grace = self.grace.filter(|&t| t <= now);

        match (hold, grace) {
            (Some(h), Some(g)) if h < g => {
                self.hold = None;
                Some(TimerEvent::Hold)
            }
            (_, Some(_)) => {
                self.grace = None;
                Some(TimerEvent::Grace)
            }
            (Some(_), None) => {
                self.hold = None;
                Some(TimerEvent::Hold)
            }
            (None, None) => None,
        }
    }
}

/// Owns the body pool and turns pointer events and animation ticks into motion.
#[derive(Debug)]
pub struct Simulation {
    /// Number of steps taken so far.
    pub frame: usize,
    context: SimulationContext,
    config: SimulationConfig,
    timers: Timers,
    rng: fastrand::Rng,
    last_step_at: Option<f64>,
    paused: bool,
}

impl Simulation {
    /// Validates `config` and spawns the pool, mounting one node per body on `stage`.
    ///
    /// Link bodies come first, one per configured link, followed by decorative
    /// bodies up to `pool_size`.
    pub fn new(
        config: SimulationConfig,
        viewport: Viewport,
        stage: &mut dyn Stage,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            log::warn!(
                "spawning into an empty viewport {}x{}",
                viewport.width,
                viewport.height
            );
        }

        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let mut bodies = Vec::with_capacity(config.pool_size);

        for spec in &config.links {
            let link = Interactive::new(spec.kind, &mut rng);
            let margin = config.spawn_margin.max(Interactive::RADIUS);
            let pos = utils::spawn_point(&mut rng, viewport, margin);
            let renderer = stage
                .mount(&NodeSpec {
                    id: bodies.len(),
                    glyph: &spec.glyph,
                    radius: Interactive::RADIUS,
                    link: Some(spec.kind),
                })
                .ok_or(SimulationError::MissingContainer)?;

            bodies.push(Element::new_interactive(
                link,
                pos,
                spec.glyph.clone(),
                Visual::new(renderer),
            ));
        }

        while bodies.len() < config.pool_size {
            let class = utils::random_class(&mut rng);
            let profile = class.profile();
            let glyph = config.glyphs[rng.usize(..config.glyphs.len())].clone();
            let pos = utils::spawn_point(&mut rng, viewport, config.spawn_margin.max(profile.radius));
            let vel = utils::spawn_velocity(&mut rng, profile.max_speed);
            let renderer = stage
                .mount(&NodeSpec {
                    id: bodies.len(),
                    glyph: &glyph,
                    radius: profile.radius,
                    link: None,
                })
                .ok_or(SimulationError::MissingContainer)?;

            bodies.push(Element::new_passive(
                Body::with_class(pos, vel, class),
                class,
                glyph,
                Visual::new(renderer),
            ));
        }

        log::debug!(
            "spawned {} bodies ({} links) in {}x{}",
            bodies.len(),
            config.links.len(),
            viewport.width,
            viewport.height
        );

        Ok(Self {
            frame: 0,
            context: SimulationContext {
                viewport,
                pointer: PointerState::default(),
                bodies,
            },
            config,
            timers: Timers::default(),
            rng,
            last_step_at: None,
            paused: false,
        })
    }

    pub fn bodies(&self) -> &[Element] {
        &self.context.bodies
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn pointer(&self) -> &PointerState {
        &self.context.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.context.viewport
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn orbit_active(&self) -> bool {
        self.context.pointer.is_orbit_active
    }

    pub fn set_hot_zones(&mut self, zones: Vec<HotZone>) {
        self.config.hot_zones = zones;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fires every timer whose deadline is at or before `now`, earliest first.
    pub fn poll_timers(&mut self, now: f64) {
        while let Some(event) = self.timers.next_due(now) {
            match event {
                TimerEvent::Hold => self.begin_orbit(),
                TimerEvent::Grace => self.end_orbit(),
            }
        }
    }

    /// Records a press. Outside hot zones this arms the hold timer.
    pub fn pointer_down(&mut self, x: f32, y: f32, now: f64) {
        self.poll_timers(now);

        let pos = Vec2::new(x, y);
        let pointer = &mut self.context.pointer;
        pointer.pos = Some(pos);
        pointer.is_down = true;
        pointer.down_since = Some(now);

        if self.config.hot_zones.iter().any(|zone| zone.contains(pos)) {
            log::trace!("pointer down at ({x}, {y}) inside a hot zone");
            return;
        }

        self.timers.hold = Some(now + self.config.hold_delay_ms);
    }

    /// Records a move. While the pointer drives an active orbit, every unlocked
    /// link body retargets to it.
    pub fn pointer_move(&mut self, x: f32, y: f32, now: f64) {
        self.poll_timers(now);

        let pos = Vec2::new(x, y);
        let pointer = &mut self.context.pointer;
        pointer.pos = Some(pos);

        if pointer.is_orbit_active && pointer.is_down {
            for element in &mut self.context.bodies {
                if let Some(link) = element.interactive_mut() {
                    link.set_orbit_center(pos);
                }
            }
        }
    }

    /// Records a release. Cancels a pending hold, or freezes an active orbit
    /// at the release point and schedules the return to idle.
    pub fn pointer_up(&mut self, x: f32, y: f32, now: f64) {
        self.poll_timers(now);

        let pos = Vec2::new(x, y);
        let pointer = &mut self.context.pointer;
        // A press made during the grace period never drove the orbit.
        let was_driving = pointer.is_down && pointer.is_orbit_active && self.timers.grace.is_none();
        pointer.pos = Some(pos);
        pointer.is_down = false;
        pointer.down_since = None;

        if self.timers.hold.take().is_some() {
            log::trace!("hold released early at {now}");
        }

        if !was_driving {
            return;
        }

        for element in &mut self.context.bodies {
            if let Some(link) = element.interactive_mut() {
                link.set_orbit_center(pos);
                link.lock_orbit_center();
            }
        }
        self.timers.grace = Some(now + self.config.grace_period_ms);
        log::debug!("orbit locked at ({x}, {y}), idle at {}", now + self.config.grace_period_ms);
    }

    fn begin_orbit(&mut self) {
        let pointer = &mut self.context.pointer;
        let Some(center) = pointer.pos else {
            return;
        };
        if !pointer.is_down {
            return;
        }

        pointer.is_orbit_active = true;
        // A new orbit supersedes a pending return to idle.
        self.timers.grace = None;

        for element in &mut self.context.bodies {
            if let Some(link) = element.interactive_mut() {
                link.start_orbiting(center);
            }
        }
        log::debug!("orbit started around ({}, {})", center.x, center.y);
    }

    fn end_orbit(&mut self) {
        self.context.pointer.is_orbit_active = false;

        for element in &mut self.context.bodies {
            if let Some(link) = element.interactive_mut() {
                link.stop_orbiting();
            }
        }
        log::debug!("orbit ended");
    }

    /// Animation-frame entry point. Services timers, then steps if at least
    /// `frame_interval_ms` passed since the previous step.
    /// Returns true if a step ran.
    pub fn tick(&mut self, now: f64) -> bool {
        self.poll_timers(now);

        if self.paused {
            return false;
        }
        if let Some(last) = self.last_step_at {
            if now - last < self.config.frame_interval_ms {
                return false;
            }
        }

        self.last_step_at = Some(now);
        self.step();
        true
    }

    /// Advances every body by one tick, in pool order.
    pub fn step(&mut self) {
        let SimulationContext {
            viewport,
            pointer,
            bodies,
        } = &mut self.context;

        let mut ctx = TickContext {
            pointer: pointer.pos,
            viewport: *viewport,
            physics: &self.config.physics,
            rng: &mut self.rng,
        };

        for i in 0..bodies.len() {
            if let Some((current, neighbors)) = Neighbors::split(bodies, i) {
                current.update(&mut ctx, neighbors);
            }
        }

        self.frame += 1;
        log::trace!("step: frame={} bodies={}", self.frame, bodies.len());
    }

    /// Adopts a new viewport size and pulls every body back inside it.
    /// Velocities are left untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            log::warn!("resize to an empty viewport {width}x{height}");
        }

        let viewport = Viewport::new(width, height);
        self.context.viewport = viewport;

        let moved = self
            .context
            .bodies
            .iter_mut()
            .map(|element| element.body.contain(viewport))
            .filter(|&moved| moved)
            .count();
        log::debug!("resized to {width}x{height}, {moved} bodies clamped");
    }

    /// The link whose disc covers (`x`, `y`), nearest center first.
    pub fn link_at(&self, x: f32, y: f32) -> Option<LinkKind> {
        let point = Vec2::new(x, y);
        self.context
            .bodies
            .iter()
            .filter_map(|element| {
                let kind = element.link()?;
                let dist_sq = (element.body.pos - point).mag_sq();
                let r = element.body.radius;
                (dist_sq <= r * r).then_some((kind, dist_sq))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(kind, _)| kind)
    }
}

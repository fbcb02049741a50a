use crate::{
    body::{Body, SizeClass, Viewport},
    config::PhysicsConfig,
    orbit::{Interactive, LinkKind, OrbitState},
    physics::{self, Contact},
    render::Visual,
};

use ultraviolet::Vec2;

/// How an element moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyKind {
    /// Decorative body: free drift, pointer repulsion, collisions.
    Passive(SizeClass),
    /// Link body: drift or orbit, pushes passive neighbors, is never pushed back.
    Interactive(Interactive),
}

/// One floating element: kinematics, movement rule and on-screen node.
#[derive(Debug)]
pub struct Element {
    pub body: Body,
    pub kind: BodyKind,
    pub glyph: String,
    visual: Visual,
}

/// Inputs shared by every element during one step.
pub struct TickContext<'a> {
    /// Last known pointer position, if the pointer has been seen.
    pub pointer: Option<Vec2>,
    pub viewport: Viewport,
    pub physics: &'a PhysicsConfig,
    pub rng: &'a mut fastrand::Rng,
}

/// Every element of the pool except the one being updated, in pool order.
pub struct Neighbors<'a> {
    before: &'a mut [Element],
    after: &'a mut [Element],
}

impl<'a> Neighbors<'a> {
    /// Splits `elements` into the element at `index` and everything else.
    pub fn split(elements: &'a mut [Element], index: usize) -> Option<(&'a mut Element, Self)> {
        if index >= elements.len() {
            return None;
        }
        let (before, rest) = elements.split_at_mut(index);
        let (current, after) = rest.split_first_mut()?;
        Some((current, Self { before, after }))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.before.iter_mut().chain(self.after.iter_mut())
    }
}

impl Element {
    pub fn new_passive(body: Body, class: SizeClass, glyph: String, visual: Visual) -> Self {
        Self {
            body,
            kind: BodyKind::Passive(class),
            glyph,
            visual,
        }
    }

    pub fn new_interactive(link: Interactive, pos: Vec2, glyph: String, visual: Visual) -> Self {
        Self {
            body: link.body(pos),
            kind: BodyKind::Interactive(link),
            glyph,
            visual,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.kind, BodyKind::Interactive(_))
    }

    pub fn interactive(&self) -> Option<&Interactive> {
        match &self.kind {
            BodyKind::Interactive(link) => Some(link),
            BodyKind::Passive(_) => None,
        }
    }

    pub fn interactive_mut(&mut self) -> Option<&mut Interactive> {
        match &mut self.kind {
            BodyKind::Interactive(link) => Some(link),
            BodyKind::Passive(_) => None,
        }
    }

    pub fn orbit_state(&self) -> Option<OrbitState> {
        self.interactive().map(|link| link.state)
    }

    pub fn link(&self) -> Option<LinkKind> {
        self.interactive().map(|link| link.link)
    }

    pub fn size_class(&self) -> Option<SizeClass> {
        match self.kind {
            BodyKind::Passive(class) => Some(class),
            BodyKind::Interactive(_) => None,
        }
    }

    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    /// Advances this element by one tick and repaints it if it moved far enough.
    pub fn update(&mut self, ctx: &mut TickContext<'_>, neighbors: Neighbors<'_>) {
        let rotation = match &mut self.kind {
            BodyKind::Passive(class) => {
                update_passive(&mut self.body, *class, ctx, neighbors);
                self.body.vel.x * ctx.physics.tilt_per_speed
            }
            BodyKind::Interactive(link) => {
                update_interactive(&mut self.body, link, ctx.viewport, neighbors);
                0.0
            }
        };

        self.visual.sync(
            self.body.pos,
            self.body.radius,
            rotation,
            ctx.physics.paint_epsilon,
        );
    }
}

fn update_passive(
    body: &mut Body,
    class: SizeClass,
    ctx: &mut TickContext<'_>,
    mut neighbors: Neighbors<'_>,
) {
    let profile = class.profile();
    let params = ctx.physics;

    if let Some(pointer) = ctx.pointer {
        physics::repel(body, pointer, profile.repulsion_force, profile.repulsion_range);
    }

    // Neighbors earlier in the pool have already moved this tick.
    for other in neighbors.iter_mut() {
        if other.is_interactive() {
            continue;
        }
        match physics::resolve_collision(body, &mut other.body, params.restitution) {
            Contact::None => {}
            Contact::Separating => {
                other.body.contain(ctx.viewport);
            }
            Contact::Impulse(_) => {
                other.body.clamp_speed();
                other.body.contain(ctx.viewport);
            }
        }
    }

    body.pos += body.vel;
    body.clamp_speed();
    physics::bounce(body, ctx.viewport, params.wall_damping);

    if physics::jitter(body, ctx.rng, params.jitter_chance, params.jitter_strength) {
        body.clamp_speed();
    }
}

fn update_interactive(
    body: &mut Body,
    link: &mut Interactive,
    viewport: Viewport,
    mut neighbors: Neighbors<'_>,
) {
    link.advance(body, viewport);

    for other in neighbors.iter_mut() {
        if other.is_interactive() {
            continue;
        }
        physics::push_away(
            body,
            &mut other.body,
            Interactive::PUSH_REACH,
            Interactive::PUSH_STRENGTH,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullRenderer;

    fn passive(x: f32, y: f32, vx: f32, vy: f32, class: SizeClass) -> Element {
        Element::new_passive(
            Body::with_class(Vec2::new(x, y), Vec2::new(vx, vy), class),
            class,
            "o".to_string(),
            Visual::new(Box::new(NullRenderer)),
        )
    }

    fn quiet_physics() -> PhysicsConfig {
        PhysicsConfig {
            jitter_chance: 0.0,
            ..PhysicsConfig::default()
        }
    }

    fn step(elements: &mut [Element], pointer: Option<Vec2>, physics: &PhysicsConfig) {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut ctx = TickContext {
            pointer,
            viewport: Viewport::new(800.0, 600.0),
            physics,
            rng: &mut rng,
        };
        for i in 0..elements.len() {
            let (current, neighbors) = Neighbors::split(elements, i).unwrap();
            current.update(&mut ctx, neighbors);
        }
    }

    #[test]
    fn split_yields_every_other_element() {
        let mut elements: Vec<Element> = (0..4)
            .map(|i| passive(100.0 * i as f32 + 50.0, 50.0, 0.0, 0.0, SizeClass::Small))
            .collect();

        let (current, mut neighbors) = Neighbors::split(&mut elements, 2).unwrap();
        assert_eq!(current.body.pos.x, 250.0);
        let xs: Vec<f32> = neighbors.iter_mut().map(|e| e.body.pos.x).collect();
        assert_eq!(xs, vec![50.0, 150.0, 350.0]);

        assert!(Neighbors::split(&mut elements, 4).is_none());
    }

    #[test]
    fn pointer_pushes_nearby_body_away() {
        let mut elements = vec![passive(400.0, 300.0, 0.0, 0.0, SizeClass::Small)];
        step(&mut elements, Some(Vec2::new(390.0, 300.0)), &quiet_physics());
        assert!(elements[0].body.vel.x > 0.0);
        assert!(elements[0].body.pos.x > 400.0);
    }

    #[test]
    fn point_blank_repulsion_moves_before_the_clamp() {
        let mut elements = vec![passive(200.0, 300.0, 0.0, 0.0, SizeClass::Small)];
        step(&mut elements, Some(Vec2::new(200.01, 300.0)), &quiet_physics());

        // The unclamped impulse carries the body into the left wall in one tick.
        let body = elements[0].body;
        assert_eq!(body.pos.x, body.radius);
        assert!(body.vel.x > 0.0);
        assert!(body.speed() <= body.max_speed + 1e-5);
    }

    #[test]
    fn overlapping_bodies_end_apart() {
        let mut elements = vec![
            passive(400.0, 300.0, 1.0, 0.0, SizeClass::Medium),
            passive(440.0, 300.0, -1.0, 0.0, SizeClass::Large),
        ];
        step(&mut elements, None, &quiet_physics());

        let a = &elements[0].body;
        let b = &elements[1].body;
        assert!(a.vel.x < 0.0);
        assert!(b.vel.x >= 0.0);
        assert!(a.speed() <= a.max_speed + 1e-5);
        assert!(b.speed() <= b.max_speed + 1e-5);
    }

    #[test]
    fn link_pushes_passive_neighbor_without_reacting() {
        let mut rng = fastrand::Rng::with_seed(5);
        let link = Interactive::new(LinkKind::Community, &mut rng);
        let mut elements = vec![
            Element::new_interactive(
                link,
                Vec2::new(400.0, 300.0),
                "L".to_string(),
                Visual::new(Box::new(NullRenderer)),
            ),
            passive(450.0, 300.0, 0.0, 0.0, SizeClass::Small),
        ];

        step(&mut elements, None, &quiet_physics());

        let link_body = elements[0].body;
        assert!((link_body.speed() - Interactive::DRIFT_SPEED).abs() < 1e-4);
        assert!(elements[1].body.vel.x > 0.0);
    }

    #[test]
    fn first_update_paints() {
        let mut elements = vec![passive(400.0, 300.0, 0.0, 0.0, SizeClass::Small)];
        assert!(elements[0].visual().last_painted().is_none());
        step(&mut elements, None, &quiet_physics());
        assert_eq!(elements[0].visual().last_painted(), Some(Vec2::new(400.0, 300.0)));
    }
}

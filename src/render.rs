//! Visual output capability.
//!
//! The host owns the actual nodes; the simulation only ever talks to them
//! through a [`Renderer`] handed out by a [`Stage`] at spawn time.

use crate::orbit::LinkKind;
use ultraviolet::Vec2;

/// Handle to one body's on-screen node.
pub trait Renderer {
    /// Moves the node so its top-left corner sits at (`left`, `top`) and rotates it by `rotation` degrees.
    fn paint(&mut self, left: f32, top: f32, rotation: f32);

    /// Detaches the node from its container.
    fn remove(&mut self) {}
}

/// The container nodes are mounted into.
pub trait Stage {
    /// Creates and attaches a node for `spec`. `None` means there is no
    /// container to attach to.
    fn mount(&mut self, spec: &NodeSpec<'_>) -> Option<Box<dyn Renderer>>;
}

/// What the host needs to know to build a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSpec<'a> {
    /// Index of the body in the pool.
    pub id: usize,
    pub glyph: &'a str,
    pub radius: f32,
    /// Set for link bodies.
    pub link: Option<LinkKind>,
}

/// Stage for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStage;

impl Stage for NullStage {
    fn mount(&mut self, _spec: &NodeSpec<'_>) -> Option<Box<dyn Renderer>> {
        Some(Box::new(NullRenderer))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn paint(&mut self, _left: f32, _top: f32, _rotation: f32) {}
}

/// A renderer plus the position it last painted.
///
/// Repaints are skipped until the body has moved more than `epsilon` pixels
/// on some axis. The node is removed when the `Visual` is dropped.
pub struct Visual {
    renderer: Box<dyn Renderer>,
    last_painted: Option<Vec2>,
}

impl std::fmt::Debug for Visual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visual")
            .field("renderer", &"dyn Renderer")
            .field("last_painted", &self.last_painted)
            .finish()
    }
}

impl Visual {
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self {
            renderer,
            last_painted: None,
        }
    }

    pub fn last_painted(&self) -> Option<Vec2> {
        self.last_painted
    }

    /// Paints the disc centered at `center` if it moved enough since the last paint.
    /// Returns true if the renderer was called.
    pub fn sync(&mut self, center: Vec2, radius: f32, rotation: f32, epsilon: f32) -> bool {
        if let Some(last) = self.last_painted {
            if (center.x - last.x).abs() <= epsilon && (center.y - last.y).abs() <= epsilon {
                return false;
            }
        }

        self.renderer
            .paint(center.x - radius, center.y - radius, rotation);
        self.last_painted = Some(center);
        true
    }
}

impl Drop for Visual {
    fn drop(&mut self) {
        self.renderer.remove();
    }
}

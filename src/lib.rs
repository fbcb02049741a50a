pub mod body;
pub mod c_api;
pub mod config;
pub mod element;
pub mod error;
pub mod orbit;
pub mod physics;
pub mod render;
pub mod simulation;
pub mod utils;

pub use body::{Body, SizeClass, Viewport};
pub use config::{HotZone, LinkSpec, PhysicsConfig, SimulationConfig};
pub use element::{BodyKind, Element};
pub use error::SimulationError;
pub use orbit::{Interactive, LinkKind, OrbitState};
pub use render::{NodeSpec, NullStage, Renderer, Stage};
pub use simulation::{PointerState, Simulation};

use crate::{
    body::Viewport,
    config::SimulationConfig,
    orbit::{LinkKind, OrbitState},
    render::{NodeSpec, Renderer, Stage},
    simulation::Simulation,
};

use std::ffi::{CStr, c_char, c_void};

/// Host callback that positions node `id`.
pub type PaintFn = extern "C" fn(user_data: *mut c_void, id: u32, left: f32, top: f32, rotation: f32);
/// Host callback that detaches node `id`.
pub type RemoveFn = extern "C" fn(user_data: *mut c_void, id: u32);

/// Snapshot of one body for the host.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub is_link: bool,
    /// 0 idle, 1 moving to center, 2 orbiting, 3 locked; always 0 for decorative bodies.
    pub orbit_state: u8,
}

struct CallbackStage {
    paint: Option<PaintFn>,
    remove: Option<RemoveFn>,
    user_data: *mut c_void,
}

impl Stage for CallbackStage {
    fn mount(&mut self, spec: &NodeSpec<'_>) -> Option<Box<dyn Renderer>> {
        let paint = self.paint?;
        Some(Box::new(CallbackRenderer {
            id: spec.id as u32,
            paint,
            remove: self.remove,
            user_data: self.user_data,
        }))
    }
}

struct CallbackRenderer {
    id: u32,
    paint: PaintFn,
    remove: Option<RemoveFn>,
    user_data: *mut c_void,
}

impl Renderer for CallbackRenderer {
    fn paint(&mut self, left: f32, top: f32, rotation: f32) {
        (self.paint)(self.user_data, self.id, left, top, rotation);
    }

    fn remove(&mut self) {
        if let Some(remove) = self.remove {
            remove(self.user_data, self.id);
        }
    }
}

fn create(
    config: SimulationConfig,
    width: f32,
    height: f32,
    paint: Option<PaintFn>,
    remove: Option<RemoveFn>,
    user_data: *mut c_void,
) -> *mut Simulation {
    let mut stage = CallbackStage {
        paint,
        remove,
        user_data,
    };
    match Simulation::new(config, Viewport::new(width, height), &mut stage) {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(e) => {
            log::error!("Simulation_Create failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Creates a simulation with default settings. A `seed` of 0 seeds from entropy.
/// Returns null if `paint` is null.
///
/// # Safety
/// `user_data` is handed back to the callbacks unchanged and must stay valid
/// until the simulation is destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Create(
    width: f32,
    height: f32,
    seed: u64,
    paint: Option<PaintFn>,
    remove: Option<RemoveFn>,
    user_data: *mut c_void,
) -> *mut Simulation {
    let config = SimulationConfig {
        seed: (seed != 0).then_some(seed),
        ..SimulationConfig::default()
    };
    create(config, width, height, paint, remove, user_data)
}

/// Creates a simulation from a JSON configuration. Returns null on any error.
///
/// # Safety
/// `config_json` must be null or a valid NUL-terminated string. `user_data`
/// follows the rules of [`Simulation_Create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_CreateFromJson(
    config_json: *const c_char,
    width: f32,
    height: f32,
    paint: Option<PaintFn>,
    remove: Option<RemoveFn>,
    user_data: *mut c_void,
) -> *mut Simulation {
    if config_json.is_null() {
        log::error!("Simulation_CreateFromJson: null configuration");
        return std::ptr::null_mut();
    }
    let text = unsafe { CStr::from_ptr(config_json) };
    let config = match text
        .to_str()
        .map_err(|e| e.to_string())
        .and_then(|s| SimulationConfig::from_json(s).map_err(|e| e.to_string()))
    {
        Ok(config) => config,
        Err(e) => {
            log::error!("Simulation_CreateFromJson: {e}");
            return std::ptr::null_mut();
        }
    };
    create(config, width, height, paint, remove, user_data)
}

/// # Safety
/// `handle` must be null or a pointer returned by a `Simulation_Create*` function
/// that has not been destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Destroy(handle: *mut Simulation) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Tick(handle: *mut Simulation, now_ms: f64) -> bool {
    unsafe { handle.as_mut() }.is_some_and(|sim| sim.tick(now_ms))
}

/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Step(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.step();
    }
}

/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_PointerDown(handle: *mut Simulation, x: f32, y: f32, now_ms: f64) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.pointer_down(x, y, now_ms);
    }
}

/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_PointerMove(handle: *mut Simulation, x: f32, y: f32, now_ms: f64) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.pointer_move(x, y, now_ms);
    }
}

/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_PointerUp(handle: *mut Simulation, x: f32, y: f32, now_ms: f64) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.pointer_up(x, y, now_ms);
    }
}

/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Resize(handle: *mut Simulation, width: f32, height: f32) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.resize(width, height);
    }
}

/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_SetPaused(handle: *mut Simulation, paused: bool) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        if paused {
            sim.pause();
        } else {
            sim.resume();
        }
    }
}

/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetBodyCount(handle: *const Simulation) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |sim| sim.bodies().len())
}

/// Copies body `index` into `out`. Returns false if either pointer is null or
/// the index is out of range.
///
/// # Safety
/// See [`Simulation_Destroy`]; `out` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetBodyState(
    handle: *const Simulation,
    index: usize,
    out: *mut BodyState,
) -> bool {
    let (Some(sim), Some(out)) = (unsafe { handle.as_ref() }, unsafe { out.as_mut() }) else {
        return false;
    };
    let Some(element) = sim.bodies().get(index) else {
        return false;
    };

    let body = element.body;
    *out = BodyState {
        x: body.pos.x,
        y: body.pos.y,
        vx: body.vel.x,
        vy: body.vel.y,
        radius: body.radius,
        is_link: element.is_interactive(),
        orbit_state: match element.orbit_state() {
            None | Some(OrbitState::Idle) => 0,
            Some(OrbitState::MovingToCenter) => 1,
            Some(OrbitState::Orbiting) => 2,
            Some(OrbitState::LockedOrbiting) => 3,
        },
    };
    true
}

/// Index into the link kinds (repository, community, leaderboard, submit score)
/// of the link under (`x`, `y`), or -1.
///
/// # Safety
/// See [`Simulation_Destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_LinkAt(handle: *const Simulation, x: f32, y: f32) -> i32 {
    unsafe { handle.as_ref() }
        .and_then(|sim| sim.link_at(x, y))
        .and_then(|kind| LinkKind::ALL.iter().position(|&k| k == kind))
        .map_or(-1, |i| i as i32)
}

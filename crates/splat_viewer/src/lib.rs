//! Real-time splat viewer session core.
//!
//! This library owns the continuously rendering 3D scene of the virtual-tour
//! viewer: it translates keyboard/mouse input into camera motion, loads and
//! unloads large point-cloud assets without stalling the render loop,
//! negotiates immersive VR sessions with a stereoscopic preview fallback, and
//! guarantees safe, idempotent teardown of renderer and surface resources.
//!
//! The splat renderer itself, the render-surface host and the XR device are
//! opaque collaborators behind the traits in [`backend`] and [`xr`]; this
//! crate never parses point-cloud formats or fetches assets.

pub mod backend;
pub mod camera;
pub mod error;
pub mod input;
pub mod scene;
pub mod session;
pub mod xr;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{RenderBackend, SurfaceHost};
pub use camera::{Camera, CameraController};
pub use error::ViewerError;
pub use input::{InputRouter, InputState, MoveKey};
pub use scene::{SceneBounds, SceneHandle, SceneLoader};
pub use session::{Lifecycle, ViewerConfig, ViewerSession};
pub use xr::{SessionEnd, SessionFeatures, XrDevice, XrSessionManager, XrState};

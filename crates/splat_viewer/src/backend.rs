//! Seams to the collaborators the session core does not implement itself:
//! the splat renderer and the render-surface host.

use crate::camera::Camera;
use crate::scene::SceneBounds;
use anyhow::Result;
use winit::dpi::PhysicalSize;

/// The opaque external splat renderer.
///
/// The core never parses point-cloud formats or fetches assets; it drives a
/// renderer that does, through this trait. Implementations may run sort or
/// compute workers internally; the session only requires that the
/// synchronous per-frame calls never block on them.
#[allow(async_fn_in_trait)]
pub trait RenderBackend {
    /// Completes the renderer's own asynchronous setup.
    async fn init(&mut self) -> Result<()>;

    /// Tunes the projection near plane for close-range point-cloud viewing.
    fn set_near_plane(&mut self, near: f32);

    /// Per-frame bookkeeping (splat sorting, streaming upkeep).
    fn update(&mut self);

    /// Draws one frame with the given camera pose.
    fn render(&mut self, camera: &Camera);

    /// Resizes the render surface.
    fn resize(&mut self, size: PhysicalSize<u32>);

    /// Streams and decodes the asset at `url` into the renderer. Partial
    /// geometry may become visible while this is pending; resolution means
    /// completion or failure, and on failure no asset remains loaded.
    async fn load_scene(&mut self, url: &str) -> Result<SceneBounds>;

    /// Releases the buffers of the currently loaded asset.
    async fn unload_scene(&mut self) -> Result<()>;

    /// Rotates the loaded scene about the horizontal axis.
    fn set_scene_rotation_x(&mut self, radians: f32) -> Result<()>;

    /// Enables or disables the device-XR rendering path.
    fn set_xr_rendering(&mut self, enabled: bool);

    /// Releases GPU resources. Called at most once, during session disposal;
    /// must be safe to call even when `init` never ran or failed.
    async fn dispose(&mut self) -> Result<()>;
}

/// Host of the render surface: a DOM container element in a web deployment,
/// a window in the native harness.
///
/// Surface attachment and the resize listener are paired exactly once per
/// session; only the owning [`ViewerSession`](crate::session::ViewerSession)
/// may attach or detach the surface.
pub trait SurfaceHost {
    /// Current inner size of the hosting container.
    fn size(&self) -> PhysicalSize<u32>;

    /// Attaches the session's render surface to the container.
    fn attach_surface(&mut self) -> Result<()>;

    /// Detaches the render surface. Must tolerate the surface already being
    /// detached and report success in that case.
    fn detach_surface(&mut self) -> Result<()>;

    /// Registers (`true`) or unregisters (`false`) the host resize listener.
    fn watch_resize(&mut self, watch: bool);
}

//! The viewer session: aggregate root that owns the renderer, surface host
//! and XR device, wires the navigation components together, and enforces the
//! lifecycle contract consumed by the hosting layer.

use crate::backend::{RenderBackend, SurfaceHost};
use crate::camera::{Camera, CameraController};
use crate::error::ViewerError;
use crate::input::InputRouter;
use crate::scene::{framing_pose, SceneHandle, SceneLoader};
use crate::xr::{XrDevice, XrSessionManager, XrState};
use glam::Vec3;
use winit::event::WindowEvent;

/// Near plane tuned for close-range point-cloud viewing.
const NEAR_PLANE: f32 = 0.01;

/// Construction options recognized by the hosting layer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub camera_up: Vec3,
    pub initial_camera_position: Vec3,
    pub initial_camera_look_at: Vec3,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera_up: Vec3::Y,
            initial_camera_position: Vec3::new(0.0, 1.6, 5.0),
            initial_camera_look_at: Vec3::new(0.0, 1.6, 0.0),
        }
    }
}

/// Session lifecycle, checked at the top of every public operation.
/// `Disposed` is terminal: all further operations are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready,
    Disposed,
}

/// One viewer session: exactly one renderer/camera/render-surface triple and
/// zero-or-one attached scene.
///
/// All operations take `&mut self`, so a pending `load` or VR request can
/// never overlap another mutation of the same session; cancellation is
/// drop-based, and `dispose` is safe after any dropped in-flight operation.
pub struct ViewerSession<B, H, D> {
    lifecycle: Lifecycle,
    pub(crate) backend: B,
    pub(crate) host: H,
    pub(crate) xr_device: D,
    camera: Camera,
    controller: CameraController,
    input: InputRouter,
    loader: SceneLoader,
    xr: XrSessionManager,
    surface_attached: bool,
    resize_watched: bool,
}

impl<B, H, D> ViewerSession<B, H, D>
where
    B: RenderBackend,
    H: SurfaceHost,
    D: XrDevice,
{
    /// Creates an uninitialized session. No renderer setup, surface
    /// attachment or listener registration happens until
    /// [`wait_for_initialization`](Self::wait_for_initialization).
    pub fn new(backend: B, host: H, xr_device: D, config: ViewerConfig) -> Self {
        let camera = Camera::looking_at(
            config.initial_camera_position,
            config.initial_camera_look_at,
            config.camera_up,
        );
        Self {
            lifecycle: Lifecycle::Uninitialized,
            backend,
            host,
            xr_device,
            camera,
            controller: CameraController::default(),
            input: InputRouter::new(),
            loader: SceneLoader::new(),
            xr: XrSessionManager::new(),
            surface_attached: false,
            resize_watched: false,
        }
    }

    /// Runs asynchronous initialization on the first call: renderer setup,
    /// surface attachment, near-plane tuning, resize-listener registration
    /// and an initial resize. Subsequent calls on a ready session are cheap
    /// no-ops and never re-run initialization. On failure the session stays
    /// `Uninitialized` with no partial surface attachment.
    pub async fn initialize(&mut self) -> Result<(), ViewerError> {
        match self.lifecycle {
            Lifecycle::Ready => return Ok(()),
            Lifecycle::Disposed => {
                log::debug!("initialize ignored: session disposed");
                return Ok(());
            }
            Lifecycle::Uninitialized | Lifecycle::Initializing => {}
        }
        self.lifecycle = Lifecycle::Initializing;
        log::info!("initializing viewer session");

        if let Err(err) = self.backend.init().await {
            self.lifecycle = Lifecycle::Uninitialized;
            return Err(ViewerError::Init(err));
        }
        if let Err(err) = self.host.attach_surface() {
            self.lifecycle = Lifecycle::Uninitialized;
            return Err(ViewerError::Init(err));
        }
        self.surface_attached = true;

        self.backend.set_near_plane(NEAR_PLANE);
        self.camera.near = NEAR_PLANE;
        self.host.watch_resize(true);
        self.resize_watched = true;
        self.handle_resize();

        self.lifecycle = Lifecycle::Ready;
        log::info!("viewer session ready");
        Ok(())
    }

    /// Awaits session readiness. Same contract as [`initialize`](Self::initialize);
    /// exposed under the name the hosting layer consumes.
    pub async fn wait_for_initialization(&mut self) -> Result<(), ViewerError> {
        self.initialize().await
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    /// Read access to the camera pose, for the hosting layer's own wiring.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The currently attached scene, if any.
    pub fn scene(&self) -> Option<&SceneHandle> {
        self.loader.current()
    }

    pub fn has_scene(&self) -> bool {
        self.loader.has_scene()
    }

    pub fn xr_state(&self) -> XrState {
        self.xr.state()
    }

    /// Navigation input is routed only while the session is ready and a
    /// scene is attached.
    fn input_active(&self) -> bool {
        self.lifecycle == Lifecycle::Ready && self.loader.has_scene()
    }

    /// Forwards one window event. Resizes always apply; navigation input is
    /// routed only while a scene is loaded on a ready session, so stale
    /// events can never drive a cleared or disposed camera.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        if matches!(event, WindowEvent::Resized(_)) {
            self.handle_resize();
            return false;
        }
        if self.input_active() {
            self.input.handle_window_event(event)
        } else {
            false
        }
    }

    /// Per-frame state advance: integrates routed input into the camera,
    /// observes externally-ended VR sessions, then runs renderer upkeep.
    /// No-op before readiness; tolerates being called on every animation
    /// tick indefinitely, including while a load is pending elsewhere.
    pub fn update(&mut self) {
        if self.lifecycle != Lifecycle::Ready {
            return;
        }
        if self.loader.has_scene() {
            self.controller
                .integrate(&mut self.camera, self.input.state_mut());
        }
        self.xr
            .poll_session_end(&mut self.backend, &mut self.camera, self.host.size());
        self.backend.update();
    }

    /// Draws one frame with the current camera pose. No-op before readiness.
    pub fn render(&mut self) {
        if self.lifecycle != Lifecycle::Ready {
            return;
        }
        self.backend.render(&self.camera);
    }

    /// Recomputes the camera aspect from the current container size (always
    /// recomputed, never cached) and resizes the render surface.
    pub fn handle_resize(&mut self) {
        if !matches!(self.lifecycle, Lifecycle::Ready | Lifecycle::Initializing) {
            return;
        }
        let size = self.host.size();
        self.camera.set_aspect_from(size);
        self.backend.resize(size);
        log::debug!("viewer resized to {}x{}", size.width, size.height);
    }

    /// Loads the splat asset at `url`, replacing any attached scene, then
    /// auto-frames the camera from the asset's bounding volume. Waits for
    /// initialization first if needed.
    pub async fn add_splat_scene(&mut self, url: &str) -> Result<(), ViewerError> {
        if self.lifecycle == Lifecycle::Disposed {
            log::debug!("add_splat_scene ignored: session disposed");
            return Ok(());
        }
        self.initialize().await?;

        let handle = self.loader.load(&mut self.backend, url).await?;
        let bounds = *handle.bounds();
        let (eye, target) = framing_pose(&bounds);
        self.camera.position = eye;
        self.camera.point_at(target);
        log::info!("camera framed at {eye} looking at {target}");
        Ok(())
    }

    /// Clears the attached scene and drops any pending navigation input.
    /// No-op when nothing is loaded or the session is disposed.
    pub async fn clear_scene(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.loader.clear(&mut self.backend).await;
        self.input.reset();
    }

    /// Toggles the 180° flip of the loaded scene about the horizontal axis.
    /// On a rotation failure the flip flag is rolled back before the error
    /// is returned.
    pub fn flip_scene_orientation(&mut self) -> Result<(), ViewerError> {
        if self.lifecycle != Lifecycle::Ready {
            return Ok(());
        }
        self.loader.toggle_flip(&mut self.backend).map(|_| ())
    }

    /// Negotiates an immersive VR session. On an unsupported or declining
    /// device returns [`ViewerError::XrUnavailable`]; the caller is expected
    /// to fall back to [`enable_vr_preview_mode`](Self::enable_vr_preview_mode).
    pub async fn enable_vr_mode(&mut self) -> Result<(), ViewerError> {
        if self.lifecycle == Lifecycle::Disposed {
            return Ok(());
        }
        self.initialize().await?;
        self.xr
            .enable_immersive(&mut self.backend, &mut self.xr_device)
            .await
    }

    /// Enables the stereoscopic preview fallback.
    pub fn enable_vr_preview_mode(&mut self) {
        if self.lifecycle != Lifecycle::Ready {
            return;
        }
        self.xr
            .enable_preview(&mut self.backend, &mut self.camera, self.host.size());
    }

    /// Leaves immersive or preview mode and restores monoscopic rendering.
    pub fn disable_vr_mode(&mut self) {
        if self.lifecycle != Lifecycle::Ready {
            return;
        }
        self.xr
            .disable(&mut self.backend, &mut self.camera, self.host.size());
    }

    /// Tears the session down: unregisters the resize listener, detaches the
    /// render surface (tolerating an already-detached surface) and releases
    /// the renderer. Teardown errors are logged, never returned, so disposal
    /// always completes. Idempotent; the host must stop scheduling frame
    /// ticks once this returns. Safe to call before initialization resolves
    /// and after a dropped in-flight load or VR request.
    pub async fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            log::debug!("viewer already disposed, skipping");
            return;
        }
        self.lifecycle = Lifecycle::Disposed;

        if self.resize_watched {
            self.host.watch_resize(false);
            self.resize_watched = false;
        }
        if self.surface_attached {
            if let Err(err) = self.host.detach_surface() {
                log::warn!("could not detach render surface: {err:#}");
            }
            self.surface_attached = false;
        }
        if let Err(err) = self.backend.dispose().await {
            log::warn!("error during renderer disposal: {err:#}");
        }

        self.loader.forget();
        self.input.reset();
        log::info!("viewer session disposed");
    }
}

//! Stub collaborators for running the session lifecycle without a real
//! splat renderer: every seam is exercised, nothing is drawn.

use anyhow::{bail, Result};
use glam::Vec3;
use splat_viewer::{
    Camera, RenderBackend, SceneBounds, SessionEnd, SessionFeatures, SurfaceHost, XrDevice,
};
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Renderer stand-in: accepts every call, reports a canned bounding volume.
#[derive(Debug, Default)]
pub struct NullRenderer {
    scene_loaded: bool,
}

impl RenderBackend for NullRenderer {
    async fn init(&mut self) -> Result<()> {
        log::info!("null renderer initialized");
        Ok(())
    }

    fn set_near_plane(&mut self, near: f32) {
        log::debug!("near plane set to {near}");
    }

    fn update(&mut self) {}

    fn render(&mut self, camera: &Camera) {
        log::trace!(
            "frame: position {}, yaw {:.3}, pitch {:.3}",
            camera.position,
            camera.yaw,
            camera.pitch
        );
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        log::debug!("surface resized to {}x{}", size.width, size.height);
    }

    async fn load_scene(&mut self, url: &str) -> Result<SceneBounds> {
        log::info!("pretending to stream {url}");
        self.scene_loaded = true;
        Ok(SceneBounds {
            min: Vec3::new(-5.0, 0.0, -5.0),
            max: Vec3::new(5.0, 3.0, 5.0),
        })
    }

    async fn unload_scene(&mut self) -> Result<()> {
        self.scene_loaded = false;
        Ok(())
    }

    fn set_scene_rotation_x(&mut self, radians: f32) -> Result<()> {
        if !self.scene_loaded {
            bail!("no scene buffers to rotate");
        }
        log::info!("scene rotation set to {radians} rad");
        Ok(())
    }

    fn set_xr_rendering(&mut self, enabled: bool) {
        log::debug!("device-XR rendering {}", if enabled { "on" } else { "off" });
    }

    async fn dispose(&mut self) -> Result<()> {
        log::info!("null renderer released");
        Ok(())
    }
}

/// Window-backed surface host. The window owns the native surface, so
/// attach/detach only track pairing; size comes straight from the window.
pub struct WindowHost {
    window: Arc<Window>,
    attached: bool,
    watching: bool,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            attached: false,
            watching: false,
        }
    }
}

impl SurfaceHost for WindowHost {
    fn size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    fn attach_surface(&mut self) -> Result<()> {
        self.attached = true;
        log::debug!("render surface attached to window");
        Ok(())
    }

    fn detach_surface(&mut self) -> Result<()> {
        if self.attached {
            self.attached = false;
            log::debug!("render surface detached");
        }
        Ok(())
    }

    fn watch_resize(&mut self, watch: bool) {
        self.watching = watch;
    }
}

/// Desktop stand-in for `navigator.xr`: immersive VR is never available, so
/// the harness always lands in the stereo preview fallback.
#[derive(Debug, Default)]
pub struct DesktopXr;

impl XrDevice for DesktopXr {
    async fn supports_immersive(&mut self) -> Result<bool> {
        Ok(false)
    }

    async fn request_immersive(
        &mut self,
        _features: &SessionFeatures,
        _on_end: SessionEnd,
    ) -> Result<()> {
        bail!("no immersive runtime on this host");
    }
}

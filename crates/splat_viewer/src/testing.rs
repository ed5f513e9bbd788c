//! Mock collaborators shared by the unit tests.

use crate::backend::{RenderBackend, SurfaceHost};
use crate::camera::Camera;
use crate::scene::SceneBounds;
use crate::xr::{SessionEnd, SessionFeatures, XrDevice};
use anyhow::{anyhow, Result};
use glam::Vec3;
use winit::dpi::PhysicalSize;

/// Records every call the session makes into the renderer seam.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub fail_init: bool,
    pub fail_load: bool,
    pub fail_rotation: bool,
    pub fail_dispose: bool,
    pub bounds: Option<SceneBounds>,

    pub init_calls: usize,
    pub update_calls: usize,
    pub render_calls: usize,
    pub resize_calls: Vec<(u32, u32)>,
    pub loaded: Vec<String>,
    pub unload_calls: usize,
    pub rotation_x: f32,
    pub xr_rendering: bool,
    pub near_plane: Option<f32>,
    pub dispose_calls: usize,
}

impl RenderBackend for MockBackend {
    async fn init(&mut self) -> Result<()> {
        self.init_calls += 1;
        if self.fail_init {
            return Err(anyhow!("adapter request failed"));
        }
        Ok(())
    }

    fn set_near_plane(&mut self, near: f32) {
        self.near_plane = Some(near);
    }

    fn update(&mut self) {
        self.update_calls += 1;
    }

    fn render(&mut self, _camera: &Camera) {
        self.render_calls += 1;
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.resize_calls.push((size.width, size.height));
    }

    async fn load_scene(&mut self, url: &str) -> Result<SceneBounds> {
        if self.fail_load {
            return Err(anyhow!("unsupported splat container"));
        }
        self.loaded.push(url.to_owned());
        Ok(self.bounds.unwrap_or(SceneBounds {
            min: Vec3::new(-1.0, 0.0, -1.0),
            max: Vec3::new(1.0, 2.0, 1.0),
        }))
    }

    async fn unload_scene(&mut self) -> Result<()> {
        self.unload_calls += 1;
        Ok(())
    }

    fn set_scene_rotation_x(&mut self, radians: f32) -> Result<()> {
        if self.fail_rotation {
            return Err(anyhow!("rotation rejected"));
        }
        self.rotation_x = radians;
        Ok(())
    }

    fn set_xr_rendering(&mut self, enabled: bool) {
        self.xr_rendering = enabled;
    }

    async fn dispose(&mut self) -> Result<()> {
        self.dispose_calls += 1;
        if self.fail_dispose {
            return Err(anyhow!("device already destroyed"));
        }
        Ok(())
    }
}

/// Surface host with a configurable size and call counters.
#[derive(Debug)]
pub struct MockHost {
    pub size: PhysicalSize<u32>,
    pub fail_attach: bool,
    pub attached: bool,
    pub attach_calls: usize,
    pub detach_calls: usize,
    pub resize_watches: Vec<bool>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            size: PhysicalSize::new(800, 600),
            fail_attach: false,
            attached: false,
            attach_calls: 0,
            detach_calls: 0,
            resize_watches: Vec::new(),
        }
    }
}

impl SurfaceHost for MockHost {
    fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn attach_surface(&mut self) -> Result<()> {
        if self.fail_attach {
            return Err(anyhow!("container is gone"));
        }
        self.attach_calls += 1;
        self.attached = true;
        Ok(())
    }

    fn detach_surface(&mut self) -> Result<()> {
        self.detach_calls += 1;
        self.attached = false;
        Ok(())
    }

    fn watch_resize(&mut self, watch: bool) {
        self.resize_watches.push(watch);
    }
}

/// XR device with scripted support and decline behavior.
#[derive(Debug, Default)]
pub struct MockXrDevice {
    pub supported: bool,
    pub decline_session: bool,
    pub requests: usize,
    pub last_features: Option<SessionFeatures>,
    pub end_handle: Option<SessionEnd>,
}

impl XrDevice for MockXrDevice {
    async fn supports_immersive(&mut self) -> Result<bool> {
        Ok(self.supported)
    }

    async fn request_immersive(
        &mut self,
        features: &SessionFeatures,
        on_end: SessionEnd,
    ) -> Result<()> {
        self.requests += 1;
        self.last_features = Some(features.clone());
        if self.decline_session {
            return Err(anyhow!("user declined the session"));
        }
        self.end_handle = Some(on_end);
        Ok(())
    }
}

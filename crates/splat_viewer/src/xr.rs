//! Immersive VR session negotiation with a stereoscopic-preview fallback.

use crate::backend::RenderBackend;
use crate::camera::Camera;
use crate::error::ViewerError;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use winit::dpi::PhysicalSize;

/// VR session lifecycle. A single tagged state instead of per-mode booleans,
/// so "immersive and preview at once" cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XrState {
    #[default]
    Inactive,
    RequestingImmersive,
    Immersive,
    StereoPreview,
}

/// Optional capabilities negotiated when requesting an immersive session.
#[derive(Debug, Clone)]
pub struct SessionFeatures {
    /// Floor-relative (and bounded-floor) tracking.
    pub floor_tracking: bool,
    pub hand_tracking: bool,
    /// Extra composition layers.
    pub layers: bool,
}

impl Default for SessionFeatures {
    fn default() -> Self {
        Self {
            floor_tracking: true,
            hand_tracking: true,
            layers: true,
        }
    }
}

/// Handle the device signals when it ends the session from its side
/// (headset removal, system exit). Polled once per frame by the session.
#[derive(Debug, Clone, Default)]
pub struct SessionEnd(Arc<AtomicBool>);

impl SessionEnd {
    /// Marks the session as externally ended.
    pub fn signal(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_signaled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The host device's XR capability (`navigator.xr` in a web deployment).
#[allow(async_fn_in_trait)]
pub trait XrDevice {
    /// Whether the device can grant an immersive VR session at all.
    async fn supports_immersive(&mut self) -> Result<bool>;

    /// Requests an immersive session. The device must call
    /// [`SessionEnd::signal`] when it ends the session from its side.
    async fn request_immersive(
        &mut self,
        features: &SessionFeatures,
        on_end: SessionEnd,
    ) -> Result<()>;
}

/// Negotiates immersive sessions and the preview fallback, keeping the
/// renderer's XR path and the camera aspect consistent with the mode.
#[derive(Debug, Default)]
pub struct XrSessionManager {
    state: XrState,
    features: SessionFeatures,
    session_end: Option<SessionEnd>,
}

impl XrSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> XrState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, XrState::Immersive | XrState::StereoPreview)
    }

    /// Requests an immersive VR session from the host device.
    ///
    /// No-op when already immersive. An unsupported or declining device is
    /// an expected alternate path reported as [`ViewerError::XrUnavailable`];
    /// callers answer it with [`enable_preview`](Self::enable_preview).
    pub async fn enable_immersive<B, D>(
        &mut self,
        backend: &mut B,
        device: &mut D,
    ) -> Result<(), ViewerError>
    where
        B: RenderBackend,
        D: XrDevice,
    {
        if self.state == XrState::Immersive {
            return Ok(());
        }
        self.state = XrState::RequestingImmersive;

        let supported = match device.supports_immersive().await {
            Ok(supported) => supported,
            Err(err) => {
                self.state = XrState::Inactive;
                return Err(ViewerError::XrUnavailable(format!(
                    "support query failed: {err:#}"
                )));
            }
        };
        if !supported {
            self.state = XrState::Inactive;
            log::info!("immersive VR not supported on this device");
            return Err(ViewerError::XrUnavailable(
                "not supported on this device".into(),
            ));
        }

        backend.set_xr_rendering(true);
        let end = SessionEnd::default();
        if let Err(err) = device.request_immersive(&self.features, end.clone()).await {
            backend.set_xr_rendering(false);
            self.state = XrState::Inactive;
            return Err(ViewerError::XrUnavailable(format!(
                "session request declined: {err:#}"
            )));
        }

        self.session_end = Some(end);
        self.state = XrState::Immersive;
        log::info!("immersive VR session started");
        Ok(())
    }

    /// Enables the non-immersive stereoscopic preview: the device-XR render
    /// path stays off and the side-by-side split is approximated by halving
    /// the camera aspect. No-op when already previewing.
    pub fn enable_preview<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        camera: &mut Camera,
        container: PhysicalSize<u32>,
    ) {
        if self.state == XrState::StereoPreview {
            return;
        }
        backend.set_xr_rendering(false);
        self.session_end = None;
        camera.aspect = container.width as f32 / 2.0 / container.height.max(1) as f32;
        self.state = XrState::StereoPreview;
        log::info!("stereo preview enabled");
    }

    /// Leaves either active mode: disables the device-XR render path and
    /// restores the full monoscopic aspect from the current container size.
    /// No-op from `Inactive`.
    pub fn disable<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        camera: &mut Camera,
        container: PhysicalSize<u32>,
    ) {
        if self.state == XrState::Inactive {
            return;
        }
        backend.set_xr_rendering(false);
        self.session_end = None;
        camera.set_aspect_from(container);
        self.state = XrState::Inactive;
        log::info!("VR mode disabled");
    }

    /// Observes an externally-ended immersive session. Called once per frame
    /// from the session's update tick.
    pub fn poll_session_end<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        camera: &mut Camera,
        container: PhysicalSize<u32>,
    ) {
        let ended = self.session_end.as_ref().is_some_and(SessionEnd::is_signaled);
        if ended && self.state == XrState::Immersive {
            log::info!("VR session ended by device");
            self.disable(backend, camera, container);
        }
    }
}

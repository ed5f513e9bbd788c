//! Scene loading: the single attached splat asset, its bounding volume, and
//! the auto-framing pose computed on load.

use crate::backend::RenderBackend;
use crate::error::ViewerError;
use glam::Vec3;
use std::f32::consts::PI;

/// Average human eye height in meters; the framing pose stands the viewer on
/// the scene floor.
pub const EYE_HEIGHT: f32 = 1.6;

/// Multiplier on the largest bounding-box dimension when backing the camera
/// away from the scene center.
pub const FRAMING_FACTOR: f32 = 1.5;

/// Axis-aligned bounding volume reported by the renderer for a loaded asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneBounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }
}

/// The currently attached splat asset.
#[derive(Debug, Clone)]
pub struct SceneHandle {
    url: String,
    bounds: SceneBounds,
    flipped: bool,
}

impl SceneHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bounds(&self) -> &SceneBounds {
        &self.bounds
    }

    /// Whether the 180° horizontal flip is applied.
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }
}

/// Eye and target of the auto-framing pose for a freshly loaded scene:
/// standing at eye height on the scene floor, backed away far enough along
/// +Z to take in the largest dimension.
pub fn framing_pose(bounds: &SceneBounds) -> (Vec3, Vec3) {
    let center = bounds.center();
    let eye_y = bounds.min.y + EYE_HEIGHT;
    let distance = bounds.max_extent() * FRAMING_FACTOR;
    (
        Vec3::new(center.x, eye_y, center.z + distance),
        Vec3::new(center.x, eye_y, center.z),
    )
}

/// Owns the zero-or-one scene slot and keeps it consistent with the renderer
/// across loads, clears and flips. At most one handle is ever attached.
#[derive(Debug, Default)]
pub struct SceneLoader {
    current: Option<SceneHandle>,
}

impl SceneLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&SceneHandle> {
        self.current.as_ref()
    }

    pub fn has_scene(&self) -> bool {
        self.current.is_some()
    }

    /// Loads the asset at `url`, clearing any previously attached scene
    /// first. Clear and load are strictly sequential so the renderer never
    /// holds two splat buffers. On failure no handle is attached and the
    /// cleared scene is not restored.
    pub async fn load<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        url: &str,
    ) -> Result<&SceneHandle, ViewerError> {
        self.clear(backend).await;

        log::info!("loading splat scene from {url}");
        let bounds = match backend.load_scene(url).await {
            Ok(bounds) => bounds,
            Err(err) => {
                log::error!("failed to load splat scene {url}: {err:#}");
                return Err(ViewerError::SceneLoad(err));
            }
        };
        log::info!(
            "splat scene loaded, bounds {:?} -> {:?}",
            bounds.min,
            bounds.max
        );

        Ok(&*self.current.insert(SceneHandle {
            url: url.to_owned(),
            bounds,
            flipped: false,
        }))
    }

    /// Detaches and releases the current scene. No-op when nothing is
    /// loaded; a failing release is logged and never raised, the handle is
    /// dropped regardless.
    pub async fn clear<B: RenderBackend>(&mut self, backend: &mut B) {
        if self.current.take().is_none() {
            return;
        }
        if let Err(err) = backend.unload_scene().await {
            log::error!("failed to release splat scene: {err:#}");
        } else {
            log::info!("splat scene cleared");
        }
    }

    /// Toggles the 180° flip about the horizontal axis. If the renderer
    /// rejects the rotation, the flag is rolled back so reported orientation
    /// matches what is actually drawn. Returns the new flipped state.
    pub fn toggle_flip<B: RenderBackend>(
        &mut self,
        backend: &mut B,
    ) -> Result<bool, ViewerError> {
        let Some(scene) = self.current.as_mut() else {
            log::warn!("no scene loaded to flip");
            return Ok(false);
        };

        scene.flipped = !scene.flipped;
        let rotation = if scene.flipped { PI } else { 0.0 };
        if let Err(err) = backend.set_scene_rotation_x(rotation) {
            scene.flipped = !scene.flipped;
            log::error!("failed to flip scene orientation: {err:#}");
            return Err(ViewerError::Flip(err));
        }

        log::info!(
            "scene orientation {}",
            if scene.flipped { "flipped" } else { "restored" }
        );
        Ok(scene.flipped)
    }

    /// Forgets the attached handle without touching the renderer. Used at
    /// disposal, after the backend itself has been released.
    pub fn forget(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use pollster::block_on;

    fn bounds(min: [f32; 3], max: [f32; 3]) -> SceneBounds {
        SceneBounds {
            min: Vec3::from(min),
            max: Vec3::from(max),
        }
    }

    #[test]
    fn framing_stands_at_eye_height_on_the_floor() {
        // center (0,1,0), max extent 2, distance 3.
        let (eye, target) = framing_pose(&bounds([-1.0, 0.0, -1.0], [1.0, 2.0, 1.0]));
        assert_eq!(eye, Vec3::new(0.0, 1.6, 3.0));
        assert_eq!(target, Vec3::new(0.0, 1.6, 0.0));
    }

    #[test]
    fn load_attaches_exactly_one_handle() {
        let mut backend = MockBackend::default();
        let mut loader = SceneLoader::new();

        let handle = block_on(loader.load(&mut backend, "scene.ply")).unwrap();
        assert_eq!(handle.url(), "scene.ply");
        assert!(!handle.is_flipped());
        assert_eq!(backend.unload_calls, 0);
        assert!(loader.has_scene());
    }

    #[test]
    fn second_load_replaces_the_first() {
        let mut backend = MockBackend::default();
        let mut loader = SceneLoader::new();

        block_on(loader.load(&mut backend, "a.splat")).unwrap();
        block_on(loader.load(&mut backend, "b.ksplat")).unwrap();

        assert_eq!(backend.loaded, vec!["a.splat", "b.ksplat"]);
        assert_eq!(backend.unload_calls, 1);
        assert_eq!(loader.current().unwrap().url(), "b.ksplat");
    }

    #[test]
    fn failed_load_leaves_nothing_attached() {
        let mut backend = MockBackend::default();
        let mut loader = SceneLoader::new();
        block_on(loader.load(&mut backend, "a.splat")).unwrap();

        backend.fail_load = true;
        let err = block_on(loader.load(&mut backend, "corrupt.ply")).unwrap_err();
        assert!(matches!(err, ViewerError::SceneLoad(_)));
        // The previously cleared scene is not restored either.
        assert!(!loader.has_scene());
        assert_eq!(backend.unload_calls, 1);
    }

    #[test]
    fn clear_on_empty_is_a_no_op() {
        let mut backend = MockBackend::default();
        let mut loader = SceneLoader::new();
        block_on(loader.clear(&mut backend));
        assert_eq!(backend.unload_calls, 0);
    }

    #[test]
    fn double_flip_restores_orientation() {
        let mut backend = MockBackend::default();
        let mut loader = SceneLoader::new();
        block_on(loader.load(&mut backend, "scene.ply")).unwrap();

        assert!(loader.toggle_flip(&mut backend).unwrap());
        assert_eq!(backend.rotation_x, PI);
        assert!(!loader.toggle_flip(&mut backend).unwrap());
        assert_eq!(backend.rotation_x, 0.0);
        assert!(!loader.current().unwrap().is_flipped());
    }

    #[test]
    fn failed_flip_rolls_the_flag_back() {
        let mut backend = MockBackend::default();
        let mut loader = SceneLoader::new();
        block_on(loader.load(&mut backend, "scene.ply")).unwrap();

        backend.fail_rotation = true;
        let err = loader.toggle_flip(&mut backend).unwrap_err();
        assert!(matches!(err, ViewerError::Flip(_)));
        assert!(!loader.current().unwrap().is_flipped());
        assert_eq!(backend.rotation_x, 0.0);
    }

    #[test]
    fn flip_without_scene_is_a_no_op() {
        let mut backend = MockBackend::default();
        let mut loader = SceneLoader::new();
        assert!(!loader.toggle_flip(&mut backend).unwrap());
    }
}

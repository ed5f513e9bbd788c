use thiserror::Error;

/// Failure taxonomy of the viewer session.
///
/// The renderer, surface host and XR device report opaque [`anyhow`] errors;
/// this enum classifies them at the session boundary so the hosting layer can
/// show a human-readable message. Disposal-time errors never appear here:
/// they are logged and swallowed so teardown always completes.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Renderer construction or async setup failed. The session stays
    /// `Uninitialized` with no surface attached.
    #[error("viewer initialization failed: {0}")]
    Init(#[source] anyhow::Error),

    /// Network, decode or unsupported-format failure while loading an asset.
    /// No scene handle is left attached.
    #[error("invalid or corrupt point-cloud file: {0}")]
    SceneLoad(#[source] anyhow::Error),

    /// Immersive VR is unavailable on this device. This is an expected
    /// alternate path, not a hard error: callers answer it by enabling the
    /// stereo preview fallback.
    #[error("immersive VR session unavailable: {0}")]
    XrUnavailable(String),

    /// Applying the flip rotation failed. The flip flag has already been
    /// rolled back so reported orientation matches what is drawn.
    #[error("failed to flip scene orientation: {0}")]
    Flip(#[source] anyhow::Error),
}

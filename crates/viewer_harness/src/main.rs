//! Entry point for the native viewer harness.
//!
//! Plays the role of the hosting page: creates one viewer session, awaits
//! its readiness, then drives a continuous per-frame update/render loop
//! until the window closes. V toggles VR (with preview fallback), F flips
//! the loaded scene, Escape exits.

mod stub;

use anyhow::Result;
use clap::Parser;
use splat_viewer::{ViewerConfig, ViewerSession, XrState};
use std::sync::Arc;
use stub::{DesktopXr, NullRenderer, WindowHost};
use winit::{
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

type Session = ViewerSession<NullRenderer, WindowHost, DesktopXr>;

#[derive(Parser, Debug)]
#[command(about = "Splat viewer session harness")]
struct Args {
    /// URL or path of a splat asset to load once the session is ready.
    #[arg(long)]
    scene: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Splat Viewer Harness")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    let mut session = Session::new(
        NullRenderer::default(),
        WindowHost::new(window.clone()),
        DesktopXr,
        ViewerConfig::default(),
    );

    pollster::block_on(session.wait_for_initialization())?;

    if let Some(url) = &args.scene {
        if let Err(err) = pollster::block_on(session.add_splat_scene(url)) {
            log::error!("{err}");
        }
    }

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                // Navigation input is consumed by the session while a scene
                // is loaded; everything else is handled here.
                if !session.handle_window_event(&event) {
                    match event {
                        WindowEvent::CloseRequested => {
                            pollster::block_on(session.dispose());
                            elwt.exit();
                        }
                        WindowEvent::KeyboardInput { event, .. }
                            if event.state == ElementState::Pressed =>
                        {
                            match event.physical_key {
                                PhysicalKey::Code(KeyCode::Escape) => {
                                    pollster::block_on(session.dispose());
                                    elwt.exit();
                                }
                                PhysicalKey::Code(KeyCode::KeyV) => toggle_vr(&mut session),
                                PhysicalKey::Code(KeyCode::KeyF) => {
                                    if let Err(err) = session.flip_scene_orientation() {
                                        log::error!("{err}");
                                    }
                                }
                                _ => {}
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            session.update();
                            session.render();
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                // Reschedule the next frame tick unless torn down.
                if !session.is_disposed() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}

/// Mirrors the hosting page's VR toggle: try immersive first, fall back to
/// the stereo preview when the device cannot grant a session.
fn toggle_vr(session: &mut Session) {
    if session.xr_state() == XrState::Inactive {
        if let Err(err) = pollster::block_on(session.enable_vr_mode()) {
            log::info!("{err}; falling back to stereo preview");
            session.enable_vr_preview_mode();
        }
    } else {
        session.disable_vr_mode();
    }
}

//! Translation of raw window events into discrete navigation intents.
//!
//! Event handlers mutate an explicit [`InputState`] immediately; the camera
//! controller reads it once per frame. The router holds no camera state, so
//! input arrival is decoupled from integration timing.

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// One of the four held-key movement intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveKey {
    fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Self::Forward),
            KeyCode::KeyS => Some(Self::Back),
            KeyCode::KeyA => Some(Self::Left),
            KeyCode::KeyD => Some(Self::Right),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Input observed since the last frame: the set of held movement keys plus
/// the look and zoom deltas accumulated from pointer events.
///
/// Deltas are consumed once per frame via the `take_*` methods and never
/// retained beyond that; held keys persist until released.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: u8,
    look_delta: (f32, f32),
    zoom_delta: f32,
}

impl InputState {
    /// Whether `key` is currently held.
    pub fn held(&self, key: MoveKey) -> bool {
        self.held & key.bit() != 0
    }

    /// Whether any movement key is held.
    pub fn any_held(&self) -> bool {
        self.held != 0
    }

    /// Returns and clears the accumulated pointer-drag delta in pixels.
    pub fn take_look_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    /// Returns and clears the accumulated wheel delta in lines. Positive
    /// means scroll down (away from the user).
    pub fn take_zoom_delta(&mut self) -> f32 {
        std::mem::take(&mut self.zoom_delta)
    }

    fn press(&mut self, key: MoveKey) {
        self.held |= key.bit();
    }

    fn release(&mut self, key: MoveKey) {
        self.held &= !key.bit();
    }

    fn add_look(&mut self, dx: f32, dy: f32) {
        self.look_delta.0 += dx;
        self.look_delta.1 += dy;
    }

    fn add_zoom(&mut self, delta: f32) {
        self.zoom_delta += delta;
    }
}

/// Routes raw window events into [`InputState`].
#[derive(Debug, Default)]
pub struct InputRouter {
    state: InputState,
    dragging: bool,
    last_pointer: Option<(f64, f64)>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Handles one window event; returns `true` when the event was consumed
    /// as navigation input.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = MoveKey::from_code(code) {
                        self.key(key, event.state);
                        return true;
                    }
                }
                false
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.pointer_button(*state == ElementState::Pressed);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position.x, position.y)
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_left();
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Normalize to lines, positive = scroll down. Pixel deltas
                // are divided by the conventional 120 px per notch.
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y,
                    MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32) / 120.0,
                };
                self.wheel_lines(lines);
                true
            }
            _ => false,
        }
    }

    /// Updates held-key membership for a movement key.
    pub fn key(&mut self, key: MoveKey, state: ElementState) {
        match state {
            ElementState::Pressed => self.state.press(key),
            ElementState::Released => self.state.release(key),
        }
    }

    /// Begins or ends a look drag.
    pub fn pointer_button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    /// Tracks the pointer; while dragging, accumulates the look delta.
    /// Returns `true` when the move contributed to the drag.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        let contributed = if let Some((lx, ly)) = self.last_pointer {
            if self.dragging {
                self.state.add_look((x - lx) as f32, (y - ly) as f32);
            }
            self.dragging
        } else {
            false
        };
        self.last_pointer = Some((x, y));
        contributed
    }

    /// Ends the drag when the pointer leaves the surface, so a stale delta
    /// cannot accumulate against the re-entry position.
    pub fn pointer_left(&mut self) {
        self.dragging = false;
        self.last_pointer = None;
    }

    /// Accumulates wheel input, in lines (positive = scroll down).
    pub fn wheel_lines(&mut self, lines: f32) {
        self.state.add_zoom(lines);
    }

    /// Drops all held keys, pending deltas and drag state. Called when the
    /// scene is cleared or the session disposed so stale input cannot drive
    /// a torn-down camera.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

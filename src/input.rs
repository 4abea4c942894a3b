//! Mouse pan and zoom folded into a single accumulated transform.
//!
//! Positions arrive in viewport pixels (origin top-left, y down) and are
//! mapped to the `[-1, 1] x [-1, 1]` plane with y up before use. Every new
//! step is composed on the right of the accumulated matrix, so with GL's
//! column vectors it acts on the clip-space point before everything that
//! came earlier.

use eframe::egui::PointerButton;
use glam::{Mat4, Vec2, Vec3};

/// Relative scale change per wheel notch.
pub const ZOOM_FACTOR: f32 = 0.05;

/// Normalized distance moved per arrow-key press.
pub const KEY_PAN_STEP: f32 = 0.05;

/// Size of the surface that pointer positions are measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn to_normalized(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            2.0 * pixel.x / self.width - 1.0,
            2.0 * (self.height - pixel.y) / self.height - 1.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Last normalized pointer position seen while the button is held.
    Dragging { anchor: Vec2 },
}

#[derive(Debug, Clone)]
pub struct InputController {
    viewport: Viewport,
    state: DragState,
}

impl InputController {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            state: DragState::Idle,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Starts a drag on a primary press. Other buttons, and presses during
    /// a drag, are ignored.
    pub fn press(&mut self, button: PointerButton, pixel: Vec2) {
        if button != PointerButton::Primary || self.is_dragging() {
            return;
        }
        let anchor = self.viewport.to_normalized(pixel);
        log::debug!("Drag started at {:?}", anchor);
        self.state = DragState::Dragging { anchor };
    }

    /// Pans by `previous - current` while dragging; no-op otherwise.
    pub fn move_to(&mut self, pixel: Vec2, transform: &mut Mat4) {
        let DragState::Dragging { anchor } = self.state else {
            return;
        };
        let current = self.viewport.to_normalized(pixel);
        pan(transform, anchor - current);
        self.state = DragState::Dragging { anchor: current };
    }

    pub fn release(&mut self) {
        if self.is_dragging() {
            log::debug!("Drag ended");
        }
        self.state = DragState::Idle;
    }

    /// Zooms about the pointer. Positive `delta` zooms in. Only the sign of
    /// `delta` matters.
    pub fn wheel(&mut self, pixel: Vec2, delta: f32, transform: &mut Mat4) {
        if delta == 0.0 || delta.is_nan() {
            return;
        }
        let fixed = self.viewport.to_normalized(pixel);
        zoom_about(transform, fixed, delta.signum());
    }

    /// Pans by a fixed step, in the same direction a drag would move.
    pub fn nudge(&mut self, direction: Vec2, transform: &mut Mat4) {
        pan(transform, -direction * KEY_PAN_STEP);
    }
}

fn pan(transform: &mut Mat4, delta: Vec2) {
    *transform *= Mat4::from_translation(delta.extend(0.0));
}

/// `steps` of +1 shrink the visible region by `1 - ZOOM_FACTOR`; -1 undoes
/// exactly one such step.
fn zoom_about(transform: &mut Mat4, fixed: Vec2, steps: f32) {
    let scale = (1.0 - ZOOM_FACTOR).powf(steps);
    let fixed = fixed.extend(0.0);
    *transform *= Mat4::from_translation(fixed)
        * Mat4::from_scale(Vec3::splat(scale))
        * Mat4::from_translation(-fixed);
}

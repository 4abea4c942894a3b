use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use eframe::{egui, glow, App};
use glam::{Mat4, Vec2};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::InputController;
use crate::params::{Control, RenderParameters};
use crate::renderer::MandelbrotRenderer;

/// Height reserved below the fractal for the slider panel.
pub const CONTROLS_HEIGHT: f32 = 140.0;

pub struct MandelbrotApp {
    // `None` once torn down in `on_exit`.
    renderer: Arc<Mutex<Option<MandelbrotRenderer>>>,
    params: RenderParameters,
    input: InputController,
    positions: [i32; 4],
    labels: [String; 4],
    t_render: Arc<Mutex<Duration>>,
}

impl MandelbrotApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &Config) -> Result<Self> {
        let gl = cc
            .gl
            .as_ref()
            .ok_or_else(|| Error::Gl("no glow context, start with the glow renderer".to_owned()))?;

        let renderer = MandelbrotRenderer::new(gl, config)?;

        let mut params = RenderParameters::default();
        Control::Iterations.apply(&mut params, config.initial_iterations());

        let positions = Control::ALL.map(|control| control.position(&params));
        let labels = Control::ALL.map(|control| control.label(control.position(&params)));

        let (width, height) = config.viewport_size();

        Ok(Self {
            renderer: Arc::new(Mutex::new(Some(renderer))),
            params,
            input: InputController::new(width, height),
            positions,
            labels,
            t_render: Arc::new(Mutex::new(Duration::ZERO)),
        })
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        for (i, control) in Control::ALL.into_iter().enumerate() {
            ui.horizontal(|ui| {
                ui.add_sized([110.0, 18.0], egui::Label::new(control.title()));
                let mut position = self.positions[i];
                let slider = egui::Slider::new(&mut position, control.range()).show_value(false);
                if ui.add(slider).changed() {
                    self.labels[i] = control.apply(&mut self.params, position);
                    self.positions[i] = control.position(&self.params);
                }
                ui.label(&self.labels[i]);
            });
        }
    }

    /// Feeds this frame's pointer and key input to the controller.
    /// Returns true when the transform changed.
    fn handle_input(&mut self, ctx: &egui::Context, rect: egui::Rect, hovered: bool) -> bool {
        self.input.resize(rect.width(), rect.height());
        let before = self.params.transform;
        let local = |pos: egui::Pos2| Vec2::new(pos.x - rect.left(), pos.y - rect.top());

        let events = ctx.input(|i| i.events.clone());
        for event in &events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed: true,
                    ..
                } if rect.contains(*pos) => self.input.press(*button, local(*pos)),
                egui::Event::PointerButton { pressed: false, .. } => self.input.release(),
                egui::Event::PointerMoved(pos) => {
                    self.input.move_to(local(*pos), &mut self.params.transform)
                }
                _ => {}
            }
        }

        let scroll = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 && hovered {
            if let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) {
                self.input.wheel(local(pos), scroll, &mut self.params.transform);
            }
        }

        let nudges = ctx.input(|i| {
            [
                (egui::Key::ArrowLeft, Vec2::X),
                (egui::Key::ArrowRight, Vec2::NEG_X),
                (egui::Key::ArrowUp, Vec2::NEG_Y),
                (egui::Key::ArrowDown, Vec2::Y),
            ]
            .into_iter()
            .filter(|(key, _)| i.key_pressed(*key))
            .map(|(_, direction)| direction)
            .collect::<Vec<_>>()
        });
        for direction in nudges {
            self.input.nudge(direction, &mut self.params.transform);
        }

        self.params.transform != before
    }

    fn paint_fractal(&self, ui: &egui::Ui, rect: egui::Rect) {
        let renderer = Arc::clone(&self.renderer);
        let t_render = Arc::clone(&self.t_render);
        let params = self.params;

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let start = Instant::now();
                let viewport = info.viewport_in_pixels();
                let gl = painter.gl();

                if let Ok(mut guard) = renderer.lock() {
                    if let Some(renderer) = guard.as_mut() {
                        renderer.resize(
                            gl,
                            viewport.left_px,
                            viewport.from_bottom_px,
                            viewport.width_px,
                            viewport.height_px,
                        );
                        renderer.render(gl, &params);
                    }
                }

                if let Ok(mut elapsed) = t_render.lock() {
                    *elapsed = start.elapsed();
                }
            })),
        };
        ui.painter().add(callback);
    }
}

impl App for MandelbrotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Reset View").clicked() {
                    self.params.transform = Mat4::IDENTITY;
                }
                ui.separator();
                let elapsed = self.t_render.lock().map(|t| *t).unwrap_or_default();
                ui.label(format!("Render time: {:.2} ms", elapsed.as_secs_f64() * 1000.0));
            });
        });

        egui::TopBottomPanel::bottom("controls")
            .exact_height(CONTROLS_HEIGHT)
            .show(ctx, |ui| self.controls_ui(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

                if self.handle_input(ctx, rect, response.hovered()) {
                    ctx.request_repaint();
                }

                self.paint_fractal(ui, rect);
            });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        let Some(gl) = gl else {
            return;
        };
        if let Ok(mut guard) = self.renderer.lock() {
            if let Some(renderer) = guard.take() {
                renderer.destroy(gl);
            }
        }
    }
}

use clap::Parser;
use eframe::egui;

use mandelbrot_palette::app::CONTROLS_HEIGHT;
use mandelbrot_palette::{Config, MandelbrotApp};

type DynError = Box<dyn std::error::Error + Send + Sync>;

fn create_app(cc: &eframe::CreationContext<'_>, config: &Config) -> Result<Box<dyn eframe::App>, DynError> {
    match MandelbrotApp::new(cc, config) {
        Ok(app) => Ok(Box::new(app)),
        Err(e) => {
            log::error!("Startup failed: {}", e);
            Err(Box::new(e))
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let (width, height) = config.viewport_size();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(egui::vec2(width, height + CONTROLS_HEIGHT))
            .with_title("Mandelbrot"),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "Mandelbrot",
        native_options,
        Box::new(move |cc: &eframe::CreationContext<'_>| create_app(cc, &config)),
    )
}

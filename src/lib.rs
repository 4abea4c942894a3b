//! Mandelbrot viewer: a fragment shader colors each pixel from a palette
//! ramp, with sliders for the shading parameters and mouse pan/zoom.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod mesh;
pub mod palette;
pub mod params;
pub mod renderer;
pub mod shader;

pub use app::MandelbrotApp;
pub use config::Config;
pub use error::{Error, Result};
pub use params::RenderParameters;

use std::path::PathBuf;

use clap::Parser;

use crate::params::Control;

/// Startup options. Paths are relative to the working directory.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "mandelbrot_palette", about = "GPU Mandelbrot viewer with a palette ramp")]
pub struct Config {
    /// Vertex shader source (GLSL ES 3.00)
    #[arg(long, default_value = "assets/shader.vert")]
    pub vertex: PathBuf,

    /// Fragment shader source (GLSL ES 3.00)
    #[arg(long, default_value = "assets/shader.frag")]
    pub fragment: PathBuf,

    /// Image whose first row becomes the color ramp
    #[arg(long, default_value = "assets/palette.png")]
    pub palette: PathBuf,

    /// Initial width of the fractal viewport, in points
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial height of the fractal viewport, in points
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Initial iteration cap
    #[arg(long, default_value_t = 500)]
    pub iterations: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("assets/shader.vert"),
            fragment: PathBuf::from("assets/shader.frag"),
            palette: PathBuf::from("assets/palette.png"),
            width: 800,
            height: 800,
            iterations: 500,
        }
    }
}

impl Config {
    /// Iteration cap as the slider would hold it.
    pub fn initial_iterations(&self) -> i32 {
        Control::Iterations.clamp(self.iterations)
    }

    /// Viewport size, never smaller than one point on either axis.
    pub fn viewport_size(&self) -> (f32, f32) {
        (self.width.max(1) as f32, self.height.max(1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_matches_default() {
        let parsed = Config::try_parse_from(["mandelbrot_palette"]).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn flags_override_paths_and_size() {
        let parsed = Config::try_parse_from([
            "mandelbrot_palette",
            "--palette",
            "ramps/fire.png",
            "--width",
            "640",
            "--height",
            "480",
        ])
        .unwrap();
        assert_eq!(parsed.palette, PathBuf::from("ramps/fire.png"));
        assert_eq!(parsed.viewport_size(), (640.0, 480.0));
        assert_eq!(parsed.vertex, PathBuf::from("assets/shader.vert"));
    }

    #[test]
    fn iterations_are_clamped_to_slider_range() {
        let mut config = Config::default();
        config.iterations = 50_000;
        assert_eq!(config.initial_iterations(), 1000);
        config.iterations = -3;
        assert_eq!(config.initial_iterations(), 1);
    }

    #[test]
    fn zero_size_is_bumped_to_one() {
        let config = Config {
            width: 0,
            ..Config::default()
        };
        assert_eq!(config.viewport_size(), (1.0, 800.0));
    }
}

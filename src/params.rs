//! Shading parameters and the sliders that drive them.

use std::ops::RangeInclusive;

use glam::{Mat4, Vec2};

/// Everything the fragment shader reads besides the palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    pub max_iterations: i32,
    /// Weight of the iteration depth in the final shade, `0..=1`.
    pub depth_affect: f32,
    /// Starting value of `z` for every pixel.
    pub z0: Vec2,
    /// Accumulated pan/zoom, applied to clip-space positions.
    pub transform: Mat4,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            depth_affect: 0.5,
            z0: Vec2::ZERO,
            transform: Mat4::IDENTITY,
        }
    }
}

/// One slider of the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Iterations,
    DepthAffect,
    SeedX,
    SeedY,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::Iterations,
        Control::DepthAffect,
        Control::SeedX,
        Control::SeedY,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Control::Iterations => "Iterations",
            Control::DepthAffect => "Depth Coloring",
            Control::SeedX => "z0.X",
            Control::SeedY => "z0.Y",
        }
    }

    pub fn range(self) -> RangeInclusive<i32> {
        match self {
            Control::Iterations => 1..=1000,
            Control::DepthAffect => 0..=100,
            Control::SeedX | Control::SeedY => -100..=100,
        }
    }

    pub fn clamp(self, position: i32) -> i32 {
        let range = self.range();
        position.clamp(*range.start(), *range.end())
    }

    /// Slider position that corresponds to the current parameters.
    pub fn position(self, params: &RenderParameters) -> i32 {
        let position = match self {
            Control::Iterations => params.max_iterations,
            Control::DepthAffect => (params.depth_affect * 100.0).round() as i32,
            Control::SeedX => (params.z0.x * 100.0).round() as i32,
            Control::SeedY => (params.z0.y * 100.0).round() as i32,
        };
        self.clamp(position)
    }

    /// Moves the slider to `position` and returns the new label text.
    pub fn apply(self, params: &mut RenderParameters, position: i32) -> String {
        let position = self.clamp(position);
        match self {
            Control::Iterations => params.max_iterations = position,
            Control::DepthAffect => params.depth_affect = position as f32 / 100.0,
            Control::SeedX => params.z0.x = position as f32 / 100.0,
            Control::SeedY => params.z0.y = position as f32 / 100.0,
        }
        self.label(position)
    }

    pub fn label(self, position: i32) -> String {
        match self {
            Control::Iterations => position.to_string(),
            Control::DepthAffect => format!("{}%", position),
            Control::SeedX | Control::SeedY => format!("{}", position as f32 / 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_bounds_reach_params_and_label() {
        let mut params = RenderParameters::default();
        let (min, max) = (*Control::Iterations.range().start(), *Control::Iterations.range().end());

        let label = Control::Iterations.apply(&mut params, min);
        assert_eq!(params.max_iterations, 1);
        assert_eq!(label, "1");

        let label = Control::Iterations.apply(&mut params, max);
        assert_eq!(params.max_iterations, 1000);
        assert_eq!(label, "1000");
    }

    #[test]
    fn out_of_range_positions_are_clamped() {
        let mut params = RenderParameters::default();
        assert_eq!(Control::Iterations.apply(&mut params, 0), "1");
        assert_eq!(params.max_iterations, 1);
        assert_eq!(Control::SeedY.apply(&mut params, 250), "1");
        assert_eq!(params.z0.y, 1.0);
    }

    #[test]
    fn depth_slider_is_a_percentage() {
        let mut params = RenderParameters::default();
        assert_eq!(Control::DepthAffect.apply(&mut params, 25), "25%");
        assert_eq!(params.depth_affect, 0.25);
        assert_eq!(Control::DepthAffect.apply(&mut params, 100), "100%");
        assert_eq!(params.depth_affect, 1.0);
    }

    #[test]
    fn seed_sliders_move_z0() {
        let mut params = RenderParameters::default();
        assert_eq!(Control::SeedX.apply(&mut params, -50), "-0.5");
        assert_eq!(Control::SeedY.apply(&mut params, 0), "0");
        assert_eq!(params.z0, Vec2::new(-0.5, 0.0));
        assert_eq!(Control::SeedX.apply(&mut params, -100), "-1");
    }

    #[test]
    fn defaults_round_trip_through_slider_positions() {
        let params = RenderParameters::default();
        let positions: Vec<i32> = Control::ALL.iter().map(|c| c.position(&params)).collect();
        assert_eq!(positions, vec![500, 50, 0, 0]);
        assert_eq!(params.transform, Mat4::IDENTITY);
    }
}

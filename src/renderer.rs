use eframe::glow::{self, HasContext};

use crate::config::Config;
use crate::error::Result;
use crate::mesh::QuadMesh;
use crate::params::RenderParameters;
use crate::shader::{ShaderProgram, RAMP_TEXTURE_TARGET};

/// Texture unit the palette is bound to.
pub const PALETTE_UNIT: u32 = 0;

/// Owns every GL object the viewer draws with.
pub struct MandelbrotRenderer {
    shader: ShaderProgram,
    quad: QuadMesh,
    palette: glow::Texture,
}

impl MandelbrotRenderer {
    /// Loads shaders and palette from the configured paths and builds the
    /// quad. Anything created before a failure is released again.
    pub fn new(gl: &glow::Context, config: &Config) -> Result<Self> {
        let mut shader = ShaderProgram::from_files(gl, &config.vertex, &config.fragment)?;

        let quad = match QuadMesh::new(gl) {
            Ok(quad) => quad,
            Err(e) => {
                shader.destroy(gl);
                return Err(e);
            }
        };

        let palette = match shader.init_texture_1d(gl, &config.palette) {
            Ok(texture) => texture,
            Err(e) => {
                quad.destroy(gl);
                shader.destroy(gl);
                return Err(e);
            }
        };

        Ok(Self {
            shader,
            quad,
            palette,
        })
    }

    /// Sets the GL viewport, in framebuffer pixels from the bottom-left.
    pub fn resize(&self, gl: &glow::Context, x: i32, y: i32, width: i32, height: i32) {
        unsafe {
            gl.viewport(x, y, width.max(1), height.max(1));
        }
    }

    /// Draws one frame with `params`. Presenting is up to the host.
    pub fn render(&mut self, gl: &glow::Context, params: &RenderParameters) {
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }

        // Uniform writes go to the current program.
        self.shader.use_program(gl);
        self.shader.set_uniform(gl, "z0", params.z0);
        self.shader.set_uniform(gl, "maxIterations", params.max_iterations);
        self.shader.set_uniform(gl, "depthAffect", params.depth_affect);
        self.shader.set_uniform(gl, "transform", params.transform);
        self.shader.set_texture_uniform(gl, "palette", PALETTE_UNIT as i32);

        unsafe {
            gl.active_texture(glow::TEXTURE0 + PALETTE_UNIT);
            gl.bind_texture(RAMP_TEXTURE_TARGET, Some(self.palette));
        }

        self.quad.bind(gl);
        self.quad.draw(gl);
        self.quad.unbind(gl);

        unsafe {
            gl.bind_texture(RAMP_TEXTURE_TARGET, None);
            gl.use_program(None);
        }
    }

    pub fn destroy(self, gl: &glow::Context) {
        self.quad.destroy(gl);
        // Also deletes the palette texture.
        self.shader.destroy(gl);
        log::info!("Renderer resources released");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    #[test]
    fn bundled_fragment_shader_declares_every_uniform() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/shader.frag");
        let source = fs::read_to_string(path).unwrap();
        for declaration in [
            "uniform vec2 z0;",
            "uniform int maxIterations;",
            "uniform float depthAffect;",
            "uniform sampler2D palette;",
            "uniform mat4 transform;",
        ] {
            assert!(source.contains(declaration), "missing `{}`", declaration);
        }
    }

    #[test]
    fn bundled_vertex_shader_reads_the_quad_position() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/shader.vert");
        let source = fs::read_to_string(path).unwrap();
        let expected = format!("layout(location = {}) in vec2 position;", crate::mesh::POSITION_LOCATION);
        assert!(source.contains(&expected));
    }
}

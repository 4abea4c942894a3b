use eframe::glow::{self, HasContext};

use crate::error::{Error, Result};

/// Corners of the full-viewport quad, counter-clockwise from bottom-left.
pub const QUAD_VERTICES: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Drawn as a triangle fan.
pub const QUAD_INDICES: [u16; 4] = [0, 1, 2, 3];

/// Attribute slot of `position` in the vertex shader.
pub const POSITION_LOCATION: u32 = 0;

/// The static quad: vertex buffer, index buffer and the vertex array
/// recording their layout.
pub struct QuadMesh {
    vertex_array: glow::VertexArray,
    vertex_buffer: glow::Buffer,
    index_buffer: glow::Buffer,
}

impl QuadMesh {
    pub fn new(gl: &glow::Context) -> Result<Self> {
        unsafe {
            let vertex_array = gl.create_vertex_array().map_err(Error::Gl)?;
            let vertex_buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(e) => {
                    gl.delete_vertex_array(vertex_array);
                    return Err(Error::Gl(e));
                }
            };
            let index_buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(e) => {
                    gl.delete_buffer(vertex_buffer);
                    gl.delete_vertex_array(vertex_array);
                    return Err(Error::Gl(e));
                }
            };

            gl.bind_vertex_array(Some(vertex_array));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_VERTICES),
                glow::STATIC_DRAW,
            );
            gl.enable_vertex_attrib_array(POSITION_LOCATION);
            gl.vertex_attrib_pointer_f32(POSITION_LOCATION, 2, glow::FLOAT, false, 0, 0);

            // The element binding is part of the vertex array state.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_INDICES),
                glow::STATIC_DRAW,
            );

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            log::info!(
                "Quad mesh ready (vao {:?}, vbo {:?}, ibo {:?})",
                vertex_array,
                vertex_buffer,
                index_buffer
            );

            Ok(Self {
                vertex_array,
                vertex_buffer,
                index_buffer,
            })
        }
    }

    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(Some(self.vertex_array));
        }
    }

    pub fn draw(&self, gl: &glow::Context) {
        unsafe {
            gl.draw_elements(glow::TRIANGLE_FAN, QUAD_INDICES.len() as i32, glow::UNSIGNED_SHORT, 0);
        }
    }

    pub fn unbind(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(None);
        }
    }

    pub fn destroy(self, gl: &glow::Context) {
        unsafe {
            gl.delete_buffer(self.index_buffer);
            gl.delete_buffer(self.vertex_buffer);
            gl.delete_vertex_array(self.vertex_array);
        }
    }
}

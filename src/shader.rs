use std::collections::HashSet;
use std::fs;
use std::path::Path;

use eframe::glow::{self, HasContext};
use glam::{Mat4, Vec2};

use crate::error::{Error, Result};
use crate::palette::ColorRamp;

/// GLES 3 has no 1-D textures, so a ramp of length `w` is stored as a
/// `w x 1` 2-D texture and sampled at `y = 0.5`.
pub const RAMP_TEXTURE_TARGET: u32 = glow::TEXTURE_2D;

/// A value that can be written to a uniform location of the bound program.
pub trait Uniform {
    /// # Safety
    /// The program owning `location` must be current on `gl`.
    unsafe fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for f32 {
    unsafe fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        gl.uniform_1_f32(Some(location), *self);
    }
}

impl Uniform for i32 {
    unsafe fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        gl.uniform_1_i32(Some(location), *self);
    }
}

impl Uniform for Vec2 {
    unsafe fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        gl.uniform_2_f32(Some(location), self.x, self.y);
    }
}

impl Uniform for Mat4 {
    unsafe fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        // glam is column-major, which is what GL expects untransposed.
        gl.uniform_matrix_4_f32_slice(Some(location), false, &self.to_cols_array());
    }
}

/// Uniform names that failed to resolve, so each is reported once.
#[derive(Debug, Default)]
struct MissingUniforms(HashSet<String>);

impl MissingUniforms {
    /// True the first time `name` is seen.
    fn first_miss(&mut self, name: &str) -> bool {
        if self.0.contains(name) {
            return false;
        }
        self.0.insert(name.to_owned());
        true
    }
}

/// A linked vertex + fragment program and the palette textures it created.
///
/// GL handles are not released on drop; call [`ShaderProgram::destroy`]
/// from the owner's teardown while the context is still alive.
pub struct ShaderProgram {
    program: glow::Program,
    textures: Vec<glow::Texture>,
    missing: MissingUniforms,
}

impl ShaderProgram {
    pub fn from_files(gl: &glow::Context, vertex_path: &Path, fragment_path: &Path) -> Result<Self> {
        let vertex = read_source(vertex_path)?;
        let fragment = read_source(fragment_path)?;
        Self::new(gl, &vertex, &fragment)
    }

    /// Compiles and links both stages.
    ///
    /// Compiler and linker diagnostics are logged as warnings; a program
    /// that failed to link is still returned and simply draws nothing.
    pub fn new(gl: &glow::Context, vertex_source: &str, fragment_source: &str) -> Result<Self> {
        unsafe {
            let program = gl.create_program().map_err(Error::Gl)?;

            let stages = [
                (glow::VERTEX_SHADER, vertex_source),
                (glow::FRAGMENT_SHADER, fragment_source),
            ];

            let mut shaders = Vec::with_capacity(stages.len());
            for (kind, source) in stages {
                let shader = match gl.create_shader(kind) {
                    Ok(shader) => shader,
                    Err(e) => {
                        for shader in shaders {
                            gl.delete_shader(shader);
                        }
                        gl.delete_program(program);
                        return Err(Error::Gl(e));
                    }
                };

                gl.shader_source(shader, source);
                gl.compile_shader(shader);

                let info_log = gl.get_shader_info_log(shader);
                if !gl.get_shader_compile_status(shader) || !info_log.trim().is_empty() {
                    log::warn!("{} shader: {}", stage_name(kind), info_log.trim());
                }

                gl.attach_shader(program, shader);
                shaders.push(shader);
            }

            gl.link_program(program);
            let info_log = gl.get_program_info_log(program);
            if !gl.get_program_link_status(program) || !info_log.trim().is_empty() {
                log::warn!("Program link: {}", info_log.trim());
            }

            for shader in shaders {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }

            log::info!("Shader program {:?} linked", program);

            Ok(Self {
                program,
                textures: Vec::new(),
                missing: MissingUniforms::default(),
            })
        }
    }

    pub fn use_program(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
        }
    }

    /// Writes `value` to the uniform called `name`. The program must be
    /// current. Unknown names are ignored.
    pub fn set_uniform<U: Uniform>(&mut self, gl: &glow::Context, name: &str, value: U) {
        unsafe {
            match gl.get_uniform_location(self.program, name) {
                Some(location) => value.upload(gl, &location),
                None => {
                    if self.missing.first_miss(name) {
                        log::debug!("Uniform '{}' not found in program {:?}", name, self.program);
                    }
                }
            }
        }
    }

    /// Points the sampler uniform `name` at texture unit `unit`.
    pub fn set_texture_uniform(&mut self, gl: &glow::Context, name: &str, unit: i32) {
        self.set_uniform(gl, name, unit);
    }

    /// Loads a palette image and uploads its first row as a ramp texture.
    pub fn init_texture_1d(&mut self, gl: &glow::Context, path: &Path) -> Result<glow::Texture> {
        let ramp = ColorRamp::load(path)?;
        self.upload_ramp(gl, &ramp)
    }

    pub fn upload_ramp(&mut self, gl: &glow::Context, ramp: &ColorRamp) -> Result<glow::Texture> {
        if ramp.is_empty() {
            return Err(Error::Gl("cannot upload an empty color ramp".to_owned()));
        }

        unsafe {
            let texture = gl.create_texture().map_err(Error::Gl)?;
            gl.bind_texture(RAMP_TEXTURE_TARGET, Some(texture));

            gl.tex_parameter_i32(RAMP_TEXTURE_TARGET, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(RAMP_TEXTURE_TARGET, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(RAMP_TEXTURE_TARGET, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(RAMP_TEXTURE_TARGET, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);

            // RGBA16F is filterable on GLES 3 and still takes a float upload.
            gl.tex_image_2d(
                RAMP_TEXTURE_TARGET,
                0,
                glow::RGBA16F as i32,
                ramp.len() as i32,
                1,
                0,
                glow::RGBA,
                glow::FLOAT,
                glow::PixelUnpackData::Slice(Some(ramp.as_bytes())),
            );

            gl.bind_texture(RAMP_TEXTURE_TARGET, None);

            let error = gl.get_error();
            if error != glow::NO_ERROR {
                gl.delete_texture(texture);
                return Err(Error::Gl(format!("ramp upload failed with error 0x{:x}", error)));
            }

            log::info!("Uploaded {}-texel ramp as texture {:?}", ramp.len(), texture);
            self.textures.push(texture);
            Ok(texture)
        }
    }

    /// Releases the program and every texture it created.
    pub fn destroy(self, gl: &glow::Context) {
        unsafe {
            for texture in self.textures {
                gl.delete_texture(texture);
            }
            gl.delete_program(self.program);
        }
        log::debug!("Shader program {:?} released", self.program);
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::ShaderSource {
        path: path.to_path_buf(),
        source,
    })
}

fn stage_name(kind: u32) -> &'static str {
    match kind {
        glow::VERTEX_SHADER => "Vertex",
        glow::FRAGMENT_SHADER => "Fragment",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_uniforms_are_reported_once() {
        let mut missing = MissingUniforms::default();
        assert!(missing.first_miss("z0"));
        assert!(!missing.first_miss("z0"));
        assert!(missing.first_miss("transform"));
    }

    #[test]
    fn unreadable_source_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shader.vert");
        let err = read_source(&path).unwrap_err();
        assert!(matches!(&err, Error::ShaderSource { path: p, .. } if p == &path));
        assert!(err.to_string().contains("shader.vert"));
    }

    #[test]
    fn shader_source_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shader.frag");
        fs::write(&path, "#version 300 es\nvoid main() {}\n").unwrap();
        assert_eq!(read_source(&path).unwrap(), "#version 300 es\nvoid main() {}\n");
    }

    #[test]
    fn stage_names() {
        assert_eq!(stage_name(glow::VERTEX_SHADER), "Vertex");
        assert_eq!(stage_name(glow::FRAGMENT_SHADER), "Fragment");
    }
}

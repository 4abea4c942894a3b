use std::io;
use std::path::PathBuf;

/// Everything that can abort loading the viewer.
///
/// Shader diagnostics are not errors: they are logged and the program is
/// linked anyway.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read shader source {}: {source}", path.display())]
    ShaderSource { path: PathBuf, source: io::Error },

    #[error("failed to load palette {}: {source}", path.display())]
    Palette {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("palette {} has no columns", path.display())]
    EmptyPalette { path: PathBuf },

    #[error("OpenGL: {0}")]
    Gl(String),
}

pub type Result<T> = std::result::Result<T, Error>;

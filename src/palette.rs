//! Color ramps read from the first scanline of an image.

use std::path::Path;

use image::DynamicImage;

use crate::error::{Error, Result};

/// One RGBA texel per image column, channels in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    texels: Vec<[f32; 4]>,
}

impl ColorRamp {
    /// Decodes `path` and samples its first row.
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|source| Error::Palette {
            path: path.to_path_buf(),
            source,
        })?;

        let ramp = Self::from_image(&image);
        if ramp.is_empty() {
            return Err(Error::EmptyPalette {
                path: path.to_path_buf(),
            });
        }

        log::info!("Loaded palette {} ({} texels)", path.display(), ramp.len());
        Ok(ramp)
    }

    /// Row 0 only; rows below it are ignored.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        if rgba.height() == 0 {
            return Self { texels: Vec::new() };
        }

        let texels = (0..rgba.width())
            .map(|x| {
                let [r, g, b, a] = rgba.get_pixel(x, 0).0;
                [
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                ]
            })
            .collect();

        Self { texels }
    }

    pub fn len(&self) -> usize {
        self.texels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }

    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    /// Tightly packed `RGBA32F` bytes, ready for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if y == 0 {
                Rgba([x as u8, 255 - x as u8, 0, 255])
            } else {
                Rgba([7, 7, 7, 7])
            }
        })
    }

    #[test]
    fn ramp_has_one_texel_per_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.png");
        gradient(256, 1).save(&path).unwrap();

        let ramp = ColorRamp::load(&path).unwrap();
        assert_eq!(ramp.len(), 256);
        for texel in ramp.texels() {
            assert!(texel.iter().all(|c| (0.0..=1.0).contains(c)));
        }
        assert_eq!(ramp.texels()[0], [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(ramp.texels()[255], [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn bundled_palette_is_256_wide() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/palette.png");
        assert_eq!(ColorRamp::load(&path).unwrap().len(), 256);
    }

    #[test]
    fn only_first_row_is_sampled() {
        let image = DynamicImage::ImageRgba8(gradient(4, 3));
        let ramp = ColorRamp::from_image(&image);
        assert_eq!(ramp.len(), 4);
        assert_eq!(ramp.texels()[2], [2.0 / 255.0, 253.0 / 255.0, 0.0, 1.0]);
    }

    #[test]
    fn opaque_rgb_images_get_full_alpha() {
        let rgb = image::RgbImage::from_pixel(3, 1, image::Rgb([51, 102, 255]));
        let ramp = ColorRamp::from_image(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(ramp.texels(), &[[0.2, 0.4, 1.0, 1.0]; 3]);
    }

    #[test]
    fn bytes_are_packed_rgba_floats() {
        let ramp = ColorRamp::from_image(&DynamicImage::ImageRgba8(gradient(5, 1)));
        assert_eq!(ramp.as_bytes().len(), 5 * 4 * std::mem::size_of::<f32>());
    }

    #[test]
    fn missing_file_is_a_palette_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ColorRamp::load(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, Error::Palette { .. }));
    }

    #[test]
    fn undecodable_file_is_a_palette_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = ColorRamp::load(&path).unwrap_err();
        assert!(matches!(err, Error::Palette { .. }));
    }
}

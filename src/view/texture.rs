use std::path::PathBuf;

use image::DynamicImage;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::view::gl::{Gl, PixelFormat};

/// Channel layout a texture is decoded into, whatever the file stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channels {
    Rgb,
    Rgba,
}

impl From<Channels> for PixelFormat {
    fn from(channels: Channels) -> Self {
        match channels {
            Channels::Rgb => PixelFormat::Rgb,
            Channels::Rgba => PixelFormat::Rgba,
        }
    }
}

/// Where a texture comes from and how it is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextureSpec {
    pub path: PathBuf,
    pub channels: Channels,
}

impl TextureSpec {
    pub fn new(path: impl Into<PathBuf>, channels: Channels) -> Self {
        Self { path: path.into(), channels }
    }
}

/// Decoded pixels, bottom row first so that GL's texture origin lines up.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn load(spec: &TextureSpec) -> Result<Self> {
        let img = image::open(&spec.path).map_err(|source| Error::TextureLoad {
            path: spec.path.clone(),
            source,
        })?;
        debug!(
            path = %spec.path.display(),
            width = img.width(),
            height = img.height(),
            "decoded texture"
        );
        Ok(Self::from_image(img, spec.channels))
    }

    pub fn from_image(img: DynamicImage, channels: Channels) -> Self {
        let img = img.flipv();
        let (width, height) = (img.width(), img.height());
        let pixels = match channels {
            Channels::Rgb => img.into_rgb8().into_raw(),
            Channels::Rgba => img.into_rgba8().into_raw(),
        };
        Self { width, height, format: channels.into(), pixels }
    }

    /// Creates a GL texture, uploads the pixels and builds the mipmap chain.
    /// Leaves the new texture bound to the active unit.
    pub fn upload<G: Gl>(&self, gl: &G) -> Result<G::Texture> {
        debug_assert_eq!(
            self.pixels.len(),
            self.width as usize * self.height as usize * self.format.bytes_per_pixel()
        );
        let texture = gl
            .create_texture()
            .map_err(|e| Error::GpuObject(format!("a texture ({e})")))?;
        gl.bind_texture_2d(Some(texture));
        gl.set_texture_2d_parameters();
        gl.tex_image_2d(self.width, self.height, self.format, &self.pixels);
        gl.generate_mipmap_2d();
        Ok(texture)
    }
}

/// Decodes both textures, failing on the first one that cannot be read.
pub fn load_pair(specs: &[TextureSpec; 2]) -> Result<[TextureImage; 2]> {
    Ok([TextureImage::load(&specs[0])?, TextureImage::load(&specs[1])?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::gl::fake::{Call, FakeGl};
    use image::{Rgba, RgbaImage};

    fn fixture(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("texcubes-{}-{name}.png", std::process::id()));
        // 3x2, top row red, bottom row half-transparent blue
        let mut img = RgbaImage::new(3, 2);
        for x in 0..3 {
            img.put_pixel(x, 0, Rgba([255, 0, 0, 255]));
            img.put_pixel(x, 1, Rgba([0, 0, 255, 128]));
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn rgb_decode_drops_alpha_and_flips_rows() {
        let path = fixture("rgb");
        let tex = TextureImage::load(&TextureSpec::new(&path, Channels::Rgb)).unwrap();
        assert_eq!((tex.width, tex.height, tex.format), (3, 2, PixelFormat::Rgb));
        assert_eq!(tex.pixels.len(), 3 * 2 * 3);
        // first row in memory is the image's bottom row
        assert_eq!(&tex.pixels[0..3], &[0, 0, 255]);
        assert_eq!(&tex.pixels[9..12], &[255, 0, 0]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn rgba_decode_keeps_alpha() {
        let path = fixture("rgba");
        let tex = TextureImage::load(&TextureSpec::new(&path, Channels::Rgba)).unwrap();
        assert_eq!(tex.pixels.len(), 3 * 2 * 4);
        assert_eq!(&tex.pixels[0..4], &[0, 0, 255, 128]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_names_the_path() {
        let spec = TextureSpec::new("assets/nope.jpg", Channels::Rgb);
        let err = TextureImage::load(&spec).unwrap_err();
        assert!(matches!(err, Error::TextureLoad { .. }));
        assert!(err.to_string().contains("assets/nope.jpg"));
    }

    #[test]
    fn load_pair_stops_at_the_first_bad_path() {
        let good = fixture("good");
        let specs = [
            TextureSpec::new(&good, Channels::Rgb),
            TextureSpec::new("assets/missing.png", Channels::Rgba),
        ];
        let err = load_pair(&specs).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
        let _ = std::fs::remove_file(good);
    }

    #[test]
    fn upload_sends_the_decoded_layout() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let tex = TextureImage::from_image(img, Channels::Rgb);
        let gl = FakeGl::default();
        tex.upload(&gl).unwrap();
        assert!(gl.calls().contains(&Call::TexImage {
            width: 4,
            height: 4,
            format: PixelFormat::Rgb,
            len: 48,
        }));
    }

    #[test]
    fn channels_parse_from_lowercase() {
        let spec: TextureSpec = toml::from_str("path = \"a.png\"\nchannels = \"rgba\"").unwrap();
        assert_eq!(spec.channels, Channels::Rgba);
    }
}

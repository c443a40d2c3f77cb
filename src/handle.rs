use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{self, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageEncoder, RgbImage, RgbaImage};

use crate::error::FaceCropError;

/// Default JPEG quality (0-100).
const JPEG_QUALITY: u8 = 95;

/// Channel layout requested at decode time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Keep the decoded channel layout (RGB or RGBA).
    #[default]
    Color,

    /// Convert to single-channel intensity during decode.
    Grayscale,
}

/// Target format for [`ImageHandle::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeFormat {
    /// JPEG, lossy. Default quality 95.
    Jpeg,

    /// PNG, lossless. Default compression is fast/low for fidelity.
    Png,

    /// WebP. The pure-Rust encoder is lossless-only.
    Webp,
}

/// PNG compression effort. More effort means smaller files and slower encodes;
/// all levels are lossless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PngCompression {
    /// Minimal effort (the default).
    #[default]
    Fast,

    /// The encoder's balanced setting.
    Balanced,

    /// Maximum effort.
    Best,
}

/// Encoding overrides. [`EncodeOptions::default`] matches what
/// [`ImageHandle::encode`] applies on its own.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// JPEG quality, 1-100. Clamped into range before use.
    pub jpeg_quality: u8,

    /// PNG compression effort.
    pub png_compression: PngCompression,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: JPEG_QUALITY,
            png_compression: PngCompression::default(),
        }
    }
}

/// Owned, value-semantic handle to a decoded raster image.
///
/// The pixel buffer is exclusively owned by the handle; copying via
/// [`ImageHandle::try_clone`] duplicates the buffer in full, so no two
/// handles ever alias the same pixels. The buffer is released when the
/// handle goes out of scope.
///
/// A handle may be **empty** (zero width or height, see
/// [`ImageHandle::empty`]). Every operation except [`ImageHandle::is_empty`]
/// fails on an empty handle rather than silently doing nothing.
#[derive(Debug)]
pub struct ImageHandle {
    image: DynamicImage,
}

impl ImageHandle {
    /// Decode raw image bytes (JPEG, PNG, WebP, ...) into a handle.
    ///
    /// Fails with [`FaceCropError::Decode`] if the bytes are not a valid
    /// image or decode to zero dimensions.
    pub fn decode(bytes: &[u8], mode: ColorMode) -> Result<Self, FaceCropError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| FaceCropError::Decode(e.to_string()))?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(FaceCropError::Decode(
                "image decoded to zero dimensions".to_string(),
            ));
        }

        let image = match mode {
            ColorMode::Color => decoded,
            ColorMode::Grayscale => DynamicImage::ImageLuma8(decoded.to_luma8()),
        };

        Ok(Self { image })
    }

    /// An empty handle. Stands in for an image that has not been decoded;
    /// all operations except [`ImageHandle::is_empty`] fail on it.
    pub fn empty() -> Self {
        Self {
            image: DynamicImage::new_rgb8(0, 0),
        }
    }

    pub(crate) fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    pub(crate) fn as_inner(&self) -> &DynamicImage {
        &self.image
    }

    /// `true` for an empty handle. Never fails.
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> Result<(u32, u32), FaceCropError> {
        if self.is_empty() {
            return Err(FaceCropError::EmptyImage("read dimensions of"));
        }
        Ok((self.image.width(), self.image.height()))
    }

    /// Number of channels in the decoded buffer (1, 3, or 4).
    pub fn channels(&self) -> Result<u8, FaceCropError> {
        if self.is_empty() {
            return Err(FaceCropError::EmptyImage("read channels of"));
        }
        Ok(self.image.color().channel_count())
    }

    /// Deep copy. The clone owns an independent pixel buffer; nothing done
    /// to it can affect `self`. Copying an empty handle is an error.
    pub fn try_clone(&self) -> Result<Self, FaceCropError> {
        if self.is_empty() {
            return Err(FaceCropError::EmptyImage("copy"));
        }
        Ok(Self {
            image: self.image.clone(),
        })
    }

    /// New single-channel intensity handle with the same dimensions.
    pub fn to_grayscale(&self) -> Result<Self, FaceCropError> {
        if self.is_empty() {
            return Err(FaceCropError::EmptyImage("convert"));
        }
        Ok(Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
        })
    }

    /// Row-major intensity buffer for the detector collaborator.
    pub(crate) fn intensity_buffer(&self) -> image::GrayImage {
        self.image.to_luma8()
    }

    /// Encode with per-format defaults: JPEG at quality 95, PNG at fast
    /// compression, WebP lossless.
    pub fn encode(&self, format: EncodeFormat) -> Result<Vec<u8>, FaceCropError> {
        self.encode_with(format, &EncodeOptions::default())
    }

    /// Encode with explicit options.
    ///
    /// Fails with [`FaceCropError::Encode`] if the handle is empty or the
    /// encoder rejects the buffer. Single-channel handles are encoded as
    /// such; RGBA sources are flattened over white first since none of the
    /// target encodings carry alpha here.
    pub fn encode_with(
        &self,
        format: EncodeFormat,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, FaceCropError> {
        if self.is_empty() {
            return Err(FaceCropError::Encode("image is empty".to_string()));
        }

        let (raw, width, height, color_type) = match &self.image {
            DynamicImage::ImageLuma8(gray) => (
                gray.as_raw().clone(),
                gray.width(),
                gray.height(),
                image::ExtendedColorType::L8,
            ),
            other => {
                let rgb = if other.color().has_alpha() {
                    flatten_alpha(other)
                } else {
                    other.to_rgb8()
                };
                (
                    rgb.as_raw().clone(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
            }
        };

        let mut buffer = Vec::new();
        match format {
            EncodeFormat::Jpeg => {
                let quality = options.jpeg_quality.clamp(1, 100);
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
                encoder
                    .write_image(&raw, width, height, color_type)
                    .map_err(|e| FaceCropError::Encode(e.to_string()))?;
            }
            EncodeFormat::Png => {
                let compression = match options.png_compression {
                    PngCompression::Fast => png::CompressionType::Fast,
                    PngCompression::Balanced => png::CompressionType::Default,
                    PngCompression::Best => png::CompressionType::Best,
                };
                let encoder =
                    PngEncoder::new_with_quality(&mut buffer, compression, png::FilterType::Adaptive);
                encoder
                    .write_image(&raw, width, height, color_type)
                    .map_err(|e| FaceCropError::Encode(e.to_string()))?;
            }
            EncodeFormat::Webp => {
                let encoder = WebPEncoder::new_lossless(&mut buffer);
                encoder
                    .write_image(&raw, width, height, color_type)
                    .map_err(|e| FaceCropError::Encode(e.to_string()))?;
            }
        }

        Ok(buffer)
    }
}

/// Flatten the alpha channel by compositing onto a white background.
fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    let rgba: RgbaImage = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let out_r = (r as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_g = (g as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_b = (b as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
    }

    rgb
}

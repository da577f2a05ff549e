use std::io::Cursor;

use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat,
    codecs::{gif::GifEncoder, jpeg::JpegEncoder, png::PngEncoder},
};

use super::error::PipelineError;

/// The closed set of formats the service decodes and re-encodes.
///
/// A codec is looked up once per request and drives both directions, so
/// decode support and encode support cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCodec {
    Jpeg,
    Png,
    Gif,
}

impl ImageCodec {
    /// Look up a codec by the content type the origin server reported.
    /// Mime parameters (`; charset=...`) are ignored for the match but the
    /// original string is echoed back in the error.
    pub fn from_content_type(content_type: &str) -> Result<Self, PipelineError> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence {
            "image/jpeg" => Ok(ImageCodec::Jpeg),
            "image/png" => Ok(ImageCodec::Png),
            "image/gif" => Ok(ImageCodec::Gif),
            _ => Err(PipelineError::UnsupportedFormat(content_type.to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageCodec::Jpeg => "image/jpeg",
            ImageCodec::Png => "image/png",
            ImageCodec::Gif => "image/gif",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ImageCodec::Jpeg => ImageFormat::Jpeg,
            ImageCodec::Png => ImageFormat::Png,
            ImageCodec::Gif => ImageFormat::Gif,
        }
    }

    /// Decode raw bytes with this codec's baseline decoder. The bytes are
    /// never sniffed; the reported content type decides the parser.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, PipelineError> {
        image::load_from_memory_with_format(bytes, self.image_format())
            .map_err(PipelineError::Decode)
    }

    /// Encode with the format's baseline encoder at default quality.
    pub fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>, PipelineError> {
        let mut buffer = Vec::new();
        match self {
            ImageCodec::Jpeg => {
                // JPEG has no alpha channel
                let rgb = image.to_rgb8();
                let encoder = JpegEncoder::new(Cursor::new(&mut buffer));
                encoder
                    .write_image(&rgb, rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                    .map_err(PipelineError::Encode)?;
            }
            ImageCodec::Png => {
                let rgba = image.to_rgba8();
                let encoder = PngEncoder::new(Cursor::new(&mut buffer));
                encoder
                    .write_image(&rgba, rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
                    .map_err(PipelineError::Encode)?;
            }
            ImageCodec::Gif => {
                let rgba = image.to_rgba8();
                let mut encoder = GifEncoder::new(Cursor::new(&mut buffer));
                encoder
                    .encode(
                        rgba.as_raw(),
                        rgba.width(),
                        rgba.height(),
                        ExtendedColorType::Rgba8,
                    )
                    .map_err(PipelineError::Encode)?;
            }
        }
        Ok(buffer)
    }
}

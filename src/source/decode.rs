//! Image decoding: common still formats first, WEBP as a fallback.

use std::io::Cursor;

use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

/// Formats the primary sniffing decoder accepts.
pub const PRIMARY_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
];

/// Format tried when the primary decoder rejects the bytes.
pub const FALLBACK_FORMAT: ImageFormat = ImageFormat::WebP;

/// A decoded raster and the name of the format it was decoded from.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub image: DynamicImage,
    pub format: &'static str,
}

/// Short lowercase name for a format, e.g. `png`, `jpeg`, `webp`.
pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        ImageFormat::WebP => "webp",
        other => other.extensions_str().first().copied().unwrap_or(""),
    }
}

/// Decode `bytes` into a raster.
///
/// The format is sniffed from the content and decoded if it is one of
/// [`PRIMARY_FORMATS`]. Otherwise the bytes are decoded as
/// [`FALLBACK_FORMAT`]. When neither works the error carries the format the
/// primary attempt detected (possibly none) and its failure.
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let (format, primary) = decode_primary(bytes);

    let decoded = match primary {
        Ok(image) => Decoded {
            image,
            format: format.map(format_name).unwrap_or(""),
        },
        Err(primary_error) => match image::load_from_memory_with_format(bytes, FALLBACK_FORMAT) {
            Ok(image) => {
                log::debug!("Decoded via {} fallback", format_name(FALLBACK_FORMAT));
                Decoded {
                    image,
                    format: format_name(FALLBACK_FORMAT),
                }
            }
            Err(_) => {
                return Err(DecodeError::Unsupported {
                    format: format.map(format_name).unwrap_or("").to_string(),
                    source: primary_error,
                })
            }
        },
    };

    check_dimensions(&decoded.image)?;
    Ok(decoded)
}

/// Sniff and decode with the primary format set.
fn decode_primary(bytes: &[u8]) -> (Option<ImageFormat>, Result<DynamicImage, ImageError>) {
    let reader = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => return (None, Err(ImageError::IoError(e))),
    };

    let format = reader.format();
    match format {
        Some(f) if PRIMARY_FORMATS.contains(&f) => (format, reader.decode()),
        Some(f) => (format, Err(unsupported(ImageFormatHint::Exact(f)))),
        None => (None, Err(unsupported(ImageFormatHint::Unknown))),
    }
}

fn unsupported(hint: ImageFormatHint) -> ImageError {
    ImageError::Unsupported(UnsupportedError::from_format_and_kind(
        hint.clone(),
        UnsupportedErrorKind::Format(hint),
    ))
}

/// Reject rasters with no pixels.
pub fn check_dimensions(image: &DynamicImage) -> Result<(), DecodeError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::Dimension {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

/// Errors that can occur while decoding image bytes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("decode error ({}): {source}", if format.is_empty() { "unknown" } else { format.as_str() })]
    Unsupported {
        /// Format reported by the primary attempt, empty when none was detected.
        format: String,
        source: ImageError,
    },

    #[error("empty image ({width}x{height})")]
    Dimension { width: u32, height: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(6, 4, Rgb([200, 100, 50]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_primary_formats() {
        for format in [ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Gif, ImageFormat::Jpeg] {
            let decoded = decode(&encode(format)).unwrap();
            assert_eq!(decoded.format, format_name(format));
            assert_eq!((decoded.image.width(), decoded.image.height()), (6, 4));
        }
    }

    #[test]
    fn test_primary_rejects_webp() {
        let (format, result) = decode_primary(&encode(ImageFormat::WebP));
        assert_eq!(format, Some(ImageFormat::WebP));
        assert!(matches!(result, Err(ImageError::Unsupported(_))));
    }

    #[test]
    fn test_webp_decodes_via_fallback() {
        let decoded = decode(&encode(ImageFormat::WebP)).unwrap();
        assert_eq!(decoded.format, "webp");
        assert_eq!((decoded.image.width(), decoded.image.height()), (6, 4));
    }

    #[test]
    fn test_garbage_is_unsupported_unknown() {
        let err = decode(b"definitely not an image").unwrap_err();
        match &err {
            DecodeError::Unsupported { format, .. } => assert!(format.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("decode error (unknown): "));
    }

    #[test]
    fn test_truncated_png_keeps_primary_format() {
        let png = encode(ImageFormat::Png);
        let err = decode(&png[..png.len() / 2]).unwrap_err();
        match err {
            DecodeError::Unsupported { format, .. } => assert_eq!(format, "png"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_sized_raster_is_dimension_error() {
        let err = check_dimensions(&DynamicImage::new_rgba8(0, 5)).unwrap_err();
        assert!(matches!(err, DecodeError::Dimension { width: 0, height: 5 }));
        assert!(check_dimensions(&DynamicImage::new_rgba8(1, 1)).is_ok());
    }
}

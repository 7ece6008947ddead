//! Lossless (PNG, SVG) and quality-bounded (JPEG) image compression.
//!
//! A result is only used when it is smaller than the input; formats
//! without an encoder here (gif, webp, ...) pass through untouched.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageFormat, load_from_memory_with_format};

use crate::config::ImageConfig;

/// Recompress image bytes based on the (lowercase) file extension.
pub fn compress(ext: Option<&str>, data: &[u8], config: &ImageConfig) -> Result<Vec<u8>, String> {
    let compressed = match ext {
        Some("png") => Some(png(data)?),
        Some("jpg" | "jpeg") => Some(jpeg(data, config.jpeg_quality)?),
        Some("svg") => svg(data)?,
        _ => None,
    };

    Ok(match compressed {
        Some(out) if out.len() < data.len() => out,
        _ => data.to_vec(),
    })
}

fn png(data: &[u8]) -> Result<Vec<u8>, String> {
    let img = load_from_memory_with_format(data, ImageFormat::Png).map_err(|e| e.to_string())?;
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
    img.write_with_encoder(encoder).map_err(|e| e.to_string())?;
    Ok(out)
}

fn jpeg(data: &[u8], quality: u8) -> Result<Vec<u8>, String> {
    let img = load_from_memory_with_format(data, ImageFormat::Jpeg).map_err(|e| e.to_string())?;
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| e.to_string())?;
    Ok(out)
}

/// Rewrite through usvg. Text elements are left alone since usvg without
/// fonts would drop them.
fn svg(data: &[u8]) -> Result<Option<Vec<u8>>, String> {
    if has_text_element(data) {
        return Ok(None);
    }
    let tree = usvg::Tree::from_data(data, &usvg::Options::default()).map_err(|e| e.to_string())?;
    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };
    Ok(Some(tree.to_string(&write_options).into_bytes()))
}

fn has_text_element(data: &[u8]) -> bool {
    data.windows(5).any(|w| w == b"<text")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};

    fn sample_png() -> Vec<u8> {
        let img: RgbImage = ImageBuffer::from_fn(64, 64, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let mut out = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut out, CompressionType::Fast, FilterType::NoFilter);
        img.write_with_encoder(encoder).unwrap();
        out
    }

    #[test]
    fn test_png_never_grows() {
        let data = sample_png();
        let out = compress(Some("png"), &data, &ImageConfig::default()).unwrap();
        assert!(out.len() <= data.len());
        assert!(load_from_memory_with_format(&out, ImageFormat::Png).is_ok());
    }

    #[test]
    fn test_corrupt_png_is_error() {
        assert!(compress(Some("png"), b"not a png", &ImageConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_format_passes_through() {
        let data = b"GIF89a....".to_vec();
        assert_eq!(compress(Some("gif"), &data, &ImageConfig::default()).unwrap(), data);
        assert_eq!(compress(None, &data, &ImageConfig::default()).unwrap(), data);
    }

    #[test]
    fn test_svg_minified() {
        let src = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
    <!-- comment -->
    <rect x="0" y="0" width="10" height="10" fill="red"/>
</svg>
"#;
        let out = compress(Some("svg"), src, &ImageConfig::default()).unwrap();
        assert!(out.len() <= src.len());
        assert!(usvg::Tree::from_data(&out, &usvg::Options::default()).is_ok());
    }

    #[test]
    fn test_svg_with_text_untouched() {
        let src = br#"<svg xmlns="http://www.w3.org/2000/svg"><text>hi</text></svg>"#;
        assert_eq!(compress(Some("svg"), src, &ImageConfig::default()).unwrap(), src);
    }
}

//! Image-to-text rendering: acquisition, decoding and rasterization.

mod job;

pub use job::{error_message, spawn_render, RENDERING_NOTICE};

use std::time::Duration;

use crate::ascii::{render_image, sanitize_cell_aspect, Ramp, RasterOptions, WidthSpec};
use crate::config::RenderConfig;
use crate::source::{decode, AcquisitionError, DecodeError, FetchOptions, Fetcher};

/// What to render and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Local path or `http(s)://` URL.
    pub source: String,
    pub width: WidthSpec,
    pub colorize: bool,
    pub invert: bool,
    /// Ramp override, darkest first.
    pub charset: Option<String>,
}

impl RenderRequest {
    /// A request for `source` with every option at its default.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            width: WidthSpec::Default,
            colorize: false,
            invert: false,
            charset: None,
        }
    }
}

/// A rendered block plus what it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub text: String,
    /// URL or expanded path.
    pub source: String,
    /// Decoded format name, e.g. `png`.
    pub format: &'static str,
    pub orig_width: u32,
    pub orig_height: u32,
    pub width: u32,
    pub height: u32,
    pub colorize: bool,
    pub invert: bool,
}

impl RenderResult {
    /// `* <source>  (<ow>x<oh> → <w>x<h>, color:<bool>, invert:<bool>)`
    pub fn header(&self) -> String {
        format!(
            "* {}  ({}x{} → {}x{}, color:{}, invert:{})",
            self.source,
            self.orig_width,
            self.orig_height,
            self.width,
            self.height,
            self.colorize,
            self.invert
        )
    }

    /// Header and block as one chat message.
    pub fn message(&self) -> String {
        format!("{}\n{}", self.header(), self.text)
    }
}

/// Errors that can occur while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Renders image sources into text blocks.
#[derive(Debug, Clone)]
pub struct Renderer {
    fetcher: Fetcher,
    default_width: u32,
    cell_aspect: f32,
    default_ramp: Ramp,
}

impl Renderer {
    /// Create a renderer from the `[render]` configuration.
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        let fetcher = Fetcher::with_options(FetchOptions {
            max_bytes: config.max_bytes,
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        })?;
        Ok(Self::with_fetcher(fetcher, config))
    }

    /// Create a renderer around an existing fetcher.
    pub fn with_fetcher(fetcher: Fetcher, config: &RenderConfig) -> Self {
        let cell_aspect = sanitize_cell_aspect(config.cell_aspect);
        if cell_aspect != config.cell_aspect {
            log::warn!(
                "render.cell_aspect {} out of range, using {}",
                config.cell_aspect,
                cell_aspect
            );
        }
        Self {
            fetcher,
            default_width: config.width,
            cell_aspect,
            default_ramp: Ramp::from_option(config.charset.as_deref(), &Ramp::default()),
        }
    }

    /// The fetcher used for acquisition.
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Output width for `request` on a display `display_width` columns wide.
    pub fn resolve_width(&self, request: &RenderRequest, display_width: Option<u32>) -> u32 {
        let display = display_width.filter(|&w| w > 0);
        let width = match request.width {
            WidthSpec::Default if display.is_none() => WidthSpec::Columns(self.default_width),
            width => width,
        };
        width.resolve(display)
    }

    /// Fetch, decode and rasterize `request.source`.
    pub async fn render(
        &self,
        request: &RenderRequest,
        display_width: Option<u32>,
    ) -> Result<RenderResult, RenderError> {
        let fetched = self.fetcher.load(&request.source).await?;
        log::debug!(
            "Fetched {} bytes from {}",
            fetched.bytes.len(),
            fetched.label
        );
        let width = self.resolve_width(request, display_width);
        self.render_bytes(&fetched.bytes, fetched.label, request, width)
    }

    /// Decode and rasterize bytes that have already been acquired.
    pub fn render_bytes(
        &self,
        bytes: &[u8],
        label: String,
        request: &RenderRequest,
        width: u32,
    ) -> Result<RenderResult, RenderError> {
        let decoded = decode(bytes)?;

        let options = RasterOptions {
            width,
            cell_aspect: self.cell_aspect,
            ramp: Ramp::from_option(request.charset.as_deref(), &self.default_ramp),
            colorize: request.colorize,
            invert: request.invert,
        };
        let block = render_image(&decoded.image, &options);

        log::debug!(
            "Rendered {} ({}, {}x{}) at {}x{}",
            label,
            decoded.format,
            decoded.image.width(),
            decoded.image.height(),
            block.width,
            block.height
        );

        Ok(RenderResult {
            text: block.text,
            source: label,
            format: decoded.format,
            orig_width: decoded.image.width(),
            orig_height: decoded.image.height(),
            width: block.width,
            height: block.height,
            colorize: request.colorize,
            invert: request.invert,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(px));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn renderer(config: RenderConfig) -> Renderer {
        Renderer::new(&config).unwrap()
    }

    #[test]
    fn test_render_bytes_square() {
        let r = renderer(RenderConfig::default());
        let request = RenderRequest::new("mem");
        let result = r
            .render_bytes(&png(100, 100, [255, 255, 255, 255]), "mem".into(), &request, 80)
            .unwrap();

        assert_eq!((result.orig_width, result.orig_height), (100, 100));
        assert_eq!((result.width, result.height), (80, 40));
        assert_eq!(result.format, "png");
        assert!(result.text.lines().all(|l| l == " ".repeat(80)));
    }

    #[test]
    fn test_render_bytes_uses_configured_ramp_and_override() {
        let config = RenderConfig {
            charset: Some("XO".to_string()),
            ..RenderConfig::default()
        };
        let r = renderer(config);
        let black = png(10, 10, [0, 0, 0, 255]);

        let result = r
            .render_bytes(&black, "mem".into(), &RenderRequest::new("mem"), 8)
            .unwrap();
        assert!(result.text.starts_with("XXXXXXXX\n"));

        let mut request = RenderRequest::new("mem");
        request.charset = Some("z".to_string());
        let result = r.render_bytes(&black, "mem".into(), &request, 8).unwrap();
        assert!(result.text.starts_with("########\n"));
    }

    #[test]
    fn test_render_bytes_rejects_garbage() {
        let r = renderer(RenderConfig::default());
        let err = r
            .render_bytes(b"nope", "mem".into(), &RenderRequest::new("mem"), 80)
            .unwrap_err();
        assert!(matches!(err, RenderError::Decode(DecodeError::Unsupported { .. })));
    }

    #[test]
    fn test_out_of_range_cell_aspect_is_clamped() {
        let white = png(10, 10, [255, 255, 255, 255]);
        let request = RenderRequest::new("mem");

        let huge = renderer(RenderConfig {
            cell_aspect: 1e6,
            ..RenderConfig::default()
        });
        let result = huge.render_bytes(&white, "mem".into(), &request, 8).unwrap();
        assert_eq!(result.height, 32);

        let negative = renderer(RenderConfig {
            cell_aspect: -1.0,
            ..RenderConfig::default()
        });
        let result = negative.render_bytes(&white, "mem".into(), &request, 8).unwrap();
        assert_eq!(result.height, 4);
    }

    #[test]
    fn test_resolve_width_uses_config_default() {
        let config = RenderConfig {
            width: 60,
            ..RenderConfig::default()
        };
        let r = renderer(config);
        let request = RenderRequest::new("x");
        assert_eq!(r.resolve_width(&request, None), 60);
        assert_eq!(r.resolve_width(&request, Some(100)), 98);
    }

    #[test]
    fn test_header_format() {
        let result = RenderResult {
            text: "@@\n".to_string(),
            source: "cat.png".to_string(),
            format: "png",
            orig_width: 640,
            orig_height: 480,
            width: 80,
            height: 30,
            colorize: true,
            invert: false,
        };
        assert_eq!(
            result.header(),
            "* cat.png  (640x480 → 80x30, color:true, invert:false)"
        );
        assert_eq!(
            result.message(),
            "* cat.png  (640x480 → 80x30, color:true, invert:false)\n@@\n"
        );
    }
}

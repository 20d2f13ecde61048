use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::color::dominant_opaque_color;
use crate::assets::decode::{
    SourceImage, decode_source, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::assets::font::FontSpec;
use crate::compose::text::{MeasuredLine, TextBrushRgba8, TextLayoutEngine};
use crate::compose::theme::{Theme, Tier};
use crate::compose::title::split_by_nearest_middle_space;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{TitlerError, TitlerResult};

/// One composition request: a decoded source image plus styling inputs.
///
/// The source (and any logo it references) is only ever read; the composer
/// draws onto its own canvas and never mutates caller-owned buffers.
#[derive(Clone, Debug)]
pub struct TitleRequest {
    pub source: SourceImage,
    /// Resolved title. `None` fails composition with `MissingTitle`; callers
    /// derive file-name titles via [`crate::compose::title::resolve_title`].
    pub title: Option<String>,
    pub tier: Tier,
    pub logo_path: Option<PathBuf>,
    pub font: FontSpec,
}

/// A finished title card: fixed-size canvas in straight RGBA8.
#[derive(Clone, Debug)]
pub struct ComposedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major straight RGBA8 pixels.
    pub rgba8: Vec<u8>,
    /// Format of the source image, preserved for saving.
    pub format: image::ImageFormat,
    /// The resolved title the card was composed from.
    pub title: String,
}

/// Logo prepared once per path: premultiplied thumbnail plus sampled accent.
#[derive(Clone, Debug)]
struct LogoOverlay {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
    accent: Option<Rgba8>,
}

/// The composition engine.
///
/// `compose` is pure with respect to its inputs: identical requests produce
/// byte-identical canvases. The struct holds reusable shaping contexts and a
/// logo cache keyed by path, so repeated requests (previews, batches) skip
/// redundant decode/resize work.
pub struct Composer {
    theme: Theme,
    text_engine: TextLayoutEngine,
    logo_cache: HashMap<PathBuf, Arc<LogoOverlay>>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Composer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            text_engine: TextLayoutEngine::new(),
            logo_cache: HashMap::new(),
            ctx: None,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Compose a title card from `request`.
    ///
    /// The source is drawn anchored top-left onto an opaque black canvas of
    /// the theme's fixed dimensions, overflow discarded. Two bands sized to
    /// the measured title lines are right-aligned against the canvas edge,
    /// outlined with the tier accent (or the sampled logo color when no tier
    /// is recognized), and the lines are drawn right-aligned within them. An
    /// optional logo is thumbnailed into the theme's logo box and placed in
    /// the bottom-left corner.
    #[tracing::instrument(skip(self, request), fields(tier = ?request.tier))]
    pub fn compose(&mut self, request: &TitleRequest) -> TitlerResult<ComposedImage> {
        let theme = self.theme.clone();
        let width_u16: u16 = theme.canvas_width.try_into().map_err(|_| {
            TitlerError::validation("theme canvas_width exceeds u16")
        })?;
        let height_u16: u16 = theme.canvas_height.try_into().map_err(|_| {
            TitlerError::validation("theme canvas_height exceeds u16")
        })?;

        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                TitlerError::missing_title(
                    "no explicit title and no file name to derive one from",
                )
            })?
            .to_string();
        let split = split_by_nearest_middle_space(&title)?;

        let font_bytes = request.font.load_bytes()?;
        let brush = TextBrushRgba8 {
            r: theme.text_fill.r,
            g: theme.text_fill.g,
            b: theme.text_fill.b,
            a: theme.text_fill.a,
        };
        let top = self
            .text_engine
            .measure_line(&split.top, &font_bytes, theme.font_size_px, brush)?;
        let bottom = self
            .text_engine
            .measure_line(&split.bottom, &font_bytes, theme.font_size_px, brush)?;
        tracing::debug!(top_px = top.width, bottom_px = bottom.width, "measured title lines");

        let logo = match &request.logo_path {
            Some(path) => Some(self.logo_overlay_for(path)?),
            None => None,
        };
        let outline = theme
            .accent_for(request.tier)
            .or_else(|| logo.as_ref().and_then(|l| l.accent));

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        // The source stays untouched; premultiply a copy for the paint.
        let mut bg_premul = request.source.rgba8.as_ref().clone();
        premultiply_rgba8_in_place(&mut bg_premul);
        let bg_paint = image_paint(&bg_premul, request.source.width, request.source.height)?;
        let (src_w, src_h) = (request.source.width as f64, request.source.height as f64);

        let (wf, hf) = (theme.canvas_width as f64, theme.canvas_height as f64);
        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);

        self.with_ctx_mut(width_u16, height_u16, |ctx| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

            // Base canvas, then the source anchored top-left. Overflow is
            // clipped by the context; underflow stays opaque black.
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, wf, hf));
            ctx.set_paint(bg_paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, src_w, src_h));

            let bands = [
                (&top, theme.top_band_y),
                (&bottom, theme.bottom_band_y()),
            ];
            for (line, band_y) in bands {
                draw_band(ctx, &theme, line.width as f64, band_y as f64, outline);
                draw_line(
                    ctx,
                    &font_data,
                    line,
                    wf - line.width as f64 - theme.x_offset as f64,
                    (band_y + theme.text_inset_y) as f64,
                );
            }

            if let Some(logo) = &logo {
                let paint = image_paint(&logo.rgba8_premul, logo.width, logo.height)?;
                let x = theme.x_offset as f64;
                let y = hf - logo.height as f64 - theme.x_offset as f64;
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    logo.width as f64,
                    logo.height as f64,
                ));
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        let mut rgba8 = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut rgba8);

        Ok(ComposedImage {
            width: theme.canvas_width,
            height: theme.canvas_height,
            rgba8,
            format: request.source.format,
            title,
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> TitlerResult<R>,
    ) -> TitlerResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Decode, sample, and thumbnail a logo once per distinct path.
    fn logo_overlay_for(&mut self, path: &PathBuf) -> TitlerResult<Arc<LogoOverlay>> {
        if let Some(overlay) = self.logo_cache.get(path) {
            return Ok(overlay.clone());
        }

        let decoded = decode_source(path)?;
        let accent = dominant_opaque_color(&decoded);
        let (width, height, mut rgba8) =
            thumbnail_rgba8(&decoded, self.theme.logo_box).ok_or_else(|| {
                TitlerError::unreadable_image(format!(
                    "logo '{}' has zero-sized pixel data",
                    path.display()
                ))
            })?;
        premultiply_rgba8_in_place(&mut rgba8);

        let overlay = Arc::new(LogoOverlay {
            width,
            height,
            rgba8_premul: Arc::new(rgba8),
            accent,
        });
        self.logo_cache.insert(path.clone(), overlay.clone());
        Ok(overlay)
    }
}

/// Scale an image down to fit a square bounding box, preserving aspect ratio.
/// Images already inside the box are passed through unscaled.
fn thumbnail_rgba8(image: &SourceImage, box_px: u32) -> Option<(u32, u32, Vec<u8>)> {
    if image.width == 0 || image.height == 0 || box_px == 0 {
        return None;
    }
    let longest = image.width.max(image.height);
    if longest <= box_px {
        return Some((image.width, image.height, image.rgba8.as_ref().clone()));
    }

    let scale = box_px as f64 / longest as f64;
    let w = ((image.width as f64 * scale).round() as u32).max(1);
    let h = ((image.height as f64 * scale).round() as u32).max(1);

    let buf = image::RgbaImage::from_raw(
        image.width,
        image.height,
        image.rgba8.as_ref().clone(),
    )?;
    let resized = image::imageops::resize(&buf, w, h, image::imageops::FilterType::Lanczos3);
    Some((w, h, resized.into_raw()))
}

fn image_paint(premul_rgba8: &[u8], width: u32, height: u32) -> TitlerResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TitlerError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TitlerError::validation("image height exceeds u16"))?;
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if premul_rgba8.len() != expected {
        return Err(TitlerError::validation("image byte length mismatch"));
    }

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in premul_rgba8.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// One band: a filled rectangle right-aligned against the canvas edge, with
/// an optional accent outline drawn as an outer fill plus an inset fill.
fn draw_band(
    ctx: &mut vello_cpu::RenderContext,
    theme: &Theme,
    text_width: f64,
    band_y: f64,
    outline: Option<Rgba8>,
) {
    let wf = theme.canvas_width as f64;
    let x0 = wf - text_width - (theme.x_offset as f64) * 2.0;
    let y1 = band_y + theme.band_height as f64;

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    match outline {
        Some(accent) => {
            let inset = theme.outline_width as f64;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                accent.r, accent.g, accent.b, accent.a,
            ));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x0, band_y, wf, y1));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                theme.band_fill.r,
                theme.band_fill.g,
                theme.band_fill.b,
                theme.band_fill.a,
            ));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                x0 + inset,
                band_y + inset,
                wf - inset,
                y1 - inset,
            ));
        }
        None => {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                theme.band_fill.r,
                theme.band_fill.g,
                theme.band_fill.b,
                theme.band_fill.a,
            ));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x0, band_y, wf, y1));
        }
    }
}

fn draw_line(
    ctx: &mut vello_cpu::RenderContext,
    font_data: &vello_cpu::peniko::FontData,
    line: &MeasuredLine,
    x: f64,
    y: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    for layout_line in line.layout.lines() {
        for item in layout_line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font_data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

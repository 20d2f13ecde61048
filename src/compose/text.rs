use crate::foundation::error::{TitlerError, TitlerResult};

/// RGBA8 brush color carried through Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A shaped single line of banner text with its measured pixel extent.
#[derive(Clone)]
pub struct MeasuredLine {
    /// Fully built layout ready for glyph-run rendering.
    pub layout: std::sync::Arc<parley::Layout<TextBrushRgba8>>,
    /// Rendered width in pixels.
    pub width: f32,
    /// Rendered height in pixels.
    pub height: f32,
}

impl std::fmt::Debug for MeasuredLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasuredLine")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Stateful helper for shaping banner lines from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and measure one line of text using the provided font bytes.
    ///
    /// No wrap width is applied; the line's natural extent is what band
    /// geometry is computed from.
    pub fn measure_line(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TitlerResult<MeasuredLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TitlerError::validation(
                "font size_px must be finite and > 0",
            ));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            TitlerError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TitlerError::validation("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let width = layout.width();
        let height = layout.height();
        Ok(MeasuredLine {
            layout: std::sync::Arc::new(layout),
            width,
            height,
        })
    }
}

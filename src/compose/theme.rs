use crate::foundation::core::Rgba8;

/// Styling category selecting an accent outline color.
///
/// Unrecognized tokens parse as [`Tier::None`], which draws no outline.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    None,
    Free,
    Premium,
}

impl Tier {
    /// Parse a tier token case-insensitively; anything unrecognized is `None`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "free" => Self::Free,
            "premium" => Self::Premium,
            _ => Self::None,
        }
    }
}

/// Immutable brand configuration for the composer.
///
/// The default reproduces the reference design: a 1920x1200 canvas, red bands
/// right-aligned with a 30 px inset, white 114 px text, silver/gold tier
/// accents, and a 50 px logo box.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub font_size_px: f32,
    /// Top edge of the upper band.
    pub top_band_y: u32,
    /// Vertical distance from the top band's top edge to the bottom band's.
    pub band_spacing: u32,
    pub band_height: u32,
    /// Vertical inset of text within its band.
    pub text_inset_y: u32,
    /// Horizontal inset from the canvas right edge, also the text margin
    /// inside each band.
    pub x_offset: u32,
    pub outline_width: u32,
    pub band_fill: Rgba8,
    pub text_fill: Rgba8,
    pub free_accent: Rgba8,
    pub premium_accent: Rgba8,
    /// Square bounding box for the logo thumbnail.
    pub logo_box: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            canvas_width: 1920,
            canvas_height: 1200,
            font_size_px: 114.0,
            top_band_y: 145,
            band_spacing: 180,
            band_height: 145,
            text_inset_y: 5,
            x_offset: 30,
            outline_width: 7,
            band_fill: Rgba8::opaque(201, 2, 41),
            text_fill: Rgba8::opaque(255, 255, 255),
            free_accent: Rgba8::opaque(192, 192, 192),
            premium_accent: Rgba8::opaque(255, 215, 0),
            logo_box: 50,
        }
    }
}

impl Theme {
    /// Top edge of the lower band.
    pub fn bottom_band_y(&self) -> u32 {
        self.top_band_y + self.band_spacing
    }

    /// Accent outline color for a tier; `Tier::None` means no outline.
    pub fn accent_for(&self, tier: Tier) -> Option<Rgba8> {
        match tier {
            Tier::None => None,
            Tier::Free => Some(self.free_accent),
            Tier::Premium => Some(self.premium_accent),
        }
    }
}

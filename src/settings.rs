//! Document settings, page presets, and color handling

use crate::constants::*;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values should be 0.0-1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Parse a `#RRGGBB` hex color. Returns None for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .ok()
        };
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Gray color
    pub fn gray(level: f32) -> Self {
        let l = level.clamp(0.0, 1.0);
        Self::rgb(l, l, l)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Named page size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Parse a preset name. Unknown names fall back to A4.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "letter" => Self::Letter,
            "legal" => Self::Legal,
            _ => Self::A4,
        }
    }

    /// Physical (width, height) in points
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            Self::A4 => (A4_WIDTH, A4_HEIGHT),
            Self::Letter => (LETTER_WIDTH, LETTER_HEIGHT),
            Self::Legal => (LEGAL_WIDTH, LEGAL_HEIGHT),
        }
    }
}

/// Procedural page texture styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageStyle {
    #[default]
    Blank,
    Cream,
    Aged,
    Notebook,
    Grid,
    LegalYellow,
    Recycled,
    Parchment,
    Grain,
    FoldCrease,
    CornerShadow,
}

impl PageStyle {
    /// Parse a style tag. Unknown tags fall back to Blank.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "cream" => Self::Cream,
            "aged" => Self::Aged,
            "notebook" => Self::Notebook,
            "grid" => Self::Grid,
            "legal_yellow" => Self::LegalYellow,
            "recycled" => Self::Recycled,
            "parchment" => Self::Parchment,
            "grain" => Self::Grain,
            "fold_crease" => Self::FoldCrease,
            "corner_shadow" => Self::CornerShadow,
            _ => Self::Blank,
        }
    }
}

/// Immutable configuration for one generation request.
///
/// Construct with `Settings::default()` and the builder methods, then pass to
/// [`crate::generate`]. Out-of-range numeric values are clamped and malformed
/// colors replaced by the default ink when the document is generated; invalid
/// settings never fail a request.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Font identifier looked up in the catalog; unknown ids use the default font
    pub font: String,
    pub font_size: f32,
    pub line_spacing: f32,
    pub ink_color: Color,
    pub margin_left: f32,
    pub page_style: PageStyle,
    pub page_size: PageSize,

    /// Positional jitter per glyph/word
    pub jitter: bool,
    /// Scales baseline-shift spread; clamped to [0.2, 2.0]
    pub jitter_strength: f32,
    /// Random variation of the baseline-to-baseline advance
    pub spacing_variation: bool,
    /// Per-word ink color drift
    pub ink_variation: bool,
    /// Per-word font size variation
    pub word_size_variation: bool,
    /// Per-word vertical baseline shift
    pub baseline_shift: bool,
    /// Ink fading across each display line
    pub ink_flow: bool,
    /// Warm gel-pen tint applied after ink flow
    pub gel_pen: bool,

    /// Vertical margin rule at the left margin
    pub margin_rule: bool,
    /// Second rule a few points inside the first
    pub double_margin: bool,
    pub bold_questions: bool,
    pub underline_headings: bool,
    pub new_question_on_new_page: bool,
    pub page_numbers: bool,

    pub header: Option<String>,
    pub footer: Option<String>,
    pub watermark: Option<String>,
    /// Raw image bytes stamped bottom-left on the last page
    pub signature: Option<Vec<u8>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            line_spacing: DEFAULT_LINE_SPACING,
            ink_color: default_ink(),
            margin_left: DEFAULT_MARGIN_LEFT,
            page_style: PageStyle::Blank,
            page_size: PageSize::A4,
            jitter: true,
            jitter_strength: 1.0,
            spacing_variation: true,
            ink_variation: true,
            word_size_variation: false,
            baseline_shift: false,
            ink_flow: false,
            gel_pen: false,
            margin_rule: false,
            double_margin: false,
            bold_questions: false,
            underline_headings: false,
            new_question_on_new_page: false,
            page_numbers: false,
            header: None,
            footer: None,
            watermark: None,
            signature: None,
        }
    }
}

impl Settings {
    /// Set the ink color from a hex string, falling back to the default ink
    /// if the value is not `#RRGGBB`.
    pub fn with_ink_hex(mut self, hex: &str) -> Self {
        self.ink_color = Color::from_hex(hex).unwrap_or_else(default_ink);
        self
    }

    pub fn with_font<S: Into<String>>(mut self, font: S) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_page_style(mut self, style: PageStyle) -> Self {
        self.page_style = style;
        self
    }

    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Clamp numeric fields into their allowed ranges.
    ///
    /// font size [10, 36], line spacing [16, 50], left margin [20, 120],
    /// jitter strength [0.2, 2.0].
    pub fn normalized(mut self) -> Self {
        self.font_size = self.font_size.clamp(10.0, 36.0);
        self.line_spacing = self.line_spacing.clamp(16.0, 50.0);
        self.margin_left = self.margin_left.clamp(20.0, 120.0);
        self.jitter_strength = self.jitter_strength.clamp(0.2, 2.0);
        self
    }
}

/// The default ink color
pub fn default_ink() -> Color {
    // DEFAULT_INK_HEX is a valid literal
    Color::from_hex(DEFAULT_INK_HEX).unwrap_or_else(Color::black)
}

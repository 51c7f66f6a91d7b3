//! Constants for page dimensions, margins, and realism tuning

/// Standard A4 page width in points
pub const A4_WIDTH: f32 = 595.0;

/// Standard A4 page height in points
pub const A4_HEIGHT: f32 = 842.0;

/// US Letter page width in points
pub const LETTER_WIDTH: f32 = 612.0;

/// US Letter page height in points
pub const LETTER_HEIGHT: f32 = 792.0;

/// US Legal page width in points
pub const LEGAL_WIDTH: f32 = 612.0;

/// US Legal page height in points
pub const LEGAL_HEIGHT: f32 = 1008.0;

/// Top page margin in points
pub const MARGIN_TOP: f32 = 50.0;

/// Bottom page margin in points
pub const MARGIN_BOTTOM: f32 = 50.0;

/// Right page margin in points
pub const MARGIN_RIGHT: f32 = 30.0;

/// Default left margin in points
pub const DEFAULT_MARGIN_LEFT: f32 = 60.0;

/// Default character width ratio for text estimation
/// (average character width as a fraction of font size)
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Default handwriting font size in points
pub const DEFAULT_FONT_SIZE: f32 = 18.0;

/// Default baseline-to-baseline spacing in points
pub const DEFAULT_LINE_SPACING: f32 = 28.0;

/// Default ink color (dark ballpoint blue)
pub const DEFAULT_INK_HEX: &str = "#0A1F5C";

/// Fraction of the usable width that wrapped lines may fill. The remaining
/// headroom absorbs word-size variation and horizontal jitter applied later.
pub const WRAP_HEADROOM: f32 = 0.85;

/// Maximum per-channel ink color drift (normalized 0-1)
pub const INK_DRIFT: f32 = 0.03;

/// Ink-flow fade floor: color multiplier at the end of a line
pub const INK_FLOW_FLOOR: f32 = 0.88;

/// Gel-pen channel tints, applied after ink-flow fade
pub const GEL_TINT_R: f32 = 1.08;
pub const GEL_TINT_G: f32 = 1.02;
pub const GEL_TINT_B: f32 = 0.95;

/// Word-size variation spread in points
pub const WORD_SIZE_SPREAD: f32 = 1.5;

/// Baseline shift spread in points, before jitter-strength scaling
pub const BASELINE_SPREAD: f32 = 1.2;

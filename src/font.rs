//! Font catalog, metrics, and PDF font embedding
//!
//! The catalog is an explicit value passed into the layout engine; there is
//! no process-wide font registry. The host loads font files once at startup,
//! registers them here, and hands the catalog to every generation request.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use tracing::debug;

use crate::constants::DEFAULT_CHAR_WIDTH_RATIO;
use crate::error::Result;

/// Trait for measuring text dimensions at a given font size.
///
/// The layout engine only ever measures through this trait, so tests can
/// substitute predictable metrics.
pub trait FontMetrics {
    /// Width of a single character in points at the given font size
    fn char_width(&self, ch: char, font_size: f32) -> f32;

    /// Total width of a string in points at the given font size
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Width-ratio metrics for the built-in base-14 fonts.
///
/// No AFM data is shipped; widths are estimated as a fixed fraction of the
/// font size, which is accurate enough for handwriting layout where jitter
/// dominates.
#[derive(Debug, Clone, Copy)]
pub struct RatioMetrics {
    ratio: f32,
}

impl Default for RatioMetrics {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_CHAR_WIDTH_RATIO,
        }
    }
}

impl FontMetrics for RatioMetrics {
    fn char_width(&self, _ch: char, font_size: f32) -> f32 {
        font_size * self.ratio
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.ratio
    }
}

/// TrueType metrics backed by ttf-parser.
///
/// Owns the raw font data and parses it on demand; glyphs missing from the
/// face fall back to the ratio estimate.
#[cfg(feature = "ttf-parser")]
pub struct TtfFontMetrics {
    font_data: Vec<u8>,
    units_per_em: f32,
}

#[cfg(feature = "ttf-parser")]
impl TtfFontMetrics {
    /// Validate and wrap raw TTF/TTC font data.
    pub fn new(font_data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&font_data, 0).map_err(|e| {
            crate::error::ScrawlError::FontError(format!("failed to parse font: {e}"))
        })?;
        let units_per_em = face.units_per_em() as f32;
        Ok(Self {
            font_data,
            units_per_em,
        })
    }

    fn face(&self) -> ttf_parser::Face<'_> {
        // Validated in new()
        ttf_parser::Face::parse(&self.font_data, 0).unwrap()
    }

    /// Glyph id for the PDF Identity-H encoding (0 for missing glyphs)
    pub fn glyph_id(&self, ch: char) -> u16 {
        self.face().glyph_index(ch).map(|g| g.0).unwrap_or(0)
    }
}

#[cfg(feature = "ttf-parser")]
impl FontMetrics for TtfFontMetrics {
    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        let face = self.face();
        face.glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
            .map(|advance| advance as f32 / self.units_per_em * font_size)
            .unwrap_or(font_size * DEFAULT_CHAR_WIDTH_RATIO)
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

#[cfg(feature = "ttf-parser")]
impl std::fmt::Debug for TtfFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFontMetrics")
            .field("units_per_em", &self.units_per_em)
            .field("font_data_len", &self.font_data.len())
            .finish()
    }
}

enum FontKind {
    /// Base-14 font referenced by name, WinAnsi encoded
    Builtin { base_font: String },
    /// Embedded TrueType font, written as Type0/CIDFontType2 with Identity-H
    #[cfg(feature = "ttf-parser")]
    Embedded { metrics: TtfFontMetrics },
}

/// One registered font: its page-resource name plus measurement and encoding
pub struct CatalogFont {
    resource_name: String,
    ratio_metrics: RatioMetrics,
    kind: FontKind,
}

impl CatalogFont {
    /// Resource name used in Tf operations, e.g. "F0"
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        match &self.kind {
            FontKind::Builtin { .. } => &self.ratio_metrics,
            #[cfg(feature = "ttf-parser")]
            FontKind::Embedded { metrics } => metrics,
        }
    }

    /// Encode text as the operand of a Tj operation.
    ///
    /// Builtin fonts take a literal string; embedded fonts take 2-byte
    /// big-endian glyph ids in a hex string.
    pub fn show_operand(&self, text: &str) -> Object {
        match &self.kind {
            FontKind::Builtin { .. } => Object::string_literal(text),
            #[cfg(feature = "ttf-parser")]
            FontKind::Embedded { metrics } => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    bytes.extend_from_slice(&metrics.glyph_id(ch).to_be_bytes());
                }
                Object::String(bytes, lopdf::StringFormat::Hexadecimal)
            }
        }
    }
}

impl std::fmt::Debug for CatalogFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogFont")
            .field("resource_name", &self.resource_name)
            .finish()
    }
}

/// Registered fonts for one process, keyed by caller-chosen identifiers.
///
/// Unknown identifiers resolve to the default font rather than failing, so a
/// stale font id in a request degrades gracefully.
#[derive(Debug)]
pub struct FontCatalog {
    fonts: BTreeMap<String, CatalogFont>,
    default_font: String,
    next_index: usize,
}

impl FontCatalog {
    /// Create a catalog with Helvetica registered as the default font.
    pub fn new() -> Self {
        let mut catalog = Self {
            fonts: BTreeMap::new(),
            default_font: "Helvetica".to_string(),
            next_index: 0,
        };
        catalog.register_builtin("Helvetica", "Helvetica");
        catalog
    }

    fn next_resource_name(&mut self) -> String {
        let name = format!("F{}", self.next_index);
        self.next_index += 1;
        name
    }

    /// Register one of the base-14 fonts under a caller-chosen identifier.
    pub fn register_builtin<S: Into<String>>(&mut self, name: S, base_font: &str) {
        let resource_name = self.next_resource_name();
        self.fonts.insert(
            name.into(),
            CatalogFont {
                resource_name,
                ratio_metrics: RatioMetrics::default(),
                kind: FontKind::Builtin {
                    base_font: base_font.to_string(),
                },
            },
        );
    }

    /// Register a TrueType font from raw file data.
    #[cfg(feature = "ttf-parser")]
    pub fn register_ttf<S: Into<String>>(&mut self, name: S, font_data: Vec<u8>) -> Result<()> {
        let metrics = TtfFontMetrics::new(font_data)?;
        let resource_name = self.next_resource_name();
        let name = name.into();
        debug!("Registered TTF font {name:?} as {resource_name}");
        self.fonts.insert(
            name,
            CatalogFont {
                resource_name,
                ratio_metrics: RatioMetrics::default(),
                kind: FontKind::Embedded { metrics },
            },
        );
        Ok(())
    }

    /// Make a previously registered font the fallback for unknown ids.
    /// Returns false if no font with that name exists.
    pub fn set_default(&mut self, name: &str) -> bool {
        if self.fonts.contains_key(name) {
            self.default_font = name.to_string();
            true
        } else {
            false
        }
    }

    /// Look up a font id, falling back to the default for unknown ids.
    pub fn resolve(&self, requested: &str) -> &CatalogFont {
        self.fonts
            .get(requested)
            .or_else(|| self.fonts.get(&self.default_font))
            .expect("catalog always contains the default font")
    }

    /// Build the per-page Font resource dictionary, adding font objects
    /// (and embedded font programs) to the document.
    pub fn install(&self, doc: &mut Document) -> Result<Dictionary> {
        debug!("Installing {} fonts into document", self.fonts.len());
        let mut resources = Dictionary::new();
        for font in self.fonts.values() {
            let font_id = match &font.kind {
                FontKind::Builtin { base_font } => doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => base_font.as_str(),
                    "Encoding" => "WinAnsiEncoding",
                }),
                #[cfg(feature = "ttf-parser")]
                FontKind::Embedded { metrics } => embed_ttf(doc, metrics)?,
            };
            resources.set(font.resource_name.as_bytes().to_vec(), font_id);
        }
        Ok(resources)
    }
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the object graph for a Type0/CIDFontType2 font: descriptor,
/// embedded font program, CID font with a full width array, and the
/// composite font that pages reference.
#[cfg(feature = "ttf-parser")]
fn embed_ttf(doc: &mut Document, metrics: &TtfFontMetrics) -> Result<lopdf::ObjectId> {
    let face = metrics.face();
    let units_per_em = face.units_per_em() as f32;
    let scale = 1000.0 / units_per_em;
    let base_font = "Handwriting";

    let font_descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_font,
        "Flags" => 32, // Nonsymbolic
        "ItalicAngle" => 0,
        "Ascent" => (face.ascender() as f32 * scale) as i64,
        "Descent" => (face.descender() as f32 * scale) as i64,
        "CapHeight" => (face.capital_height().unwrap_or(face.ascender()) as f32 * scale) as i64,
        "StemV" => 80,
        "FontBBox" => vec![
            Object::Integer(0),
            Object::Integer((face.descender() as f32 * scale) as i64),
            Object::Integer(1000),
            Object::Integer((face.ascender() as f32 * scale) as i64),
        ],
    });

    let font_stream = Stream::new(
        dictionary! {
            "Length1" => metrics.font_data.len() as i64,
        },
        metrics.font_data.clone(),
    );
    let font_stream_id = doc.add_object(font_stream);

    if let Ok(Object::Dictionary(desc)) = doc.get_object_mut(font_descriptor_id) {
        desc.set("FontFile2", font_stream_id);
    }

    // Per-glyph advances so viewers position glyphs the same way the
    // layout engine measured them.
    let widths: Vec<Object> = (0..face.number_of_glyphs())
        .map(|gid| {
            let advance = face
                .glyph_hor_advance(ttf_parser::GlyphId(gid))
                .unwrap_or(0);
            Object::Integer((advance as f32 * scale) as i64)
        })
        .collect();

    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => base_font,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => font_descriptor_id,
        "DW" => 1000,
        "W" => vec![Object::Integer(0), Object::Array(widths)],
    });

    Ok(doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => base_font,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_metrics_scale_with_size() {
        let metrics = RatioMetrics::default();
        assert_eq!(metrics.text_width("abcd", 10.0), 20.0);
        assert_eq!(metrics.text_width("abcd", 20.0), 40.0);
        assert_eq!(metrics.char_width('x', 18.0), 9.0);
    }

    #[test]
    fn test_unknown_font_resolves_to_default() {
        let catalog = FontCatalog::new();
        let font = catalog.resolve("NoSuchFont");
        assert_eq!(font.resource_name(), catalog.resolve("Helvetica").resource_name());
    }

    #[test]
    fn test_set_default_requires_registration() {
        let mut catalog = FontCatalog::new();
        assert!(!catalog.set_default("Pacifico"));
        catalog.register_builtin("Pacifico", "Times-Roman");
        assert!(catalog.set_default("Pacifico"));
        let font = catalog.resolve("missing");
        assert_eq!(font.resource_name(), "F1");
    }

    #[test]
    fn test_builtin_show_operand_is_literal() {
        let catalog = FontCatalog::new();
        let operand = catalog.resolve("Helvetica").show_operand("hi");
        assert!(matches!(operand, Object::String(_, lopdf::StringFormat::Literal)));
    }

    #[cfg(feature = "ttf-parser")]
    #[test]
    fn test_ttf_metrics_reject_garbage() {
        assert!(TtfFontMetrics::new(vec![0, 1, 2, 3]).is_err());
    }
}

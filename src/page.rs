//! Page surfaces, drawing primitives, and PDF document assembly
//!
//! Drawing accumulates `lopdf` content-stream operations per page. Each page
//! keeps its decoration (background, furniture) separate from its body
//! content so decorations can be painted after layout, when the total page
//! count is known, while still rendering underneath the text.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::debug;

use crate::constants::{MARGIN_BOTTOM, MARGIN_RIGHT, MARGIN_TOP};
use crate::error::Result;
use crate::font::FontCatalog;
use crate::settings::{Color, Settings};

/// Physical page geometry for one generation request
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl Geometry {
    pub fn from_settings(settings: &Settings) -> Self {
        let (width, height) = settings.page_size.dimensions();
        Self {
            width,
            height,
            margin_left: settings.margin_left,
            margin_right: MARGIN_RIGHT,
            margin_top: MARGIN_TOP,
            margin_bottom: MARGIN_BOTTOM,
        }
    }

    /// Horizontal origin for left-aligned text, inside the margin rule
    pub fn x_base(&self) -> f32 {
        self.margin_left + 10.0
    }

    /// Width available to wrapped text
    pub fn usable_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right - 20.0
    }

    /// Cursor position at the top of a fresh page
    pub fn top_y(&self) -> f32 {
        self.height - self.margin_top
    }
}

/// Accumulated drawing operations for one physical page
#[derive(Debug, Default)]
pub struct Page {
    /// Background texture and furniture, rendered first
    pub decor: Vec<Operation>,
    /// Glyph and underline draws
    pub content: Vec<Operation>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Set the non-stroking color
pub fn fill_color(color: Color) -> Operation {
    Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()])
}

/// Set the stroking color
pub fn stroke_color(color: Color) -> Operation {
    Operation::new("RG", vec![color.r.into(), color.g.into(), color.b.into()])
}

/// Set the stroke line width
pub fn line_width(width: f32) -> Operation {
    Operation::new("w", vec![width.into()])
}

/// Fill a rectangle with the given color
pub fn fill_rect(x: f32, y: f32, width: f32, height: f32, color: Color) -> Vec<Operation> {
    vec![
        fill_color(color),
        Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]),
        Operation::new("f", vec![]),
    ]
}

/// Stroke a straight line between two points
pub fn stroke_line(x1: f32, y1: f32, x2: f32, y2: f32) -> Vec<Operation> {
    vec![
        Operation::new("m", vec![x1.into(), y1.into()]),
        Operation::new("l", vec![x2.into(), y2.into()]),
        Operation::new("S", vec![]),
    ]
}

/// Kappa constant for approximating a quarter circle with one cubic Bezier
const CIRCLE_KAPPA: f32 = 0.552_284_75;

/// Fill a circle built from four cubic Bezier quarter-arcs
pub fn fill_circle(cx: f32, cy: f32, r: f32, color: Color) -> Vec<Operation> {
    let k = CIRCLE_KAPPA * r;
    let mut ops = vec![
        fill_color(color),
        Operation::new("m", vec![(cx + r).into(), cy.into()]),
    ];
    let arcs = [
        [(cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)],
        [(cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)],
        [(cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)],
        [(cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)],
    ];
    for [(x1, y1), (x2, y2), (x3, y3)] in arcs {
        ops.push(Operation::new(
            "c",
            vec![
                x1.into(),
                y1.into(),
                x2.into(),
                y2.into(),
                x3.into(),
                y3.into(),
            ],
        ));
    }
    ops.push(Operation::new("f", vec![]));
    ops
}

/// Show one run of text at an absolute position.
///
/// `operand` must come from the font's `show_operand` so the bytes match its
/// encoding. Bold runs use the fill-and-stroke text render mode rather than a
/// separate bold face, which suits hand lettering.
pub fn show_text(
    x: f32,
    y: f32,
    font_resource: &str,
    font_size: f32,
    color: Color,
    operand: Object,
    bold: bool,
) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(font_resource.as_bytes().to_vec()),
                font_size.into(),
            ],
        ),
        fill_color(color),
    ];
    if bold {
        ops.push(stroke_color(color));
        ops.push(line_width(font_size * 0.02));
        ops.push(Operation::new("Tr", vec![2.into()]));
    }
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![operand]));
    if bold {
        ops.push(Operation::new("Tr", vec![0.into()]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Show text rotated by `degrees` around its own origin, via the text matrix
pub fn show_text_rotated(
    x: f32,
    y: f32,
    degrees: f32,
    font_resource: &str,
    font_size: f32,
    color: Color,
    operand: Object,
) -> Vec<Operation> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(font_resource.as_bytes().to_vec()),
                font_size.into(),
            ],
        ),
        fill_color(color),
        Operation::new(
            "Tm",
            vec![
                cos.into(),
                sin.into(),
                (-sin).into(),
                cos.into(),
                x.into(),
                y.into(),
            ],
        ),
        Operation::new("Tj", vec![operand]),
        Operation::new("ET", vec![]),
    ]
}

/// Assemble finished pages into a lopdf document.
///
/// Per page the decoration stream renders first, then the content stream.
/// The optional signature image is stamped bottom-left on the last page.
pub fn write_document(
    pages: Vec<Page>,
    geometry: &Geometry,
    catalog: &FontCatalog,
    signature: Option<&[u8]>,
) -> Result<Document> {
    debug!("Assembling document with {} pages", pages.len());

    let mut doc = Document::with_version("1.5");

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    });

    let font_resources = catalog.install(&mut doc)?;
    let resources_id = doc.add_object(dictionary! {
        "Font" => font_resources,
    });

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        geometry.width.into(),
        geometry.height.into(),
    ];

    let page_count = pages.len();
    let mut page_ids = Vec::with_capacity(page_count);
    for page in pages {
        let mut operations = page.decor;
        operations.extend(page.content);
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    if let Ok(Object::Dictionary(pages_dict)) = doc.get_object_mut(pages_id) {
        pages_dict.set(
            "Kids",
            page_ids
                .iter()
                .map(|&id| Object::Reference(id))
                .collect::<Vec<Object>>(),
        );
        pages_dict.set("Count", Object::Integer(page_count as i64));
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let (Some(image_data), Some(&last_page_id)) = (signature, page_ids.last()) {
        let image = lopdf::xobject::image_from(image_data.to_vec())?;
        doc.insert_image(
            last_page_id,
            image,
            (geometry.margin_left, geometry.margin_bottom),
            (140.0, 60.0),
        )?;
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_circle_is_closed_path() {
        let ops = fill_circle(10.0, 10.0, 5.0, Color::black());
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(operators, vec!["rg", "m", "c", "c", "c", "c", "f"]);
    }

    #[test]
    fn test_show_text_wraps_in_text_object() {
        let ops = show_text(
            10.0,
            20.0,
            "F0",
            12.0,
            Color::black(),
            Object::string_literal("hi"),
            false,
        );
        assert_eq!(ops.first().unwrap().operator, "BT");
        assert_eq!(ops.last().unwrap().operator, "ET");
        assert!(ops.iter().any(|op| op.operator == "Tj"));
    }

    #[test]
    fn test_bold_toggles_render_mode() {
        let ops = show_text(
            0.0,
            0.0,
            "F0",
            12.0,
            Color::black(),
            Object::string_literal("q"),
            true,
        );
        let modes: Vec<_> = ops.iter().filter(|op| op.operator == "Tr").collect();
        assert_eq!(modes.len(), 2);
    }

    #[test]
    fn test_write_document_builds_page_tree() {
        let geometry = Geometry::from_settings(&Settings::default());
        let catalog = FontCatalog::new();
        let mut page = Page::new();
        page.content.extend(show_text(
            72.0,
            700.0,
            "F0",
            12.0,
            Color::black(),
            Object::string_literal("hello"),
            false,
        ));
        let doc = write_document(vec![page, Page::new()], &geometry, &catalog, None).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}

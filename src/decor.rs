//! Procedural page backgrounds and structural furniture
//!
//! Textures are purely cosmetic and re-sampled independently for every page.
//! Furniture (margin rule, header, footer, watermark) is painted per page
//! after layout completes, so footer page counts are exact.

use lopdf::content::Operation;
use rand::Rng;
use rand::rngs::StdRng;

use crate::font::CatalogFont;
use crate::page::{
    Geometry, fill_circle, fill_rect, line_width, show_text, show_text_rotated, stroke_color,
    stroke_line,
};
use crate::settings::{Color, PageStyle, Settings};

/// Parse a known-good hex literal
fn hex(literal: &str) -> Color {
    Color::from_hex(literal).unwrap_or_default()
}

/// Paint the page texture for one page into `ops`.
pub fn paint_background(
    ops: &mut Vec<Operation>,
    style: PageStyle,
    geometry: &Geometry,
    line_spacing: f32,
    rng: &mut StdRng,
) {
    let (w, h) = (geometry.width, geometry.height);
    match style {
        PageStyle::Blank => {
            ops.extend(fill_rect(0.0, 0.0, w, h, Color::white()));
        }
        PageStyle::Cream => {
            ops.extend(fill_rect(0.0, 0.0, w, h, hex("#FFF8E7")));
        }
        PageStyle::Aged => {
            ops.extend(fill_rect(0.0, 0.0, w, h, hex("#F5E6C8")));
            let speckle = hex("#EAD5AA");
            for _ in 0..15 {
                let x = rng.random_range(0.0..w);
                let y = rng.random_range(0.0..h);
                let r = rng.random_range(2.0..8.0);
                ops.extend(fill_circle(x, y, r, speckle));
            }
        }
        PageStyle::Notebook => {
            ops.extend(fill_rect(0.0, 0.0, w, h, Color::white()));
            ops.push(stroke_color(hex("#E0E0E0")));
            ops.push(line_width(0.3));
            let mut y = h - 60.0;
            while y > 40.0 {
                ops.extend(stroke_line(geometry.margin_left, y, w - 30.0, y));
                y -= line_spacing;
            }
            ops.push(stroke_color(hex("#FF9999")));
            ops.push(line_width(0.8));
            ops.extend(stroke_line(geometry.margin_left, 0.0, geometry.margin_left, h));
        }
        PageStyle::Grid => {
            ops.extend(fill_rect(0.0, 0.0, w, h, Color::white()));
            ops.push(stroke_color(hex("#E8E8E8")));
            ops.push(line_width(0.2));
            let step = 20.0;
            let mut x = 0.0;
            while x <= w {
                ops.extend(stroke_line(x, 0.0, x, h));
                x += step;
            }
            let mut y = 0.0;
            while y <= h {
                ops.extend(stroke_line(0.0, y, w, y));
                y += step;
            }
        }
        PageStyle::LegalYellow => {
            ops.extend(fill_rect(0.0, 0.0, w, h, hex("#FBF4C2")));
            ops.push(stroke_color(hex("#D9CE9A")));
            ops.push(line_width(0.3));
            let mut y = h - 60.0;
            while y > 40.0 {
                ops.extend(stroke_line(geometry.margin_left, y, w - 30.0, y));
                y -= line_spacing;
            }
            ops.push(stroke_color(hex("#E08888")));
            ops.push(line_width(0.8));
            ops.extend(stroke_line(geometry.margin_left, 0.0, geometry.margin_left, h));
            ops.extend(stroke_line(
                geometry.margin_left - 6.0,
                0.0,
                geometry.margin_left - 6.0,
                h,
            ));
        }
        PageStyle::Recycled => {
            ops.extend(fill_rect(0.0, 0.0, w, h, hex("#F4F1E8")));
            let fleck = hex("#DDD8CA");
            for _ in 0..40 {
                let x = rng.random_range(0.0..w);
                let y = rng.random_range(0.0..h);
                let r = rng.random_range(0.4..1.4);
                ops.extend(fill_circle(x, y, r, fleck));
            }
        }
        PageStyle::Parchment => {
            ops.extend(fill_rect(0.0, 0.0, w, h, hex("#F0E2C4")));
            let blotch = hex("#E6D3AA");
            for _ in 0..8 {
                let x = rng.random_range(0.0..w);
                let y = rng.random_range(0.0..h);
                let r = rng.random_range(10.0..30.0);
                ops.extend(fill_circle(x, y, r, blotch));
            }
        }
        PageStyle::Grain => {
            ops.extend(fill_rect(0.0, 0.0, w, h, hex("#FBFAF7")));
            ops.push(stroke_color(hex("#EFECE4")));
            ops.push(line_width(0.3));
            for _ in 0..60 {
                let x = rng.random_range(0.0..w);
                let y = rng.random_range(0.0..h);
                let len = rng.random_range(8.0..25.0);
                ops.extend(stroke_line(x, y, x, (y + len).min(h)));
            }
        }
        PageStyle::FoldCrease => {
            ops.extend(fill_rect(0.0, 0.0, w, h, Color::white()));
            let crease_y = h * 0.5 + rng.random_range(-20.0..20.0);
            ops.push(stroke_color(hex("#DDDDDD")));
            ops.push(line_width(0.5));
            ops.extend(stroke_line(0.0, crease_y, w, crease_y));
            ops.push(stroke_color(hex("#EEEEEE")));
            ops.push(line_width(0.4));
            ops.extend(stroke_line(0.0, crease_y - 1.5, w, crease_y - 1.5));
        }
        PageStyle::CornerShadow => {
            ops.extend(fill_rect(0.0, 0.0, w, h, Color::white()));
            // Darker rings toward the corner, painted lightest first
            for (r, level) in [(60.0, 0.95), (40.0, 0.91), (20.0, 0.87)] {
                ops.extend(fill_circle(w, h, r, Color::gray(level)));
            }
        }
    }
}

/// Paint the margin rule, header, footer, and watermark for one page.
///
/// `total_pages` is exact: furniture is painted after the layout pass has
/// finished, so early pages carry the true count.
pub fn paint_furniture(
    ops: &mut Vec<Operation>,
    settings: &Settings,
    geometry: &Geometry,
    font: &CatalogFont,
    page_number: usize,
    total_pages: usize,
) {
    if settings.margin_rule {
        ops.push(stroke_color(hex("#FF9999")));
        ops.push(line_width(0.8));
        ops.extend(stroke_line(
            geometry.margin_left,
            0.0,
            geometry.margin_left,
            geometry.height,
        ));
        if settings.double_margin {
            ops.extend(stroke_line(
                geometry.margin_left - 8.0,
                0.0,
                geometry.margin_left - 8.0,
                geometry.height,
            ));
        }
    }

    if let Some(header) = settings.header.as_deref() {
        let size = 9.0;
        let tw = font.metrics().text_width(header, size);
        ops.extend(show_text(
            (geometry.width - tw) / 2.0,
            geometry.height - 25.0,
            font.resource_name(),
            size,
            Color::gray(0.35),
            font.show_operand(header),
            false,
        ));
    }

    let mut footer_parts = Vec::new();
    if let Some(footer) = settings.footer.as_deref() {
        if !footer.is_empty() {
            footer_parts.push(footer.to_string());
        }
    }
    if settings.page_numbers {
        footer_parts.push(format!("Page {page_number} of {total_pages}"));
    }
    if !footer_parts.is_empty() {
        let footer_text = footer_parts.join(" | ");
        let size = 9.0;
        let tw = font.metrics().text_width(&footer_text, size);
        ops.extend(show_text(
            (geometry.width - tw) / 2.0,
            20.0,
            font.resource_name(),
            size,
            Color::gray(0.35),
            font.show_operand(&footer_text),
            false,
        ));
    }

    if let Some(watermark) = settings.watermark.as_deref() {
        if !watermark.is_empty() {
            let size = 48.0;
            let tw = font.metrics().text_width(watermark, size);
            // Diagonal through the page center
            let offset = tw * std::f32::consts::FRAC_1_SQRT_2 / 2.0;
            ops.extend(show_text_rotated(
                geometry.width / 2.0 - offset,
                geometry.height / 2.0 - offset,
                45.0,
                font.resource_name(),
                size,
                Color::gray(0.88),
                font.show_operand(watermark),
            ));
        }
    }
}

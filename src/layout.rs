//! Page layout engine
//!
//! Consumes classified lines, drives the wrapper, dispatches per-role draw
//! routines, tracks the cursor, and triggers page breaks. Word and glyph
//! placement is a fold producing a new horizontal position, so the engine
//! can be exercised without a PDF document.

use lopdf::content::Operation;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::classify::{Role, classify};
use crate::decor::{paint_background, paint_furniture};
use crate::font::{CatalogFont, FontCatalog};
use crate::page::{Geometry, Page, line_width, show_text, stroke_color, stroke_line};
use crate::realism::Sampler;
use crate::settings::{Color, Settings};
use crate::text::wrap_text;

/// Current drawing position, owned exclusively by the engine.
/// Reset to the top margin on every page break.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    page: usize,
    y: f32,
}

pub(crate) struct LayoutEngine<'a> {
    settings: &'a Settings,
    geometry: Geometry,
    font: &'a CatalogFont,
    sampler: Sampler,
    decor_rng: StdRng,
    pages: Vec<Page>,
    cursor: Cursor,
}

impl<'a> LayoutEngine<'a> {
    pub(crate) fn new(
        settings: &'a Settings,
        catalog: &'a FontCatalog,
        sampler: Sampler,
        decor_rng: StdRng,
    ) -> Self {
        let geometry = Geometry::from_settings(settings);
        let cursor = Cursor {
            page: 0,
            y: geometry.top_y(),
        };
        Self {
            settings,
            geometry,
            font: catalog.resolve(&settings.font),
            sampler,
            decor_rng,
            pages: vec![Page::new()],
            cursor,
        }
    }

    /// Lay out the whole text and return finished pages with decorations.
    pub(crate) fn run(mut self, text: &str) -> Vec<Page> {
        for line in text.lines() {
            let (role, content) = classify(line);
            trace!("Line classified as {:?}", role);
            self.draw_line(role, &content);
        }
        self.finalize()
    }

    fn content(&mut self) -> &mut Vec<Operation> {
        &mut self.pages[self.cursor.page].content
    }

    /// Finalize the current page and reset the cursor to the top margin
    fn break_page(&mut self) {
        self.pages.push(Page::new());
        self.cursor.page += 1;
        self.cursor.y = self.geometry.top_y();
        debug!("Page break: now on page {}", self.cursor.page + 1);
    }

    /// Break before drawing if the cursor has passed the bottom margin.
    /// Called once per display line, never mid-line.
    fn ensure_room(&mut self) {
        if self.cursor.y < self.geometry.margin_bottom {
            self.break_page();
        }
    }

    fn draw_line(&mut self, role: Role, content: &str) {
        let spacing = self.settings.line_spacing;
        match role {
            Role::Empty => {
                // Advances the cursor without emitting marks; the break, if
                // due, happens before the next drawn line.
                self.cursor.y -= spacing * 0.6;
            }
            Role::Title => self.draw_title(content),
            Role::Name | Role::Id | Role::Subject => self.draw_field_left(content),
            Role::Date => self.draw_field_right(content),
            Role::Question => self.draw_question(content),
            Role::Heading => self.draw_heading(content),
            Role::AnswerLabel => {
                self.ensure_room();
                self.draw_body_display_line(content, self.settings.font_size);
                let advance = self.sampler.line_advance(spacing);
                self.cursor.y -= advance;
            }
            Role::Answer => self.draw_answer(content),
        }
    }

    fn draw_title(&mut self, content: &str) {
        self.ensure_room();
        let size = self.settings.font_size + 6.0;
        let tw = self.font.metrics().text_width(content, size);
        let x = (self.geometry.width - tw) / 2.0;
        let dy = self.sampler.jitter_y(1.5);
        let operand = self.font.show_operand(content);
        let resource = self.font.resource_name().to_string();
        let (y, spacing) = (self.cursor.y, self.settings.line_spacing);
        self.content()
            .extend(show_text(x, y + dy, &resource, size, Color::black(), operand, false));
        self.cursor.y -= spacing * 1.8;
    }

    fn draw_field_left(&mut self, content: &str) {
        self.ensure_room();
        let size = self.settings.font_size + 1.0;
        let dx = self.sampler.jitter_x(1.0);
        let dy = self.sampler.jitter_y(1.0);
        let operand = self.font.show_operand(content);
        let resource = self.font.resource_name().to_string();
        let x = self.geometry.x_base() + dx;
        let (y, spacing) = (self.cursor.y, self.settings.line_spacing);
        self.content()
            .extend(show_text(x, y + dy, &resource, size, Color::black(), operand, false));
        self.cursor.y -= spacing * 1.3;
    }

    fn draw_field_right(&mut self, content: &str) {
        self.ensure_room();
        let size = self.settings.font_size + 1.0;
        let tw = self.font.metrics().text_width(content, size);
        let x = self.geometry.width - self.geometry.margin_right - tw - 10.0;
        let dy = self.sampler.jitter_y(1.0);
        let operand = self.font.show_operand(content);
        let resource = self.font.resource_name().to_string();
        let (y, spacing) = (self.cursor.y, self.settings.line_spacing);
        self.content()
            .extend(show_text(x, y + dy, &resource, size, Color::black(), operand, false));
        self.cursor.y -= spacing * 1.3;
    }

    fn draw_question(&mut self, content: &str) {
        // A question opens a fresh page unless the cursor is already near
        // the top of one.
        let near_top = self.cursor.y >= self.geometry.top_y() - self.settings.line_spacing;
        if self.settings.new_question_on_new_page && !near_top {
            self.break_page();
        }

        let size = self.settings.font_size + 1.0;
        let bold = self.settings.bold_questions;
        let spacing = self.settings.line_spacing;
        let wrapped = wrap_text(content, size, self.geometry.usable_width(), self.font.metrics());
        let resource = self.font.resource_name().to_string();
        for line in &wrapped {
            self.ensure_room();
            let dx = self.sampler.jitter_x(1.2);
            let dy = self.sampler.jitter_y(1.0);
            let operand = self.font.show_operand(line);
            let x = self.geometry.x_base() + dx;
            let y = self.cursor.y;
            self.content()
                .extend(show_text(x, y + dy, &resource, size, Color::black(), operand, bold));
            let advance = self.sampler.line_advance(spacing);
            self.cursor.y -= advance;
        }
        self.cursor.y -= spacing * 0.3;
    }

    fn draw_heading(&mut self, content: &str) {
        let size = self.settings.font_size + 3.0;
        let spacing = self.settings.line_spacing;
        let wrapped = wrap_text(content, size, self.geometry.usable_width(), self.font.metrics());
        let resource = self.font.resource_name().to_string();
        for line in &wrapped {
            self.ensure_room();
            let dy = self.sampler.jitter_y(1.0);
            let tw = self.font.metrics().text_width(line, size);
            let operand = self.font.show_operand(line);
            let x = self.geometry.x_base();
            let y = self.cursor.y;
            let underline = self.settings.underline_headings && !line.is_empty();
            let ops = self.content();
            ops.extend(show_text(x, y + dy, &resource, size, Color::black(), operand, false));
            if underline {
                ops.push(stroke_color(Color::black()));
                ops.push(line_width(0.6));
                ops.extend(stroke_line(x, y + dy - 2.5, x + tw, y + dy - 2.5));
            }
            let advance = self.sampler.line_advance(spacing);
            self.cursor.y -= advance;
        }
        self.cursor.y -= spacing * 0.5;
    }

    fn draw_answer(&mut self, content: &str) {
        let size = self.settings.font_size;
        let spacing = self.settings.line_spacing;
        let wrapped = wrap_text(content, size, self.geometry.usable_width(), self.font.metrics());
        for line in &wrapped {
            self.ensure_room();
            self.draw_body_display_line(line, size);
            let advance = self.sampler.line_advance(spacing);
            self.cursor.y -= advance;
        }
    }

    /// The densest rendering path: per-word color drift, ink flow, size
    /// variation, baseline shift, and horizontal jitter. The word positions
    /// fold left to right; the cursor's y is untouched.
    fn draw_body_display_line(&mut self, line: &str, base_size: f32) {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return;
        }

        let ink = self.settings.ink_color;
        let space_width = self.font.metrics().char_width(' ', base_size);
        let baseline = self.cursor.y;
        let last = words.len().saturating_sub(1);
        let mut x = self.geometry.x_base() + self.sampler.jitter_x(1.5);

        for (index, word) in words.iter().enumerate() {
            let ratio = if last > 0 {
                index as f32 / last as f32
            } else {
                0.0
            };
            let color = self.sampler.word_ink(ink, ratio);
            let size = self.sampler.word_size(base_size);
            let dy = self.sampler.jitter_y(1.0) + self.sampler.baseline_shift();

            if self.sampler.scatter_glyphs() {
                x = self.draw_scattered_word(word, x, baseline + dy, size, color);
            } else {
                let operand = self.font.show_operand(word);
                let resource = self.font.resource_name().to_string();
                let advance = self.font.metrics().text_width(word, size);
                self.content()
                    .extend(show_text(x, baseline + dy, &resource, size, color, operand, false));
                x += advance;
            }
            x += space_width;
        }
    }

    /// Draw a word glyph by glyph with sub-point scatter, returning the new
    /// horizontal position.
    fn draw_scattered_word(&mut self, word: &str, x: f32, y: f32, size: f32, color: Color) -> f32 {
        let resource = self.font.resource_name().to_string();
        let mut pen_x = x;
        for ch in word.chars() {
            let (dx, dy) = self.sampler.glyph_scatter();
            let slack = self.sampler.glyph_advance_slack();
            let advance = self.font.metrics().char_width(ch, size);
            let operand = self.font.show_operand(&ch.to_string());
            self.content()
                .extend(show_text(pen_x + dx, y + dy, &resource, size, color, operand, false));
            pen_x += advance + slack;
        }
        pen_x
    }

    /// Paint background and furniture for every page. Runs after layout so
    /// footer page counts are exact.
    fn finalize(mut self) -> Vec<Page> {
        let total = self.pages.len();
        debug!("Layout complete: {total} pages");
        for (index, page) in self.pages.iter_mut().enumerate() {
            paint_background(
                &mut page.decor,
                self.settings.page_style,
                &self.geometry,
                self.settings.line_spacing,
                &mut self.decor_rng,
            );
            paint_furniture(
                &mut page.decor,
                self.settings,
                &self.geometry,
                self.font,
                index + 1,
                total,
            );
        }
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Object;
    use rand::SeedableRng;

    fn layout(text: &str, settings: &Settings, seed: u64) -> Vec<Page> {
        let settings = settings.clone().normalized();
        let catalog = FontCatalog::new();
        let sampler = Sampler::seeded(&settings, seed);
        let decor_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        LayoutEngine::new(&settings, &catalog, sampler, decor_rng).run(text)
    }

    /// Absolute y operands of every Td in the content stream
    fn baselines(pages: &[Page]) -> Vec<f32> {
        pages
            .iter()
            .flat_map(|page| &page.content)
            .filter(|op| op.operator == "Td")
            .filter_map(|op| match op.operands[1] {
                Object::Real(y) => Some(y),
                Object::Integer(y) => Some(y as f32),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_short_assignment_fits_one_page() {
        let pages = layout(
            "ASSIGNMENT 1\nName: Jane\n1. What is 2+2?\nAns: 4",
            &Settings::default(),
            7,
        );
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].content.is_empty());
        assert!(!pages[0].decor.is_empty());
    }

    #[test]
    fn test_long_answer_spans_pages_with_decor_each() {
        let word = "lorem ";
        let body = word.repeat(2000);
        let settings = Settings {
            margin_rule: true,
            ..Default::default()
        };
        let pages = layout(&body, &settings, 3);
        assert!(pages.len() > 1, "2000 words should overflow one A4 page");
        for page in &pages {
            assert!(
                page.decor.iter().any(|op| op.operator == "re"),
                "every page gets its own background"
            );
            assert!(
                page.decor.iter().any(|op| op.operator == "m"),
                "every page gets its own margin rule"
            );
        }
    }

    #[test]
    fn test_no_baseline_below_bottom_margin() {
        let body = "word ".repeat(3000);
        let settings = Settings::default().normalized();
        let pages = layout(&body, &settings, 11);
        let floor = Geometry::from_settings(&settings).margin_bottom - settings.line_spacing;
        for y in baselines(&pages) {
            assert!(y >= floor, "baseline {y} drawn below the page floor {floor}");
        }
    }

    #[test]
    fn test_fixed_seed_reproduces_layout() {
        let text = "ASSIGNMENT 2\n# Theory\n1. Explain gravity.\nAns: Mass attracts mass, and the effect weakens with distance.";
        let settings = Settings {
            word_size_variation: true,
            baseline_shift: true,
            ink_flow: true,
            ..Default::default()
        };
        let a = layout(text, &settings, 21);
        let b = layout(text, &settings, 21);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(format!("{:?}", pa.content), format!("{:?}", pb.content));
            assert_eq!(format!("{:?}", pa.decor), format!("{:?}", pb.decor));
        }
    }

    #[test]
    fn test_question_starts_new_page_when_enabled() {
        let settings = Settings {
            new_question_on_new_page: true,
            ..Default::default()
        };
        let text = "1. First question\nAns: short answer\n2. Second question";
        let pages = layout(text, &settings, 5);
        assert_eq!(pages.len(), 2);

        // The first question is near the top of page one and must not break
        let first_only = layout("1. First question", &settings, 5);
        assert_eq!(first_only.len(), 1);
    }

    #[test]
    fn test_blank_lines_advance_without_marks() {
        let with_gap = layout("Ans: one\n\n\nAns: two", &Settings::default(), 13);
        let without_gap = layout("Ans: one\nAns: two", &Settings::default(), 13);
        let gap_ys = baselines(&with_gap);
        let plain_ys = baselines(&without_gap);
        assert_eq!(gap_ys.len(), plain_ys.len());
        // The second label sits lower when blank lines intervene
        assert!(gap_ys.last().unwrap() < plain_ys.last().unwrap());
    }

    #[test]
    fn test_underlined_heading_emits_stroke() {
        let settings = Settings {
            underline_headings: true,
            ..Default::default()
        };
        let pages = layout("# Observations", &settings, 2);
        assert!(pages[0].content.iter().any(|op| op.operator == "S"));
    }

    #[test]
    fn test_scatter_path_draws_per_glyph() {
        // jitter + spacing variation trigger per-glyph scatter for answers
        let pages = layout("hello", &Settings::default(), 17);
        let glyph_draws = pages[0]
            .content
            .iter()
            .filter(|op| op.operator == "Tj")
            .count();
        assert_eq!(glyph_draws, "hello".chars().count());
    }

    #[test]
    fn test_plain_word_path_without_scatter() {
        let settings = Settings {
            spacing_variation: false,
            ..Default::default()
        };
        let pages = layout("hello world", &settings, 17);
        let word_draws = pages[0]
            .content
            .iter()
            .filter(|op| op.operator == "Tj")
            .count();
        assert_eq!(word_draws, 2);
    }
}

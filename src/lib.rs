//! A handwritten-style document generator for PDFs built on lopdf
//!
//! scrawl turns plain text into a paginated PDF that looks hand-written:
//! each input line is classified into a semantic role (title, name, question,
//! answer, ...), laid out across pages with margins and word wrapping, and
//! perturbed with controlled randomness (jitter, ink drift, baseline shift,
//! ink flow) to simulate natural handwriting.
//!
//! The caller owns everything around the core: font loading (register fonts
//! once in a [`FontCatalog`]), storage of the produced document, and any
//! raster export.

use lopdf::Document;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

mod constants;
mod decor;
mod layout;
mod page;
mod realism;

pub mod classify;
pub mod error;
pub mod font;
pub mod settings;
pub mod text;

pub use classify::{Role, classify, preview_classification};
pub use error::{Result, ScrawlError};
#[cfg(feature = "ttf-parser")]
pub use font::TtfFontMetrics;
pub use font::{FontCatalog, FontMetrics, RatioMetrics};
pub use settings::{Color, PageSize, PageStyle, Settings};

use layout::LayoutEngine;
use page::Geometry;
use realism::Sampler;

/// Generate a handwritten document from plain text.
///
/// Settings are normalized first (out-of-range values clamped, malformed
/// colors already replaced at construction), so invalid settings degrade
/// instead of failing. Realism randomness is drawn from OS entropy: two
/// generations of the same input are structurally identical but visually
/// different.
#[instrument(skip_all, fields(text_len = text.len()))]
pub fn generate(text: &str, settings: &Settings, catalog: &FontCatalog) -> Result<Document> {
    let settings = settings.clone().normalized();
    let sampler = Sampler::new(&settings);
    render(text, &settings, catalog, sampler, StdRng::from_os_rng())
}

/// Generate with a fixed seed; identical inputs and seed produce an
/// identical document. Intended for tests and reproducible output.
#[instrument(skip_all, fields(text_len = text.len(), seed))]
pub fn generate_seeded(
    text: &str,
    settings: &Settings,
    catalog: &FontCatalog,
    seed: u64,
) -> Result<Document> {
    let settings = settings.clone().normalized();
    let sampler = Sampler::seeded(&settings, seed);
    // Texture randomness gets its own stream so it cannot shift layout
    let decor_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    render(text, &settings, catalog, sampler, decor_rng)
}

fn render(
    text: &str,
    settings: &Settings,
    catalog: &FontCatalog,
    sampler: Sampler,
    decor_rng: StdRng,
) -> Result<Document> {
    let pages = LayoutEngine::new(settings, catalog, sampler, decor_rng).run(text);
    debug!("Rendered {} pages", pages.len());
    let geometry = Geometry::from_settings(settings);
    page::write_document(pages, &geometry, catalog, settings.signature.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_basic_document() {
        let catalog = FontCatalog::new();
        let doc = generate_seeded(
            "ASSIGNMENT 1\nName: Jane\n1. What is 2+2?\nAns: 4",
            &Settings::default(),
            &catalog,
            42,
        )
        .unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_generate_multi_page_document() {
        let catalog = FontCatalog::new();
        let body = "lorem ".repeat(2000);
        let doc = generate_seeded(&body, &Settings::default(), &catalog, 1).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_invalid_settings_still_generate() {
        let catalog = FontCatalog::new();
        let settings = Settings {
            font_size: 999.0,
            font: "NoSuchFont".to_string(),
            ..Default::default()
        }
        .with_ink_hex("red");
        let doc = generate_seeded("Ans: fine", &settings, &catalog, 2).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_preview_matches_generate_classification() {
        let preview = preview_classification("ASSIGNMENT\nAns: 4");
        assert_eq!(preview[0].0, Role::Title);
        assert_eq!(preview[1].0, Role::AnswerLabel);
    }
}

//! Greedy word wrapping against measured text widths

use tracing::trace;

use crate::constants::WRAP_HEADROOM;
use crate::font::FontMetrics;

/// Break one logical line of content into display lines.
///
/// Words are accumulated greedily and flushed when the candidate line would
/// exceed `max_width * WRAP_HEADROOM`; the headroom absorbs the word-size
/// variation and horizontal jitter applied during drawing. A single word
/// wider than the limit is placed alone on its own line, never split.
/// Empty content yields exactly one empty display line so blank content
/// still advances the cursor.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    max_width: f32,
    metrics: &dyn FontMetrics,
) -> Vec<String> {
    let limit = max_width * WRAP_HEADROOM;
    let space_width = metrics.char_width(' ', font_size);

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width: f32 = 0.0;

    for word in text.split_whitespace() {
        let word_width = metrics.text_width(word, font_size);

        if !current_line.is_empty() && current_width + space_width + word_width > limit {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0.0;
        }

        if current_line.is_empty() {
            current_line.push_str(word);
            current_width = word_width;
        } else {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += space_width + word_width;
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(current_line);
    }

    trace!("Wrapped content into {} display lines", lines.len());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::RatioMetrics;

    fn metrics() -> RatioMetrics {
        RatioMetrics::default()
    }

    #[test]
    fn test_empty_content_yields_one_empty_line() {
        let lines = wrap_text("", 10.0, 100.0, &metrics());
        assert_eq!(lines, vec![String::new()]);

        let lines = wrap_text("   ", 10.0, 100.0, &metrics());
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_words_are_preserved_in_order() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let lines = wrap_text(text, 10.0, 120.0, &metrics());
        assert!(lines.len() > 1);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_lines_respect_headroom() {
        // char width = 5pt at size 10; limit = 200 * 0.85 = 170
        let text = "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj";
        let lines = wrap_text(text, 10.0, 200.0, &metrics());
        let m = metrics();
        for line in &lines {
            assert!(
                m.text_width(line, 10.0) <= 200.0,
                "line {line:?} exceeds max width"
            );
        }
    }

    #[test]
    fn test_overlong_word_is_not_split() {
        let text = "short supercalifragilisticexpialidocious short";
        let lines = wrap_text(text, 10.0, 80.0, &metrics());
        assert!(lines.contains(&"supercalifragilisticexpialidocious".to_string()));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_single_word_fits() {
        let lines = wrap_text("hello", 10.0, 200.0, &metrics());
        assert_eq!(lines, vec!["hello".to_string()]);
    }
}

//! Semantic classification of input lines
//!
//! Each raw input line is assigned exactly one role, once, before layout
//! begins. Drawing routines dispatch on the role and never reclassify.

/// Semantic role of one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Empty,
    Title,
    Name,
    Id,
    Date,
    Subject,
    Question,
    Heading,
    AnswerLabel,
    Answer,
}

impl Role {
    /// Stable lowercase tag, e.g. for preview serialization
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Title => "title",
            Self::Name => "name",
            Self::Id => "id",
            Self::Date => "date",
            Self::Subject => "subject",
            Self::Question => "question",
            Self::Heading => "heading",
            Self::AnswerLabel => "answer_label",
            Self::Answer => "answer",
        }
    }
}

const TITLE_KEYWORDS: &[&str] = &["HOME ASSIGNMENT", "ASSIGNMENT", "HOMEWORK"];
const NAME_PREFIXES: &[&str] = &["STUDENT NAME", "NAME"];
const ID_PREFIXES: &[&str] = &["ROLL NO", "STUDENT ID", "REG", "ID"];
const DATE_PREFIXES: &[&str] = &["SUBMITTED ON", "DATE"];
const SUBJECT_PREFIXES: &[&str] = &["SUBJECT", "COURSE", "CLASS"];

/// Classify a raw input line into a role plus cleaned content.
///
/// Rules are evaluated in a fixed priority order and the first match wins.
/// The returned content is the trimmed line; only headings have their `#`
/// marker stripped.
pub fn classify(line: &str) -> (Role, String) {
    let stripped = line.trim();
    if stripped.is_empty() {
        return (Role::Empty, stripped.to_string());
    }

    let upper = stripped.to_uppercase();
    if TITLE_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
        return (Role::Title, stripped.to_string());
    }
    if has_field_prefix(&upper, NAME_PREFIXES) {
        return (Role::Name, stripped.to_string());
    }
    if has_field_prefix(&upper, ID_PREFIXES) {
        return (Role::Id, stripped.to_string());
    }
    if has_field_prefix(&upper, DATE_PREFIXES) {
        return (Role::Date, stripped.to_string());
    }
    if has_field_prefix(&upper, SUBJECT_PREFIXES) {
        return (Role::Subject, stripped.to_string());
    }
    if is_numbered_item(stripped) || is_question_marker(&upper) {
        return (Role::Question, stripped.to_string());
    }
    if is_answer_label(&upper) {
        return (Role::AnswerLabel, stripped.to_string());
    }
    if stripped.starts_with('#') {
        let content = stripped.trim_start_matches('#').trim();
        return (Role::Heading, content.to_string());
    }

    (Role::Answer, stripped.to_string())
}

/// Classify every line of a text for UI preview, without rendering.
pub fn preview_classification(text: &str) -> Vec<(Role, String)> {
    text.lines().map(classify).collect()
}

/// Field prefix followed by optional whitespace and a `:` or `.` separator.
/// `upper` must already be uppercased.
fn has_field_prefix(upper: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        upper
            .strip_prefix(prefix)
            .is_some_and(|rest| matches!(rest.trim_start().chars().next(), Some(':' | '.')))
    })
}

/// Numeric list marker: digits, `.` or `)`, then at least one space
fn is_numbered_item(stripped: &str) -> bool {
    let digits: usize = stripped.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return false;
    }
    let rest = &stripped[digits..];
    let mut chars = rest.chars();
    matches!(chars.next(), Some('.' | ')')) && matches!(chars.next(), Some(c) if c.is_whitespace())
}

/// `Q<n>` or `Question <n>` marker at the start of the line
fn is_question_marker(upper: &str) -> bool {
    if let Some(rest) = upper.strip_prefix('Q') {
        if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return true;
        }
    }
    upper
        .strip_prefix("QUESTION")
        .and_then(|rest| rest.strip_prefix(char::is_whitespace))
        .is_some_and(|rest| {
            rest.trim_start()
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
}

/// `Ans`, `Answer`, or bare `A` followed by `:`, `.`, or `)`
fn is_answer_label(upper: &str) -> bool {
    ["ANSWER", "ANS", "A"].iter().any(|prefix| {
        upper
            .strip_prefix(prefix)
            .is_some_and(|rest| matches!(rest.trim_start().chars().next(), Some(':' | '.' | ')')))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_empty() {
        assert_eq!(classify("").0, Role::Empty);
        assert_eq!(classify("   \t ").0, Role::Empty);
    }

    #[test]
    fn test_title_containment_any_case() {
        assert_eq!(classify("Home Assignment 3").0, Role::Title);
        assert_eq!(classify("physics homework").0, Role::Title);
        assert_eq!(classify("ASSIGNMENT").0, Role::Title);
    }

    #[test]
    fn test_field_prefixes() {
        assert_eq!(classify("Name: Jane Doe").0, Role::Name);
        assert_eq!(classify("student name. Jane").0, Role::Name);
        assert_eq!(classify("Roll No: 42").0, Role::Id);
        assert_eq!(classify("REG: 2024-17").0, Role::Id);
        assert_eq!(classify("Date: 2026-08-28").0, Role::Date);
        assert_eq!(classify("Submitted on: Friday").0, Role::Date);
        assert_eq!(classify("Subject: Chemistry").0, Role::Subject);
        assert_eq!(classify("Course : CS101").0, Role::Subject);
    }

    #[test]
    fn test_prefix_requires_separator() {
        // "Identify" starts with ID but has no separator
        assert_eq!(classify("Identify the parts of a cell").0, Role::Answer);
        assert_eq!(classify("Name of the experiment was lost").0, Role::Answer);
    }

    #[test]
    fn test_question_markers() {
        assert_eq!(classify("1. What is 2+2?").0, Role::Question);
        assert_eq!(classify("12) Define osmosis").0, Role::Question);
        assert_eq!(classify("Q3 Define osmosis").0, Role::Question);
        assert_eq!(classify("question 4: why?").0, Role::Question);
        // Marker needs trailing whitespace after the separator
        assert_eq!(classify("3.14 is pi").0, Role::Answer);
    }

    #[test]
    fn test_answer_labels() {
        assert_eq!(classify("Ans: 4").0, Role::AnswerLabel);
        assert_eq!(classify("Answer. It depends").0, Role::AnswerLabel);
        assert_eq!(classify("A) Mitochondria").0, Role::AnswerLabel);
    }

    #[test]
    fn test_heading_marker_is_stripped() {
        let (role, content) = classify("## Observations ");
        assert_eq!(role, Role::Heading);
        assert_eq!(content, "Observations");
    }

    #[test]
    fn test_content_is_trimmed_marker_retained() {
        let (role, content) = classify("  Ans: 4  ");
        assert_eq!(role, Role::AnswerLabel);
        assert_eq!(content, "Ans: 4");
    }

    #[test]
    fn test_whitespace_never_changes_role() {
        let samples = [
            "Assignment 1",
            "Name: Jane",
            "1. What is 2+2?",
            "Ans: 4",
            "# Notes",
            "plain body text",
        ];
        for s in samples {
            let padded = format!("   {s}\t ");
            assert_eq!(classify(s).0, classify(&padded).0, "role changed for {s:?}");
        }
    }

    #[test]
    fn test_scenario_roles() {
        let roles: Vec<Role> = preview_classification("ASSIGNMENT 1\nName: Jane\n1. What is 2+2?\nAns: 4")
            .into_iter()
            .map(|(role, _)| role)
            .collect();
        assert_eq!(
            roles,
            vec![Role::Title, Role::Name, Role::Question, Role::AnswerLabel]
        );
    }
}

use regex::Regex;
use std::sync::LazyLock;

static NON_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]+").expect("valid filename regex"));
static DASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid dash regex"));

/// Filesystem-safe stem for a lesson title: lowercase, runs of anything
/// outside `[a-z0-9_-]` collapsed to one `-`, no leading or trailing `-`.
pub fn safe_filename(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let dashed = NON_FILENAME.replace_all(&lowered, "-");
    let collapsed = DASH_RUN.replace_all(&dashed, "-");
    let trimmed = collapsed.trim_matches('-');

    if trimmed.is_empty() {
        String::from("lesson")
    } else {
        trimmed.to_string()
    }
}

// "hands-on lab" -> "Hands-On Lab"
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_punctuation_and_spaces() {
        assert_eq!(safe_filename("  Intro to Rust: Part 1! "), "intro-to-rust-part-1");
        assert_eq!(safe_filename("a -- b"), "a-b");
        assert_eq!(safe_filename("keep_under_scores"), "keep_under_scores");
    }

    #[test]
    fn empty_titles_fall_back_to_lesson() {
        assert_eq!(safe_filename(""), "lesson");
        assert_eq!(safe_filename("???"), "lesson");
    }

    #[test]
    fn non_ascii_letters_become_dashes() {
        assert_eq!(safe_filename("Café Basics"), "caf-basics");
    }

    #[test]
    fn title_case_capitalises_each_word() {
        assert_eq!(title_case("coding"), "Coding");
        assert_eq!(title_case("hands-on LAB"), "Hands-On Lab");
        assert_eq!(title_case(""), "");
    }
}

use std::path::Path;

use crate::foundation::error::{TitlerError, TitlerResult};

/// Words kept lowercase by title-casing unless they open or close the title.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "if", "in", "nor", "of", "on", "or", "so",
    "the", "to", "up", "yet",
];

/// A title split into its two banner lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitTitle {
    pub top: String,
    pub bottom: String,
}

/// Resolve the banner title: an explicit title wins unchanged; otherwise the
/// file stem is turned into a title by replacing `separator` with spaces and
/// title-casing the words. Returns `None` when neither input is available.
pub fn resolve_title(
    explicit: Option<&str>,
    path: Option<&Path>,
    separator: char,
) -> Option<String> {
    if let Some(t) = explicit {
        return Some(t.to_string());
    }
    let stem = path?.file_stem()?.to_str()?;
    Some(title_case(&stem.replace(separator, " ")))
}

/// Apply standard title-casing: every word gets a leading capital except minor
/// words ("a", "the", "of", ...) in interior positions, which are lowercased.
pub fn title_case(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let last = words.len().saturating_sub(1);

    let mut out = String::with_capacity(text.len());
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let lower = word.to_lowercase();
        if i != 0 && i != last && MINOR_WORDS.contains(&lower.as_str()) {
            out.push_str(&lower);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// Split a title at the space nearest its midpoint.
///
/// Starting from the middle character, probe outward alternating right and
/// left (+1, -2, +3, -4, ...) until a whitespace character is found. The scan
/// is bounded by the string length; a title with no whitespace fails with
/// [`TitlerError::UnsplittableTitle`] instead of probing out of range forever.
pub fn split_by_nearest_middle_space(title: &str) -> TitlerResult<SplitTitle> {
    let chars: Vec<char> = title.chars().collect();
    let len = chars.len() as isize;
    if len == 0 {
        return Err(TitlerError::unsplittable_title("title is empty"));
    }

    let mut index = len / 2;
    let mut n: isize = 1;
    loop {
        if index >= 0 && index < len && chars[index as usize].is_whitespace() {
            let top: String = chars[..index as usize].iter().collect();
            let bottom: String = chars[index as usize + 1..].iter().collect();
            if top.is_empty() || bottom.is_empty() {
                return Err(TitlerError::unsplittable_title(format!(
                    "splitting '{title}' would leave an empty line"
                )));
            }
            return Ok(SplitTitle { top, bottom });
        }
        if n > len {
            return Err(TitlerError::unsplittable_title(format!(
                "'{title}' has no space to split on"
            )));
        }
        // Alternating outward probe: +1, -2, +3, -4, ...
        index += if n % 2 == 1 { n } else { -n };
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_title_passes_through_unchanged() {
        let title = resolve_title(Some("How to Loop in Python"), None, '-');
        assert_eq!(title.as_deref(), Some("How to Loop in Python"));
    }

    #[test]
    fn file_name_becomes_title() {
        let title = resolve_title(None, Some(Path::new("how-to-loop-in-python.png")), '-');
        assert_eq!(title.as_deref(), Some("How to Loop in Python"));
    }

    #[test]
    fn custom_separator_is_respected() {
        let title = resolve_title(None, Some(Path::new("how.to.loop.in.python.png")), '.');
        assert_eq!(title.as_deref(), Some("How to Loop in Python"));
    }

    #[test]
    fn both_absent_yields_none() {
        assert_eq!(resolve_title(None, None, '-'), None);
    }

    #[test]
    fn minor_words_capitalize_at_the_edges() {
        assert_eq!(title_case("the best of the rest"), "The Best of the Rest");
        assert_eq!(title_case("a tale of two cities"), "A Tale of Two Cities");
    }

    #[test]
    fn split_middle_space() {
        let split = split_by_nearest_middle_space("Hello World").unwrap();
        assert_eq!(split.top, "Hello");
        assert_eq!(split.bottom, "World");
    }

    #[test]
    fn split_space_left_of_middle() {
        let split = split_by_nearest_middle_space("Split first one").unwrap();
        assert_eq!(split.top, "Split");
        assert_eq!(split.bottom, "first one");
    }

    #[test]
    fn split_space_right_of_middle() {
        let split = split_by_nearest_middle_space("Split last opening").unwrap();
        assert_eq!(split.top, "Split last");
        assert_eq!(split.bottom, "opening");
    }

    #[test]
    fn rejoining_reproduces_the_title() {
        for title in ["Hello World", "Split first one", "Split last opening"] {
            let split = split_by_nearest_middle_space(title).unwrap();
            assert_eq!(format!("{} {}", split.top, split.bottom), title);
        }
    }

    #[test]
    fn single_word_fails_with_unsplittable() {
        let err = split_by_nearest_middle_space("Minimalism").unwrap_err();
        assert!(matches!(err, TitlerError::UnsplittableTitle(_)));
    }

    #[test]
    fn empty_title_fails_with_unsplittable() {
        let err = split_by_nearest_middle_space("").unwrap_err();
        assert!(matches!(err, TitlerError::UnsplittableTitle(_)));
    }
}

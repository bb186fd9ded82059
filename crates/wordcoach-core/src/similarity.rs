//! String similarity primitives used by the speaking scorer.
//!
//! All lengths are counted in `char`s, not bytes, so accented letters and
//! non-Latin scripts compare the same way ASCII does.

/// Canonicalize an utterance or target for comparison.
///
/// Lowercases, drops every character that is not a letter, digit or
/// whitespace, then drops the whitespace too. `"The Dog!"` becomes
/// `"thedog"`. The result is a fixed point: normalizing it again returns it
/// unchanged.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Levenshtein distance between `a` and `b`.
///
/// The table has `len(b) + 1` rows and `len(a) + 1` columns; row 0 and
/// column 0 hold their indices and every other cell is the cheapest of a
/// deletion, an insertion, or a substitution (free on a match).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, cell) in matrix[0].iter_mut().enumerate() {
        *cell = i;
    }
    for (j, row) in matrix.iter_mut().enumerate() {
        row[0] = j;
    }

    for j in 1..=b.len() {
        for i in 1..=a.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[j][i] = (matrix[j][i - 1] + 1)
                .min(matrix[j - 1][i] + 1)
                .min(matrix[j - 1][i - 1] + cost);
        }
    }

    matrix[b.len()][a.len()]
}

/// Whether `a` shares enough letters with `b`.
///
/// Every character of `a` that occurs anywhere in `b` counts once per
/// occurrence in `a`. The count must reach `ratio` of the shorter-scaled
/// length, i.e. `min(len(a) * ratio, len(b) * ratio)`.
pub fn has_letter_overlap(a: &str, b: &str, ratio: f64) -> bool {
    let shared = a.chars().filter(|c| b.contains(*c)).count();
    let a_len = a.chars().count() as f64;
    let b_len = b.chars().count() as f64;
    shared as f64 >= (a_len * ratio).min(b_len * ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_punctuation_and_spaces() {
        assert_eq!(normalize("  The Dog!  "), "thedog");
        assert_eq!(normalize("ice-cream, please."), "icecreamplease");
        assert_eq!(normalize("Route 66"), "route66");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn normalize_keeps_non_ascii_letters() {
        assert_eq!(normalize("Café"), "café");
        assert_eq!(normalize("NAÏVE"), "naïve");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "",
            "Dog",
            "  Hello,   World! ",
            "x_y-z",
            "ÀÉÎÕÜ ß",
            "İstanbul",
            "123 go!",
            "\u{200b}zero width",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn edit_distance_known_values() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("dawg", "dog"), 2);
        assert_eq!(edit_distance("", "dog"), 3);
        assert_eq!(edit_distance("dog", ""), 3);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn edit_distance_identity_and_symmetry() {
        let words = ["", "a", "dog", "dawg", "banana", "bandana", "café", "cafe"];
        for a in words {
            assert_eq!(edit_distance(a, a), 0);
            for b in words {
                assert_eq!(edit_distance(a, b), edit_distance(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn edit_distance_bounded_by_longer_length() {
        let pairs = [("abc", "xyz"), ("short", "muchlonger"), ("", "abcd"), ("aaaa", "b")];
        for (a, b) in pairs {
            let bound = a.chars().count().max(b.chars().count());
            assert!(edit_distance(a, b) <= bound);
        }
    }

    #[test]
    fn edit_distance_counts_chars_not_bytes() {
        assert_eq!(edit_distance("café", "cafe"), 1);
    }

    #[test]
    fn letter_overlap_cat_cot() {
        assert!(has_letter_overlap("cat", "cot", 0.4));
    }

    #[test]
    fn letter_overlap_counts_repeats_in_first_string() {
        // 'a' appears three times in "banana" and counts each time.
        assert!(has_letter_overlap("banana", "a", 0.4));
        assert!(!has_letter_overlap("xyz123", "dog", 0.4));
    }

    #[test]
    fn letter_overlap_against_empty_target_is_trivially_met() {
        assert!(has_letter_overlap("dog", "", 0.4));
    }
}

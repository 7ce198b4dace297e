//! Text cleanup applied before linguistic analysis.

/// Variation selector 16, left behind when emoji are split.
const VARIATION_SELECTOR: char = '\u{FE0F}';
/// Zero-width joiner, left behind when emoji sequences are split.
const ZERO_WIDTH_JOINER: char = '\u{200D}';

/// Strip wikilink brackets, whitespace controls and task checkboxes.
///
/// Steps, in order: remove `[[` and `]]`, turn `\n` and `\t` into spaces,
/// remove `[ ]` and `[x]`.
#[must_use]
pub fn normalize_note_text(text: &str) -> String {
    text.replace("[[", "")
        .replace("]]", "")
        .replace(['\n', '\t'], " ")
        .replace("[ ]", "")
        .replace("[x]", "")
}

/// Whether `item` is a lone invisible joiner character.
#[must_use]
pub fn is_joiner_only(item: &str) -> bool {
    let mut chars = item.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(VARIATION_SELECTOR | ZERO_WIDTH_JOINER), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_markup() {
        let raw = "- [ ] call [[Anna]]\n- [x] done\twell";
        assert_eq!(normalize_note_text(raw), "-  call Anna -  done well");
    }

    #[test]
    fn test_joiner_detection() {
        assert!(is_joiner_only("\u{FE0F}"));
        assert!(is_joiner_only("\u{200D}"));
        assert!(!is_joiner_only("\u{FE0F}\u{FE0F}"));
        assert!(!is_joiner_only("☀️"));
        assert!(!is_joiner_only(""));
    }
}

use super::*;

#[test]
fn wraps_greedily_at_width() {
    let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
    assert!(lines.iter().all(|l| l.chars().count() <= 10));
}

#[test]
fn collapses_whitespace_and_newlines() {
    assert_eq!(wrap_text("  a \n\n b\tc  ", 30), vec!["a b c"]);
    assert!(wrap_text("   ", 30).is_empty());
    assert!(wrap_text("", 30).is_empty());
}

#[test]
fn breaks_words_longer_than_width() {
    assert_eq!(wrap_text("ab abcdefghij", 4), vec!["ab", "abcd", "efgh", "ij"]);
}

#[test]
fn counts_chars_not_bytes() {
    let lines = wrap_text("ééééé ééééé", 5);
    assert_eq!(lines, vec!["ééééé", "ééééé"]);
}

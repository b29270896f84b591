// crates/refsuggest-core/src/text.rs

//! Text folding shared by matching, prefix checks and country scoping.

/// Convert a string into a folded key suitable for comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Łódź` -> `Lodz`)
/// 2\) Normalize to lowercase
///
/// ```rust
/// use refsuggest_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Prepare `s` for matching under the given case policy.
///
/// Case-insensitive matching also folds accents, so `"zurich"` finds
/// `"Zürich"`. Case-sensitive matching leaves the text untouched.
pub fn normalize(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_owned()
    } else {
        fold_key(s)
    }
}

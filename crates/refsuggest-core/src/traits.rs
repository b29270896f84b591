// crates/refsuggest-core/src/traits.rs
use crate::model::SelectionValue;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A canonical record the user can pick from a reference dataset.
///
/// Records are immutable once loaded and compared structurally; there is no
/// surrogate key. Implementors describe which text fields are searchable, how
/// the record renders in the dropdown and in the input after commit, and what
/// payload the hosting form receives.
///
/// # Examples
/// ```rust
/// use refsuggest_core::model::InstitutionRecord;
/// use refsuggest_core::traits::ReferenceRecord;
///
/// let rec = InstitutionRecord::new("Boston University", "US");
/// assert_eq!(rec.field("name"), Some("Boston University"));
/// assert_eq!(rec.list_label(), "Boston University (US)");
/// ```
pub trait ReferenceRecord: Clone + Debug + PartialEq + DeserializeOwned + Send + Sync + 'static {
    /// Short name of the dataset kind, used in logs.
    const KIND: &'static str;

    /// Fields searched when [`crate::search::MatchOptions`] names none.
    const DEFAULT_FIELDS: &'static [&'static str];

    /// Whether searches are restricted to the selected country before scoring.
    const COUNTRY_SCOPED: bool;

    /// Text of a named field, `None` if this record kind has no such field.
    fn field(&self, name: &str) -> Option<&str>;

    /// Country the record belongs to (ISO code or display name, as stored).
    fn country(&self) -> &str;

    /// Text written back into the input once this record is committed.
    fn display_text(&self) -> String;

    /// Text of the dropdown row for this record.
    fn list_label(&self) -> String;

    /// Normalized payload reported to the hosting form.
    fn to_value(&self) -> SelectionValue;
}

// crates/refsuggest-core/src/model/mod.rs

//! # Reference Records
//!
//! The two dataset shapes the engine knows about (institutions and postal
//! locations) plus the payload reported to the hosting form.

mod institution;
mod location;

pub use institution::InstitutionRecord;
pub use location::LocationRecord;

use serde::{Deserialize, Deserializer, Serialize};

/// Value handed to the hosting form when a suggestion is committed.
///
/// Serializes untagged: an institution commits as its plain name, a location
/// as `{ "zip", "city", "state", "country" }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SelectionValue {
    Text(String),
    Location(LocationRecord),
}

impl SelectionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SelectionValue::Text(s) => Some(s),
            SelectionValue::Location(_) => None,
        }
    }

    pub fn as_location(&self) -> Option<&LocationRecord> {
        match self {
            SelectionValue::Location(l) => Some(l),
            SelectionValue::Text(_) => None,
        }
    }
}

/// Accepts a string, a number, a bool or `null` and yields a `String`.
///
/// Source datasets are hand-assembled; postal codes in particular show up as
/// JSON numbers in some shards.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
        Bool(bool),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => s,
        Some(Raw::Num(n)) => n.to_string(),
        Some(Raw::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}

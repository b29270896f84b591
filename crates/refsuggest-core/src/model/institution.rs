// crates/refsuggest-core/src/model/institution.rs
use super::{lenient_string, SelectionValue};
use crate::traits::ReferenceRecord;
use serde::{Deserialize, Serialize};

/// A college / university entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstitutionRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
}

impl InstitutionRecord {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }
}

impl ReferenceRecord for InstitutionRecord {
    const KIND: &'static str = "institution";
    const DEFAULT_FIELDS: &'static [&'static str] = &["name"];
    const COUNTRY_SCOPED: bool = false;

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "country" => Some(&self.country),
            _ => None,
        }
    }

    fn country(&self) -> &str {
        &self.country
    }

    fn display_text(&self) -> String {
        self.name.clone()
    }

    fn list_label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.country)
        }
    }

    fn to_value(&self) -> SelectionValue {
        SelectionValue::Text(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_missing_country() {
        let rec: InstitutionRecord = serde_json::from_str(r#"{"name":"MIT"}"#).unwrap();
        assert_eq!(rec, InstitutionRecord::new("MIT", ""));
        assert_eq!(rec.list_label(), "MIT");
    }

    #[test]
    fn commits_plain_name() {
        let rec = InstitutionRecord::new("Boston University", "US");
        assert_eq!(rec.to_value(), SelectionValue::Text("Boston University".into()));
        assert_eq!(rec.display_text(), "Boston University");
    }
}

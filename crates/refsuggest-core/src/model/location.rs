// crates/refsuggest-core/src/model/location.rs
use super::{lenient_string, SelectionValue};
use crate::traits::ReferenceRecord;
use serde::{Deserialize, Serialize};

/// A postal code / city entry.
///
/// On the wire the postal code is `zip`; `postalCode` and `postal_code` are
/// accepted when decoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(
        rename = "zip",
        alias = "postalCode",
        alias = "postal_code",
        default,
        deserialize_with = "lenient_string"
    )]
    pub postal_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
}

impl LocationRecord {
    pub fn new(
        postal_code: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            postal_code: postal_code.into(),
            city: city.into(),
            state: state.into(),
            country: country.into(),
        }
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

impl ReferenceRecord for LocationRecord {
    const KIND: &'static str = "location";
    const DEFAULT_FIELDS: &'static [&'static str] = &["zip", "city"];
    const COUNTRY_SCOPED: bool = true;

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "zip" | "postalCode" | "postal_code" => Some(&self.postal_code),
            "city" => Some(&self.city),
            "state" => Some(&self.state),
            "country" => Some(&self.country),
            _ => None,
        }
    }

    fn country(&self) -> &str {
        &self.country
    }

    fn display_text(&self) -> String {
        format!(
            "{} – {}, {}, {}",
            self.postal_code, self.city, self.state, self.country
        )
    }

    fn list_label(&self) -> String {
        format!(
            "{} – {}, {}, {}",
            or_placeholder(&self.postal_code, "no-zip"),
            or_placeholder(&self.city, "no-city"),
            or_placeholder(&self.state, "no-state"),
            or_placeholder(&self.country, "no-country"),
        )
    }

    fn to_value(&self) -> SelectionValue {
        SelectionValue::Location(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_zip_and_alias_keys_decode() {
        let a: LocationRecord =
            serde_json::from_str(r#"{"zip":94105,"city":"San Francisco","state":"CA","country":"US"}"#)
                .unwrap();
        let b: LocationRecord = serde_json::from_str(
            r#"{"postalCode":"94105","city":"San Francisco","state":"CA","country":"US"}"#,
        )
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.postal_code, "94105");
    }

    #[test]
    fn null_and_missing_fields_become_empty() {
        let rec: LocationRecord = serde_json::from_str(r#"{"zip":null,"city":"Paris"}"#).unwrap();
        assert_eq!(rec, LocationRecord::new("", "Paris", "", ""));
        assert_eq!(rec.list_label(), "no-zip – Paris, no-state, no-country");
    }

    #[test]
    fn serializes_with_zip_key() {
        let rec = LocationRecord::new("75001", "Paris", "IDF", "FR");
        let json = serde_json::to_value(rec.to_value()).unwrap();
        assert_eq!(json["zip"], "75001");
        assert_eq!(json["city"], "Paris");
    }
}

use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// Raw configuration document as served by the agent. Its shape is defined by the configuration
/// profile; for flag profiles every value is a [`FlagDefinition`].
pub type ConfigurationDocument = serde_json::Map<String, serde_json::Value>;

/// Flags keyed by flag key, each value exactly as the agent sent it.
pub type MultiFlag = serde_json::Map<String, serde_json::Value>;

/// Extra flag attributes beyond `enabled` and `customers`.
pub type Attributes = HashMap<String, AttributeValue>;

/// A value of a flag attribute.
///
/// Conveniently implements `From` conversions for the supported value kinds.
///
/// ```
/// # use appconfig_flags::AttributeValue;
/// let tier: AttributeValue = "gold".into();
/// let limit: AttributeValue = serde_json::Number::from(25).into();
/// let regions: AttributeValue = vec!["eu".to_owned(), "us".to_owned()].into();
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, From, Clone)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A boolean value.
    Boolean(bool),
    /// A numerical value. Integers stay integers.
    Number(serde_json::Number),
    /// A string value.
    String(String),
    /// A list of strings.
    StringList(Vec<String>),
    /// A list of numbers.
    NumberList(Vec<serde_json::Number>),
    /// Any other JSON value (`null`, objects, mixed lists), kept as sent.
    Json(serde_json::Value),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// A flag as stored inside a configuration document or returned for a single `?flag=` request:
/// `enabled`, an optional customer allow-list, and any other attributes at the top level.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct FlagDefinition {
    pub enabled: bool,
    /// Allow-list of customer identifiers. `None` (or an empty list) means the flag applies to
    /// everyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<Vec<String>>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl FlagDefinition {
    /// Attach the flag key, producing the canonical [`Flag`] shape.
    pub fn into_flag(self, key: impl Into<String>) -> Flag {
        Flag {
            key: key.into(),
            enabled: self.enabled,
            customers: self.customers,
            attributes: (!self.attributes.is_empty()).then_some(self.attributes),
        }
    }
}

/// Canonical feature flag.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    pub key: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<Vec<String>>,
    /// `None` when the flag carries no extra attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

/// Per-request attributes used to refine a flag's enabled state.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    pub customer_id: String,
}

impl EvaluationContext {
    pub fn new(customer_id: impl Into<String>) -> Self {
        EvaluationContext {
            customer_id: customer_id.into(),
        }
    }
}

/// Find `key` in a configuration document. Returns `None` if the key is missing or its value is
/// not a valid flag definition.
pub(crate) fn find_flag(mut document: ConfigurationDocument, key: &str) -> Option<Flag> {
    let value = document.remove(key)?;
    match serde_json::from_value::<FlagDefinition>(value) {
        Ok(definition) => Some(definition.into_flag(key)),
        Err(err) => {
            log::warn!(target: "appconfig", flag_key = key; "malformed flag definition: {:?}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::BufReader};

    use super::{
        find_flag, AttributeValue, ConfigurationDocument, EvaluationContext, Flag, FlagDefinition,
    };

    fn document(json: &str) -> ConfigurationDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parse_fixture_document() {
        let f = File::open("tests/data/flags.json")
            .expect("Failed to open tests/data/flags.json");
        let document: ConfigurationDocument = serde_json::from_reader(BufReader::new(f)).unwrap();

        assert!(find_flag(document.clone(), "feature_flag_enabled").unwrap().enabled);
        assert_eq!(
            find_flag(document.clone(), "feature_flag_enabled_with_customers")
                .unwrap()
                .customers,
            Some(vec!["CUSTOMER1".to_owned(), "CUSTOMER2".to_owned()])
        );
        assert!(!find_flag(document, "feature_flag_disabled").unwrap().enabled);
    }

    #[test]
    fn untyped_attributes_are_kept_as_sent() {
        let doc = document(
            r#"{
                "nested": { "enabled": true, "meta": { "x": 1 } },
                "nullable": { "enabled": true, "note": null },
                "mixed": { "enabled": false, "values": [1, "a"] }
            }"#,
        );

        let nested = find_flag(doc.clone(), "nested").unwrap();
        assert!(nested.enabled);
        assert_eq!(
            nested.attributes.unwrap()["meta"],
            AttributeValue::Json(serde_json::json!({ "x": 1 }))
        );

        let nullable = find_flag(doc.clone(), "nullable").unwrap();
        assert_eq!(
            nullable.attributes.unwrap()["note"],
            AttributeValue::Json(serde_json::Value::Null)
        );

        let mixed = find_flag(doc, "mixed").unwrap();
        assert_eq!(
            serde_json::to_value(&mixed.attributes.unwrap()["values"]).unwrap(),
            serde_json::json!([1, "a"])
        );
    }

    #[test]
    fn integer_attributes_stay_integers() {
        let definition: FlagDefinition =
            serde_json::from_str(r#"{ "enabled": true, "limit": 25, "ratio": 0.5 }"#).unwrap();

        assert_eq!(
            serde_json::to_string(&definition.attributes["limit"]).unwrap(),
            "25"
        );
        assert_eq!(
            serde_json::to_string(&definition.attributes["ratio"]).unwrap(),
            "0.5"
        );
    }

    #[test]
    fn extra_fields_become_typed_attributes() {
        let definition: FlagDefinition = serde_json::from_str(
            r#"{
                "enabled": true,
                "customers": ["C1"],
                "tier": "gold",
                "limit": 25,
                "beta": false,
                "regions": ["eu", "us"],
                "weights": [0.5, 1.5]
            }"#,
        )
        .unwrap();

        assert_eq!(definition.customers, Some(vec!["C1".to_owned()]));
        assert_eq!(definition.attributes.len(), 5);
        assert_eq!(definition.attributes["tier"], AttributeValue::from("gold"));
        assert_eq!(
            definition.attributes["limit"],
            AttributeValue::Number(serde_json::Number::from(25))
        );
        assert_eq!(definition.attributes["beta"], AttributeValue::Boolean(false));
        assert_eq!(
            definition.attributes["regions"],
            AttributeValue::StringList(vec!["eu".to_owned(), "us".to_owned()])
        );
        assert_eq!(
            definition.attributes["weights"],
            AttributeValue::NumberList(vec![
                serde_json::Number::from_f64(0.5).unwrap(),
                serde_json::Number::from_f64(1.5).unwrap(),
            ])
        );
    }

    #[test]
    fn into_flag_leaves_attributes_absent_when_empty() {
        let definition: FlagDefinition = serde_json::from_str(r#"{"enabled": false}"#).unwrap();

        assert_eq!(
            definition.into_flag("release"),
            Flag {
                key: "release".to_owned(),
                enabled: false,
                customers: None,
                attributes: None,
            }
        );
    }

    #[test]
    fn flag_serializes_without_absent_fields() {
        let flag = Flag {
            key: "release".to_owned(),
            enabled: true,
            customers: None,
            attributes: None,
        };

        assert_eq!(
            serde_json::to_value(&flag).unwrap(),
            serde_json::json!({ "key": "release", "enabled": true })
        );
    }

    #[test]
    fn find_flag_by_exact_key() {
        let doc = document(r#"{ "release": { "enabled": true }, "Release": { "enabled": false } }"#);

        let flag = find_flag(doc.clone(), "release").unwrap();
        assert_eq!(flag.key, "release");
        assert!(flag.enabled);

        assert!(!find_flag(doc.clone(), "Release").unwrap().enabled);
        assert_eq!(find_flag(doc, "RELEASE"), None);
    }

    #[test]
    fn find_flag_ignores_malformed_entry() {
        let doc = document(r#"{ "release": { "enabled": "yes" } }"#);
        assert_eq!(find_flag(doc, "release"), None);
    }

    #[test]
    fn evaluation_context_uses_camel_case() {
        let context: EvaluationContext =
            serde_json::from_str(r#"{ "customerId": "C000001" }"#).unwrap();
        assert_eq!(context, EvaluationContext::new("C000001"));
    }
}

//! Request schema and validation.
//!
//! The schema is a list of independent field rules. [`validate`] strips
//! unrecognized fields, runs every rule against what is left, and reports all
//! failing fields together, in declaration order.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::types::{Level, NetworkContext};

/// What a recognized field's value must look like.
#[derive(Clone, Copy, Debug)]
enum Rule {
    Text,
    NumberList,
    TextList,
    Date,
    OneOf(&'static [&'static str]),
    /// A string or a number.
    Scalar,
}

struct FieldRule {
    name: &'static str,
    rule: Rule,
    optional: bool,
}

impl FieldRule {
    const fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            optional: false,
        }
    }

    const fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            optional: true,
        }
    }

    fn check(&self, value: Option<&Value>) -> Option<ValidationViolation> {
        let value = value.filter(|value| !is_blank(value));
        match value {
            None if self.optional => None,
            None => Some(ValidationViolation {
                field_name: self.name,
                offending_value: Value::Null,
                constraint: Constraint::Required,
            }),
            Some(value) => check_rule(self.rule, value).map(|constraint| ValidationViolation {
                field_name: self.name,
                offending_value: value.clone(),
                constraint,
            }),
        }
    }
}

const SCHEMA: &[FieldRule] = &[
    FieldRule::required("payerId", Rule::Text),
    FieldRule::required("providerPrices", Rule::NumberList),
    FieldRule::required("serviceTypes", Rule::TextList),
    FieldRule::required("providerFirstName", Rule::Text),
    FieldRule::required("providerLastName", Rule::Text),
    FieldRule::required("providerNpi", Rule::Text),
    FieldRule::required("network", Rule::OneOf(NetworkContext::WIRE_VALUES)),
    FieldRule::optional("memberId", Rule::Text),
    FieldRule::optional("memberFirstName", Rule::Text),
    FieldRule::optional("memberLastName", Rule::Text),
    FieldRule::optional("memberDateOfBirth", Rule::Date),
    FieldRule::optional("level", Rule::OneOf(Level::WIRE_VALUES)),
    FieldRule::optional("placeOfService", Rule::Scalar),
];

/// The constraint a field value failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// A required field is missing, null, or an empty string.
    Required,
    ExpectedString,
    ExpectedArray,
    /// A list holds something other than numbers.
    ExpectedNumber,
    /// A list is empty.
    MinCount,
    ExpectedDate,
    /// The value is not one of the field's enumerated values.
    NotAllowed,
    ExpectedScalar,
}

impl Constraint {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::ExpectedString => "expectedString",
            Constraint::ExpectedArray => "expectedArray",
            Constraint::ExpectedNumber => "expectedNumber",
            Constraint::MinCount => "minCount",
            Constraint::ExpectedDate => "expectedDate",
            Constraint::NotAllowed => "notAllowed",
            Constraint::ExpectedScalar => "expectedScalar",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failing field.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationViolation {
    /// The camelCase field name, e.g. `payerId`.
    pub field_name: &'static str,
    /// The value that failed, `null` when the field was absent.
    pub offending_value: Value,
    pub constraint: Constraint,
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field {} value was {}, expectation from field: {}",
            self.field_name, self.offending_value, self.constraint
        )
    }
}

/// A request that failed the request schema, with every failing field.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationError {
    violations: Vec<ValidationViolation>,
}

impl ValidationError {
    /// The failing fields, in schema declaration order.
    pub fn violations(&self) -> &[ValidationViolation] {
        &self.violations
    }

    /// The violation reported for `field_name`, if that field failed.
    pub fn violation(&self, field_name: &str) -> Option<&ValidationViolation> {
        self.violations
            .iter()
            .find(|violation| violation.field_name == field_name)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request data was at invalid format, the following fields had invalid values:"
        )?;
        for violation in &self.violations {
            write!(f, "\n{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Copies the recognized fields out of a request document, dropping the rest.
///
/// A document that is not a JSON object has no recognized fields.
pub fn clean(document: &Value) -> Map<String, Value> {
    let Some(fields) = document.as_object() else {
        return Map::new();
    };
    fields
        .iter()
        .filter(|(name, _)| SCHEMA.iter().any(|rule| rule.name == name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Validates a camelCase request document against the request schema.
pub fn validate(document: &Value) -> Result<(), ValidationError> {
    let cleaned = clean(document);
    let violations: Vec<ValidationViolation> = SCHEMA
        .iter()
        .filter_map(|rule| rule.check(cleaned.get(rule.name)))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Parses a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn check_rule(rule: Rule, value: &Value) -> Option<Constraint> {
    match rule {
        Rule::Text => (!value.is_string()).then_some(Constraint::ExpectedString),
        Rule::NumberList => check_list(value, Value::is_number, Constraint::ExpectedNumber),
        Rule::TextList => check_list(value, Value::is_string, Constraint::ExpectedString),
        Rule::Date => match value.as_str() {
            Some(text) if parse_date(text).is_some() => None,
            _ => Some(Constraint::ExpectedDate),
        },
        Rule::OneOf(allowed) => match value.as_str() {
            Some(text) if allowed.contains(&text) => None,
            _ => Some(Constraint::NotAllowed),
        },
        Rule::Scalar => {
            (!(value.is_string() || value.is_number())).then_some(Constraint::ExpectedScalar)
        }
    }
}

fn check_list(value: &Value, is_item: fn(&Value) -> bool, item: Constraint) -> Option<Constraint> {
    let Some(items) = value.as_array() else {
        return Some(Constraint::ExpectedArray);
    };
    if items.is_empty() {
        Some(Constraint::MinCount)
    } else if items.iter().all(is_item) {
        None
    } else {
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_document() -> Value {
        json!({
            "payerId": "0001",
            "providerPrices": [250.3, 150.2],
            "serviceTypes": ["1"],
            "providerFirstName": "Big",
            "providerLastName": "Daddy",
            "providerNpi": "8405830571",
            "network": "IN",
            "memberId": "U9843294132",
            "memberFirstName": "Shmoopy",
            "memberLastName": "McDuck",
            "memberDateOfBirth": "1992-01-15",
            "level": "INDIVIDUAL",
            "placeOfService": 11
        })
    }

    fn with_field(name: &str, value: Value) -> Value {
        let mut document = valid_document();
        document[name] = value;
        document
    }

    fn without_field(name: &str) -> Value {
        let mut document = valid_document();
        document.as_object_mut().unwrap().remove(name);
        document
    }

    fn only_violation(document: &Value) -> ValidationViolation {
        let err = validate(document).unwrap_err();
        assert_eq!(err.violations().len(), 1, "violations: {}", err);
        err.violations()[0].clone()
    }

    #[test]
    fn full_document_is_valid() {
        assert!(validate(&valid_document()).is_ok());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut document = valid_document();
        let fields = document.as_object_mut().unwrap();
        for name in [
            "memberId",
            "memberFirstName",
            "memberLastName",
            "memberDateOfBirth",
            "level",
            "placeOfService",
        ] {
            fields.remove(name);
        }
        assert!(validate(&document).is_ok());
    }

    #[test]
    fn optional_fields_may_be_null() {
        let document = with_field("memberDateOfBirth", Value::Null);
        assert!(validate(&with_field("level", Value::Null)).is_ok());
        assert!(validate(&document).is_ok());
    }

    #[test]
    fn missing_payer_id_is_required_and_null() {
        let violation = only_violation(&without_field("payerId"));
        assert_eq!(violation.field_name, "payerId");
        assert_eq!(violation.offending_value, Value::Null);
        assert_eq!(violation.constraint, Constraint::Required);
        assert!(validate(&without_field("payerId"))
            .unwrap_err()
            .to_string()
            .contains("field payerId value was null, expectation from field: required"));
    }

    #[test]
    fn blank_payer_id_counts_as_missing() {
        let violation = only_violation(&with_field("payerId", json!("  ")));
        assert_eq!(violation.constraint, Constraint::Required);
    }

    #[test]
    fn numeric_payer_id_is_not_a_string() {
        let violation = only_violation(&with_field("payerId", json!(1)));
        assert_eq!(violation.constraint, Constraint::ExpectedString);
        assert_eq!(violation.offending_value, json!(1));
    }

    #[test]
    fn missing_provider_prices() {
        let violation = only_violation(&without_field("providerPrices"));
        assert_eq!(violation.field_name, "providerPrices");
        assert_eq!(violation.constraint, Constraint::Required);
    }

    #[test]
    fn scalar_provider_prices_expect_array() {
        let violation = only_violation(&with_field(
            "providerPrices",
            json!("supercalifragilisticexpialidocious!"),
        ));
        assert_eq!(violation.constraint, Constraint::ExpectedArray);
    }

    #[test]
    fn empty_provider_prices() {
        let violation = only_violation(&with_field("providerPrices", json!([])));
        assert_eq!(violation.constraint, Constraint::MinCount);
    }

    #[test]
    fn non_numeric_provider_price() {
        let violation = only_violation(&with_field("providerPrices", json!([100, "cheap"])));
        assert_eq!(violation.constraint, Constraint::ExpectedNumber);
        assert_eq!(violation.offending_value, json!([100, "cheap"]));
    }

    #[test]
    fn service_types_rules() {
        assert_eq!(
            only_violation(&without_field("serviceTypes")).constraint,
            Constraint::Required
        );
        assert_eq!(
            only_violation(&with_field("serviceTypes", json!("1"))).constraint,
            Constraint::ExpectedArray
        );
        assert_eq!(
            only_violation(&with_field("serviceTypes", json!([1, 4]))).constraint,
            Constraint::ExpectedString
        );
    }

    #[test]
    fn missing_provider_details() {
        for name in ["providerFirstName", "providerLastName", "providerNpi"] {
            let violation = only_violation(&without_field(name));
            assert_eq!(violation.field_name, name);
            assert_eq!(violation.constraint, Constraint::Required);
        }
    }

    #[test]
    fn network_rules() {
        assert_eq!(
            only_violation(&without_field("network")).constraint,
            Constraint::Required
        );
        let violation = only_violation(&with_field("network", json!("bogus")));
        assert_eq!(violation.field_name, "network");
        assert_eq!(violation.constraint, Constraint::NotAllowed);
        assert_eq!(
            only_violation(&with_field("network", json!("in"))).constraint,
            Constraint::NotAllowed
        );
    }

    #[test]
    fn member_date_of_birth_rules() {
        let violation = only_violation(&with_field(
            "memberDateOfBirth",
            json!("supercalifragilisticexpialidocious!"),
        ));
        assert_eq!(violation.constraint, Constraint::ExpectedDate);
        assert!(validate(&with_field("memberDateOfBirth", json!("1992-01-15T08:30:00-05:00"))).is_ok());
        assert_eq!(
            only_violation(&with_field("memberDateOfBirth", json!("1992-02-30"))).constraint,
            Constraint::ExpectedDate
        );
    }

    #[test]
    fn level_rules() {
        assert_eq!(
            only_violation(&with_field("level", json!("supercalifragilisticexpialidocious!")))
                .constraint,
            Constraint::NotAllowed
        );
        assert_eq!(
            only_violation(&with_field("level", json!(15))).constraint,
            Constraint::NotAllowed
        );
        assert!(validate(&with_field("level", json!("FAMILY"))).is_ok());
    }

    #[test]
    fn place_of_service_accepts_string_or_number_only() {
        assert!(validate(&with_field("placeOfService", json!("11"))).is_ok());
        assert_eq!(
            only_violation(&with_field("placeOfService", json!([11]))).constraint,
            Constraint::ExpectedScalar
        );
    }

    #[test]
    fn collects_every_violation_in_declaration_order() {
        let mut document = with_field("level", json!("bogus"));
        document["network"] = json!("bogus");
        document["providerPrices"] = json!("free");
        document.as_object_mut().unwrap().remove("payerId");

        let err = validate(&document).unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field_name).collect();
        assert_eq!(fields, ["payerId", "providerPrices", "network", "level"]);
        assert_eq!(
            err.violation("network").unwrap().constraint,
            Constraint::NotAllowed
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let document = with_field("favoriteColor", json!({"nested": true}));
        assert!(validate(&document).is_ok());
        assert!(!clean(&document).contains_key("favoriteColor"));
        assert_eq!(clean(&document).len(), 13);
    }

    #[test]
    fn non_object_document_misses_every_required_field() {
        let err = validate(&json!(["payerId"])).unwrap_err();
        assert_eq!(err.violations().len(), 7);
        assert!(err
            .violations()
            .iter()
            .all(|v| v.constraint == Constraint::Required));
    }

    #[test]
    fn error_message_lists_each_field() {
        let mut document = without_field("payerId");
        document["network"] = json!("bogus");
        let err = validate(&document).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r#"
        Request data was at invalid format, the following fields had invalid values:
        field payerId value was null, expectation from field: required
        field network value was "bogus", expectation from field: notAllowed
        "#);
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("1992-01-15"), NaiveDate::from_ymd_opt(1992, 1, 15));
        assert_eq!(
            parse_date("1992-01-15T23:00:00Z"),
            NaiveDate::from_ymd_opt(1992, 1, 15)
        );
        assert_eq!(parse_date("01/15/1992"), None);
    }
}

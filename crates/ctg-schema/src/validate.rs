//! # Validation
//!
//! Checks a parsed JSON value against a [`Descriptor`] tree.
//!
//! ## Reporting
//!
//! Validation is exhaustive. A composite node validates every child even
//! after one fails, prefixes child violations with the child's key or
//! index, and returns all of them. A single record may surface many
//! violations in one pass, each carrying:
//!
//! - the path from the document root (`project.places[0].coordinates.lat`),
//! - a [`Rule`] with a stable kebab-case identifier,
//! - a message naming expected vs. actual,
//! - the offending raw value, when there is one.
//!
//! ## Unions
//!
//! Alternatives are tried in declaration order and the first acceptance
//! wins, returning that alternative's normalized form. When nothing
//! matches and every alternative only objected to the JSON kind of the
//! value, one `type-mismatch` listing all alternatives is reported.
//! Otherwise one `union-no-alternative-matched` summarizes the first
//! objection of each alternative.
//!
//! ## Strict objects
//!
//! Every input key not declared by a strict object yields one
//! `unrecognized-key` violation. Declared fields are checked first, in
//! declaration order, then undeclared keys in input order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ctg_core::{CalendarDate, RecordId};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::descriptor::{enum_summary, Descriptor, Field, Literal, ObjectShape, ScalarKind};
use crate::normalized::Normalized;

/// Outcome of validating one value: the normalized value, or every violation found.
pub type ValidationResult = Result<Normalized, ValidationViolations>;

/// The rule a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// The JSON kind of the value is not accepted here.
    TypeMismatch,
    /// A number lies outside its inclusive range.
    OutOfRange,
    /// A string exceeds its maximum length.
    TooLong,
    /// A string does not match its pattern.
    PatternMismatch,
    /// A string could not be read as a date, URL or UUID.
    InvalidFormat,
    /// A date lies before its minimum.
    DateBeforeMinimum,
    /// A string is not a member of its enum.
    EnumNotAllowed,
    /// A value differs from its pinned literal.
    LiteralMismatch,
    /// A strict object received an undeclared key.
    UnrecognizedKey,
    /// No alternative of a union accepted the value.
    UnionNoAlternativeMatched,
    /// A required field is absent.
    MissingRequiredField,
}

impl Rule {
    /// Stable identifier, e.g. `type-mismatch`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::TypeMismatch => "type-mismatch",
            Rule::OutOfRange => "out-of-range",
            Rule::TooLong => "too-long",
            Rule::PatternMismatch => "pattern-mismatch",
            Rule::InvalidFormat => "invalid-format",
            Rule::DateBeforeMinimum => "date-before-minimum",
            Rule::EnumNotAllowed => "enum-not-allowed",
            Rule::LiteralMismatch => "literal-mismatch",
            Rule::UnrecognizedKey => "unrecognized-key",
            Rule::UnionNoAlternativeMatched => "union-no-alternative-matched",
            Rule::MissingRequiredField => "missing-required-field",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step from a parent value to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key.
    Key(String),
    /// Array index.
    Index(usize),
}

/// Location of a value, as steps from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// This path extended by an object key.
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    /// This path extended by an array index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// The steps from the root.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Whether this is the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Location of the violating value.
    pub path: FieldPath,
    /// The rule broken.
    pub rule: Rule,
    /// Human-readable description naming expected vs. actual.
    pub message: String,
    /// The offending raw value, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Violation {
    fn new(path: &FieldPath, rule: Rule, message: String, value: Option<&Value>) -> Self {
        Self {
            path: path.clone(),
            rule,
            message,
            value: value.cloned(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: [{}] {}", self.path, self.rule, self.message)
    }
}

/// Non-empty collection of validation violations, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty(), "rejections carry at least one violation");
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterate over violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Violations breaking `rule`.
    pub fn with_rule(&self, rule: Rule) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.rule == rule)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl Descriptor {
    /// Validate `value` against this descriptor, starting at the document root.
    pub fn validate(&self, value: &Value) -> ValidationResult {
        self.validate_at(value, &FieldPath::root())
            .map_err(ValidationViolations::new)
    }

    /// Validate `value` located at `path`.
    ///
    /// Returns the normalized value or a non-empty list of violations whose
    /// paths all start with `path`.
    pub fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<Normalized, Vec<Violation>> {
        match self {
            Descriptor::Scalar(kind) => validate_scalar(kind, value, path).map_err(|v| vec![v]),
            Descriptor::Literal(literal) => validate_literal(literal, value, path).map_err(|v| vec![v]),
            Descriptor::Enum(allowed) => validate_enum(allowed, value, path).map_err(|v| vec![v]),
            Descriptor::Union(alternatives) => validate_union(alternatives, value, path),
            Descriptor::Array(element) => validate_array(element, value, path),
            Descriptor::Object(shape) => validate_object(shape, value, path),
            Descriptor::Optional(inner) => inner.validate_at(value, path),
        }
    }
}

fn validate_scalar(kind: &ScalarKind, value: &Value, path: &FieldPath) -> Result<Normalized, Violation> {
    match kind {
        ScalarKind::Text { max_len, pattern } => {
            let text = expect_str(value, path, "string")?;
            if let Some(max) = max_len {
                let len = text.chars().count();
                if len > *max {
                    return Err(Violation::new(
                        path,
                        Rule::TooLong,
                        format!("expected at most {max} characters, got {len}"),
                        Some(value),
                    ));
                }
            }
            if let Some(pattern) = pattern {
                if !pattern.is_match(text) {
                    return Err(Violation::new(
                        path,
                        Rule::PatternMismatch,
                        format!(
                            "expected {} matching {}, got {value}",
                            pattern.label(),
                            pattern.as_str()
                        ),
                        Some(value),
                    ));
                }
            }
            Ok(Normalized::Text(text.to_string()))
        }
        ScalarKind::Integer { min, max } => {
            let n = expect_integral(value, path, "integer")?;
            check_range(n, *min, *max, value, path)?;
            Ok(Normalized::Integer(n))
        }
        ScalarKind::Boolean { nullable } => match value {
            Value::Bool(b) => Ok(Normalized::Bool(*b)),
            Value::Null if *nullable => Ok(Normalized::Null),
            other => {
                let expected = if *nullable { "boolean or null" } else { "boolean" };
                Err(type_mismatch(path, expected, other))
            }
        },
        ScalarKind::Date { min } => {
            let text = expect_str(value, path, "date string")?;
            let date = CalendarDate::parse(text).map_err(|e| {
                Violation::new(path, Rule::InvalidFormat, e.to_string(), Some(value))
            })?;
            if date < *min {
                return Err(Violation::new(
                    path,
                    Rule::DateBeforeMinimum,
                    format!("date {date} is before minimum {min}"),
                    Some(value),
                ));
            }
            Ok(Normalized::Date(date))
        }
        ScalarKind::Year { min, max } => {
            let year = expect_integral(value, path, "year")?;
            check_range(year, *min, *max, value, path)?;
            Ok(Normalized::Integer(year))
        }
        ScalarKind::Url => {
            let text = expect_str(value, path, "url")?;
            url::Url::parse(text).map_err(|e| {
                Violation::new(
                    path,
                    Rule::InvalidFormat,
                    format!("expected an absolute URL, got {value}: {e}"),
                    Some(value),
                )
            })?;
            Ok(Normalized::Text(text.to_string()))
        }
        ScalarKind::Uuid => {
            let text = expect_str(value, path, "uuid")?;
            RecordId::parse(text).map_err(|e| {
                Violation::new(path, Rule::InvalidFormat, e.to_string(), Some(value))
            })?;
            Ok(Normalized::Text(text.to_string()))
        }
    }
}

fn validate_literal(literal: &Literal, value: &Value, path: &FieldPath) -> Result<Normalized, Violation> {
    let expected = literal.expected();
    if value == expected {
        return Ok(Normalized::from_json(value));
    }
    if json_kind(value) != json_kind(expected) {
        return Err(type_mismatch(path, &format!("literal {expected}"), value));
    }
    let message = match literal.label() {
        Some(label) => format!("{label} mismatch: expected {expected}, got {value}"),
        None => format!("expected literal {expected}, got {value}"),
    };
    Err(Violation::new(path, Rule::LiteralMismatch, message, Some(value)))
}

fn validate_enum(allowed: &BTreeSet<String>, value: &Value, path: &FieldPath) -> Result<Normalized, Violation> {
    let text = expect_str(value, path, "string")?;
    if allowed.contains(text) {
        Ok(Normalized::Text(text.to_string()))
    } else {
        Err(Violation::new(
            path,
            Rule::EnumNotAllowed,
            format!("value {value} not in {}", enum_summary(allowed)),
            Some(value),
        ))
    }
}

fn validate_union(alternatives: &[Descriptor], value: &Value, path: &FieldPath) -> Result<Normalized, Vec<Violation>> {
    if alternatives.is_empty() {
        return Err(vec![Violation::new(
            path,
            Rule::UnionNoAlternativeMatched,
            "union has no alternatives".to_string(),
            Some(value),
        )]);
    }

    let mut failures: Vec<Vec<Violation>> = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        match alternative.validate_at(value, path) {
            Ok(normalized) => return Ok(normalized),
            Err(violations) => failures.push(violations),
        }
    }

    let only_kind_objections = failures.iter().all(|violations| {
        violations
            .iter()
            .all(|v| v.rule == Rule::TypeMismatch && v.path == *path)
    });
    if only_kind_objections {
        let expected = Descriptor::Union(alternatives.to_vec()).type_summary();
        return Err(vec![type_mismatch(path, &expected, value)]);
    }

    let summary: Vec<String> = alternatives
        .iter()
        .zip(&failures)
        .map(|(alternative, violations)| {
            let first = violations
                .first()
                .map(|v| v.message.as_str())
                .unwrap_or("rejected");
            format!("{}: {first}", alternative.type_summary())
        })
        .collect();
    Err(vec![Violation::new(
        path,
        Rule::UnionNoAlternativeMatched,
        format!("no alternative matched ({})", summary.join("; ")),
        Some(value),
    )])
}

fn validate_array(element: &Descriptor, value: &Value, path: &FieldPath) -> Result<Normalized, Vec<Violation>> {
    let Some(items) = value.as_array() else {
        return Err(vec![type_mismatch(path, "array", value)]);
    };

    let mut normalized = Vec::with_capacity(items.len());
    let mut violations = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match element.validate_at(item, &path.index(i)) {
            Ok(n) => normalized.push(n),
            Err(mut found) => violations.append(&mut found),
        }
    }

    if violations.is_empty() {
        Ok(Normalized::List(normalized))
    } else {
        Err(violations)
    }
}

fn validate_object(shape: &ObjectShape, value: &Value, path: &FieldPath) -> Result<Normalized, Vec<Violation>> {
    let Some(map) = value.as_object() else {
        return Err(vec![type_mismatch(path, "object", value)]);
    };

    let mut normalized = BTreeMap::new();
    let mut violations = Vec::new();

    for declared in shape.fields() {
        let child = path.key(declared.name());
        match map.get(declared.name()) {
            Some(v) => match declared.descriptor().validate_at(v, &child) {
                Ok(n) => {
                    normalized.insert(declared.name().to_string(), n);
                }
                Err(mut found) => violations.append(&mut found),
            },
            None if declared.is_required() => violations.push(missing_field(&child, declared)),
            None => {}
        }
    }

    if shape.is_strict() {
        for (key, v) in map {
            if !shape.declares(key) {
                let message = match shape.description() {
                    Some(hint) => format!("unrecognized key {key:?} (in {hint})"),
                    None => format!("unrecognized key {key:?}"),
                };
                violations.push(Violation::new(&path.key(key), Rule::UnrecognizedKey, message, Some(v)));
            }
        }
    }

    if violations.is_empty() {
        Ok(Normalized::Record(normalized))
    } else {
        Err(violations)
    }
}

fn missing_field(path: &FieldPath, declared: &Field) -> Violation {
    let message = match declared.description() {
        Some(hint) => format!(
            "missing required field {:?} ({hint}), expected {}",
            declared.name(),
            declared.descriptor().type_summary()
        ),
        None => format!(
            "missing required field {:?}, expected {}",
            declared.name(),
            declared.descriptor().type_summary()
        ),
    };
    Violation::new(path, Rule::MissingRequiredField, message, None)
}

fn expect_str<'v>(value: &'v Value, path: &FieldPath, expected: &str) -> Result<&'v str, Violation> {
    value.as_str().ok_or_else(|| type_mismatch(path, expected, value))
}

/// Integral numbers, including floats with no fractional part (`5.0`).
fn expect_integral(value: &Value, path: &FieldPath, expected: &str) -> Result<i64, Violation> {
    let Value::Number(n) = value else {
        return Err(type_mismatch(path, expected, value));
    };
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    if n.is_u64() {
        return Err(Violation::new(
            path,
            Rule::OutOfRange,
            format!("expected {expected} within 64-bit range, got {value}"),
            Some(value),
        ));
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(type_mismatch(path, expected, value)),
    }
}

fn check_range(n: i64, min: i64, max: i64, value: &Value, path: &FieldPath) -> Result<(), Violation> {
    if (min..=max).contains(&n) {
        Ok(())
    } else {
        Err(Violation::new(
            path,
            Rule::OutOfRange,
            format!("expected value in {min}..={max}, got {n}"),
            Some(value),
        ))
    }
}

fn type_mismatch(path: &FieldPath, expected: &str, actual: &Value) -> Violation {
    Violation::new(
        path,
        Rule::TypeMismatch,
        format!("expected {expected}, got {}", json_kind(actual)),
        Some(actual),
    )
}

/// JSON kind name for messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{field, ObjectShape, Pattern};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn fuzzy() -> Descriptor {
        Descriptor::fuzzy_date(date(1900, 1, 1), (1900, 2100))
    }

    fn only(violations: &ValidationViolations) -> &Violation {
        assert_eq!(violations.len(), 1, "expected one violation, got:\n{violations}");
        &violations.violations()[0]
    }

    // ---- scalars ----

    #[test]
    fn test_text_accepts_strings_only() {
        assert_eq!(Descriptor::text().validate(&json!("abc")).unwrap(), Normalized::Text("abc".into()));
        let err = Descriptor::text().validate(&json!(1)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::TypeMismatch);
        assert_eq!(only(&err).message, "expected string, got integer");
    }

    #[test]
    fn test_text_max_len_counts_characters() {
        let d = Descriptor::text_max(3);
        assert!(d.validate(&json!("äöü")).is_ok());
        let err = d.validate(&json!("abcd")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::TooLong);
    }

    #[test]
    fn test_pattern_mismatch() {
        let lat_lng = Pattern::new("coordinate", r"^-?[0-9]{1,3}(\.[0-9]{1,5})?$").unwrap();
        let d = Descriptor::pattern(lat_lng);
        assert!(d.validate(&json!("-33.86785")).is_ok());
        assert!(d.validate(&json!("151")).is_ok());
        let err = d.validate(&json!("151.123456")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::PatternMismatch);
        assert_eq!(only(&err).value, Some(json!("151.123456")));
    }

    #[test]
    fn test_integer_range() {
        let d = Descriptor::integer(0, 3);
        assert_eq!(d.validate(&json!(3)).unwrap(), Normalized::Integer(3));
        let err = d.validate(&json!(4)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::OutOfRange);
        assert!(only(&err).message.contains("0..=3"));
        let err = d.validate(&json!(-1)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::OutOfRange);
    }

    #[test]
    fn test_integer_rejects_fractions_and_strings() {
        let d = Descriptor::integer(0, 100);
        assert_eq!(only(&d.validate(&json!(1.5)).unwrap_err()).rule, Rule::TypeMismatch);
        assert_eq!(only(&d.validate(&json!("50")).unwrap_err()).rule, Rule::TypeMismatch);
        assert_eq!(d.validate(&json!(50.0)).unwrap(), Normalized::Integer(50));
    }

    #[test]
    fn test_integer_beyond_i64_is_out_of_range() {
        let err = Descriptor::integer(0, 100).validate(&json!(u64::MAX)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::OutOfRange);
    }

    #[test]
    fn test_boolean_nullability() {
        assert_eq!(Descriptor::nullable_boolean().validate(&json!(null)).unwrap(), Normalized::Null);
        assert_eq!(Descriptor::nullable_boolean().validate(&json!(false)).unwrap(), Normalized::Bool(false));
        let err = Descriptor::boolean().validate(&json!(null)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::TypeMismatch);
        let err = Descriptor::nullable_boolean().validate(&json!("yes")).unwrap_err();
        assert_eq!(only(&err).message, "expected boolean or null, got string");
    }

    #[test]
    fn test_url() {
        assert!(Descriptor::url().validate(&json!("https://example.org/a?b=c")).is_ok());
        let err = Descriptor::url().validate(&json!("example.org")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::InvalidFormat);
        let err = Descriptor::url().validate(&json!("")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::InvalidFormat);
    }

    #[test]
    fn test_url_or_empty() {
        let d = Descriptor::url_or_empty();
        assert_eq!(d.validate(&json!("")).unwrap(), Normalized::Text(String::new()));
        assert!(d.validate(&json!("https://d-nb.info/gnd/123")).is_ok());
        let err = d.validate(&json!("not a url")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::UnionNoAlternativeMatched);
    }

    #[test]
    fn test_uuid_keeps_original_text() {
        let raw = "3F1C2B1E-8D4A-4C1E-9B7A-2A6F0C9D1E55";
        assert_eq!(Descriptor::uuid().validate(&json!(raw)).unwrap(), Normalized::Text(raw.into()));
        let err = Descriptor::uuid().validate(&json!("123")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::InvalidFormat);
    }

    #[test]
    fn test_date_minimum() {
        let d = Descriptor::date(date(2020, 1, 1));
        assert_eq!(d.validate(&json!("2020-01-01")).unwrap(), Normalized::Date(date(2020, 1, 1)));
        let err = d.validate(&json!("2019-12-31")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::DateBeforeMinimum);
        let err = d.validate(&json!("yesterday")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::InvalidFormat);
    }

    #[test]
    fn test_date_rejects_numbers() {
        let err = Descriptor::date(date(1900, 1, 1)).validate(&json!(1950)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::TypeMismatch);
    }

    // ---- literal & enum ----

    #[test]
    fn test_literal_mismatch_vs_type_mismatch() {
        let d = Descriptor::labelled_literal("schema version", "0.1.8");
        assert!(d.validate(&json!("0.1.8")).is_ok());

        let err = d.validate(&json!("0.1.7")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::LiteralMismatch);
        assert_eq!(only(&err).message, "schema version mismatch: expected \"0.1.8\", got \"0.1.7\"");

        let err = d.validate(&json!(18)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::TypeMismatch);
    }

    #[test]
    fn test_enum_is_case_sensitive() {
        let d = Descriptor::one_of(["organization", "project"]);
        assert!(d.validate(&json!("project")).is_ok());
        let err = d.validate(&json!("Project")).unwrap_err();
        assert_eq!(only(&err).rule, Rule::EnumNotAllowed);
        assert!(only(&err).message.contains("organization|project"));
        assert_eq!(only(&d.validate(&json!(1)).unwrap_err()).rule, Rule::TypeMismatch);
    }

    // ---- unions ----

    #[test]
    fn test_fuzzy_date_empty_sentinel() {
        assert_eq!(fuzzy().validate(&json!("")).unwrap(), Normalized::Text(String::new()));
    }

    #[test]
    fn test_fuzzy_date_below_minimum() {
        let err = fuzzy().validate(&json!("1899-12-31")).unwrap_err();
        let v = only(&err);
        assert_eq!(v.rule, Rule::UnionNoAlternativeMatched);
        assert!(v.message.contains("before minimum 1900-01-01"), "{}", v.message);
    }

    #[test]
    fn test_fuzzy_date_coerces_full_date() {
        assert_eq!(fuzzy().validate(&json!("2021-05-01")).unwrap(), Normalized::Date(date(2021, 5, 1)));
    }

    #[test]
    fn test_fuzzy_date_bare_year() {
        assert_eq!(fuzzy().validate(&json!(1950)).unwrap(), Normalized::Integer(1950));
        let err = fuzzy().validate(&json!(1850)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::UnionNoAlternativeMatched);
    }

    #[test]
    fn test_fuzzy_date_year_string_is_a_date() {
        assert_eq!(fuzzy().validate(&json!("1950")).unwrap(), Normalized::Date(date(1950, 1, 1)));
    }

    #[test]
    fn test_union_kind_only_failures_collapse_to_type_mismatch() {
        let err = fuzzy().validate(&json!({})).unwrap_err();
        let v = only(&err);
        assert_eq!(v.rule, Rule::TypeMismatch);
        assert_eq!(v.message, "expected date >= 1900-01-01 | year 1900..=2100 | \"\", got object");
    }

    #[test]
    fn test_union_first_match_wins() {
        let d = Descriptor::union([Descriptor::text(), Descriptor::date(date(1900, 1, 1))]);
        assert_eq!(d.validate(&json!("2021-05-01")).unwrap(), Normalized::Text("2021-05-01".into()));
        let d = Descriptor::union([Descriptor::date(date(1900, 1, 1)), Descriptor::text()]);
        assert_eq!(d.validate(&json!("2021-05-01")).unwrap(), Normalized::Date(date(2021, 5, 1)));
    }

    #[test]
    fn test_empty_union_rejects() {
        let err = Descriptor::Union(Vec::new()).validate(&json!(1)).unwrap_err();
        assert_eq!(only(&err).rule, Rule::UnionNoAlternativeMatched);
    }

    // ---- composites ----

    fn place() -> Descriptor {
        ObjectShape::strict([
            field("text", Descriptor::text()),
            field("ref", Descriptor::array_of(Descriptor::url())),
        ])
        .describe("name of the place")
        .into()
    }

    #[test]
    fn test_array_paths_and_exhaustive_reporting() {
        let d = Descriptor::array_of(Descriptor::url());
        let err = d.validate(&json!(["https://a.org", 1, "nope"])).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.violations()[0].path.to_string(), "[1]");
        assert_eq!(err.violations()[1].path.to_string(), "[2]");
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert_eq!(Descriptor::array_of(Descriptor::text()).validate(&json!([])).unwrap(), Normalized::List(vec![]));
    }

    #[test]
    fn test_object_reports_every_field() {
        let err = place().validate(&json!({"text": 5, "ref": ["x"], "lat": "1"})).unwrap_err();
        let rules: Vec<(String, Rule)> = err.iter().map(|v| (v.path.to_string(), v.rule)).collect();
        assert_eq!(
            rules,
            vec![
                ("text".to_string(), Rule::TypeMismatch),
                ("ref[0]".to_string(), Rule::InvalidFormat),
                ("lat".to_string(), Rule::UnrecognizedKey),
            ]
        );
        assert!(err.violations()[2].message.contains("name of the place"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = place().validate(&json!({"text": "Berlin"})).unwrap_err();
        let v = only(&err);
        assert_eq!(v.rule, Rule::MissingRequiredField);
        assert_eq!(v.path.to_string(), "ref");
        assert!(v.value.is_none());
    }

    #[test]
    fn test_optional_field() {
        let d: Descriptor = ObjectShape::strict([
            field("description", Descriptor::text()),
            field("ref", Descriptor::optional(Descriptor::array_of(Descriptor::url()))),
        ])
        .into();
        let accepted = d.validate(&json!({"description": "GitHub"})).unwrap();
        assert!(accepted.get("ref").is_none());

        let err = d.validate(&json!({"description": "GitHub", "ref": null})).unwrap_err();
        assert_eq!(only(&err).rule, Rule::TypeMismatch);
        assert_eq!(only(&err).path.to_string(), "ref");
    }

    #[test]
    fn test_lenient_object_drops_unknown_keys() {
        let d: Descriptor = ObjectShape::lenient([field("a", Descriptor::text())]).into();
        let accepted = d.validate(&json!({"a": "x", "b": "y"})).unwrap();
        assert_eq!(accepted.to_json(), json!({"a": "x"}));
    }

    #[test]
    fn test_nested_paths() {
        let d: Descriptor = ObjectShape::strict([field("places", Descriptor::array_of(place()))]).into();
        let err = d.validate(&json!({"places": [{"text": "a", "ref": []}, {"text": "b", "ref": [7]}]})).unwrap_err();
        assert_eq!(only(&err).path.to_string(), "places[1].ref[0]");
    }

    #[test]
    fn test_object_type_mismatch_at_root() {
        let err = place().validate(&json!([])).unwrap_err();
        assert_eq!(only(&err).path.to_string(), "(root)");
        assert!(only(&err).path.is_root());
    }

    // ---- reporting ----

    #[test]
    fn test_rule_identifiers_serialize_as_kebab_case() {
        for rule in [
            Rule::TypeMismatch,
            Rule::OutOfRange,
            Rule::TooLong,
            Rule::PatternMismatch,
            Rule::InvalidFormat,
            Rule::DateBeforeMinimum,
            Rule::EnumNotAllowed,
            Rule::LiteralMismatch,
            Rule::UnrecognizedKey,
            Rule::UnionNoAlternativeMatched,
            Rule::MissingRequiredField,
        ] {
            assert_eq!(serde_json::to_value(rule).unwrap(), json!(rule.as_str()));
        }
    }

    #[test]
    fn test_violation_serializes_path_as_string() {
        let err = place().validate(&json!({"text": "a", "ref": [1]})).unwrap_err();
        let report = serde_json::to_value(&err).unwrap();
        assert_eq!(report[0]["path"], json!("ref[0]"));
        assert_eq!(report[0]["rule"], json!("type-mismatch"));
        assert_eq!(report[0]["value"], json!(1));
    }

    #[test]
    fn test_violation_display_format() {
        let err = place().validate(&json!({"text": "a"})).unwrap_err();
        let display = err.to_string();
        assert!(display.starts_with("  ref: [missing-required-field]"), "{display}");
    }
}

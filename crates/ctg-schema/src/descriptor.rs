//! # Shape Descriptors
//!
//! A [`Descriptor`] describes the accepted shape, type and range of one
//! JSON value. Descriptors compose into a tree that mirrors the document
//! they check. The set of variants is closed: the validation algorithm in
//! [`crate::validate`] is a single exhaustive `match`, and adding a variant
//! forces every consumer (validation, audit, outline) to handle it.
//!
//! Trees are built once at startup and are read-only afterwards. Enum
//! member sets are shared through `Arc`, so cloning a descriptor that
//! references the keyword vocabulary does not copy the vocabulary.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use ctg_core::CalendarDate;
use regex::Regex;
use serde_json::Value;

/// Enums with at most this many members list them in summaries and messages.
pub(crate) const ENUM_LISTING_LIMIT: usize = 8;

/// One node of a descriptor tree.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// A single JSON scalar with kind-specific constraints.
    Scalar(ScalarKind),
    /// Exactly one fixed value.
    Literal(Literal),
    /// A string drawn from a fixed set (case-sensitive, exact).
    Enum(Arc<BTreeSet<String>>),
    /// Alternatives tried left to right; the first match wins.
    Union(Vec<Descriptor>),
    /// A homogeneous array. Empty arrays are always valid.
    Array(Box<Descriptor>),
    /// A keyed object with declared fields.
    Object(ObjectShape),
    /// A field that may be absent from its parent object.
    Optional(Box<Descriptor>),
}

/// Scalar kinds and their constraints.
#[derive(Debug, Clone)]
pub enum ScalarKind {
    /// A JSON string, optionally length-capped and/or pattern-constrained.
    Text {
        /// Maximum length in Unicode scalar values.
        max_len: Option<usize>,
        /// Anchored pattern the whole string must match.
        pattern: Option<Pattern>,
    },
    /// An integral JSON number within an inclusive range.
    Integer {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// `true` or `false`, plus `null` when nullable.
    Boolean {
        /// Whether `null` ("unknown / not applicable") is accepted.
        nullable: bool,
    },
    /// A date string coerced to a calendar date no earlier than `min`.
    Date {
        /// Earliest accepted date.
        min: CalendarDate,
    },
    /// A bare year number within an inclusive range.
    Year {
        /// Earliest accepted year.
        min: i64,
        /// Latest accepted year.
        max: i64,
    },
    /// An absolute URL.
    Url,
    /// A hyphenated UUID.
    Uuid,
}

/// A compiled regular expression with a human-readable label for messages.
#[derive(Debug, Clone)]
pub struct Pattern {
    label: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns the `regex` compilation error for malformed sources.
    pub fn new(label: impl Into<String>, source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.into(),
            regex: Regex::new(source)?,
        })
    }

    /// Label used in violation messages (e.g. "ISO 639-3 language code").
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A fixed expected value, optionally labelled.
///
/// The label names what the literal pins (e.g. "schema version") and turns
/// a generic literal mismatch into "schema version mismatch".
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    expected: Value,
    label: Option<String>,
}

impl Literal {
    /// The expected value.
    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// What the literal pins, if labelled.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Declared fields of an object, in declaration order.
#[derive(Debug, Clone)]
pub struct ObjectShape {
    fields: Vec<Field>,
    strict: bool,
    description: Option<String>,
}

impl ObjectShape {
    /// An object that rejects every undeclared key.
    pub fn strict(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            strict: true,
            description: None,
        }
    }

    /// An object that drops undeclared keys from its normalized output.
    pub fn lenient(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            strict: false,
            description: None,
        }
    }

    /// Attach a description, used as a hint in unrecognized-key messages.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is declared.
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Whether undeclared keys are rejected.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The object's description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl From<ObjectShape> for Descriptor {
    fn from(shape: ObjectShape) -> Self {
        Descriptor::Object(shape)
    }
}

/// A named field of an object.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    descriptor: Descriptor,
    description: Option<String>,
}

impl Field {
    /// Declare a field.
    pub fn new(name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            description: None,
        }
    }

    /// Attach a description.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Field name as it appears in documents.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptor the field value must satisfy.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// The field's description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the field must be present.
    pub fn is_required(&self) -> bool {
        !self.descriptor.is_optional()
    }
}

/// Shorthand for [`Field::new`].
pub fn field(name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Field {
    Field::new(name, descriptor)
}

impl Descriptor {
    /// Any string.
    pub fn text() -> Self {
        Descriptor::Scalar(ScalarKind::Text { max_len: None, pattern: None })
    }

    /// A string of at most `max_len` characters.
    pub fn text_max(max_len: usize) -> Self {
        Descriptor::Scalar(ScalarKind::Text { max_len: Some(max_len), pattern: None })
    }

    /// A string matching `pattern`.
    pub fn pattern(pattern: Pattern) -> Self {
        Descriptor::Scalar(ScalarKind::Text { max_len: None, pattern: Some(pattern) })
    }

    /// An integer in `min..=max`.
    pub fn integer(min: i64, max: i64) -> Self {
        Descriptor::Scalar(ScalarKind::Integer { min, max })
    }

    /// `true` or `false`.
    pub fn boolean() -> Self {
        Descriptor::Scalar(ScalarKind::Boolean { nullable: false })
    }

    /// `true`, `false`, or `null` for "unknown".
    pub fn nullable_boolean() -> Self {
        Descriptor::Scalar(ScalarKind::Boolean { nullable: true })
    }

    /// A date string no earlier than `min`.
    pub fn date(min: CalendarDate) -> Self {
        Descriptor::Scalar(ScalarKind::Date { min })
    }

    /// A bare year number in `min..=max`.
    pub fn year(min: i64, max: i64) -> Self {
        Descriptor::Scalar(ScalarKind::Year { min, max })
    }

    /// An absolute URL.
    pub fn url() -> Self {
        Descriptor::Scalar(ScalarKind::Url)
    }

    /// A hyphenated UUID.
    pub fn uuid() -> Self {
        Descriptor::Scalar(ScalarKind::Uuid)
    }

    /// Exactly `expected`.
    pub fn literal(expected: impl Into<Value>) -> Self {
        Descriptor::Literal(Literal { expected: expected.into(), label: None })
    }

    /// Exactly `expected`, reported under `label` on mismatch.
    pub fn labelled_literal(label: impl Into<String>, expected: impl Into<Value>) -> Self {
        Descriptor::Literal(Literal {
            expected: expected.into(),
            label: Some(label.into()),
        })
    }

    /// One of a fixed list of strings.
    pub fn one_of<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Descriptor::Enum(Arc::new(members.into_iter().map(Into::into).collect()))
    }

    /// One of a shared, runtime-supplied set of strings.
    pub fn enumeration(allowed: Arc<BTreeSet<String>>) -> Self {
        Descriptor::Enum(allowed)
    }

    /// The first of `alternatives` that accepts the value.
    pub fn union(alternatives: impl IntoIterator<Item = Descriptor>) -> Self {
        Descriptor::Union(alternatives.into_iter().collect())
    }

    /// An array whose elements all satisfy `element`.
    pub fn array_of(element: impl Into<Descriptor>) -> Self {
        Descriptor::Array(Box::new(element.into()))
    }

    /// A field that may be absent.
    pub fn optional(inner: impl Into<Descriptor>) -> Self {
        Descriptor::Optional(Box::new(inner.into()))
    }

    /// A full date, a bare year, or `""` for "unknown".
    ///
    /// Models historically fuzzy dates such as the start of a long-running
    /// project whose exact founding day is not recorded.
    pub fn fuzzy_date(min: CalendarDate, years: (i64, i64)) -> Self {
        Descriptor::union([
            Descriptor::date(min),
            Descriptor::year(years.0, years.1),
            Descriptor::literal(""),
        ])
    }

    /// An absolute URL, or `""` for "not yet available".
    pub fn url_or_empty() -> Self {
        Descriptor::union([Descriptor::url(), Descriptor::literal("")])
    }

    /// Whether this descriptor may be absent from its parent object.
    pub fn is_optional(&self) -> bool {
        matches!(self, Descriptor::Optional(_))
    }

    /// A short human-readable type summary, e.g. `date >= 1900-01-01`.
    pub fn type_summary(&self) -> String {
        match self {
            Descriptor::Scalar(kind) => kind.to_string(),
            Descriptor::Literal(lit) => lit.expected.to_string(),
            Descriptor::Enum(allowed) => enum_summary(allowed),
            Descriptor::Union(alternatives) => alternatives
                .iter()
                .map(Descriptor::type_summary)
                .collect::<Vec<_>>()
                .join(" | "),
            Descriptor::Array(element) => format!("array<{}>", element.type_summary()),
            Descriptor::Object(shape) if shape.strict => "object (strict)".to_string(),
            Descriptor::Object(_) => "object".to_string(),
            Descriptor::Optional(inner) => format!("optional<{}>", inner.type_summary()),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Text { max_len: None, pattern: None } => f.write_str("string"),
            ScalarKind::Text { max_len: Some(n), pattern: None } => write!(f, "string (max {n})"),
            ScalarKind::Text { pattern: Some(p), .. } => write!(f, "string ({})", p.label()),
            ScalarKind::Integer { min, max } => write!(f, "integer {min}..={max}"),
            ScalarKind::Boolean { nullable: false } => f.write_str("boolean"),
            ScalarKind::Boolean { nullable: true } => f.write_str("boolean | null"),
            ScalarKind::Date { min } => write!(f, "date >= {min}"),
            ScalarKind::Year { min, max } => write!(f, "year {min}..={max}"),
            ScalarKind::Url => f.write_str("url"),
            ScalarKind::Uuid => f.write_str("uuid"),
        }
    }
}

pub(crate) fn enum_summary(allowed: &BTreeSet<String>) -> String {
    if allowed.len() <= ENUM_LISTING_LIMIT {
        let members: Vec<&str> = allowed.iter().map(String::as_str).collect();
        format!("enum({})", members.join("|"))
    } else {
        format!("enum({} values)", allowed.len())
    }
}

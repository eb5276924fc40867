//! # ctg-schema: Project Record Validation Engine
//!
//! Checks parsed JSON project records against the pinned project schema and
//! reports every violation in a single pass.
//!
//! ## Descriptor Library (`descriptor`, `validate`)
//!
//! A [`Descriptor`] is a closed sum type describing the accepted shape of a
//! value: scalars (text, bounded integer, nullable boolean, date, year, URL,
//! UUID), literals, enums, unions, arrays, strict objects and optional
//! fields. [`Descriptor::validate`] walks a value and a descriptor tree
//! together and returns either the [`Normalized`] value or a non-empty
//! [`ValidationViolations`] list. Traversal never stops at the first
//! failure.
//!
//! ## Schema Definition (`project`)
//!
//! [`project_schema`] builds the descriptor tree for one project record,
//! pinned to [`SCHEMA_VERSION`] and parameterized by the keyword
//! [`Vocabulary`]. [`ProjectValidator`] bundles both and can decode an
//! accepted record into the typed [`ProjectRecord`] model.
//!
//! ## Crate Policy
//!
//! - Depends only on `ctg-core` internally.
//! - Validation is pure: no IO, no shared mutable state. Descriptors,
//!   vocabularies and validators are `Send + Sync` and may be shared across
//!   threads once built.
//! - Input records are never mutated. Normalization coerces representation
//!   (date strings become dates) but never alters content.

pub mod audit;
pub mod descriptor;
pub mod normalized;
pub mod project;
pub mod record;
pub mod validate;
pub mod vocabulary;

pub use audit::{audit_strictness, outline, OutlineEntry, StrictnessFinding};
pub use descriptor::{field, Descriptor, Field, Literal, ObjectShape, Pattern, ScalarKind};
pub use normalized::Normalized;
pub use project::{project_schema, ProjectError, ProjectValidator, SCHEMA_VERSION};
pub use record::ProjectRecord;
pub use validate::{FieldPath, PathSegment, Rule, ValidationResult, ValidationViolations, Violation};
pub use vocabulary::{Vocabulary, VocabularyError};

//! # ctg-core: Foundational Types for the Record Validator
//!
//! Leaf crate of the workspace. It defines the primitives every other crate
//! builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Calendar dates, not timestamps.** Record dates are coerced to a
//!    [`CalendarDate`] (a `chrono::NaiveDate`). Time-of-day and offsets are
//!    accepted on input and discarded.
//!
//! 2. **Newtype for record identifiers.** [`RecordId`] wraps a `Uuid` and
//!    only accepts the hyphenated textual form used in record files.
//!
//! 3. **One error enum.** [`CtgError`] is the operational error type. Rule
//!    violations found while validating a record are data, not errors, and
//!    live in `ctg-schema`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ctg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::CtgError;
pub use identity::RecordId;
pub use temporal::CalendarDate;

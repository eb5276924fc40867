//! # Typed Project Record
//!
//! Rust model of an accepted project record. Decoding goes through
//! [`crate::ProjectValidator::parse`], which validates first, so every
//! `ProjectRecord` in memory has already passed the schema. The structs
//! mirror the schema one-to-one and reject unknown fields as a second line
//! of defence against drift between the two.

use std::fmt;

use ctg_core::{CalendarDate, RecordId};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// One project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectRecord {
    /// Always the pinned schema version.
    pub schema_version: String,
    /// Who created the record, and when.
    pub record_metadata: RecordMetadata,
    /// The described project.
    pub project: Project,
}

/// Provenance of the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordMetadata {
    /// Identifier other records point at.
    pub uuid: RecordId,
    /// On or after 2020-01-01.
    pub record_created_on: CalendarDate,
    /// Name of the record author.
    pub record_created_by: String,
    pub last_edited_on: LastEdited,
}

/// When a record was last edited, if ever. Serialized as `""` or `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastEdited {
    /// Serialized as `""`.
    Never,
    On(CalendarDate),
}

impl Serialize for LastEdited {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LastEdited::Never => serializer.serialize_str(""),
            LastEdited::On(date) => serializer.serialize_str(&date.to_iso8601()),
        }
    }
}

impl<'de> Deserialize<'de> for LastEdited {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(LastEdited::Never);
        }
        CalendarDate::parse(&raw).map(LastEdited::On).map_err(de::Error::custom)
    }
}

/// A full date, a bare year, or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuzzyDate {
    Date(CalendarDate),
    /// A bare year, 1900 to 2100.
    Year(i32),
    /// Serialized as `""`.
    Unknown,
}

impl FuzzyDate {
    /// The year, if known.
    pub fn year(&self) -> Option<i32> {
        match self {
            FuzzyDate::Date(date) => Some(date.year()),
            FuzzyDate::Year(year) => Some(*year),
            FuzzyDate::Unknown => None,
        }
    }
}

impl Serialize for FuzzyDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FuzzyDate::Date(date) => serializer.serialize_str(&date.to_iso8601()),
            FuzzyDate::Year(year) => serializer.serialize_i32(*year),
            FuzzyDate::Unknown => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for FuzzyDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FuzzyDateVisitor;

        impl Visitor<'_> for FuzzyDateVisitor {
            type Value = FuzzyDate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a date string, a year number, or \"\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<FuzzyDate, E> {
                i32::try_from(v)
                    .map(FuzzyDate::Year)
                    .map_err(|_| E::custom(format!("year {v} out of range")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<FuzzyDate, E> {
                i32::try_from(v)
                    .map(FuzzyDate::Year)
                    .map_err(|_| E::custom(format!("year {v} out of range")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FuzzyDate, E> {
                if v.is_empty() {
                    return Ok(FuzzyDate::Unknown);
                }
                CalendarDate::parse(v).map(FuzzyDate::Date).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(FuzzyDateVisitor)
    }
}

/// The described project or organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub title: String,
    /// Short name, at most 16 characters.
    pub abbr: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Authority-file URIs identifying the project.
    #[serde(rename = "ref")]
    pub authority_refs: Vec<String>,
    /// Periods of activity.
    #[serde(rename = "date")]
    pub active_periods: Vec<ActivePeriod>,
    /// Project websites; `""` entries are allowed.
    pub websites: Vec<String>,
    /// Description, at most 750 characters.
    pub project_desc: String,
    pub places: Vec<Place>,
    /// ISO 639-3 codes of the languages the project works in.
    pub lang: Vec<String>,
    pub host_institutions: Vec<HostInstitution>,
    /// Links to other records.
    pub relations: Vec<Relation>,
    pub contacts: Vec<Contact>,
    pub research_data: ResearchData,
    pub policies: Vec<Policy>,
    /// Technology stack.
    pub stack: Stack,
    /// Entries of the keyword vocabulary.
    pub keywords: Vec<String>,
    /// Free-text remarks.
    pub comment: String,
}

/// Whether the record describes an organization or a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Organization,
    Project,
}

/// One span of activity. Either end may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivePeriod {
    pub from: FuzzyDate,
    pub to: FuzzyDate,
}

/// A name plus the authority-file URIs that identify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedReference {
    /// Display name.
    pub text: String,
    /// Authority-file URIs, e.g. GND or Wikidata.
    #[serde(rename = "ref")]
    pub refs: Vec<String>,
}

/// A geolocated place associated with the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Place {
    pub place_name: NamedReference,
    pub coordinates: Coordinates,
}

/// Decimal degrees, kept as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coordinates {
    /// Latitude.
    pub lat: String,
    /// Longitude.
    pub lng: String,
}

/// An institution hosting the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostInstitution {
    pub org_name: NamedReference,
    pub websites: Vec<String>,
}

/// A link to another project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relation {
    pub relation_type: RelationType,
    /// Title of the related project.
    pub title: String,
    /// Identifier of the related record. Not checked for existence.
    pub uuid: RecordId,
}

/// How a related record stands to this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Parent,
    Sibling,
    Child,
    Cooperation,
}

/// A person to contact about the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Contact {
    pub pers_name: NamedReference,
    /// Numeric role code, 0 to 3.
    pub role: ContactRole,
    pub websites: Vec<String>,
}

/// Role of a contact, stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ContactRole {
    /// Code 0.
    Management,
    /// Code 1.
    Employee,
    /// Code 2.
    StudentEmployee,
    /// Code 3. Contractor or honorary staff.
    External,
}

impl TryFrom<u8> for ContactRole {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ContactRole::Management),
            1 => Ok(ContactRole::Employee),
            2 => Ok(ContactRole::StudentEmployee),
            3 => Ok(ContactRole::External),
            other => Err(format!("unknown contact role {other}")),
        }
    }
}

impl From<ContactRole> for u8 {
    fn from(role: ContactRole) -> Self {
        match role {
            ContactRole::Management => 0,
            ContactRole::Employee => 1,
            ContactRole::StudentEmployee => 2,
            ContactRole::External => 3,
        }
    }
}

impl fmt::Display for ContactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactRole::Management => "Management",
            ContactRole::Employee => "Employee",
            ContactRole::StudentEmployee => "Student Employee",
            ContactRole::External => "Contractor or Honorary Staff",
        })
    }
}

/// Languages, publications and data produced by the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResearchData {
    /// ISO 639-3 codes of the research data.
    pub lang: Vec<String>,
    /// `None` when unknown.
    pub sustainability_plan: Option<bool>,
    pub publications: Publications,
    pub data: DataStages,
}

/// Open-access share and licensing of publications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Publications {
    /// Percentage, 0 to 100.
    pub open_access: u8,
    pub licensing: Vec<String>,
}

/// Data at each pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataStages {
    pub raw: DataStage,
    pub refined: DataStage,
    /// Serialized as `final`.
    #[serde(rename = "final")]
    pub finalized: DataStage,
}

/// Datatypes and repositories of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataStage {
    pub datatypes: Vec<Datatype>,
    pub repositories: Vec<Repository>,
}

/// A kind of data with its licensing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Datatype {
    pub label: String,
    pub licensing: Vec<String>,
    /// Percentage, 0 to 100.
    pub open_access: u8,
}

/// Where the data of one stage is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Repository {
    /// Serialized as `type`.
    #[serde(rename = "type")]
    pub location: RepositoryLocation,
    pub accessibility: Accessibility,
    /// Repository URLs. May be absent.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub refs: Option<Vec<String>>,
    pub description: String,
}

/// Hosted by the project, or elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryLocation {
    Local,
    Remote,
}

/// Whether repository access is restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Restricted,
    Open,
}

/// A data or publication policy the project follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    pub description: String,
    #[serde(rename = "ref")]
    pub refs: Vec<String>,
}

/// Software the project is built on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stack {
    pub database: Vec<String>,
    pub backend: Vec<String>,
    pub frontend: Vec<String>,
    pub languages: Vec<String>,
    pub tools: Vec<Tool>,
}

/// A tool used in the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tool {
    pub label: String,
    /// Built by the project itself.
    pub self_developed: bool,
    #[serde(rename = "ref")]
    pub refs: Vec<String>,
    pub purpose: String,
}

//! # Project Record Schema
//!
//! The fixed descriptor tree for one project record, strict at every level.
//!
//! ## Version Pinning
//!
//! [`SCHEMA_VERSION`] is the single source of truth for the record format.
//! Every record must stamp exactly this string in `schema_version`; a
//! record produced under an older or newer schema is rejected with one
//! `literal-mismatch` ("schema version mismatch") violation.
//!
//! ## Out of Scope
//!
//! `relations[].uuid` must be a well-formed UUID, but whether another
//! record with that identifier exists is not checked here. URIs are
//! checked for syntax only and never dereferenced.

use std::sync::Arc;

use ctg_core::{CalendarDate, CtgError};
use serde_json::Value;
use thiserror::Error;

use crate::descriptor::{field, Descriptor, Field, ObjectShape, Pattern};
use crate::record::ProjectRecord;
use crate::validate::{ValidationResult, ValidationViolations};
use crate::vocabulary::Vocabulary;

/// Version of the project record schema. Set here, validated everywhere else.
pub const SCHEMA_VERSION: &str = "0.1.8";

/// Three lowercase letters, e.g. `deu`.
pub const ISO_639_3_PATTERN: &str = r"^[a-z]{3}$";

/// Signed decimal degrees with up to five fractional digits, e.g. `-33.86785`.
/// ASCII digits only; `\d` would also match other Unicode digit sets.
pub const LAT_LNG_PATTERN: &str = r"^-?[0-9]{1,3}(\.[0-9]{1,5})?$";

/// Record metadata dates may not precede the dataset itself.
const RECORD_DATE_MIN: (i32, u32, u32) = (2020, 1, 1);

/// Active periods may reach back to the start of the 20th century.
const ACTIVE_PERIOD_MIN: (i32, u32, u32) = (1900, 1, 1);

/// Inclusive range of bare years in active periods.
const ACTIVE_PERIOD_YEARS: (i64, i64) = (1900, 2100);

const ABBR_MAX_LEN: usize = 16;
const PROJECT_DESC_MAX_LEN: usize = 750;

/// Error from the project validator.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// The record broke one or more schema rules.
    #[error("record rejected with {} violation(s):\n{violations}", .violations.len())]
    Rejected {
        /// Every violation found.
        violations: ValidationViolations,
    },

    /// The record was accepted but does not fit the typed model.
    #[error("accepted record could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    /// A pattern in the schema definition failed to compile.
    #[error("invalid pattern in schema definition: {0}")]
    Pattern(#[from] regex::Error),

    /// A constant in the schema definition is invalid.
    #[error(transparent)]
    Core(#[from] CtgError),
}

fn date_const((y, m, d): (i32, u32, u32)) -> Result<CalendarDate, CtgError> {
    CalendarDate::from_ymd(y, m, d)
}

/// Build the descriptor tree for one project record.
///
/// # Errors
///
/// Only fails if one of the schema's own constants is malformed.
pub fn project_schema(vocabulary: &Vocabulary) -> Result<Descriptor, ProjectError> {
    let record_min = date_const(RECORD_DATE_MIN)?;
    let period_min = date_const(ACTIVE_PERIOD_MIN)?;
    let iso_639_3 = Pattern::new("ISO 639-3 language code", ISO_639_3_PATTERN)?;
    let lat_lng = Pattern::new("decimal degrees", LAT_LNG_PATTERN)?;

    let record_metadata = ObjectShape::strict([
        field("uuid", Descriptor::uuid()).describe("Universally unique identifier for the project"),
        field("record_created_on", Descriptor::date(record_min))
            .describe("Record creation date (YYYY-MM-DD)"),
        field("record_created_by", Descriptor::text()).describe("Name of the record's creator"),
        field(
            "last_edited_on",
            Descriptor::union([Descriptor::date(record_min), Descriptor::literal("")]),
        )
        .describe("Date of last modification of the record (YYYY-MM-DD)"),
    ])
    .describe("Metadata of the record file");

    let active_period = ObjectShape::strict([
        field("from", Descriptor::fuzzy_date(period_min, ACTIVE_PERIOD_YEARS)),
        field("to", Descriptor::fuzzy_date(period_min, ACTIVE_PERIOD_YEARS)),
    ])
    .describe("Active period");

    let place = ObjectShape::strict([
        field("place_name", named_reference("Name of the place", "place name")),
        field(
            "coordinates",
            ObjectShape::strict([
                field("lat", Descriptor::pattern(lat_lng.clone())).describe("Latitude of the place"),
                field("lng", Descriptor::pattern(lat_lng)).describe("Longitude of the place"),
            ])
            .describe("coordinates"),
        ),
    ])
    .describe("Location of the project");

    let host_institution = ObjectShape::strict([
        field("org_name", named_reference("Name of the institution", "institution name")),
        websites("List of institutional website URLs"),
    ])
    .describe("Host institution");

    let relation = ObjectShape::strict([
        field(
            "relation_type",
            Descriptor::one_of(["parent", "sibling", "child", "cooperation"]),
        ),
        field("title", Descriptor::text()),
        field("uuid", Descriptor::uuid()),
    ])
    .describe("Related entity");

    let contact = ObjectShape::strict([
        field("pers_name", named_reference("Name of the contact", "contact name")),
        field("role", Descriptor::integer(0, 3)).describe(
            "Role of the contact: (0 = Management | 1 = Employee | 2 = Student Employee | \
             3 = Contractor or Honorary Staff)",
        ),
        websites("List of institutional and/or personal website URLs"),
    ])
    .describe("Main contact");

    let language_codes = |text: &str| {
        field("lang", Descriptor::array_of(Descriptor::pattern(iso_639_3.clone()))).describe(text)
    };

    let research_data = ObjectShape::strict([
        language_codes("List of languages of the project's research data (ISO-639-3 codes)"),
        field("sustainability_plan", Descriptor::nullable_boolean()).describe(
            "Is there a plan to ensure the sustainability and reusability of the project's \
             research data and output?",
        ),
        field(
            "publications",
            ObjectShape::strict([
                field("open_access", Descriptor::integer(0, 100)).describe(
                    "Approximate percentage of publications that are available open-access",
                ),
                licensing("List of licenses that apply to publications"),
            ])
            .describe("Information about publication accessibility and licensing"),
        ),
        field(
            "data",
            ObjectShape::strict([
                field("raw", data_stage("Information about raw research data")),
                field("refined", data_stage("Information about refined research data")),
                field(
                    "final",
                    data_stage("Information about final and publication-ready research data"),
                ),
            ])
            .describe("Information about research data"),
        ),
    ])
    .describe("Information about the project's research data");

    let policy = ObjectShape::strict([
        field("description", Descriptor::text())
            .describe("Description of the policy, e.g. 'Research Data Policy'"),
        field("ref", url_list()).describe("List of URLs relevant to the policy"),
    ])
    .describe("Policy");

    let tool = ObjectShape::strict([
        field("label", Descriptor::text()).describe("Name of the tool"),
        field("self_developed", Descriptor::boolean())
            .describe("Is the tool developed within the project?"),
        field("ref", url_list()).describe("List of URLs for the tool and/or codebase"),
        field("purpose", Descriptor::text())
            .describe("Description of the purpose in the context of the project"),
    ])
    .describe("Tool");

    let stack = ObjectShape::strict([
        text_list("database", "List of database systems in use"),
        text_list("backend", "List of backend technologies in use"),
        text_list("frontend", "List of frontend technologies in use"),
        text_list("languages", "List of programming languages (defined broadly) in use"),
        field("tools", Descriptor::array_of(tool)).describe("List of tools that are used in the project"),
    ])
    .describe("Information about the tech stack used in the project");

    let project = ObjectShape::strict([
        field("title", Descriptor::text()).describe("Official title of the project"),
        field("abbr", Descriptor::text_max(ABBR_MAX_LEN))
            .describe("Abbreviation of the project title (optional)"),
        field("type", Descriptor::one_of(["organization", "project"]))
            .describe("Entity type (organization | project)"),
        field("ref", Descriptor::array_of(Descriptor::url_or_empty()))
            .describe("List of authority file URIs"),
        field("date", Descriptor::array_of(active_period))
            .describe("List of active periods (YYYY-MM-DD)"),
        websites("List of project website URLs"),
        field("project_desc", Descriptor::text_max(PROJECT_DESC_MAX_LEN))
            .describe("Short description of the project"),
        field("places", Descriptor::array_of(place)).describe("Location(s) of the project"),
        language_codes("List of languages used in the project's output (ISO-639-3 codes)"),
        field("host_institutions", Descriptor::array_of(host_institution))
            .describe("Universities or research organizations which host the project"),
        field("relations", Descriptor::array_of(relation))
            .describe("Entities that are related to the project"),
        field("contacts", Descriptor::array_of(contact)).describe("Main contact(s) of the project"),
        field("research_data", research_data),
        field("policies", Descriptor::array_of(policy)).describe(
            "Information about policies (e.g. RDP, RDM, OA) applicable to the project and its \
             publications and data",
        ),
        field("stack", stack),
        field("keywords", Descriptor::array_of(vocabulary.as_descriptor())).describe(
            "List of keywords to describe the project; use lowercase letters, with underscore \
             as a separator where needed",
        ),
        field("comment", Descriptor::text())
            .describe("Any commentary that doesn't fit elsewhere in the schema"),
    ])
    .describe("Information about the project");

    Ok(ObjectShape::strict([
        field("schema_version", Descriptor::labelled_literal("schema version", SCHEMA_VERSION))
            .describe("Version of the project JSON schema"),
        field("record_metadata", record_metadata),
        field("project", project),
    ])
    .describe(
        "Project that deals in some way with the digital humanities, research data management, \
         non-Latin scripts, or infrastructure",
    )
    .into())
}

/// `{text, ref[]}`: a name plus the authority files identifying it.
fn named_reference(text_description: &str, hint: &str) -> ObjectShape {
    ObjectShape::strict([
        field("text", Descriptor::text()).describe(text_description),
        field("ref", url_list()).describe("List of authority file URIs"),
    ])
    .describe(hint)
}

fn data_stage(description: &str) -> ObjectShape {
    let datatype = ObjectShape::strict([
        field("label", Descriptor::text()).describe("Label for the datatype"),
        licensing("List of licenses that apply to the datatype"),
        field("open_access", Descriptor::integer(0, 100))
            .describe("Approximate percentage of this datatype available open-access"),
    ])
    .describe("Datatype");

    let repository = ObjectShape::strict([
        field("type", Descriptor::one_of(["local", "remote"])),
        field("accessibility", Descriptor::one_of(["restricted", "open"])).describe(
            "Information about the accessibility of the repository; if local and open, please explain",
        ),
        field("ref", Descriptor::optional(url_list()))
            .describe("List of repository URLs (if applicable)"),
        field("description", Descriptor::text()).describe("Repository description, e.g. 'GitHub'"),
    ])
    .describe("Repository");

    ObjectShape::strict([
        field("datatypes", Descriptor::array_of(datatype))
            .describe("List of datatypes contained in the project's research data"),
        field("repositories", Descriptor::array_of(repository))
            .describe("Information about local or remote repositories"),
    ])
    .describe(description)
}

fn url_list() -> Descriptor {
    Descriptor::array_of(Descriptor::url())
}

fn websites(description: &str) -> Field {
    field("websites", url_list()).describe(description)
}

fn licensing(description: &str) -> Field {
    field("licensing", Descriptor::array_of(Descriptor::text())).describe(description)
}

fn text_list(name: &str, description: &str) -> Field {
    field(name, Descriptor::array_of(Descriptor::text())).describe(description)
}

/// The project schema bound to its keyword vocabulary.
///
/// Cheap to share: wrap in an `Arc` and validate records from any number
/// of threads.
#[derive(Debug, Clone)]
pub struct ProjectValidator {
    schema: Descriptor,
    vocabulary: Arc<Vocabulary>,
}

impl ProjectValidator {
    /// Build the schema for `vocabulary`.
    ///
    /// # Errors
    ///
    /// See [`project_schema`].
    pub fn new(vocabulary: Vocabulary) -> Result<Self, ProjectError> {
        let schema = project_schema(&vocabulary)?;
        Ok(Self {
            schema,
            vocabulary: Arc::new(vocabulary),
        })
    }

    /// The descriptor tree.
    pub fn schema(&self) -> &Descriptor {
        &self.schema
    }

    /// The keyword vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Validate one record.
    pub fn validate(&self, record: &Value) -> ValidationResult {
        let result = self.schema.validate(record);
        match &result {
            Ok(_) => tracing::debug!("record accepted"),
            Err(violations) => tracing::debug!(violations = violations.len(), "record rejected"),
        }
        result
    }

    /// Validate one record and decode it into the typed model.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Rejected`] with every violation if the record
    /// breaks the schema.
    pub fn parse(&self, record: &Value) -> Result<ProjectRecord, ProjectError> {
        let normalized = self
            .validate(record)
            .map_err(|violations| ProjectError::Rejected { violations })?;
        serde_json::from_value(normalized.to_json()).map_err(ProjectError::Decode)
    }
}

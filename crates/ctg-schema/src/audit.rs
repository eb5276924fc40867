//! # Schema Audit & Outline
//!
//! Static analysis of descriptor trees, independent of any input record.
//!
//! [`audit_strictness`] reports every object descriptor that tolerates
//! undeclared keys. A project record with a misspelled or stale field must
//! be rejected rather than silently stripped, so the project schema is
//! expected to produce no findings.
//!
//! [`outline`] flattens a tree into one row per declared field, used by
//! `ctg schema` to document the record format.
//!
//! Paths use the same dotted notation as violations, with `[]` standing
//! for "every element of this array".

use serde::Serialize;

use crate::descriptor::Descriptor;

/// An object descriptor that does not reject undeclared keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrictnessFinding {
    /// Where the object sits in the tree, e.g. `project.places[]`.
    pub path: String,
    /// The object's description, if it has one.
    pub description: Option<String>,
    /// What to change.
    pub recommendation: String,
}

/// One declared field of a descriptor tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Dotted path, e.g. `project.contacts[].role`.
    pub path: String,
    /// Short type summary, e.g. `integer 0..=3`.
    pub type_summary: String,
    /// Whether the field must be present.
    pub required: bool,
    /// The field's description, if it has one.
    pub description: Option<String>,
}

/// Audit a descriptor tree for non-strict objects.
///
/// Visits objects inside arrays, unions and optional fields too.
pub fn audit_strictness(descriptor: &Descriptor) -> Vec<StrictnessFinding> {
    let mut findings = Vec::new();
    audit_node(descriptor, "", &mut findings);
    findings
}

fn audit_node(descriptor: &Descriptor, path: &str, findings: &mut Vec<StrictnessFinding>) {
    match descriptor {
        Descriptor::Scalar(_) | Descriptor::Literal(_) | Descriptor::Enum(_) => {}
        Descriptor::Union(alternatives) => {
            for alternative in alternatives {
                audit_node(alternative, path, findings);
            }
        }
        Descriptor::Array(element) => audit_node(element, &format!("{path}[]"), findings),
        Descriptor::Optional(inner) => audit_node(inner, path, findings),
        Descriptor::Object(shape) => {
            if !shape.is_strict() {
                findings.push(StrictnessFinding {
                    path: display_path(path),
                    description: shape.description().map(str::to_string),
                    recommendation: "Declare the object strict so undeclared keys are rejected"
                        .to_string(),
                });
            }
            for field in shape.fields() {
                audit_node(field.descriptor(), &join(path, field.name()), findings);
            }
        }
    }
}

/// Flatten a descriptor tree into one entry per declared field, depth-first
/// in declaration order.
pub fn outline(descriptor: &Descriptor) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    outline_node(descriptor, "", &mut entries);
    entries
}

fn outline_node(descriptor: &Descriptor, path: &str, entries: &mut Vec<OutlineEntry>) {
    match descriptor {
        Descriptor::Scalar(_) | Descriptor::Literal(_) | Descriptor::Enum(_) => {}
        Descriptor::Union(alternatives) => {
            for alternative in alternatives {
                outline_node(alternative, path, entries);
            }
        }
        Descriptor::Array(element) => outline_node(element, &format!("{path}[]"), entries),
        Descriptor::Optional(inner) => outline_node(inner, path, entries),
        Descriptor::Object(shape) => {
            for field in shape.fields() {
                let child = join(path, field.name());
                entries.push(OutlineEntry {
                    path: child.clone(),
                    type_summary: field.descriptor().type_summary(),
                    required: field.is_required(),
                    description: field.description().map(str::to_string),
                });
                outline_node(field.descriptor(), &child, entries);
            }
        }
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{field, ObjectShape};

    fn tree(inner_strict: bool) -> Descriptor {
        let coordinates = [field("lat", Descriptor::text()), field("lng", Descriptor::text())];
        let inner = if inner_strict {
            ObjectShape::strict(coordinates)
        } else {
            ObjectShape::lenient(coordinates).describe("coordinates")
        };
        ObjectShape::strict([
            field("title", Descriptor::text()).describe("Official title"),
            field(
                "places",
                Descriptor::array_of(ObjectShape::strict([field("coordinates", inner)])),
            ),
            field("ref", Descriptor::optional(Descriptor::array_of(Descriptor::url()))),
        ])
        .into()
    }

    #[test]
    fn test_strict_tree_has_no_findings() {
        assert!(audit_strictness(&tree(true)).is_empty());
    }

    #[test]
    fn test_nested_lenient_object_is_found() {
        let findings = audit_strictness(&tree(false));
        assert_eq!(findings.len(), 1, "got: {findings:?}");
        assert_eq!(findings[0].path, "places[].coordinates");
        assert_eq!(findings[0].description.as_deref(), Some("coordinates"));
    }

    #[test]
    fn test_lenient_root_is_reported_as_root() {
        let root: Descriptor = ObjectShape::lenient([field("a", Descriptor::text())]).into();
        assert_eq!(audit_strictness(&root)[0].path, "(root)");
    }

    #[test]
    fn test_objects_inside_unions_are_audited() {
        let d = Descriptor::union([
            Descriptor::literal(""),
            ObjectShape::lenient([field("a", Descriptor::text())]).into(),
        ]);
        assert_eq!(audit_strictness(&d).len(), 1);
    }

    #[test]
    fn test_outline_rows() {
        let rows = outline(&tree(true));
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "title",
                "places",
                "places[].coordinates",
                "places[].coordinates.lat",
                "places[].coordinates.lng",
                "ref",
            ]
        );
        assert_eq!(rows[0].description.as_deref(), Some("Official title"));
        assert_eq!(rows[0].type_summary, "string");
        assert!(rows[0].required);
        assert!(!rows[5].required);
        assert_eq!(rows[5].type_summary, "optional<array<url>>");
    }
}

//! # Keyword Vocabulary
//!
//! The `keywords` field of a project record may only use terms from an
//! external taxonomy. The taxonomy groups keywords by category:
//!
//! ```json
//! { "methods": ["ocr", "htr"], "scripts": ["arabic", "cjk"] }
//! ```
//!
//! For validation the categories are flattened into one set. The set must
//! be non-empty and must not contain any keyword twice, whether within one
//! category or across two. Both properties are checked once, when the
//! vocabulary is built, and a violation fails startup instead of any
//! individual record.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::descriptor::Descriptor;

/// Error while building the keyword vocabulary.
#[derive(Error, Debug)]
pub enum VocabularyError {
    /// The taxonomy contains no keywords at all.
    #[error("keyword vocabulary is empty")]
    Empty,

    /// A keyword appears more than once.
    #[error("duplicate keyword {keyword:?} (in categories {first_category:?} and {second_category:?})")]
    Duplicate {
        /// The repeated keyword.
        keyword: String,
        /// Category of the first occurrence.
        first_category: String,
        /// Category of the repeated occurrence (may equal `first_category`).
        second_category: String,
    },

    /// The taxonomy is not an object of category → list of strings.
    #[error("malformed keyword taxonomy: {0}")]
    Parse(#[from] serde_json::Error),

    /// The taxonomy file could not be read.
    #[error("cannot read keyword taxonomy {}: {source}", path.display())]
    Io {
        /// Path of the taxonomy file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// The flattened, duplicate-free set of allowed keywords.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    keywords: Vec<String>,
    category_of: BTreeMap<String, String>,
    categories: BTreeMap<String, Vec<String>>,
    allowed: Arc<BTreeSet<String>>,
}

impl Vocabulary {
    /// Flatten a category → keywords mapping.
    ///
    /// Categories are visited in key order and keywords in list order; the
    /// first repeated keyword aborts construction.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::Duplicate`] or [`VocabularyError::Empty`].
    pub fn from_categories(categories: BTreeMap<String, Vec<String>>) -> Result<Self, VocabularyError> {
        let mut keywords = Vec::new();
        let mut category_of: BTreeMap<String, String> = BTreeMap::new();

        for (category, terms) in &categories {
            for term in terms {
                if let Some(first) = category_of.get(term) {
                    return Err(VocabularyError::Duplicate {
                        keyword: term.clone(),
                        first_category: first.clone(),
                        second_category: category.clone(),
                    });
                }
                category_of.insert(term.clone(), category.clone());
                keywords.push(term.clone());
            }
        }

        if keywords.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let allowed = Arc::new(keywords.iter().cloned().collect::<BTreeSet<_>>());
        tracing::debug!(
            keyword_count = keywords.len(),
            category_count = categories.len(),
            "built keyword vocabulary"
        );

        Ok(Self {
            keywords,
            category_of,
            categories,
            allowed,
        })
    }

    /// Parse a taxonomy document.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::Parse`] for malformed JSON, and the
    /// [`Vocabulary::from_categories`] errors otherwise.
    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let categories: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_categories(categories)
    }

    /// Read and parse a taxonomy file.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::Io`] if the file cannot be read, and the
    /// [`Vocabulary::from_json_str`] errors otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let vocabulary = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            keyword_count = vocabulary.len(),
            "loaded keyword vocabulary"
        );
        Ok(vocabulary)
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Always false: construction rejects empty taxonomies.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether `keyword` is allowed (exact, case-sensitive).
    pub fn contains(&self, keyword: &str) -> bool {
        self.allowed.contains(keyword)
    }

    /// The category a keyword was listed under.
    pub fn category_of(&self, keyword: &str) -> Option<&str> {
        self.category_of.get(keyword).map(String::as_str)
    }

    /// Categories and their keywords, as loaded.
    pub fn categories(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categories
    }

    /// Keywords in flattening order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// An enum descriptor over this vocabulary. The member set is shared, not copied.
    pub fn as_descriptor(&self) -> Descriptor {
        Descriptor::enumeration(Arc::clone(&self.allowed))
    }
}

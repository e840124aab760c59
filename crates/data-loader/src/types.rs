//! Core domain types for expert search results.
//!
//! A [`Candidate`] is one raw, untrusted record returned by a search backend.
//! Only the fields the validator looks at are typed; everything else rides
//! along in [`Candidate::extra`] and is serialized back unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque identifier issued by the search backend.
///
/// Backends hand out ids as strings or numbers; both are normalized to the
/// string form so `7` and `"7"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for CandidateId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(Number),
}

impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => CandidateId(s),
            RawId::Number(n) => CandidateId(n.to_string()),
        })
    }
}

impl Serialize for CandidateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// =============================================================================
// Candidate
// =============================================================================

/// Fields backends spell both ways, as (camelCase, snake_case).
const DUAL_SPELLINGS: [(&str, &str); 4] = [
    ("profileUrl", "profile_url"),
    ("linkedinUrl", "linkedin_url"),
    ("publicationsCount", "publications_count"),
    ("citationsCount", "citations_count"),
];

/// One search result record, as returned by a search backend.
///
/// Field names follow the camelCase wire shape; the snake_case spellings used
/// by the expert backend are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CandidateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, alias = "profile_url", skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, alias = "linkedin_url", skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "publications_count", skip_serializing_if = "Option::is_none")]
    pub publications_count: Option<u64>,
    #[serde(default, alias = "citations_count", skip_serializing_if = "Option::is_none")]
    pub citations_count: Option<u64>,
    /// Fields this crate doesn't model, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    /// Create a candidate with just an id and a name.
    pub fn new(id: impl Into<CandidateId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Interpret an untyped JSON record as a candidate.
    ///
    /// Returns `None` for anything that isn't a well-formed candidate object
    /// (null, arrays, wrong field types, negative counts).
    ///
    /// When a record carries both spellings of a field the camelCase one is
    /// decoded and the snake_case one is kept in [`Candidate::extra`].
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let mut shadowed = Map::new();
        for (camel, snake) in DUAL_SPELLINGS {
            if fields.contains_key(camel) {
                if let Some(duplicate) = fields.remove(snake) {
                    shadowed.insert(snake.to_string(), duplicate);
                }
            }
        }

        let mut candidate: Candidate = serde_json::from_value(Value::Object(fields)).ok()?;
        candidate.extra.extend(shadowed);
        Some(candidate)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = Some(skills.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = Some(url.into());
        self
    }

    pub fn with_linkedin_url(mut self, url: impl Into<String>) -> Self {
        self.linkedin_url = Some(url.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_publications(mut self, count: u64) -> Self {
        self.publications_count = Some(count);
        self
    }

    pub fn with_citations(mut self, count: u64) -> Self {
        self.citations_count = Some(count);
        self
    }

    /// The name, if present and not blank.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    /// Organization, falling back to company.
    pub fn affiliation(&self) -> Option<&str> {
        non_blank(&self.organization).or_else(|| non_blank(&self.company))
    }

    /// Non-blank profile links, `profileUrl` first.
    pub fn profile_links(&self) -> impl Iterator<Item = &str> {
        [&self.profile_url, &self.linkedin_url]
            .into_iter()
            .filter_map(non_blank)
    }
}

/// `Some(trimmed)` when the field is present and has non-whitespace content.
pub fn non_blank(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// =============================================================================
// SearchPage
// =============================================================================

/// One page of raw results from a search backend.
///
/// `total_results` is the backend's own claim about the number of matches and
/// is treated as advisory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub candidates: Vec<Candidate>,
    pub total_results: usize,
    pub requested_offset: usize,
    pub requested_limit: usize,
}

impl SearchPage {
    pub fn new(
        candidates: Vec<Candidate>,
        total_results: usize,
        requested_offset: usize,
        requested_limit: usize,
    ) -> Self {
        Self {
            candidates,
            total_results,
            requested_offset,
            requested_limit,
        }
    }

    /// Number of records the backend returned for this page.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

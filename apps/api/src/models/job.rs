use serde::{Deserialize, Serialize};

/// A job posting translated from any provider into the common schema.
///
/// Fields a provider cannot supply stay at their zero value. `source` is always
/// set by the adapter that produced the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub description: String,
    pub url: String,
    /// `YYYY-MM-DD`, or empty when the provider date could not be parsed.
    pub posted_date: String,
    pub employment_type: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub currency: Option<String>,
    pub is_remote: bool,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub source: String,
    /// Scratch value owned by the keyword filter stage.
    #[serde(skip)]
    pub relevance_score: u32,
}

/// Key used to detect the same posting coming back twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    JobId(String),
    TitleCompany(String, String),
}

impl NormalizedJob {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn identity_key(&self) -> IdentityKey {
        let job_id = normalize_key_part(&self.job_id);
        if !job_id.is_empty() {
            return IdentityKey::JobId(job_id);
        }
        IdentityKey::TitleCompany(
            normalize_key_part(&self.title),
            normalize_key_part(&self.company),
        )
    }

    /// Lowercased location, city, state and country joined for matching.
    pub fn location_text(&self) -> String {
        [
            Some(self.location.as_str()),
            self.city.as_deref(),
            self.state.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

fn normalize_key_part(value: &str) -> String {
    value.trim().to_lowercase()
}

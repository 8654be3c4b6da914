use serde::{Deserialize, Serialize};

/// Smallest and largest result count a caller may ask for.
pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 50;
pub const DEFAULT_LIMIT: usize = 10;

/// Seniority bucket requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Internship,
    #[serde(alias = "entry_level")]
    Entry,
    #[serde(alias = "mid_level")]
    Associate,
    #[serde(alias = "senior", alias = "mid-senior")]
    MidSenior,
    Director,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "internship",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Associate => "associate",
            ExperienceLevel::MidSenior => "mid_senior",
            ExperienceLevel::Director => "director",
            ExperienceLevel::Executive => "executive",
        }
    }
}

/// One job search as received from the HTTP layer.
/// Immutable for the lifetime of the search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub keywords: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl SearchRequest {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            location: None,
            experience_level: None,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_experience(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// The requested limit clamped into `MIN_LIMIT..=MAX_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(MIN_LIMIT, MAX_LIMIT)
    }

    /// The location with surrounding whitespace removed, or `None` when blank.
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

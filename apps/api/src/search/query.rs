//! Query Composer: embeds location and experience terms in the provider query text,
//! because provider-native filters for both are unreliable.

use crate::models::search::{ExperienceLevel, SearchRequest};
use crate::providers::{CompositionRule, LocationPlacement, ProviderQuery};
use crate::search::location::{is_remote_location, NormalizedLocation};

/// Appended to the keywords when a search has to look past the requested location.
pub const BROADENING_TERMS: &str = "international global remote worldwide";

/// Static phrase appended to the query for each experience level.
pub fn experience_phrase(level: ExperienceLevel) -> &'static str {
    match level {
        ExperienceLevel::Internship => "intern internship",
        ExperienceLevel::Entry => "entry level junior",
        ExperienceLevel::Associate => "associate",
        ExperienceLevel::MidSenior => "senior mid level",
        ExperienceLevel::Director => "director manager",
        ExperienceLevel::Executive => "executive VP president",
    }
}

/// Builds the query for one provider.
///
/// Experience terms are only embedded for well-covered locations: in non-English
/// markets they cut recall. Location placement follows the provider's rule.
pub fn compose_query(
    request: &SearchRequest,
    location: &NormalizedLocation,
    rule: CompositionRule,
    limit: usize,
) -> ProviderQuery {
    let mut parts = vec![request.keywords.trim().to_string()];
    let mut native_location = None;

    if !location.is_empty() {
        match rule.location {
            LocationPlacement::Inline => parts.push(location.canonical.clone()),
            LocationPlacement::Native => native_location = Some(location.canonical.clone()),
            LocationPlacement::Omit => {}
        }
    }

    if rule.experience_inline && location.is_well_covered() {
        if let Some(level) = request.experience_level {
            parts.push(experience_phrase(level).to_string());
        }
    }

    ProviderQuery {
        text: parts.join(" "),
        location: native_location,
        limit,
        remote_only: location.is_empty() || is_remote_location(&location.canonical),
    }
}

/// Location-free query baited with remote/international terms.
pub fn compose_broadened_query(request: &SearchRequest, limit: usize) -> ProviderQuery {
    ProviderQuery {
        text: format!("{} {}", request.keywords.trim(), BROADENING_TERMS),
        location: None,
        limit,
        remote_only: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::location::normalize_location;

    const INLINE: CompositionRule = CompositionRule {
        location: LocationPlacement::Inline,
        experience_inline: true,
    };
    const NATIVE: CompositionRule = CompositionRule {
        location: LocationPlacement::Native,
        experience_inline: true,
    };
    const OMIT: CompositionRule = CompositionRule {
        location: LocationPlacement::Omit,
        experience_inline: false,
    };

    #[test]
    fn test_well_covered_gets_experience_and_location() {
        let request = SearchRequest::new("software engineer")
            .with_location("nyc")
            .with_experience(ExperienceLevel::Entry);
        let location = normalize_location("nyc");

        let query = compose_query(&request, &location, INLINE, 10);
        assert_eq!(query.text, "software engineer New York, NY entry level junior");
        assert_eq!(query.location, None);
        assert!(!query.remote_only);
    }

    #[test]
    fn test_under_covered_drops_experience_keeps_inline_location() {
        let request = SearchRequest::new("data scientist")
            .with_location("tel aviv")
            .with_experience(ExperienceLevel::MidSenior);
        let location = normalize_location("tel aviv");

        let query = compose_query(&request, &location, INLINE, 10);
        assert_eq!(query.text, "data scientist Tel Aviv, Israel");
    }

    #[test]
    fn test_native_location_travels_out_of_band() {
        let request = SearchRequest::new("data scientist").with_location("Tel Aviv");
        let location = normalize_location("Tel Aviv");

        let query = compose_query(&request, &location, NATIVE, 10);
        assert_eq!(query.text, "data scientist");
        assert_eq!(query.location.as_deref(), Some("Tel Aviv, Israel"));
    }

    #[test]
    fn test_omit_rule_sends_keywords_only() {
        let request = SearchRequest::new("rust")
            .with_location("Berlin")
            .with_experience(ExperienceLevel::Entry);
        let location = normalize_location("Berlin");

        let query = compose_query(&request, &location, OMIT, 5);
        assert_eq!(query.text, "rust");
        assert_eq!(query.location, None);
        assert_eq!(query.limit, 5);
    }

    #[test]
    fn test_no_location_is_remote_only() {
        let request = SearchRequest::new("rust").with_experience(ExperienceLevel::Internship);
        let location = normalize_location("");

        let query = compose_query(&request, &location, INLINE, 10);
        assert_eq!(query.text, "rust intern internship");
        assert!(query.remote_only);
    }

    #[test]
    fn test_remote_location_is_remote_only() {
        let request = SearchRequest::new("rust").with_location("Remote");
        let query = compose_query(&request, &normalize_location("Remote"), OMIT, 10);
        assert!(query.remote_only);
    }

    #[test]
    fn test_broadened_query() {
        let request = SearchRequest::new(" data scientist ").with_location("Tel Aviv");
        let query = compose_broadened_query(&request, 10);
        assert_eq!(
            query.text,
            "data scientist international global remote worldwide"
        );
        assert!(query.location.is_none());
        assert!(query.remote_only);
    }
}

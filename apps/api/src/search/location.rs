//! Location normalizer: canonicalizes free-text locations and classifies how well the
//! primary board covers them.
//!
//! Both tables are plain data: tune by editing the entries.

use crate::search::text::contains_word;

/// Whether embedding extra terms in the query is expected to help for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    WellCovered,
    UnderCovered,
}

/// A location after alias resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLocation {
    pub canonical: String,
    pub coverage: Coverage,
}

impl NormalizedLocation {
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    pub fn is_well_covered(&self) -> bool {
        self.coverage == Coverage::WellCovered
    }
}

/// Case-insensitive alias → canonical display form.
const LOCATION_ALIASES: &[(&str, &str)] = &[
    ("tel aviv", "Tel Aviv, Israel"),
    ("tel-aviv", "Tel Aviv, Israel"),
    ("telaviv", "Tel Aviv, Israel"),
    ("tel aviv-yafo", "Tel Aviv, Israel"),
    ("israel", "Israel"),
    ("jerusalem", "Jerusalem, Israel"),
    ("haifa", "Haifa, Israel"),
    ("new york", "New York, NY"),
    ("new york city", "New York, NY"),
    ("nyc", "New York, NY"),
    ("sf", "San Francisco, CA"),
    ("san francisco", "San Francisco, CA"),
    ("bay area", "San Francisco, CA"),
    ("la", "Los Angeles, CA"),
    ("los angeles", "Los Angeles, CA"),
    ("dc", "Washington, DC"),
    ("washington dc", "Washington, DC"),
    ("london", "London, UK"),
    ("paris", "Paris, France"),
    ("berlin", "Berlin, Germany"),
    ("munich", "Munich, Germany"),
    ("münchen", "Munich, Germany"),
    ("amsterdam", "Amsterdam, Netherlands"),
    ("barcelona", "Barcelona, Spain"),
    ("madrid", "Madrid, Spain"),
    ("zurich", "Zurich, Switzerland"),
    ("stockholm", "Stockholm, Sweden"),
    ("dublin", "Dublin, Ireland"),
    ("tokyo", "Tokyo, Japan"),
];

/// Substrings of locations the primary board and the keyword-embedding strategy cover well.
const WELL_COVERED_REGIONS: &[&str] = &[
    // English-speaking countries
    "united states",
    "usa",
    "us",
    "america",
    "canada",
    "uk",
    "united kingdom",
    "england",
    "scotland",
    "wales",
    "australia",
    "new zealand",
    "ireland",
    "south africa",
    // US states and large English-speaking metros
    "new york",
    "ny",
    "california",
    "ca",
    "texas",
    "florida",
    "washington",
    "seattle",
    "san francisco",
    "los angeles",
    "chicago",
    "boston",
    "atlanta",
    "denver",
    "austin",
    "miami",
    "philadelphia",
    "toronto",
    "vancouver",
    "sydney",
    "melbourne",
    "london",
    // location-free searches
    "remote",
    "anywhere",
    "global",
    "worldwide",
];

/// Locations that mean "no particular place".
const REMOTE_LOCATIONS: &[&str] = &["remote", "anywhere", "global", "worldwide"];

/// Resolves aliases and classifies coverage. Unknown strings pass through trimmed.
pub fn normalize_location(raw: &str) -> NormalizedLocation {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizedLocation {
            canonical: String::new(),
            coverage: Coverage::WellCovered,
        };
    }

    let lower = trimmed.to_lowercase();
    let canonical = LOCATION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string());

    let coverage = classify_coverage(&canonical);
    NormalizedLocation {
        canonical,
        coverage,
    }
}

fn classify_coverage(location: &str) -> Coverage {
    let lower = location.to_lowercase();
    if WELL_COVERED_REGIONS
        .iter()
        .any(|region| contains_word(&lower, region))
    {
        Coverage::WellCovered
    } else {
        Coverage::UnderCovered
    }
}

/// True for "remote", "anywhere", "global" and "worldwide", in any case.
pub fn is_remote_location(location: &str) -> bool {
    let lower = location.trim().to_lowercase();
    REMOTE_LOCATIONS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lookup_is_case_insensitive() {
        assert_eq!(normalize_location("NYC").canonical, "New York, NY");
        assert_eq!(normalize_location(" tel-aviv ").canonical, "Tel Aviv, Israel");
    }

    #[test]
    fn test_unknown_location_passes_through_trimmed() {
        let loc = normalize_location("  Kraków ");
        assert_eq!(loc.canonical, "Kraków");
        assert_eq!(loc.coverage, Coverage::UnderCovered);
    }

    #[test]
    fn test_empty_location_is_well_covered() {
        let loc = normalize_location("   ");
        assert!(loc.is_empty());
        assert!(loc.is_well_covered());
    }

    #[test]
    fn test_english_regions_are_well_covered() {
        assert!(normalize_location("nyc").is_well_covered());
        assert!(normalize_location("Austin, TX").is_well_covered());
        assert!(normalize_location("london").is_well_covered());
        assert!(normalize_location("Toronto, Canada").is_well_covered());
    }

    #[test]
    fn test_international_cities_are_under_covered() {
        assert_eq!(normalize_location("Berlin").coverage, Coverage::UnderCovered);
        assert_eq!(normalize_location("tel aviv").coverage, Coverage::UnderCovered);
        assert_eq!(normalize_location("Paris").coverage, Coverage::UnderCovered);
    }

    #[test]
    fn test_short_region_codes_need_whole_words() {
        // "us" inside "Belarus" or "ca" inside "Casablanca" must not count
        assert_eq!(normalize_location("Minsk, Belarus").coverage, Coverage::UnderCovered);
        assert_eq!(normalize_location("Casablanca").coverage, Coverage::UnderCovered);
    }

    #[test]
    fn test_remote_locations() {
        assert!(is_remote_location("Remote"));
        assert!(is_remote_location(" anywhere "));
        assert!(!is_remote_location("Remote Island"));
        assert!(normalize_location("remote").is_well_covered());
    }
}

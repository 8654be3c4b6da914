//! Experience-Level Filter: conservative positive/negative keyword classifier.

use tracing::info;

use crate::models::job::NormalizedJob;
use crate::models::search::ExperienceLevel;
use crate::search::text::contains_word;

/// Below this many survivors the filter is skipped: over-pruning is worse than
/// under-filtering.
pub const EXPERIENCE_FLOOR: usize = 3;

struct LevelTerms {
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

fn level_terms(level: ExperienceLevel) -> LevelTerms {
    match level {
        ExperienceLevel::Internship => LevelTerms {
            positive: &["intern", "internship", "student", "trainee"],
            negative: &["senior", "lead", "principal", "director", "manager", "experienced"],
        },
        ExperienceLevel::Entry => LevelTerms {
            positive: &["entry level", "entry-level", "junior", "graduate", "new grad"],
            negative: &["senior", "lead", "principal", "director", "sr", "staff"],
        },
        ExperienceLevel::Associate => LevelTerms {
            positive: &["associate", "mid level", "mid-level", "intermediate", "experienced"],
            negative: &["intern", "junior", "new grad"],
        },
        ExperienceLevel::MidSenior => LevelTerms {
            positive: &["senior", "lead", "principal", "staff"],
            negative: &["intern", "junior", "new grad", "entry", "associate"],
        },
        ExperienceLevel::Director => LevelTerms {
            positive: &["director", "head of", "manager"],
            negative: &["intern", "junior", "entry", "associate"],
        },
        ExperienceLevel::Executive => LevelTerms {
            positive: &["executive", "vp", "vice president", "chief", "cto", "ceo"],
            negative: &["intern", "junior", "entry", "associate"],
        },
    }
}

/// Keeps a job when it mentions the level, or at least nothing that contradicts it.
///
/// Returns the input unchanged when fewer than `EXPERIENCE_FLOOR` jobs would survive.
pub fn filter_by_experience(
    jobs: Vec<NormalizedJob>,
    level: ExperienceLevel,
) -> Vec<NormalizedJob> {
    let terms = level_terms(level);

    let keep: Vec<bool> = jobs
        .iter()
        .map(|job| {
            let text = format!("{} {}", job.title, job.description).to_lowercase();
            let positive = terms.positive.iter().any(|t| contains_word(&text, t));
            let negative = terms.negative.iter().any(|t| contains_word(&text, t));
            positive || !negative
        })
        .collect();

    let kept = keep.iter().filter(|k| **k).count();
    if kept < EXPERIENCE_FLOOR {
        info!(
            "Experience filtering ({}) would leave {} of {} jobs, skipping",
            level.as_str(),
            kept,
            jobs.len()
        );
        return jobs;
    }

    info!(
        "Experience filtering ({}): {} -> {} jobs",
        level.as_str(),
        jobs.len(),
        kept
    );
    jobs.into_iter()
        .zip(keep)
        .filter_map(|(job, keep)| keep.then_some(job))
        .collect()
}

//! Deduplicator & Limiter. First occurrence wins; order is never changed.

use std::collections::HashSet;

use crate::models::job::NormalizedJob;

pub fn dedup(jobs: Vec<NormalizedJob>) -> Vec<NormalizedJob> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(job.identity_key()))
        .collect()
}

pub fn dedup_and_limit(jobs: Vec<NormalizedJob>, limit: usize) -> Vec<NormalizedJob> {
    let mut result = dedup(jobs);
    result.truncate(limit);
    result
}

//! Keyword Relevance Filter: synonym-expanded term hits, ranked by count.

use std::collections::BTreeSet;

use tracing::info;

use crate::models::job::NormalizedJob;
use crate::search::text::contains_term;

const STOPWORDS: &[&str] = &["and", "or", "the", "a", "an", "in", "at", "of", "for", "with"];

/// Query token → terms that count as a hit for it.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("js", &["javascript", "js"]),
    ("javascript", &["javascript", "js"]),
    ("python", &["python", "django", "flask"]),
    ("react", &["react", "reactjs", "react.js"]),
    ("vue", &["vue", "vuejs", "vue.js"]),
    ("angular", &["angular", "angularjs"]),
    ("node", &["node", "nodejs", "node.js"]),
    ("ai", &["ai", "artificial intelligence", "machine learning", "ml"]),
    ("ml", &["machine learning", "ml", "ai"]),
    ("data", &["data", "analytics", "scientist"]),
    ("software", &["software", "engineer", "developer", "programming"]),
    ("frontend", &["frontend", "front-end", "ui", "user interface"]),
    ("backend", &["backend", "back-end", "api", "server"]),
    ("fullstack", &["fullstack", "full-stack", "full stack"]),
    ("devops", &["devops", "dev ops", "infrastructure", "cloud"]),
    ("mobile", &["mobile", "ios", "android", "react native", "flutter"]),
];

/// Query tokens minus stopwords, expanded through the synonym table.
///
/// Ordered so scoring is deterministic.
pub fn expand_terms(keywords: &str) -> BTreeSet<String> {
    let mut expanded = BTreeSet::new();

    for token in keywords.split_whitespace() {
        let token = token
            .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '!' | '?' | '(' | ')' | '"' | '\''))
            .to_lowercase();
        if token.is_empty() || STOPWORDS.contains(&token.as_str()) {
            continue;
        }
        if let Some((_, synonyms)) = SYNONYMS.iter().find(|(key, _)| *key == token) {
            expanded.extend(synonyms.iter().map(|s| s.to_string()));
        }
        expanded.insert(token);
    }

    expanded
}

fn searchable_text(job: &NormalizedJob) -> String {
    format!(
        "{} {} {} {}",
        job.title,
        job.description,
        job.tags.join(" "),
        job.employment_type
    )
    .to_lowercase()
}

/// Scores every job by distinct expanded-term hits, drops zero scores and sorts
/// descending. Ties keep input order.
///
/// When the keywords expand to nothing (only stopwords) every job is kept in its
/// original order.
pub fn filter_by_keywords(jobs: Vec<NormalizedJob>, keywords: &str) -> Vec<NormalizedJob> {
    let terms = expand_terms(keywords);
    let input_count = jobs.len();

    if terms.is_empty() {
        return jobs
            .into_iter()
            .map(|mut job| {
                job.relevance_score = 0;
                job
            })
            .collect();
    }

    let mut kept: Vec<NormalizedJob> = jobs
        .into_iter()
        .filter_map(|mut job| {
            let text = searchable_text(&job);
            let score = terms.iter().filter(|t| contains_term(&text, t)).count() as u32;
            job.relevance_score = score;
            (score > 0).then_some(job)
        })
        .collect();

    // stable: equal scores keep provider order
    kept.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

    info!(
        "Keyword filtering for '{}': {} -> {} jobs",
        keywords,
        input_count,
        kept.len()
    );
    kept
}

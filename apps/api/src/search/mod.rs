//! Search pipeline: location normalization, query composition, the provider
//! fallback policy and the relevance filters applied to every batch.

pub mod dedup;
pub mod discovery;
pub mod experience;
pub mod handlers;
pub mod keyword_filter;
pub mod location;
pub mod location_filter;
pub mod orchestrator;
pub mod query;
pub mod text;

//! Gemini `generateContent` client and the two lead adapters built on it:
//! maps-grounded discovery and search-grounded enrichment.

pub mod client;
pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use discovery::{discover_leads, leads_from_grounding, DiscoveryRequest};
pub use enrichment::{
    enrich_lead, merge_patch, parse_patch, EnrichmentPatch, ENRICHMENT_FAILED_NOTE,
    NOT_FOUND_SENTINEL,
};
pub use error::GeminiError;

//! The remote capability the orchestrator is built on, and its Gemini
//! implementation.

use async_trait::async_trait;
use leadgen_core::{AppConfig, Lead};
use leadgen_gemini::{discover_leads, enrich_lead, DiscoveryRequest, GeminiClient, GeminiError};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Discovery and enrichment, as one injected capability.
///
/// Implementations hold no session state; the orchestrator owns the lead
/// collection.
#[async_trait]
pub trait LeadService: Send + Sync {
    /// Find candidate businesses. An empty list means "no matches".
    async fn discover(&self, industry: &str, location: &str) -> Result<Vec<Lead>, BoxError>;

    /// Enrich one lead. Never fails: the returned lead is `Completed` or
    /// `Failed`.
    async fn enrich(&self, lead: Lead) -> Lead;
}

/// [`LeadService`] backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiLeadService {
    client: GeminiClient,
    discovery_model: String,
    enrichment_model: String,
    discovery_limit: u32,
    latitude: f64,
    longitude: f64,
}

impl GeminiLeadService {
    /// Build the service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError`] if the HTTP client cannot be built or the
    /// configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeminiError> {
        let client = GeminiClient::with_base_url(
            &config.gemini_api_key,
            config.request_timeout_secs,
            &config.gemini_base_url,
        )?;
        Ok(Self {
            client,
            discovery_model: config.discovery_model.clone(),
            enrichment_model: config.enrichment_model.clone(),
            discovery_limit: config.discovery_limit,
            latitude: config.default_latitude,
            longitude: config.default_longitude,
        })
    }
}

#[async_trait]
impl LeadService for GeminiLeadService {
    async fn discover(&self, industry: &str, location: &str) -> Result<Vec<Lead>, BoxError> {
        let request = DiscoveryRequest {
            model: &self.discovery_model,
            industry,
            location,
            limit: self.discovery_limit,
            latitude: self.latitude,
            longitude: self.longitude,
        };
        Ok(discover_leads(&self.client, &request).await?)
    }

    async fn enrich(&self, lead: Lead) -> Lead {
        enrich_lead(&self.client, &self.enrichment_model, lead).await
    }
}

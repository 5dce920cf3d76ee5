//! Maps-grounded business discovery.
//!
//! One `generateContent` call with the `googleMaps` tool; the candidates are
//! read from the grounding chunks, not from the generated prose.

use std::collections::HashSet;

use leadgen_core::Lead;

use crate::client::GeminiClient;
use crate::error::GeminiError;
use crate::types::{GenerateContentRequest, GenerateContentResponse, Tool};

/// Placeholder for places the grounding data returns without an address.
pub const ADDRESS_UNAVAILABLE: &str = "Address unavailable";

/// Parameters for one discovery query. `industry` and `location` are expected
/// to be trimmed and non-empty; validation is the caller's job.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest<'a> {
    pub model: &'a str,
    pub industry: &'a str,
    pub location: &'a str,
    pub limit: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl DiscoveryRequest<'_> {
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Find {limit} businesses of type \"{industry}\" in \"{location}\".\n\
             Provide a detailed list. Make sure to include the exact name and \
             address of each one.",
            limit = self.limit,
            industry = self.industry,
            location = self.location,
        )
    }

    fn to_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::prompt(self.prompt(), Tool::GoogleMaps {})
            .with_lat_lng(self.latitude, self.longitude)
    }
}

/// Run a discovery query and convert its grounding chunks into leads.
///
/// An empty result means "no matches" and is not an error.
///
/// # Errors
///
/// Propagates any [`GeminiError`] from the remote call: transport, auth
/// (non-2xx), or an undecodable body.
pub async fn discover_leads(
    client: &GeminiClient,
    request: &DiscoveryRequest<'_>,
) -> Result<Vec<Lead>, GeminiError> {
    let response = client
        .generate_content(request.model, &request.to_request())
        .await?;
    let leads = leads_from_grounding(&response);
    tracing::info!(
        industry = request.industry,
        location = request.location,
        count = leads.len(),
        "discovery completed"
    );
    Ok(leads)
}

/// Extract one `Discovered` lead per distinct place from the response's maps
/// grounding chunks, in chunk order.
///
/// Chunks without a maps reference or with a blank title are skipped. Places
/// are keyed by `placeId`; a chunk with no `placeId` is keyed by its
/// normalised title and address instead.
#[must_use]
pub fn leads_from_grounding(response: &GenerateContentResponse) -> Vec<Lead> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut leads = Vec::new();

    for place in response
        .grounding_chunks()
        .iter()
        .filter_map(|chunk| chunk.maps.as_ref())
    {
        let Some(title) = non_blank(place.title.as_deref()) else {
            tracing::debug!(place_id = ?place.place_id, "skipping place without a title");
            continue;
        };
        let address = non_blank(place.address.as_deref()).unwrap_or(ADDRESS_UNAVAILABLE);
        let place_id = non_blank(place.place_id.as_deref());

        let key = match place_id {
            Some(id) => format!("id:{id}"),
            None => format!(
                "name:{}|{}",
                title.to_lowercase(),
                address.to_lowercase()
            ),
        };
        if !seen.insert(key) {
            tracing::debug!(title, "skipping duplicate place");
            continue;
        }

        leads.push(Lead::discovered(
            title,
            address,
            place_id.map(str::to_string),
            non_blank(place.uri.as_deref()).map(str::to_string),
        ));
    }

    leads
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgen_core::LeadStatus;
    use serde_json::json;

    fn response(chunks: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Here are some businesses."}]},
                "groundingMetadata": {"groundingChunks": chunks}
            }]
        }))
        .unwrap()
    }

    #[test]
    fn two_distinct_places_yield_two_discovered_leads() {
        let resp = response(json!([
            {"maps": {"title": "Boulangerie Paul", "address": "1 Rue A, Lyon", "placeId": "p1", "uri": "https://maps.google.com/?cid=1"}},
            {"maps": {"title": "Maison Pralus", "address": "2 Rue B, Lyon", "placeId": "p2", "uri": "https://maps.google.com/?cid=2"}}
        ]));
        let leads = leads_from_grounding(&resp);
        assert_eq!(leads.len(), 2);
        assert!(leads.iter().all(|l| l.status == LeadStatus::Discovered));
        assert_eq!(leads[0].name, "Boulangerie Paul");
        assert_eq!(leads[1].place_id.as_deref(), Some("p2"));
        assert_eq!(
            leads[0].source_url.as_deref(),
            Some("https://maps.google.com/?cid=1")
        );
        assert_ne!(leads[0].id, leads[1].id);
    }

    #[test]
    fn repeated_place_id_yields_one_lead() {
        let resp = response(json!([
            {"maps": {"title": "Paul", "placeId": "p1"}},
            {"maps": {"title": "Paul (again)", "placeId": "p1"}},
            {"maps": {"title": "Paul", "placeId": "p1"}}
        ]));
        let leads = leads_from_grounding(&resp);
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Paul");
    }

    #[test]
    fn untitled_and_web_chunks_are_skipped() {
        let resp = response(json!([
            {"web": {"uri": "https://example.com", "title": "Example"}},
            {"maps": {"placeId": "p1"}},
            {"maps": {"title": "   ", "placeId": "p2"}},
            {"maps": {"title": "Real Place", "placeId": "p3"}}
        ]));
        let leads = leads_from_grounding(&resp);
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Real Place");
    }

    #[test]
    fn missing_address_uses_placeholder() {
        let resp = response(json!([{"maps": {"title": "No Address Co", "placeId": "p1"}}]));
        let leads = leads_from_grounding(&resp);
        assert_eq!(leads[0].address, ADDRESS_UNAVAILABLE);
    }

    #[test]
    fn places_without_id_dedup_by_name_and_address() {
        let resp = response(json!([
            {"maps": {"title": "Corner Shop", "address": "5 High St"}},
            {"maps": {"title": "corner shop", "address": "5 HIGH ST"}},
            {"maps": {"title": "Corner Shop", "address": "9 Low St"}}
        ]));
        let leads = leads_from_grounding(&resp);
        assert_eq!(leads.len(), 2);
        assert!(leads.iter().all(|l| l.place_id.is_none()));
    }

    #[test]
    fn no_usable_chunks_is_empty_not_error() {
        assert!(leads_from_grounding(&response(json!([]))).is_empty());
        let bare: GenerateContentResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(leads_from_grounding(&bare).is_empty());
    }

    #[test]
    fn prompt_mentions_industry_location_and_limit() {
        let req = DiscoveryRequest {
            model: "m",
            industry: "bakeries",
            location: "Lyon",
            limit: 10,
            latitude: 0.0,
            longitude: 0.0,
        };
        let prompt = req.prompt();
        assert!(prompt.contains("\"bakeries\""));
        assert!(prompt.contains("\"Lyon\""));
        assert!(prompt.contains("Find 10 businesses"));
    }
}

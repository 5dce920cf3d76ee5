//! Search-grounded contact enrichment for a single lead.
//!
//! The model is asked for a fenced JSON object with exactly `website`,
//! `phone`, `email` and `owner`, using [`NOT_FOUND_SENTINEL`] for anything it
//! cannot find. Parsing is best effort: an unreadable reply degrades to an
//! empty patch and the lead still completes. Only a failed remote call marks
//! the lead `Failed`.

use leadgen_core::{Lead, LeadStatus};
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::client::GeminiClient;
use crate::types::{GenerateContentRequest, Tool};

/// Value the model is told to emit for a field it could not find.
pub const NOT_FOUND_SENTINEL: &str = "NOT_FOUND";

/// Diagnostic stored in `notes` when the remote call fails.
pub const ENRICHMENT_FAILED_NOTE: &str = "enrichment request failed";

/// The four fields decoded from an enrichment reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnrichmentPatch {
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub owner: Option<String>,
}

/// Accept strings and bare numbers (phone numbers come back unquoted now and
/// then); anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A found value: present, non-blank, and not the sentinel. Trimmed.
fn hit(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(NOT_FOUND_SENTINEL))
}

#[must_use]
pub fn enrichment_prompt(lead: &Lead) -> String {
    format!(
        r#"Act as an expert business researcher.

Goal: find contact and ownership information for the following business:
Name: "{name}"
Address: "{address}"

Use Google Search to find:
1. The official website.
2. A public phone number.
3. A contact email address (info, sales, contact, etc.).
4. The name of the owner, founder or CEO (deep research).

Return the answer STRICTLY as a valid JSON code block in the following format, with no text before or after it. Use "{sentinel}" for any field you cannot find:
```json
{{
  "website": "url found or {sentinel}",
  "phone": "number or {sentinel}",
  "email": "email or {sentinel}",
  "owner": "name found or {sentinel}"
}}
```"#,
        name = lead.name,
        address = lead.address,
        sentinel = NOT_FOUND_SENTINEL,
    )
}

/// Locate the JSON object in a model reply. Preference order:
/// a ```` ```json ```` fence, then any fence (minus its language tag), then
/// the span from the first `{` to the last `}`.
pub(crate) fn extract_json_block(text: &str) -> Option<&str> {
    let json_fence =
        Regex::new(r"(?is)```json[ \t]*\r?\n(.*?)```").expect("valid json fence regex");
    if let Some(m) = json_fence.captures(text).and_then(|c| c.get(1)) {
        return Some(m.as_str());
    }

    let any_fence = Regex::new(r"(?s)```(.*?)```").expect("valid fence regex");
    if let Some(m) = any_fence.captures(text).and_then(|c| c.get(1)) {
        let inner = m.as_str();
        let body = match inner.split_once('\n') {
            Some((tag, rest)) if is_language_tag(tag) => rest,
            _ => inner,
        };
        return Some(body);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn is_language_tag(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Decode an enrichment reply into a patch, falling back to
/// [`EnrichmentPatch::default`] on any failure.
#[must_use]
pub fn parse_patch(text: &str) -> EnrichmentPatch {
    let Some(block) = extract_json_block(text) else {
        tracing::warn!("enrichment reply contained no JSON object");
        return EnrichmentPatch::default();
    };

    match serde_json::from_str::<EnrichmentPatch>(block.trim()) {
        Ok(patch) => patch,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse enrichment JSON");
            EnrichmentPatch::default()
        }
    }
}

/// Merge a patch into `lead` and mark it `Completed`.
///
/// `website` and `phone` keep their previous value on a miss; `email` and
/// `owner` always take the freshly parsed value, so a miss clears them.
/// A stale failure note is dropped.
#[must_use]
pub fn merge_patch(mut lead: Lead, patch: EnrichmentPatch) -> Lead {
    lead.website = hit(patch.website).or(lead.website);
    lead.phone = hit(patch.phone).or(lead.phone);
    lead.email = hit(patch.email);
    lead.owner = hit(patch.owner);
    lead.status = LeadStatus::Completed;
    lead.notes = None;
    lead
}

/// Enrich one lead. Never fails: a remote error yields the input lead with
/// `status = Failed` and [`ENRICHMENT_FAILED_NOTE`], everything else intact.
pub async fn enrich_lead(client: &GeminiClient, model: &str, lead: Lead) -> Lead {
    let request = GenerateContentRequest::prompt(enrichment_prompt(&lead), Tool::GoogleSearch {});

    match client.generate_content(model, &request).await {
        Ok(response) => {
            let patch = parse_patch(&response.text());
            tracing::debug!(lead_id = %lead.id, ?patch, "enrichment reply parsed");
            merge_patch(lead, patch)
        }
        Err(e) => {
            tracing::warn!(lead_id = %lead.id, name = %lead.name, error = %e, "enrichment failed");
            mark_failed(lead)
        }
    }
}

fn mark_failed(mut lead: Lead) -> Lead {
    lead.status = LeadStatus::Failed;
    lead.notes = Some(ENRICHMENT_FAILED_NOTE.to_string());
    lead
}

#[cfg(test)]
#[path = "enrichment_test.rs"]
mod tests;

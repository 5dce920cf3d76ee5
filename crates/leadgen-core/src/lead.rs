//! Lead record and its enrichment status state machine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Opaque, session-unique lead identifier. Generated at discovery time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(Uuid);

impl LeadId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LeadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LeadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Discovered,
    Enriching,
    Completed,
    Failed,
}

impl LeadStatus {
    /// Raw lowercase value, as written to exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Discovered => "discovered",
            LeadStatus::Enriching => "enriching",
            LeadStatus::Completed => "completed",
            LeadStatus::Failed => "failed",
        }
    }

    /// Whether an enrichment (first run or retry) may start from this status.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, LeadStatus::Discovered | LeadStatus::Failed)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, LeadStatus::Completed | LeadStatus::Failed)
    }

    /// The transition table:
    ///
    /// | from       | to         |
    /// |------------|------------|
    /// | Discovered | Enriching  |
    /// | Failed     | Enriching  |
    /// | Enriching  | Completed  |
    /// | Enriching  | Failed     |
    #[must_use]
    pub fn can_transition_to(self, next: LeadStatus) -> bool {
        matches!(
            (self, next),
            (
                LeadStatus::Discovered | LeadStatus::Failed,
                LeadStatus::Enriching
            ) | (
                LeadStatus::Enriching,
                LeadStatus::Completed | LeadStatus::Failed
            )
        )
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prospective business tracked through discovery and enrichment.
///
/// `id`, `place_id`, `name` and `address` are fixed at discovery. The contact
/// fields stay `None` until an enrichment pass finds something. Equality is by
/// `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub owner: Option<String>,
    pub status: LeadStatus,
    pub source_url: Option<String>,
    pub notes: Option<String>,
}

impl Lead {
    /// Creates a freshly discovered lead with a new id and no contact data.
    #[must_use]
    pub fn discovered(
        name: impl Into<String>,
        address: impl Into<String>,
        place_id: Option<String>,
        source_url: Option<String>,
    ) -> Self {
        Self {
            id: LeadId::new(),
            place_id,
            name: name.into(),
            address: address.into(),
            website: None,
            phone: None,
            email: None,
            owner: None,
            status: LeadStatus::Discovered,
            source_url,
            notes: None,
        }
    }

    /// Moves the lead to `next`, enforcing [`LeadStatus::can_transition_to`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if the table does not allow it.
    pub fn transition(&mut self, next: LeadStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Takes over the enrichment-owned fields of `result`, leaving identity
    /// and discovery fields (`id`, `place_id`, `name`, `address`) untouched.
    pub fn absorb_enrichment(&mut self, result: Lead) {
        self.website = result.website;
        self.phone = result.phone;
        self.email = result.email;
        self.owner = result.owner;
        self.source_url = result.source_url;
        self.notes = result.notes;
        self.status = result.status;
    }
}

impl PartialEq for Lead {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Lead {}

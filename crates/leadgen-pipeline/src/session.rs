//! Observable session state and the controls derived from it.

use leadgen_core::{Lead, LeadId, LeadStatus};

use crate::error::PipelineError;

/// Validated search input: both fields trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    industry: String,
    location: String,
}

impl SearchParams {
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidSearch`] if either field is blank.
    pub fn new(industry: &str, location: &str) -> Result<Self, PipelineError> {
        let industry = industry.trim();
        let location = location.trim();
        if industry.is_empty() {
            return Err(PipelineError::InvalidSearch(
                "industry is required".to_string(),
            ));
        }
        if location.is_empty() {
            return Err(PipelineError::InvalidSearch(
                "location is required".to_string(),
            ));
        }
        Ok(Self {
            industry: industry.to_string(),
            location: location.to_string(),
        })
    }

    #[must_use]
    pub fn industry(&self) -> &str {
        &self.industry
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Inline message shown above the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    SearchFailed,
    NoResults,
}

impl Banner {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Banner::SearchFailed => {
                "Search failed. Please check your API key and try again."
            }
            Banner::NoResults => {
                "No businesses matched those criteria. Try broadening the location."
            }
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Banner::SearchFailed)
    }
}

impl std::fmt::Display for Banner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Which user actions are currently available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub can_search: bool,
    pub can_enrich_all: bool,
    pub can_export: bool,
}

/// A consistent snapshot of the session, published on every change.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub(crate) leads: Vec<Lead>,
    pub(crate) generation: u64,
    pub(crate) searching: bool,
    pub(crate) bulk_in_progress: bool,
    pub(crate) banner: Option<Banner>,
}

impl SessionView {
    /// Leads in discovery order.
    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    #[must_use]
    pub fn lead(&self, id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    /// Bumped every time a search replaces the collection.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    #[must_use]
    pub fn bulk_in_progress(&self) -> bool {
        self.bulk_in_progress
    }

    #[must_use]
    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.leads.iter().filter(|l| l.status.is_pending()).count()
    }

    #[must_use]
    pub fn count_with_status(&self, status: LeadStatus) -> usize {
        self.leads.iter().filter(|l| l.status == status).count()
    }

    /// Per-lead enrich/retry availability: pending status and no bulk run.
    #[must_use]
    pub fn can_enrich(&self, id: LeadId) -> bool {
        !self.bulk_in_progress && self.lead(id).is_some_and(|l| l.status.is_pending())
    }

    #[must_use]
    pub fn controls(&self) -> Controls {
        Controls {
            can_search: !self.searching,
            can_enrich_all: !self.bulk_in_progress && self.pending_count() > 0,
            can_export: !self.leads.is_empty(),
        }
    }
}

//! Dashboard state: the case collection and its three operations.
//!
//! The dashboard owns a local copy of the case list and a display error
//! slot. Every operation catches at this boundary; nothing propagates
//! past the screen. A 401 is surfaced as displayable text like any other
//! failure — there is no token refresh and no forced logout here.

use std::path::Path;
use tracing::debug;

use crate::api::PapiClient;
use crate::types::{Case, Result};

/// Outcome of a delete request, distinguishing a user abort from a
/// completed removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The confirmation prompt was declined; nothing was sent.
    Cancelled,
    /// The server accepted the delete and the case left local state.
    Deleted,
}

/// Local state for the case-collection screen.
#[derive(Default)]
pub struct Dashboard {
    cases: Vec<Case>,
    error: Option<String>,
}

impl Dashboard {
    /// An empty dashboard; call [`refresh`](Self::refresh) to populate it.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current list, in the order the server returned it.
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// The last displayable error, if the previous operation failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches all cases, replacing local state wholesale. Server order
    /// is kept; there is no client-side sorting.
    pub async fn refresh(&mut self, client: &PapiClient) -> Result<()> {
        match client.list_cases().await {
            Ok(cases) => {
                debug!(count = cases.len(), "case list refreshed");
                self.cases = cases;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.display_message());
                Err(e)
            }
        }
    }

    /// Uploads a document, then re-fetches the full list on success. No
    /// optimistic insert: the server's view of the new case (id, status)
    /// is the only one shown.
    pub async fn upload(&mut self, client: &PapiClient, path: &Path) -> Result<()> {
        if let Err(e) = client.upload_case(path).await {
            self.error = Some(e.display_message());
            return Err(e);
        }
        self.refresh(client).await
    }

    /// Deletes a case after confirmation.
    ///
    /// `confirm` is the blocking prompt seam; declining sends nothing. On
    /// server success exactly the matching id is removed from local state,
    /// with no re-fetch.
    pub async fn delete<F>(
        &mut self,
        client: &PapiClient,
        case_id: &str,
        confirm: F,
    ) -> Result<DeleteOutcome>
    where
        F: FnOnce(&Case) -> bool,
    {
        let Some(case) = self.cases.iter().find(|c| c.id == case_id) else {
            self.error = Some(format!("No case with id {}", case_id));
            return Ok(DeleteOutcome::Cancelled);
        };

        if !confirm(case) {
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(e) = client.delete_case(case_id).await {
            self.error = Some(e.display_message());
            return Err(e);
        }

        self.cases.retain(|c| c.id != case_id);
        self.error = None;
        Ok(DeleteOutcome::Deleted)
    }
}

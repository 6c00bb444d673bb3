//! Case collection calls: list, upload, delete, metadata, question sets.

use reqwest::multipart;
use std::path::Path;
use tracing::info;

use crate::api::client::PapiClient;
use crate::types::{AppError, Case, CaseQuestionsResponse, Result};

impl PapiClient {
    /// Lists all cases for the current user, in the order the server
    /// returns them. No client-side re-sort.
    pub async fn list_cases(&self) -> Result<Vec<Case>> {
        let builder = self.authed(self.http.get(self.url("/cases/get_all_cases")))?;
        self.send_json(builder).await
    }

    /// Uploads a document as a new case. Multipart field name is `file`,
    /// filename taken from the path.
    pub async fn upload_case(&self, path: &Path) -> Result<()> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::Validation(format!("{} is not a valid file path", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Validation(format!("cannot read {}: {}", path.display(), e)))?;

        let part = multipart::Part::bytes(bytes).file_name(filename.clone());
        let form = multipart::Form::new().part("file", part);

        let builder = self.authed(self.http.post(self.url("/cases/upload_case")))?;
        self.send_unit(builder.multipart(form)).await?;
        info!(filename = %filename, "case uploaded");
        Ok(())
    }

    /// Deletes a case by id.
    pub async fn delete_case(&self, case_id: &str) -> Result<()> {
        let url = self.url(&format!("/cases/delete_case/{}", case_id));
        let builder = self.authed(self.http.delete(url))?;
        self.send_unit(builder).await
    }

    /// Fetches metadata for one case.
    pub async fn get_case(&self, case_id: &str) -> Result<Case> {
        let url = self.url(&format!("/cases/get_case/{}", case_id));
        let builder = self.authed(self.http.get(url))?;
        self.send_json(builder).await
    }

    /// Fetches the question-set generation status and results for a case.
    pub async fn case_questions(&self, case_id: &str) -> Result<CaseQuestionsResponse> {
        let url = self.url(&format!("/cases/get_case_questions/{}", case_id));
        let builder = self.authed(self.http.get(url))?;
        self.send_json(builder).await
    }
}

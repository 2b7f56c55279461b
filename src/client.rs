//! HTTP client for the analysis/scoring service.

use crate::intake::{FileSlot, SlotRole};
use crate::model::{
    AnalyzeReport, ClientConfig, ErrorBody, OperationKind, OperationResult, ScoreReport,
};
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use thiserror::Error;

/// Uniform failure of a remote operation. The message is user-facing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RequestError {
    pub message: String,
}

impl RequestError {
    /// Failure reported by the service or in its reply, prefixed with the operation.
    pub(crate) fn new(kind: OperationKind, detail: impl std::fmt::Display) -> Self {
        Self {
            message: format!("{} failed: {detail}", kind.label()),
        }
    }

    /// Failure of the transport itself, kept as the transport describes it.
    fn transport(err: &reqwest::Error) -> Self {
        Self {
            message: error_chain(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestClient {
    http: reqwest::Client,
    api_base: String,
}

impl RequestClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;
        Ok(Self {
            http,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, kind: OperationKind) -> String {
        format!("{}{}", self.api_base, kind.endpoint())
    }

    /// Upload both files to the endpoint for `kind` and decode the reply.
    ///
    /// Makes exactly one attempt.
    pub async fn submit(
        &self,
        kind: OperationKind,
        resume: &FileSlot,
        job_description: &FileSlot,
    ) -> std::result::Result<OperationResult, RequestError> {
        let form = Form::new()
            .part(
                SlotRole::Resume.field_name(),
                file_part(resume).await.map_err(|e| RequestError::new(kind, e))?,
            )
            .part(
                SlotRole::JobDescription.field_name(),
                file_part(job_description)
                    .await
                    .map_err(|e| RequestError::new(kind, e))?,
            );

        let url = self.url(kind);
        tracing::debug!(%url, resume = %resume.name, jd = %job_description.name, "submitting");

        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RequestError::transport(&e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = error_detail(status, &body);
            tracing::debug!(%url, %status, %detail, "remote rejected request");
            return Err(RequestError::new(kind, detail));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| RequestError::transport(&e))?;
        decode_success(kind, &body)
    }
}

async fn file_part(slot: &FileSlot) -> std::result::Result<Part, String> {
    let bytes = tokio::fs::read(&slot.path)
        .await
        .map_err(|e| format!("cannot read {}: {e}", slot.path.display()))?;
    Part::bytes(bytes)
        .file_name(slot.name.clone())
        .mime_str(slot.mime_type())
        .map_err(|e| error_chain(&e))
}

/// Message for a non-success response: the `detail` field when the body has
/// the structured error shape, otherwise the status line text.
fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.detail.is_empty() {
            return parsed.detail;
        }
    }
    status
        .canonical_reason()
        .map(|s| s.to_string())
        .unwrap_or_else(|| status.as_str().to_string())
}

fn decode_success(
    kind: OperationKind,
    body: &[u8],
) -> std::result::Result<OperationResult, RequestError> {
    let decoded = match kind {
        OperationKind::Analyze => {
            serde_json::from_slice::<AnalyzeReport>(body).map(OperationResult::Analyze)
        }
        OperationKind::Score => {
            serde_json::from_slice::<ScoreReport>(body).map(OperationResult::Score)
        }
    };
    decoded.map_err(|e| RequestError::new(kind, format!("invalid response: {e}")))
}

/// Render an error with its source chain, `outer: inner: root`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

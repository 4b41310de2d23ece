//! HTTP transport to the decisioning service.
//!
//! One blocking request per call. There is no request timeout and no retry:
//! a hung call keeps its pipeline in flight until the service answers.

use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::transport::{Transport, TransportError};
use super::types::{
    AadhaarExtraction, LoanApplicationForm, LoanDecision, PanExtraction, Suggestion,
    VerificationRequest, VerificationResult,
};
use super::Pipeline;
use crate::config;

/// Request body for `POST /groq-suggest`
#[derive(Serialize)]
struct SuggestRequest<'a> {
    prompt: &'a str,
}

pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Transport bound to the fixed deployment endpoint.
    pub fn deployment() -> Result<Self, TransportError> {
        Self::new(config::SERVICE_ENDPOINT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, pipeline: Pipeline) -> String {
        format!("{}{}", self.base_url, pipeline.endpoint_path())
    }

    fn upload<T: DeserializeOwned>(
        &self,
        pipeline: Pipeline,
        request: &VerificationRequest,
    ) -> Result<T, TransportError> {
        let part = multipart::Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type())
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(
            %pipeline,
            file = %request.file_name,
            bytes = request.bytes.len(),
            "Uploading document"
        );

        let response = self
            .client
            .post(self.url(pipeline))
            .multipart(form)
            .send()
            .map_err(|e| self.send_error(e))?;

        settle(pipeline, response)
    }

    fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        pipeline: Pipeline,
        body: &B,
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .post(self.url(pipeline))
            .json(body)
            .send()
            .map_err(|e| self.send_error(e))?;

        settle(pipeline, response)
    }

    fn send_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_connect() {
            TransportError::Unavailable(format!("cannot connect to {}", self.base_url))
        } else {
            TransportError::Unavailable(e.to_string())
        }
    }
}

/// Classify a settled response.
///
/// The body is parsed before the status is inspected, so an unparseable body
/// is a transport failure whatever the status.
fn settle<T: DeserializeOwned>(pipeline: Pipeline, response: Response) -> Result<T, TransportError> {
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .map_err(|e| TransportError::Unavailable(format!("malformed response body: {e}")))?;

    if !status.is_success() {
        let message = body
            .get("error")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        tracing::warn!(%pipeline, status = status.as_u16(), "Service rejected request");
        return Err(TransportError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_value(body)
        .map_err(|e| TransportError::Unavailable(format!("unexpected response shape: {e}")))
}

impl Transport for HttpTransport {
    fn extract_pan(&self, request: &VerificationRequest) -> Result<VerificationResult, TransportError> {
        let body: PanExtraction = self.upload(Pipeline::Pan, request)?;
        Ok(body.into())
    }

    fn extract_aadhaar(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, TransportError> {
        let body: AadhaarExtraction = self.upload(Pipeline::Aadhaar, request)?;
        Ok(body.into())
    }

    fn process_loan(&self, form: &LoanApplicationForm) -> Result<LoanDecision, TransportError> {
        self.post_json(Pipeline::Loan, form)
    }

    fn suggest(&self, prompt: &str) -> Result<Suggestion, TransportError> {
        self.post_json(Pipeline::Ai, &SuggestRequest { prompt })
    }
}

//! Logs requests and responses without touching them

use reqwest::{Request, header::HeaderMap};

use super::{ClientInterceptor, FhirResponse};
use crate::error::Result;

/// Logs each exchange under the `fhir_client::http` target.
///
/// Summary, headers and body can be switched on and off independently for
/// requests and responses. Sensitive header values are masked.
#[derive(Debug, Clone)]
pub struct LoggingInterceptor {
    log_request_summary: bool,
    log_request_headers: bool,
    log_request_body: bool,
    log_response_summary: bool,
    log_response_headers: bool,
    log_response_body: bool,
}

impl Default for LoggingInterceptor {
    /// Summaries only
    fn default() -> Self {
        Self {
            log_request_summary: true,
            log_request_headers: false,
            log_request_body: false,
            log_response_summary: true,
            log_response_headers: false,
            log_response_body: false,
        }
    }
}

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_request_summary(mut self, enabled: bool) -> Self {
        self.log_request_summary = enabled;
        self
    }

    pub fn log_request_headers(mut self, enabled: bool) -> Self {
        self.log_request_headers = enabled;
        self
    }

    pub fn log_request_body(mut self, enabled: bool) -> Self {
        self.log_request_body = enabled;
        self
    }

    pub fn log_response_summary(mut self, enabled: bool) -> Self {
        self.log_response_summary = enabled;
        self
    }

    pub fn log_response_headers(mut self, enabled: bool) -> Self {
        self.log_response_headers = enabled;
        self
    }

    pub fn log_response_body(mut self, enabled: bool) -> Self {
        self.log_response_body = enabled;
        self
    }
}

fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if value.is_sensitive() {
                "***"
            } else {
                value.to_str().unwrap_or("<non-ascii>")
            };
            format!("{}: {}", name, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl ClientInterceptor for LoggingInterceptor {
    fn intercept_request(&self, request: &mut Request) {
        if self.log_request_summary {
            tracing::info!(
                target: "fhir_client::http",
                method = %request.method(),
                url = %request.url(),
                "Client request"
            );
        }
        if self.log_request_headers {
            tracing::info!(
                target: "fhir_client::http",
                headers = %format_headers(request.headers()),
                "Client request headers"
            );
        }
        if self.log_request_body
            && let Some(bytes) = request.body().and_then(|b| b.as_bytes())
        {
            tracing::info!(
                target: "fhir_client::http",
                body = %String::from_utf8_lossy(bytes),
                "Client request body"
            );
        }
    }

    fn intercept_response(&self, response: &mut FhirResponse) -> Result<()> {
        if self.log_response_summary {
            tracing::info!(
                target: "fhir_client::http",
                status = %response.status.as_u16(),
                mime_type = ?response.mime_type(),
                "Client response"
            );
        }
        if self.log_response_headers {
            tracing::info!(
                target: "fhir_client::http",
                headers = %format_headers(&response.headers),
                "Client response headers"
            );
        }
        if self.log_response_body {
            tracing::info!(
                target: "fhir_client::http",
                body = %response.body,
                "Client response body"
            );
        }
        Ok(())
    }
}

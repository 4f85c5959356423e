//! FHIR REST client for search and page navigation

use fhir_core::{Bundle, LINK_NEXT, OperationOutcome};
use reqwest::{
    Request,
    header::{ACCEPT, HeaderValue},
};
use url::Url;

use crate::error::{ClientError, Result, ServerResponseError, TransportError};
use crate::interceptor::{FhirResponse, InterceptorChain};

const FHIR_JSON: &str = "application/fhir+json";

/// What the bundle fetcher and the driver need from a FHIR server
pub trait SearchClient {
    /// Search `resource_type` for resources whose `filter_field` matches
    /// `filter_value`, returning the first page of results
    fn search(
        &self,
        resource_type: &str,
        filter_field: &str,
        filter_value: &str,
    ) -> impl Future<Output = Result<Bundle>> + Send;

    /// Load the page behind the `next` link of `page`
    fn fetch_next_page(&self, page: &Bundle) -> impl Future<Output = Result<Bundle>> + Send;
}

/// Client for a single FHIR server base URL
#[derive(Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    base_url: Url,
    interceptors: InterceptorChain,
    page_size: Option<u32>,
}

impl FhirClient {
    pub fn new(base_url: Url, interceptors: InterceptorChain) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, interceptors)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        mut base_url: Url,
        interceptors: InterceptorChain,
    ) -> Self {
        // Resource paths are joined onto the base, which needs a trailing slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            interceptors,
            page_size: None,
        }
    }

    /// Ask the server for at most `page_size` entries per page (`_count`)
    pub fn page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, reference: &str) -> Result<Url> {
        self.base_url.join(reference).map_err(|e| {
            ClientError::InvalidArgument(format!("invalid URL '{}': {}", reference, e))
        })
    }

    fn get_request(&self, url: Url) -> Result<Request> {
        let request = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(FHIR_JSON))
            .build()?;
        Ok(request)
    }

    /// Send a request through the interceptor chain and buffer the response
    async fn execute(&self, mut request: Request) -> Result<FhirResponse> {
        self.interceptors.before_send(&mut request);

        let response = self.http.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        let mut response = FhirResponse {
            status,
            headers,
            body,
        };
        self.interceptors.after_receive(&mut response)?;
        Ok(response)
    }

    async fn get_bundle(&self, url: Url) -> Result<Bundle> {
        let request = self.get_request(url)?;
        let response = self.execute(request).await?;
        parse_bundle(response)
    }

    /// Follow the link with the given relation (`next`, `previous`, ...).
    ///
    /// Relative link URLs are resolved against the base URL.
    pub async fn load_page(&self, page: &Bundle, relation: &str) -> Result<Bundle> {
        let link = page.link(relation).ok_or_else(|| {
            ClientError::InvalidArgument(format!("bundle has no '{}' link", relation))
        })?;
        let url = self.resolve(&link.url)?;
        tracing::debug!(relation = relation, url = %url, "Loading page");
        self.get_bundle(url).await
    }
}

impl SearchClient for FhirClient {
    async fn search(
        &self,
        resource_type: &str,
        filter_field: &str,
        filter_value: &str,
    ) -> Result<Bundle> {
        let mut url = self.resolve(resource_type)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(filter_field, filter_value);
            if let Some(count) = self.page_size {
                query.append_pair("_count", &count.to_string());
            }
        }
        tracing::debug!(url = %url, "Searching");
        self.get_bundle(url).await
    }

    async fn fetch_next_page(&self, page: &Bundle) -> Result<Bundle> {
        self.load_page(page, LINK_NEXT).await
    }
}

/// Turn a buffered response into a Bundle, or into the server's error envelope
fn parse_bundle(response: FhirResponse) -> Result<Bundle> {
    if !response.status.is_success() {
        return Err(server_error(response).into());
    }
    serde_json::from_str(&response.body)
        .map_err(|e| ClientError::Transport(TransportError::Malformed(e)))
}

fn server_error(response: FhirResponse) -> ServerResponseError {
    let mime_type = response.mime_type();
    let mut additional_messages = Vec::new();

    let outcome = if response.body.trim().is_empty() {
        None
    } else {
        match serde_json::from_str::<OperationOutcome>(&response.body) {
            Ok(outcome) if outcome.resource_type == "OperationOutcome" => Some(outcome),
            Ok(other) => {
                additional_messages.push(format!(
                    "Response body is a {} resource, not an OperationOutcome",
                    other.resource_type
                ));
                None
            }
            Err(e) => {
                additional_messages.push(format!(
                    "Response body is not an OperationOutcome: {}",
                    e
                ));
                None
            }
        }
    };

    ServerResponseError {
        status: Some(response.status.as_u16()),
        mime_type,
        body: Some(response.body).filter(|b| !b.is_empty()),
        additional_messages,
        outcome,
    }
}

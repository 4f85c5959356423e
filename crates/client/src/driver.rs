//! Example search run: find patients by family name and log what came back

use fhir_core::Bundle;

use crate::client::{FhirClient, SearchClient};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::fetcher::fetch_all;
use crate::interceptor::{
    AdditionalHeadersInterceptor, BasicAuthInterceptor, InterceptorChain, LoggingInterceptor,
};
use crate::report::describe_failure;

pub const RESOURCE_TYPE: &str = "Patient";
pub const SEARCH_PARAM: &str = "family";
pub const SEARCH_VALUE: &str = "reynolds";

/// Interceptors for a configuration, in the order they run: extra headers,
/// then authentication, then logging so the log shows the final request
pub fn build_interceptors(config: &Config) -> Result<InterceptorChain> {
    let mut chain = InterceptorChain::new();

    let mut headers = AdditionalHeadersInterceptor::new();
    for (name, value) in &config.extra_headers {
        headers.add_header_value(name, value)?;
    }
    if !headers.is_empty() {
        chain.register(headers);
    }

    if let Some(credentials) = &config.credentials {
        chain.register(BasicAuthInterceptor::new(
            &credentials.username,
            &credentials.password,
        )?);
    }

    chain.register(
        LoggingInterceptor::new()
            .log_request_headers(config.log_headers)
            .log_response_headers(config.log_headers)
            .log_request_body(config.log_bodies)
            .log_response_body(config.log_bodies),
    );

    tracing::debug!(interceptors = chain.len(), "Built interceptor chain");
    Ok(chain)
}

pub fn build_client(config: &Config) -> Result<FhirClient> {
    let interceptors = build_interceptors(config)?;
    Ok(FhirClient::new(config.base_url.clone(), interceptors).page_size(config.page_size))
}

/// Run a search and drain every page of its result
pub async fn search_all<C: SearchClient>(
    client: &C,
    resource_type: &str,
    filter_field: &str,
    filter_value: &str,
) -> Result<Bundle> {
    let first = client
        .search(resource_type, filter_field, filter_value)
        .await?;
    fetch_all(client, &first).await
}

/// Search, then log either the matches or the server's error report.
///
/// A FHIR error response is logged and swallowed; any other failure is
/// returned to the caller.
pub async fn run_search<C: SearchClient>(client: &C) -> Result<Option<Bundle>> {
    match search_all(client, RESOURCE_TYPE, SEARCH_PARAM, SEARCH_VALUE).await {
        Ok(bundle) => {
            tracing::info!("Found {} patients.", bundle.entry.len());
            for entry in &bundle.entry {
                match entry.resource_id() {
                    Some(id) => tracing::info!("ID of found patient is {}", id),
                    None => tracing::info!(full_url = ?entry.full_url, "Found patient without an ID"),
                }
            }
            Ok(Some(bundle))
        }
        Err(ClientError::Server(err)) => {
            tracing::error!("A FHIR error occurred!: {}", err);
            describe_failure(&err).log();
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let client = build_client(config)?;
    tracing::debug!(base_url = %client.base_url(), "Base URL");
    run_search(&client).await?;
    Ok(())
}

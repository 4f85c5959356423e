//! fhir-client library crate
//!
//! A small FHIR REST client: searches a server, drains every page of the
//! result through [`BundleFetcher`], and decomposes server error responses.
//! Requests pass through an ordered [`InterceptorChain`].
//! The binary entrypoint is in `main.rs`.

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod fetcher;
pub mod interceptor;
pub mod report;

#[cfg(test)]
mod test_support;

pub use client::{FhirClient, SearchClient};
pub use config::Config;
pub use error::{ClientError, Result, ServerResponseError, TransportError};
pub use fetcher::{BundleFetcher, fetch_all};
pub use interceptor::{
    AdditionalHeadersInterceptor, BasicAuthInterceptor, ClientInterceptor, FhirResponse,
    InterceptorChain, LoggingInterceptor,
};
pub use report::{FailureReport, describe_failure};

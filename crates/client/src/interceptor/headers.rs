//! Adds arbitrary header values to every request

use indexmap::IndexMap;
use reqwest::{
    Request,
    header::{HeaderName, HeaderValue},
};

use super::{ClientInterceptor, FhirResponse};
use crate::error::{ClientError, Result};

/// Appends a fixed set of header values to each outgoing request.
///
/// Header names are replayed in the order they were first added and the
/// values of one name in the order they were added. Every value becomes its
/// own header line; duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct AdditionalHeadersInterceptor {
    headers: IndexMap<HeaderName, Vec<HeaderValue>>,
}

impl AdditionalHeadersInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interceptor pre-populated from an ordered map
    pub fn with_headers<I, V>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, V)>,
        V: IntoIterator<Item = String>,
    {
        let mut interceptor = Self::new();
        for (name, values) in headers {
            let values: Vec<String> = values.into_iter().collect();
            interceptor.add_all_header_values(&name, &values)?;
        }
        Ok(interceptor)
    }

    /// Add one value for `name`.
    ///
    /// Fails with [`ClientError::InvalidArgument`] if the name is empty or
    /// not a valid header name, or if the value contains characters a header
    /// cannot carry. Nothing is stored on failure.
    pub fn add_header_value(&mut self, name: &str, value: &str) -> Result<()> {
        let name = parse_name(name)?;
        let value = parse_value(value)?;
        self.headers.entry(name).or_default().push(value);
        Ok(())
    }

    /// Add several values for `name`, all or nothing
    pub fn add_all_header_values<S: AsRef<str>>(&mut self, name: &str, values: &[S]) -> Result<()> {
        let name = parse_name(name)?;
        let values = values
            .iter()
            .map(|v| parse_value(v.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.headers.entry(name).or_default().extend(values);
        Ok(())
    }

    /// True when no header value would be added to a request
    pub fn is_empty(&self) -> bool {
        self.headers.values().all(Vec::is_empty)
    }
}

fn parse_name(name: &str) -> Result<HeaderName> {
    if name.is_empty() {
        return Err(ClientError::InvalidArgument(
            "header name cannot be empty".to_string(),
        ));
    }
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ClientError::InvalidArgument(format!("invalid header name '{}': {}", name, e)))
}

fn parse_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::InvalidArgument(format!("invalid header value: {}", e)))
}

impl ClientInterceptor for AdditionalHeadersInterceptor {
    fn intercept_request(&self, request: &mut Request) {
        let headers = request.headers_mut();
        for (name, values) in &self.headers {
            for value in values {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    fn intercept_response(&self, _response: &mut FhirResponse) -> Result<()> {
        Ok(())
    }
}

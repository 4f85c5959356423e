use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{
    Request,
    header::{AUTHORIZATION, HeaderValue},
};

use super::{ClientInterceptor, FhirResponse};
use crate::error::{ClientError, Result};

/// HTTP Basic authentication with fixed credentials
#[derive(Clone)]
pub struct BasicAuthInterceptor {
    header: HeaderValue,
}

impl BasicAuthInterceptor {
    pub fn new(username: &str, password: &str) -> Result<Self> {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        let mut header = HeaderValue::from_str(&format!("Basic {}", encoded))
            .map_err(|e| ClientError::InvalidArgument(format!("invalid credentials: {}", e)))?;
        header.set_sensitive(true);
        Ok(Self { header })
    }
}

impl std::fmt::Debug for BasicAuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthInterceptor").finish_non_exhaustive()
    }
}

impl ClientInterceptor for BasicAuthInterceptor {
    fn intercept_request(&self, request: &mut Request) {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.header.clone());
    }

    fn intercept_response(&self, _response: &mut FhirResponse) -> Result<()> {
        Ok(())
    }
}

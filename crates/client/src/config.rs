//! Client configuration

use url::Url;

use crate::error::{ClientError, Result};

/// Basic auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Client configuration.
///
/// The FHIR base URL is the single command line argument; everything else
/// comes from optional environment variables:
///
/// - `FHIR_USERNAME` / `FHIR_PASSWORD`: enable basic auth (both or neither)
/// - `FHIR_EXTRA_HEADERS`: `Name: value` pairs separated by `;`
/// - `FHIR_PAGE_SIZE`: requested entries per page (`_count`)
/// - `FHIR_LOG_HEADERS`, `FHIR_LOG_BODIES`: log HTTP headers / bodies
/// - `FHIR_LOG_JSON`: emit logs as JSON
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub credentials: Option<Credentials>,
    pub extra_headers: Vec<(String, String)>,
    pub page_size: Option<u32>,
    pub log_headers: bool,
    pub log_bodies: bool,
    pub log_json: bool,
}

impl Config {
    /// Load configuration from the process arguments and environment
    pub fn from_env() -> Result<Self> {
        Self::from_args_and_env(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Build a configuration from positional arguments (program name
    /// excluded) and an environment lookup
    pub fn from_args_and_env<I, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();
        let base_url = args.next().ok_or_else(|| {
            ClientError::InvalidConfiguration(
                "The base URL for the FHIR server must be specified as an argument. \
                 For example: http://fhirtest.uhn.ca/baseDstu2"
                    .to_string(),
            )
        })?;
        if let Some(extra) = args.next() {
            return Err(ClientError::InvalidConfiguration(format!(
                "Unexpected argument '{}': only the base URL is accepted",
                extra
            )));
        }

        let credentials = match (env("FHIR_USERNAME"), env("FHIR_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(ClientError::InvalidConfiguration(
                    "FHIR_USERNAME and FHIR_PASSWORD must be set together".to_string(),
                ));
            }
        };

        let page_size = env("FHIR_PAGE_SIZE")
            .map(|v| {
                v.trim().parse::<u32>().map_err(|e| {
                    ClientError::InvalidConfiguration(format!("Invalid FHIR_PAGE_SIZE '{}': {}", v, e))
                })
            })
            .transpose()?;

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            credentials,
            extra_headers: env("FHIR_EXTRA_HEADERS")
                .map(|v| parse_header_list(&v))
                .transpose()?
                .unwrap_or_default(),
            page_size,
            log_headers: env("FHIR_LOG_HEADERS").is_some_and(|v| is_truthy(&v)),
            log_bodies: env("FHIR_LOG_BODIES").is_some_and(|v| is_truthy(&v)),
            log_json: env("FHIR_LOG_JSON").is_some_and(|v| is_truthy(&v)),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        ClientError::InvalidConfiguration(format!("Invalid base URL '{}': {}", raw, e))
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidConfiguration(format!(
            "Base URL '{}' must be an http(s) URL",
            raw
        )));
    }
    Ok(url)
}

fn parse_header_list(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once(':').ok_or_else(|| {
                ClientError::InvalidConfiguration(format!(
                    "Invalid FHIR_EXTRA_HEADERS entry '{}', expected 'Name: value'",
                    pair
                ))
            })?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

//! fhir-client: search a FHIR server and log every matching patient.
//!
//! Usage: `fhir-client <base-url>`

use std::error::Error;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fhir_client::Config;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );
    let json = config.as_ref().is_ok_and(|c| c.log_json);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let result = match config {
        Ok(config) => fhir_client::driver::run(&config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(error = %error_chain(&e), "Something really bad happened!");
        std::process::exit(1);
    }
}

/// Display an error followed by all of its sources
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

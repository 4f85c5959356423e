//! Request/response interceptors
//!
//! Interceptors run around every exchange made by [`crate::FhirClient`]:
//! `intercept_request` right before a request is sent and
//! `intercept_response` right after its response has been buffered. Both
//! hooks run in registration order.

pub mod basic_auth;
pub mod headers;
pub mod logging;

use std::sync::Arc;

use reqwest::{Request, StatusCode, header::HeaderMap};

use crate::error::Result;

pub use basic_auth::BasicAuthInterceptor;
pub use headers::AdditionalHeadersInterceptor;
pub use logging::LoggingInterceptor;

/// A fully buffered response, as seen by response interceptors
#[derive(Debug, Clone)]
pub struct FhirResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl FhirResponse {
    /// MIME type from `Content-Type`, without parameters such as charset
    pub fn mime_type(&self) -> Option<String> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Hook invoked around each HTTP exchange
pub trait ClientInterceptor: Send + Sync {
    /// Called before the request is sent; may add or replace headers
    fn intercept_request(&self, request: &mut Request);

    /// Called once the response is received.
    ///
    /// Returning an error aborts the exchange and is handed to the caller.
    fn intercept_response(&self, response: &mut FhirResponse) -> Result<()>;
}

/// Ordered set of interceptors
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn ClientInterceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor; it runs after every one registered before it
    pub fn register(&mut self, interceptor: impl ClientInterceptor + 'static) {
        self.interceptors.push(Arc::new(interceptor));
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn before_send(&self, request: &mut Request) {
        for interceptor in &self.interceptors {
            interceptor.intercept_request(request);
        }
    }

    /// Same order as [`Self::before_send`], not reversed
    pub fn after_receive(&self, response: &mut FhirResponse) -> Result<()> {
        for interceptor in &self.interceptors {
            interceptor.intercept_response(response)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use reqwest::{Method, Url};
    use std::sync::Mutex;

    /// Writes its name into a shared log from both hooks
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail_response: bool,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name,
                log: log.clone(),
                fail_response: false,
            }
        }
    }

    impl ClientInterceptor for Recorder {
        fn intercept_request(&self, _request: &mut Request) {
            self.log.lock().unwrap().push(format!("send:{}", self.name));
        }

        fn intercept_response(&self, _response: &mut FhirResponse) -> Result<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("receive:{}", self.name));
            if self.fail_response {
                return Err(ClientError::InvalidArgument(self.name.to_string()));
            }
            Ok(())
        }
    }

    fn request() -> Request {
        Request::new(Method::GET, Url::parse("http://localhost/fhir/Patient").unwrap())
    }

    fn response() -> FhirResponse {
        FhirResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    #[test]
    fn test_registration_order_on_send_and_receive() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = InterceptorChain::new();
        chain.register(Recorder::new("I1", &log));
        chain.register(Recorder::new("I2", &log));
        chain.register(Recorder::new("I3", &log));

        chain.before_send(&mut request());
        chain.after_receive(&mut response()).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "send:I1",
                "send:I2",
                "send:I3",
                "receive:I1",
                "receive:I2",
                "receive:I3"
            ]
        );
    }

    #[test]
    fn test_response_error_propagates_and_stops_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = InterceptorChain::new();
        chain.register(Recorder::new("I1", &log));
        chain.register(Recorder {
            fail_response: true,
            ..Recorder::new("I2", &log)
        });
        chain.register(Recorder::new("I3", &log));

        let err = chain.after_receive(&mut response()).unwrap_err();

        assert!(matches!(err, ClientError::InvalidArgument(ref name) if name == "I2"));
        assert_eq!(*log.lock().unwrap(), vec!["receive:I1", "receive:I2"]);
    }

    #[test]
    fn test_empty_chain_leaves_request_untouched() {
        let chain = InterceptorChain::new();
        let mut req = request();
        chain.before_send(&mut req);

        assert!(chain.is_empty());
        assert!(req.headers().is_empty());
    }

    #[test]
    fn test_mime_type_strips_parameters() {
        let mut resp = response();
        resp.headers.insert(
            reqwest::header::CONTENT_TYPE,
            "application/fhir+json;charset=UTF-8".parse().unwrap(),
        );
        assert_eq!(resp.mime_type().as_deref(), Some("application/fhir+json"));
        assert_eq!(response().mime_type(), None);
    }
}

use super::extract::{extract_visible_polygons, PolygonFeature};
use super::items::FeatureCollection;
use super::protocol::RedactionRequest;
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/clean";
pub const DEFAULT_K_THRESHOLD: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct RedactionOptions {
    /// Minimum group size below which a region counts as identifying.
    pub k_threshold: u32,
    pub endpoint: String,
}

impl Default for RedactionOptions {
    fn default() -> Self {
        RedactionOptions {
            k_threshold: DEFAULT_K_THRESHOLD,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RedactionResult {
    pub ids_to_hide: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RedactionError {
    #[error("redaction service responded with status {status}")]
    Service { status: u16 },
    #[error("redaction request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not encode redaction request: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Delivers an encoded redaction request to a service.
pub trait Transport {
    fn post_json(&self, endpoint: &str, body: &[u8]) -> Result<TransportResponse, RedactionError>;
}

/// Blocking HTTP transport. Without a configured timeout the client's
/// defaults apply.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, RedactionError> {
        let client = Client::builder().build()?;
        Ok(HttpTransport { client })
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, RedactionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, endpoint: &str, body: &[u8]) -> Result<TransportResponse, RedactionError> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(TransportResponse { status, body })
    }
}

/// Read `ids_to_hide` from a response body. Anything unexpected yields an
/// empty list, hiding nothing new.
fn parse_ids_to_hide(body: &[u8]) -> Vec<String> {
    let mut json = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(json)) => json,
        Ok(_) => {
            warn!("redaction response is not a JSON object");
            return vec![];
        }
        Err(err) => {
            warn!("redaction response is not valid JSON: {}", err);
            return vec![];
        }
    };
    let ids = match json.remove("ids_to_hide") {
        Some(ids) => ids,
        None => {
            warn!("redaction response has no ids_to_hide");
            return vec![];
        }
    };
    serde_json::from_value(ids).unwrap_or_else(|err| {
        warn!("malformed ids_to_hide in redaction response: {}", err);
        vec![]
    })
}

/// Ask the service which of `features` to hide.
///
/// An empty feature list is answered locally without contacting the service.
pub fn submit<T: Transport + ?Sized>(
    transport: &T,
    features: Vec<PolygonFeature>,
    options: &RedactionOptions,
) -> Result<RedactionResult, RedactionError> {
    if features.is_empty() {
        debug!("no visible polygons, skipping redaction request");
        return Ok(RedactionResult::default());
    }

    let count = features.len();
    let request = RedactionRequest {
        features: features.into_iter().map(Into::into).collect(),
        k_threshold: options.k_threshold,
    };
    let body = serde_json::to_vec(&request)?;
    debug!(
        "requesting redaction of {} polygons from {} (k = {})",
        count, options.endpoint, options.k_threshold
    );

    let response = transport.post_json(&options.endpoint, &body)?;
    if !response.is_success() {
        return Err(RedactionError::Service {
            status: response.status,
        });
    }

    let ids_to_hide = parse_ids_to_hide(&response.body);
    debug!("service asked to hide {} of {} polygons", ids_to_hide.len(), count);
    Ok(RedactionResult { ids_to_hide })
}

/// Extract the visible polygons of `collections` at `time` and request a
/// redaction decision for them.
///
/// The returned ids are not applied; hiding them is up to the caller.
pub fn request_redaction<'a, T: Transport + ?Sized>(
    transport: &T,
    collections: impl IntoIterator<Item = &'a FeatureCollection>,
    time: f64,
    options: &RedactionOptions,
) -> Result<RedactionResult, RedactionError> {
    let features = extract_visible_polygons(collections, time);
    submit(transport, features, options)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Applied(T),
    /// A request issued later has already been applied.
    Superseded,
}

/// Orders overlapping redaction requests so that a slow, older response
/// never overrides a newer one.
#[derive(Debug, Default)]
pub struct RedactionSession {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RedactionSession {
    pub fn new() -> Self {
        RedactionSession::default()
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn resolve<R>(&self, ticket: Ticket, result: R) -> Resolution<R> {
        let previous = self.applied.fetch_max(ticket.0, Ordering::SeqCst);
        if ticket.0 > previous {
            Resolution::Applied(result)
        } else {
            debug!(
                "dropping redaction result {:?}, {} already applied",
                ticket, previous
            );
            Resolution::Superseded
        }
    }

    pub fn request<'a, T: Transport + ?Sized>(
        &self,
        transport: &T,
        collections: impl IntoIterator<Item = &'a FeatureCollection>,
        time: f64,
        options: &RedactionOptions,
    ) -> Result<Resolution<RedactionResult>, RedactionError> {
        let ticket = self.ticket();
        let result = request_redaction(transport, collections, time, options)?;
        Ok(self.resolve(ticket, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{polygon_feature, squares};
    use serde_json::json;
    use std::cell::RefCell;

    struct MockTransport {
        status: u16,
        body: &'static str,
        requests: RefCell<Vec<(String, Value)>>,
    }

    impl MockTransport {
        fn new(status: u16, body: &'static str) -> Self {
            MockTransport {
                status,
                body,
                requests: RefCell::new(vec![]),
            }
        }

        fn calls(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for MockTransport {
        fn post_json(
            &self,
            endpoint: &str,
            body: &[u8],
        ) -> Result<TransportResponse, RedactionError> {
            let json = serde_json::from_slice(body)?;
            self.requests.borrow_mut().push((endpoint.to_string(), json));
            Ok(TransportResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    #[test]
    fn build_http_transports() {
        assert!(HttpTransport::new().is_ok());
        assert!(HttpTransport::with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn default_options() {
        let options = RedactionOptions::default();
        assert_eq!(options.k_threshold, 30);
        assert_eq!(options.endpoint, "http://localhost:8000/clean");
    }

    #[test]
    fn no_request_without_polygons() {
        let transport = MockTransport::new(200, r#"{"ids_to_hide": ["a"]}"#);
        let mut collection = squares("layer", &["a"]);
        collection.show = false;
        let result =
            request_redaction(&transport, &[collection], 0., &RedactionOptions::default())
                .unwrap();
        assert!(result.ids_to_hide.is_empty());
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn send_threshold_and_endpoint() {
        let transport = MockTransport::new(200, r#"{"ids_to_hide": []}"#);
        let options = RedactionOptions {
            k_threshold: 12,
            endpoint: "http://redact.test/clean".into(),
        };
        request_redaction(&transport, &[squares("layer", &["a"])], 0., &options).unwrap();

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        let (endpoint, body) = &requests[0];
        assert_eq!(endpoint, "http://redact.test/clean");
        assert_eq!(body["k_threshold"], json!(12));
        assert_eq!(body["features"][0]["id"], json!("a"));
        assert_eq!(body["features"][0]["geometry"]["type"], json!("Polygon"));
        assert_eq!(
            body["features"][0]["geometry"]["coordinates"][0]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn propagate_service_error() {
        let transport = MockTransport::new(500, "Internal Server Error");
        let collections = [squares("layer", &["a", "b"])];
        let result = request_redaction(&transport, &collections, 0., &RedactionOptions::default());
        match result {
            Err(RedactionError::Service { status }) => assert_eq!(status, 500),
            other => panic!("expected service error, got {:?}", other),
        }
        assert_eq!(transport.calls(), 1);
        assert!(collections[0].features.iter().all(|feature| feature.show));
    }

    #[test]
    fn accept_any_success_status() {
        let transport = MockTransport::new(201, r#"{"ids_to_hide": ["a"]}"#);
        let result = request_redaction(
            &transport,
            &[squares("layer", &["a"])],
            0.,
            &RedactionOptions::default(),
        )
        .unwrap();
        assert_eq!(result.ids_to_hide, vec!["a"]);
    }

    #[test]
    fn default_missing_ids() {
        let transport = MockTransport::new(200, "{}");
        let result = request_redaction(
            &transport,
            &[squares("layer", &["a"])],
            0.,
            &RedactionOptions::default(),
        )
        .unwrap();
        assert_eq!(result, RedactionResult::default());
    }

    #[test]
    fn default_malformed_bodies() {
        assert!(parse_ids_to_hide(br#"{"ids_to_hide": "a"}"#).is_empty());
        assert!(parse_ids_to_hide(br#"{"ids_to_hide": [1, 2]}"#).is_empty());
        assert!(parse_ids_to_hide(br#"["a"]"#).is_empty());
        assert!(parse_ids_to_hide(b"not json").is_empty());
        assert!(parse_ids_to_hide(b"").is_empty());
    }

    #[test]
    fn parse_ids() {
        let ids = parse_ids_to_hide(br#"{"ids_to_hide": ["a", "b"], "extra": 1}"#);
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn submit_prepared_features() {
        let transport = MockTransport::new(200, r#"{"ids_to_hide": ["t"]}"#);
        let collection = {
            let mut collection = FeatureCollection::new("layer");
            collection.push(polygon_feature("t", &[(0., 0.), (0., 1.), (1., 1.)]));
            collection
        };
        let features = extract_visible_polygons(&[collection], 0.);
        let result = submit(&transport, features, &RedactionOptions::default()).unwrap();
        assert_eq!(result.ids_to_hide, vec!["t"]);
    }

    #[test]
    fn tickets_increase() {
        let session = RedactionSession::new();
        let first = session.ticket();
        let second = session.ticket();
        assert!(second > first);
    }

    #[test]
    fn drop_stale_results() {
        let session = RedactionSession::new();
        let older = session.ticket();
        let newer = session.ticket();

        assert_eq!(session.resolve(newer, "fresh"), Resolution::Applied("fresh"));
        assert_eq!(session.resolve(older, "stale"), Resolution::Superseded);
    }

    #[test]
    fn apply_results_in_order() {
        let session = RedactionSession::new();
        let older = session.ticket();
        let newer = session.ticket();

        assert_eq!(session.resolve(older, 1), Resolution::Applied(1));
        assert_eq!(session.resolve(newer, 2), Resolution::Applied(2));
    }

    #[test]
    fn session_request() {
        let transport = MockTransport::new(200, r#"{"ids_to_hide": ["b"]}"#);
        let session = RedactionSession::new();
        let collections = [squares("layer", &["a", "b"])];
        let resolution = session
            .request(&transport, &collections, 0., &RedactionOptions::default())
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Applied(RedactionResult {
                ids_to_hide: vec!["b".into()]
            })
        );
    }
}

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct AuthzMetrics {
    registry: Registry,
    cache_events: IntCounterVec,
    repository_lookups: IntCounterVec,
    requests: IntCounterVec,
}

impl AuthzMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let cache_events = IntCounterVec::new(
            Opts::new(
                "authz_cache_events_total",
                "Role cache lookups grouped by hit/miss",
            ),
            &["event"],
        )?;
        registry.register(Box::new(cache_events.clone()))?;

        let repository_lookups = IntCounterVec::new(
            Opts::new(
                "authz_repository_lookups_total",
                "Role store lookups grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(repository_lookups.clone()))?;

        let requests = IntCounterVec::new(
            Opts::new(
                "authz_requests_total",
                "Authorization requests grouped by caller kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(requests.clone()))?;

        Ok(Self {
            registry,
            cache_events,
            repository_lookups,
            requests,
        })
    }

    pub fn cache_event(&self, event: &str) {
        self.cache_events.with_label_values(&[event]).inc();
    }

    pub fn repository_lookup(&self, outcome: &str) {
        self.repository_lookups.with_label_values(&[outcome]).inc();
    }

    pub fn request(&self, kind: &str) {
        self.requests.with_label_values(&[kind]).inc();
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}

//! Fetching raw ephemerides from JPL Horizons.
//!
//! [`EphemerisSource`] is the seam between the resolver and the network: one attempt per call,
//! failures reported as [`TransportFailure`]. [`HorizonsClient`] is the HTTP implementation,
//! asking for one-day vector tables around the requested instant.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::HorizonsConfig, ephemeris::TransportFailure, orrery_errors::OrreryError,
    time::TimeBucket,
};

/// Provider-native response body, handed untouched to the parser.
pub type RawPayload = String;

/// Table step of every request: one row per day.
pub const STEP_SIZE: &str = "1d";

/// Inclusive `[start, stop]` date pair of an ephemeris request, with its table step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: String,
    pub stop: String,
    pub step: &'static str,
}

impl FetchWindow {
    /// One-day window starting at the bucket's UTC date, one row per day.
    pub fn around(bucket: &TimeBucket) -> Self {
        let (start, stop) = bucket.day_window();
        FetchWindow {
            start,
            stop,
            step: STEP_SIZE,
        }
    }
}

/// Anything able to fetch a raw ephemeris payload for a body over a time window.
///
/// Implementations make a single attempt: no retries, and every failure is reported as a
/// [`TransportFailure`] so that the caller decides what to do with it.
#[async_trait]
pub trait EphemerisSource: Send + Sync {
    async fn fetch(
        &self,
        provider_id: &str,
        window: &FetchWindow,
    ) -> Result<RawPayload, TransportFailure>;
}

/// HTTP client for the JPL Horizons API, asking for heliocentric ICRF state vectors in AU.
#[derive(Debug, Clone)]
pub struct HorizonsClient {
    http: Client,
    endpoint: String,
    center: String,
    timeout: Duration,
}

impl HorizonsClient {
    /// Build a client with a hard per-request timeout.
    ///
    /// Arguments
    /// ---------
    /// * `endpoint`: URL of the Horizons API
    /// * `center`: Horizons `CENTER` code, e.g. `500@10` for the Sun's center
    /// * `timeout`: total time allowed for one request, connection included
    pub fn new(endpoint: &str, center: &str, timeout: Duration) -> Result<Self, OrreryError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(HorizonsClient::with_http_client(http, endpoint, center, timeout))
    }

    /// Use a preconfigured [`reqwest::Client`]; `timeout` should match the one set on it.
    pub fn with_http_client(http: Client, endpoint: &str, center: &str, timeout: Duration) -> Self {
        HorizonsClient {
            http,
            endpoint: endpoint.to_string(),
            center: center.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &HorizonsConfig) -> Result<Self, OrreryError> {
        HorizonsClient::new(&config.endpoint, &config.center, config.timeout())
    }

    pub(crate) fn query_params(
        &self,
        provider_id: &str,
        window: &FetchWindow,
    ) -> [(&'static str, String); 14] {
        [
            ("format", "json".into()),
            ("COMMAND", format!("'{provider_id}'")),
            ("OBJ_DATA", "NO".into()),
            ("MAKE_EPHEM", "YES".into()),
            ("EPHEM_TYPE", "VECTORS".into()),
            ("CENTER", format!("'{}'", self.center)),
            ("START_TIME", format!("'{}'", window.start)),
            ("STOP_TIME", format!("'{}'", window.stop)),
            ("STEP_SIZE", format!("'{}'", window.step)),
            ("CSV_FORMAT", "YES".into()),
            ("REF_SYSTEM", "ICRF".into()),
            ("REF_PLANE", "FRAME".into()),
            ("OUT_UNITS", "AU-D".into()),
            ("VEC_TABLE", "2".into()),
        ]
    }

    fn transport_failure(&self, err: reqwest::Error) -> TransportFailure {
        if err.is_timeout() {
            TransportFailure::Timeout(self.timeout)
        } else if let Some(status) = err.status() {
            TransportFailure::Status(status.as_u16())
        } else {
            TransportFailure::Connection(err.to_string())
        }
    }
}

#[async_trait]
impl EphemerisSource for HorizonsClient {
    async fn fetch(
        &self,
        provider_id: &str,
        window: &FetchWindow,
    ) -> Result<RawPayload, TransportFailure> {
        debug!(
            provider_id,
            start = %window.start,
            stop = %window.stop,
            "requesting Horizons state vectors"
        );

        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(provider_id, window))
            .send()
            .await
            .map_err(|err| self.transport_failure(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|err| self.transport_failure(err))
    }
}

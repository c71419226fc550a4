//! # Position resolver
//!
//! Resolution of a body at an instant follows one path per request:
//!
//! ```text
//! cache lookup ── hit ─────────────────────────────────────────────▶ cached result
//!      │
//!     miss ─▶ fetch ── ok ─▶ parse ── ok ───▶ store ─▶ LIVE
//!               │                │
//!               └─ transport ────┴─ parse ──▶ fallback ─▶ store ─▶ FALLBACK
//! ```
//!
//! Degraded results are cached for the same validity window as live ones, so an upstream
//! outage costs one request per body and time bucket rather than one per caller.
//!
//! Only [`TransportFailure`] and [`ParseFailure`](crate::ephemeris::ParseFailure) lead to a
//! fallback; they never reach the caller. The caller only sees [`OrreryError`] for rejected
//! input (unknown body, unparseable time).
use std::{fmt, sync::Arc, time::Duration};

use futures::future::join_all;
use itertools::Itertools;
use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::{
    cache::PositionCache,
    constants::FETCH_TIMEOUT,
    coordinates::CartesianPosition,
    ephemeris::{
        bodies::{BodyRegistry, CelestialBody},
        fallback::FallbackTable,
        horizons_parser::{self, StateVector},
        horizons_request::{EphemerisSource, FetchWindow},
        ResolveFailure, TransportFailure,
    },
    orrery_errors::OrreryError,
    time::{Clock, TimeBucket},
};

/// Whether a position comes from the live provider or from the static fallback table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Live,
    Fallback,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Live => write!(f, "LIVE"),
            Origin::Fallback => write!(f, "FALLBACK"),
        }
    }
}

/// Heliocentric position of a body in AU, tagged with its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPosition {
    pub position: CartesianPosition,
    /// AU/day, only available for live results
    pub velocity: Option<Vector3<f64>>,
    pub origin: Origin,
}

impl ResolvedPosition {
    pub fn live(state: StateVector) -> Self {
        ResolvedPosition {
            position: state.position,
            velocity: state.velocity,
            origin: Origin::Live,
        }
    }

    pub fn fallback(position: CartesianPosition) -> Self {
        ResolvedPosition {
            position,
            velocity: None,
            origin: Origin::Fallback,
        }
    }

    pub fn is_live(&self) -> bool {
        self.origin == Origin::Live
    }
}

/// Outcome of resolving one body.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Canonical body name
    pub body: String,
    /// The normalized instant actually used, echoed back to the caller
    pub instant: TimeBucket,
    pub resolved: ResolvedPosition,
    /// True when served from the cache without touching the provider
    pub cached: bool,
    /// Why the live path failed, when this call degraded to the fallback table
    pub failure: Option<ResolveFailure>,
}

/// Outcome of resolving every known body at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResolution {
    pub instant: TimeBucket,
    pub resolutions: Vec<Resolution>,
}

impl BatchResolution {
    pub fn get(&self, body: &str) -> Option<&Resolution> {
        self.resolutions.iter().find(|res| res.body == body)
    }

    /// Bodies whose live resolution failed during this batch, with the cause.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ResolveFailure)> {
        self.resolutions
            .iter()
            .filter_map(|res| res.failure.as_ref().map(|failure| (res.body.as_str(), failure)))
    }
}

/// Resolves live body positions through the cache, the ephemeris source and the fallback table.
///
/// Every collaborator is injected, so several resolvers can share one cache and tests can
/// substitute the source and the clock.
#[derive(Clone)]
pub struct PositionResolver {
    registry: Arc<BodyRegistry>,
    source: Arc<dyn EphemerisSource>,
    cache: Arc<PositionCache>,
    clock: Arc<dyn Clock>,
    fallback: FallbackTable,
    fetch_timeout: Duration,
}

impl fmt::Debug for PositionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionResolver")
            .field("registry", &self.registry)
            .field("cache_entries", &self.cache.len())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl PositionResolver {
    pub fn new(
        registry: Arc<BodyRegistry>,
        source: Arc<dyn EphemerisSource>,
        cache: Arc<PositionCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        PositionResolver {
            registry,
            source,
            cache,
            clock,
            fallback: FallbackTable,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }

    /// Upper bound on a single fetch, enforced here whatever the source does.
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn cache(&self) -> &Arc<PositionCache> {
        &self.cache
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Normalize an optional ISO-8601 instant, defaulting to the current time.
    pub fn bucket_for(&self, at: Option<&str>) -> Result<TimeBucket, OrreryError> {
        match at {
            Some(raw) => TimeBucket::parse(raw),
            None => Ok(TimeBucket::from_epoch(self.clock.now())),
        }
    }

    /// Resolve one body.
    ///
    /// Arguments
    /// ---------
    /// * `body`: body name, matched case-insensitively against the registry
    /// * `at`: ISO-8601 instant, `None` for now
    ///
    /// Return
    /// ------
    /// * A [`Resolution`], live or degraded, or [`OrreryError::UnknownBody`] /
    ///   [`OrreryError::InvalidTime`] for rejected input.
    pub async fn resolve(&self, body: &str, at: Option<&str>) -> Result<Resolution, OrreryError> {
        let body = self
            .registry
            .get(body)
            .ok_or_else(|| OrreryError::UnknownBody(body.to_string()))?;
        let bucket = self.bucket_for(at)?;
        Ok(self.resolve_body(body, bucket).await)
    }

    /// Resolve every registered body at the same instant.
    ///
    /// Bodies are resolved concurrently and independently: a failure for one of them degrades
    /// that body only and is reported through [`BatchResolution::failures`].
    pub async fn resolve_all(&self, at: Option<&str>) -> Result<BatchResolution, OrreryError> {
        let bucket = self.bucket_for(at)?;
        let resolutions = join_all(
            self.registry
                .iter()
                .map(|body| self.resolve_body(body, bucket)),
        )
        .await;

        let batch = BatchResolution {
            instant: bucket,
            resolutions,
        };

        let degraded = batch
            .resolutions
            .iter()
            .filter(|res| !res.resolved.is_live())
            .map(|res| res.body.as_str())
            .join(",");
        info!(
            instant = %bucket,
            bodies = batch.resolutions.len(),
            failures = batch.failures().count(),
            degraded = %degraded,
            "batch resolution complete"
        );

        Ok(batch)
    }

    async fn resolve_body(&self, body: &CelestialBody, bucket: TimeBucket) -> Resolution {
        if let Some(entry) = self.cache.get(body.name, &bucket) {
            debug!(body = body.name, instant = %bucket, origin = %entry.payload.origin, "position cache hit");
            return Resolution {
                body: body.name.to_string(),
                instant: bucket,
                resolved: entry.payload,
                cached: true,
                failure: None,
            };
        }
        debug!(body = body.name, instant = %bucket, "position cache miss");

        let (resolved, failure) = match self.fetch_live(body, &bucket).await {
            Ok(state) => (ResolvedPosition::live(state), None),
            Err(failure) => {
                warn!(
                    body = body.name,
                    instant = %bucket,
                    error = %failure,
                    "live ephemeris unavailable, serving fallback position"
                );
                (
                    ResolvedPosition::fallback(self.fallback.get(body.name)),
                    Some(failure),
                )
            }
        };

        self.cache.put(body.name, &bucket, resolved);

        Resolution {
            body: body.name.to_string(),
            instant: bucket,
            resolved,
            cached: false,
            failure,
        }
    }

    async fn fetch_live(
        &self,
        body: &CelestialBody,
        bucket: &TimeBucket,
    ) -> Result<StateVector, ResolveFailure> {
        let window = FetchWindow::around(bucket);
        let payload = tokio::time::timeout(
            self.fetch_timeout,
            self.source.fetch(body.horizons_id, &window),
        )
        .await
        .map_err(|_| TransportFailure::Timeout(self.fetch_timeout))??;

        Ok(horizons_parser::parse(&payload, body.name)?)
    }
}

#[cfg(test)]
mod resolver_test {
    use async_trait::async_trait;
    use hifitime::Epoch;

    use super::*;
    use crate::{ephemeris::horizons_request::RawPayload, time::ManualClock};

    #[derive(Debug)]
    struct StalledSource;

    #[async_trait]
    impl EphemerisSource for StalledSource {
        async fn fetch(&self, _: &str, _: &FetchWindow) -> Result<RawPayload, TransportFailure> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }
    }

    fn resolver(source: Arc<dyn EphemerisSource>) -> PositionResolver {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(
            Epoch::from_gregorian_utc_at_midnight(2024, 6, 1),
        ));
        let cache = Arc::new(PositionCache::new(Duration::from_secs(3600), clock.clone()));
        PositionResolver::new(
            Arc::new(BodyRegistry::solar_system()),
            source,
            cache,
            clock,
        )
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(Origin::Live.to_string(), "LIVE");
        assert_eq!(Origin::Fallback.to_string(), "FALLBACK");
    }

    #[tokio::test]
    async fn test_hard_timeout_falls_back() {
        let resolver = resolver(Arc::new(StalledSource))
            .with_fetch_timeout(Duration::from_millis(50));

        let res = resolver.resolve("jupiter", Some("2024-06-01T00:00:00")).await.unwrap();
        assert_eq!(res.resolved.origin, Origin::Fallback);
        assert_eq!(res.resolved.position, FallbackTable.get("jupiter"));
        assert_eq!(
            res.failure,
            Some(ResolveFailure::Transport(TransportFailure::Timeout(
                Duration::from_millis(50)
            )))
        );
    }

    #[tokio::test]
    async fn test_default_instant_is_clock_time() {
        let resolver = resolver(Arc::new(StalledSource))
            .with_fetch_timeout(Duration::from_millis(10));
        let res = resolver.resolve("mars", None).await.unwrap();
        assert_eq!(res.instant.to_string(), "2024-06-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_rejected_input() {
        let resolver = resolver(Arc::new(StalledSource));
        assert_eq!(
            resolver.resolve("vulcan", None).await,
            Err(OrreryError::UnknownBody("vulcan".into()))
        );
        assert!(matches!(
            resolver.resolve("mars", Some("not a time")).await,
            Err(OrreryError::InvalidTime(_))
        ));
        assert!(matches!(
            resolver.resolve_all(Some("not a time")).await,
            Err(OrreryError::InvalidTime(_))
        ));
        assert!(resolver.cache().is_empty());
    }
}

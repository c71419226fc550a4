//! # Orrery
//!
//! Position resolution and caching for a 3-D sky viewer.
//!
//! Two kinds of objects are served:
//!
//! - **Catalog objects** (stars, galaxies, ...) with fixed sky coordinates, converted once to
//!   Cartesian parsecs and queried spatially ([`catalog`]).
//! - **Solar-system bodies** whose heliocentric positions change with time, fetched from JPL
//!   Horizons, cached per `(body, instant)` and degraded to a static table when the provider
//!   fails ([`resolver`]).
//!
//! The [`Orrery`](crate::orrery::Orrery) façade wires both together from an
//! [`OrreryConfig`](crate::config::OrreryConfig).
//!
//! ```rust, no_run
//! use orrery::{config::OrreryConfig, orrery::Orrery};
//!
//! # async fn demo() -> Result<(), orrery::orrery_errors::OrreryError> {
//! let orrery = Orrery::new(OrreryConfig::default())?;
//! let mars = orrery.resolve("mars", Some("2024-03-01T12:00:00Z")).await?;
//! println!("{} {:?} ({})", mars.body, mars.resolved.position, mars.resolved.origin);
//!
//! let nearby = orrery.positions(Some("-10,-10,-10,10,10,10"), Some(1.0))?;
//! # Ok(())
//! # }
//! ```
pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod ephemeris;
pub mod orrery;
pub mod orrery_errors;
pub mod resolver;
pub mod time;

use orrery_errors::OrreryError;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
///
/// Arguments
/// ---------
/// * `level`: default filter directive, e.g. `"info"` or `"orrery=debug"`
/// * `json`: JSON lines instead of compact human-readable output
///
/// Return
/// ------
/// * [`OrreryError::TracingInit`] if a global subscriber is already set.
pub fn init_tracing(level: &str, json: bool) -> Result<(), OrreryError> {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
            .map_err(|e| OrreryError::TracingInit(e.to_string()))
    } else {
        fmt()
            .compact()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
            .map_err(|e| OrreryError::TracingInit(e.to_string()))
    }
}

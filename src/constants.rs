//! # Constants and type definitions for Orrery
//!
//! This module centralizes the **unit conversions** and **common type aliases** used throughout
//! the crate, together with the few fixed policy values (default distance, cache validity,
//! request timeout) that the rest of the code refers to by name.
//!
//! ## Overview
//!
//! - Angle conversions (degrees ↔ radians)
//! - Length conversions (parsec ↔ light-year, parallax ↔ parsec)
//! - Type aliases documenting the unit carried by a bare `f64`

use std::time::Duration;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Light-years in one parsec
pub const PARSEC_TO_LIGHT_YEAR: f64 = 3.26156;

/// Distance assigned to catalog objects without a usable parallax (parsecs)
pub const DEFAULT_DISTANCE_PC: f64 = 1000.0;

/// Milliarcseconds of parallax corresponding to one parsec
pub const MAS_PER_PARSEC: f64 = 1000.0;

// -------------------------------------------------------------------------------------------------
// Policy values
// -------------------------------------------------------------------------------------------------

/// Validity window of a cached position
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Hard limit on a single request to the ephemeris provider
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Parallax in milliarcseconds
pub type Milliarcsecond = f64;
/// Distance in parsecs
pub type Parsec = f64;
/// Apparent visual magnitude (lower is brighter)
pub type Magnitude = f64;

//! Static positions served when the live path fails.
//!
//! Values are coarse: each body sits on the +x axis at its mean heliocentric distance. They keep
//! a viewer drawing something plausible during a provider outage.
use nalgebra::Vector3;

use crate::coordinates::CartesianPosition;

/// Last-resort heliocentric positions in AU: each body on the +x axis at its mean distance
/// from the Sun (the Moon sits just outside the Earth).
const FALLBACK_POSITIONS: [(&str, [f64; 3]); 11] = [
    ("sun", [0.0, 0.0, 0.0]),
    ("mercury", [0.387, 0.0, 0.0]),
    ("venus", [0.723, 0.0, 0.0]),
    ("earth", [1.0, 0.0, 0.0]),
    ("moon", [1.00257, 0.0, 0.0]),
    ("mars", [1.524, 0.0, 0.0]),
    ("jupiter", [5.204, 0.0, 0.0]),
    ("saturn", [9.537, 0.0, 0.0]),
    ("uranus", [19.191, 0.0, 0.0]),
    ("neptune", [30.069, 0.0, 0.0]),
    ("pluto", [39.482, 0.0, 0.0]),
];

/// Static, build-time table of degraded positions.
///
/// Lookups never fail: an unknown body resolves to the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackTable;

impl FallbackTable {
    pub fn get(&self, body_name: &str) -> CartesianPosition {
        FALLBACK_POSITIONS
            .iter()
            .find(|(name, _)| *name == body_name)
            .map(|(_, xyz)| Vector3::from(*xyz))
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn contains(&self, body_name: &str) -> bool {
        FALLBACK_POSITIONS.iter().any(|(name, _)| *name == body_name)
    }
}

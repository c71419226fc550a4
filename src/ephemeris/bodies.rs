//! Solar-system bodies known to the resolver.
//!
//! The registry maps a canonical lowercase name to the JPL Horizons `COMMAND` identifier. Only
//! registered bodies can be resolved; anything else is rejected as an unknown body.
/// Broad classification of a solar-system body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Star,
    Planet,
    DwarfPlanet,
    Moon,
}

/// Reference data for a body whose position is resolved from the ephemeris provider.
///
/// `name` is the canonical lowercase key used everywhere in the crate (cache keys, fallback
/// table, logs). `horizons_id` is the `COMMAND` value understood by JPL Horizons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialBody {
    pub name: &'static str,
    pub horizons_id: &'static str,
    pub kind: BodyKind,
    /// Mean radius in kilometers
    pub mean_radius_km: f64,
}

const SOLAR_SYSTEM: [CelestialBody; 11] = [
    CelestialBody {
        name: "sun",
        horizons_id: "10",
        kind: BodyKind::Star,
        mean_radius_km: 695_700.0,
    },
    CelestialBody {
        name: "mercury",
        horizons_id: "199",
        kind: BodyKind::Planet,
        mean_radius_km: 2_439.7,
    },
    CelestialBody {
        name: "venus",
        horizons_id: "299",
        kind: BodyKind::Planet,
        mean_radius_km: 6_051.8,
    },
    CelestialBody {
        name: "earth",
        horizons_id: "399",
        kind: BodyKind::Planet,
        mean_radius_km: 6_371.0,
    },
    CelestialBody {
        name: "moon",
        horizons_id: "301",
        kind: BodyKind::Moon,
        mean_radius_km: 1_737.4,
    },
    CelestialBody {
        name: "mars",
        horizons_id: "499",
        kind: BodyKind::Planet,
        mean_radius_km: 3_389.5,
    },
    CelestialBody {
        name: "jupiter",
        horizons_id: "599",
        kind: BodyKind::Planet,
        mean_radius_km: 69_911.0,
    },
    CelestialBody {
        name: "saturn",
        horizons_id: "699",
        kind: BodyKind::Planet,
        mean_radius_km: 58_232.0,
    },
    CelestialBody {
        name: "uranus",
        horizons_id: "799",
        kind: BodyKind::Planet,
        mean_radius_km: 25_362.0,
    },
    CelestialBody {
        name: "neptune",
        horizons_id: "899",
        kind: BodyKind::Planet,
        mean_radius_km: 24_622.0,
    },
    CelestialBody {
        name: "pluto",
        horizons_id: "999",
        kind: BodyKind::DwarfPlanet,
        mean_radius_km: 1_188.3,
    },
];

/// Immutable set of known bodies, loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::solar_system()
    }
}

impl BodyRegistry {
    pub fn new(bodies: Vec<CelestialBody>) -> Self {
        BodyRegistry { bodies }
    }

    /// The Sun, the eight planets, the Moon and Pluto.
    pub fn solar_system() -> Self {
        BodyRegistry::new(SOLAR_SYSTEM.to_vec())
    }

    /// Look a body up by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        let name = name.trim();
        self.bodies
            .iter()
            .find(|body| body.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

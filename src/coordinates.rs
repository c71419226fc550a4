//! # Coordinate transforms
//!
//! Conversions between astrometric spherical coordinates (right ascension, declination,
//! parallax) and Cartesian positions in the right-handed equatorial (ICRS) frame, plus the two
//! geometric predicates built on top of them: Euclidean distance and bounding-box membership.
//!
//! Everything here is a pure function over plain numbers. The length unit of a
//! [`CartesianPosition`] is not stored: catalog objects are expressed in parsecs, ephemeris
//! bodies in astronomical units, and it is up to the caller not to mix them.
//!
//! ## Frame
//!
//! ```text
//! x = d · cos(δ) · cos(α)
//! y = d · cos(δ) · sin(α)
//! z = d · sin(δ)
//! ```
//!
//! with `d = 1000 / parallax` parsecs when the parallax is positive, and
//! [`DEFAULT_DISTANCE_PC`] otherwise.
use std::{fmt, str::FromStr};

use itertools::Itertools;
use nalgebra::Vector3;

use crate::{
    constants::{Degree, Milliarcsecond, Parsec, DEFAULT_DISTANCE_PC, MAS_PER_PARSEC, RADEG},
    orrery_errors::OrreryError,
};

/// Cartesian position in the equatorial frame (parsecs or astronomical units, see module docs).
pub type CartesianPosition = Vector3<f64>;

/// Astrometric input of a catalog object.
///
/// A parallax `<= 0` means "no parallax measurement" and places the object at
/// [`DEFAULT_DISTANCE_PC`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoordinate {
    /// Right ascension in degrees, `[0, 360)`
    pub ra: Degree,
    /// Declination in degrees, `[-90, 90]`
    pub dec: Degree,
    /// Parallax in milliarcseconds
    pub parallax: Milliarcsecond,
}

impl SphericalCoordinate {
    pub fn new(ra: Degree, dec: Degree, parallax: Milliarcsecond) -> Self {
        SphericalCoordinate { ra, dec, parallax }
    }

    /// Distance implied by the parallax, see [`parallax_to_distance`].
    pub fn distance(&self) -> Parsec {
        parallax_to_distance(self.parallax)
    }

    pub fn to_cartesian(&self) -> CartesianPosition {
        to_cartesian(self.ra, self.dec, self.parallax)
    }
}

/// Result of the inverse transform: the parallax is replaced by the Euclidean distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPosition {
    /// Right ascension in degrees, `[0, 360)`
    pub ra: Degree,
    /// Declination in degrees, `[-90, 90]`
    pub dec: Degree,
    /// Distance to the origin, in the unit of the input position
    pub distance: f64,
}

/// Convert a parallax in milliarcseconds to a distance in parsecs.
///
/// Non-positive parallaxes carry no distance information and resolve to
/// [`DEFAULT_DISTANCE_PC`] instead of failing.
pub fn parallax_to_distance(parallax: Milliarcsecond) -> Parsec {
    if parallax > 0.0 {
        MAS_PER_PARSEC / parallax
    } else {
        DEFAULT_DISTANCE_PC
    }
}

/// Convert right ascension, declination and parallax to an equatorial Cartesian position.
///
/// Arguments
/// ---------
/// * `ra`: right ascension in degrees
/// * `dec`: declination in degrees
/// * `parallax`: parallax in milliarcseconds, `<= 0` when unmeasured
///
/// Return
/// ------
/// * The position in parsecs. Never fails.
pub fn to_cartesian(ra: Degree, dec: Degree, parallax: Milliarcsecond) -> CartesianPosition {
    let distance = parallax_to_distance(parallax);
    let (sin_ra, cos_ra) = (ra * RADEG).sin_cos();
    let (sin_dec, cos_dec) = (dec * RADEG).sin_cos();

    Vector3::new(
        distance * cos_dec * cos_ra,
        distance * cos_dec * sin_ra,
        distance * sin_dec,
    )
}

/// Convert a Cartesian position back to right ascension, declination and distance.
///
/// Arguments
/// ---------
/// * `position`: Cartesian position in any length unit
///
/// Return
/// ------
/// * A [`SkyPosition`] with `ra ∈ [0, 360)`, `dec ∈ [-90, 90]` and the distance in the unit of
///   the input. The origin maps to `(0, 0, 0)`.
///
/// Remarks
/// -------
/// * The declination is computed as `atan2(z, √(x² + y²))`, which equals `asin(z / d)` but
///   keeps full precision close to the poles.
pub fn to_spherical(position: &CartesianPosition) -> SkyPosition {
    let distance = position.norm();
    if distance == 0.0 {
        return SkyPosition {
            ra: 0.0,
            dec: 0.0,
            distance,
        };
    }

    let dec = position.z.atan2(position.x.hypot(position.y)) / RADEG;

    let mut ra = position.y.atan2(position.x) / RADEG;
    if ra < 0.0 {
        ra += 360.0;
    }
    if ra >= 360.0 {
        ra = 0.0;
    }

    SkyPosition { ra, dec, distance }
}

/// Euclidean distance between two positions, in their common unit.
pub fn distance(a: &CartesianPosition, b: &CartesianPosition) -> f64 {
    (a - b).norm()
}

/// Axis-aligned box in Cartesian space, inclusive on all six faces.
///
/// The fields are public so a box can be built directly; such a box is not checked.
/// [`BoundingBox::new`] and the string parser reject `min > max` on any axis, and
/// [`in_bounding_box`] treats an unchecked malformed box as empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: CartesianPosition,
    pub max: CartesianPosition,
}

impl BoundingBox {
    /// Build a validated box.
    ///
    /// Return
    /// ------
    /// * [`OrreryError::InvalidBoundingBox`] if a component is NaN or `min > max` on any axis.
    pub fn new(min: CartesianPosition, max: CartesianPosition) -> Result<Self, OrreryError> {
        let bbox = BoundingBox { min, max };
        if bbox.is_well_formed() {
            Ok(bbox)
        } else {
            Err(OrreryError::InvalidBoundingBox(format!(
                "min {} must not exceed max {} on any axis",
                format_triplet(&min),
                format_triplet(&max)
            )))
        }
    }

    /// `min <= max` on every axis. NaN components make the box malformed.
    pub fn is_well_formed(&self) -> bool {
        self.min
            .iter()
            .zip(self.max.iter())
            .all(|(lo, hi)| lo <= hi)
    }

    pub fn contains(&self, position: &CartesianPosition) -> bool {
        in_bounding_box(position, self)
    }
}

impl FromStr for BoundingBox {
    type Err = OrreryError;

    /// Parse `"x_min,y_min,z_min,x_max,y_max,z_max"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(',')
            .map(|field| field.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|err| OrreryError::InvalidBoundingBox(format!("{s:?}: {err}")))?;

        let [x_min, y_min, z_min, x_max, y_max, z_max] = coords[..] else {
            return Err(OrreryError::InvalidBoundingBox(format!(
                "{s:?}: expected 6 coordinates, got {}",
                coords.len()
            )));
        };

        BoundingBox::new(
            Vector3::new(x_min, y_min, z_min),
            Vector3::new(x_max, y_max, z_max),
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            self.min.iter().join(","),
            self.max.iter().join(",")
        )
    }
}

fn format_triplet(v: &CartesianPosition) -> String {
    format!("({})", v.iter().join(", "))
}

/// Inclusive membership test: `min <= p <= max` componentwise.
///
/// A malformed box (`min > max` on some axis, or NaN bounds) contains nothing.
pub fn in_bounding_box(position: &CartesianPosition, bbox: &BoundingBox) -> bool {
    bbox.is_well_formed()
        && (0..3).all(|axis| bbox.min[axis] <= position[axis] && position[axis] <= bbox.max[axis])
}

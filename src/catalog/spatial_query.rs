//! Spatial filtering over a [`StarCatalog`].
//!
//! Queries scan the catalog in insertion order: results are stable and reproducible for the
//! same catalog content.
use crate::{
    catalog::{CatalogObject, StarCatalog},
    constants::{Magnitude, Parsec, PARSEC_TO_LIGHT_YEAR},
    coordinates::{distance, in_bounding_box, BoundingBox},
    orrery_errors::OrreryError,
};

/// Distance between two catalog objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    pub parsecs: Parsec,
    pub light_years: f64,
}

impl Separation {
    pub fn from_parsecs(parsecs: Parsec) -> Self {
        Separation {
            parsecs,
            light_years: parsecs * PARSEC_TO_LIGHT_YEAR,
        }
    }
}

/// `true` when no ceiling is given, or when the object has a magnitude at or below it.
///
/// An object without a recorded magnitude never passes a ceiling.
pub fn passes_magnitude(object: &CatalogObject, max_magnitude: Option<Magnitude>) -> bool {
    match max_magnitude {
        None => true,
        Some(ceiling) => object.magnitude.is_some_and(|magnitude| magnitude <= ceiling),
    }
}

/// Catalog objects inside `bbox` and at or below the magnitude ceiling.
///
/// Arguments
/// ---------
/// * `catalog`: the objects to scan
/// * `bbox`: inclusive box, in parsecs
/// * `max_magnitude`: optional inclusive brightness ceiling
///
/// Return
/// ------
/// * Matching objects in catalog order. A malformed box yields no object.
pub fn query<'a>(
    catalog: &'a StarCatalog,
    bbox: &BoundingBox,
    max_magnitude: Option<Magnitude>,
) -> Vec<&'a CatalogObject> {
    catalog
        .iter()
        .filter(|object| in_bounding_box(&object.position, bbox))
        .filter(|object| passes_magnitude(object, max_magnitude))
        .collect()
}

/// Like [`query`] without a spatial constraint.
pub fn brighter_than(
    catalog: &StarCatalog,
    max_magnitude: Option<Magnitude>,
) -> Vec<&CatalogObject> {
    catalog
        .iter()
        .filter(|object| passes_magnitude(object, max_magnitude))
        .collect()
}

pub fn separation(a: &CatalogObject, b: &CatalogObject) -> Separation {
    Separation::from_parsecs(distance(&a.position, &b.position))
}

impl StarCatalog {
    pub fn query(&self, bbox: &BoundingBox, max_magnitude: Option<Magnitude>) -> Vec<&CatalogObject> {
        query(self, bbox, max_magnitude)
    }

    /// Separation between two objects looked up by id.
    ///
    /// Return
    /// ------
    /// * [`OrreryError::UnknownObject`] for the first id not present in the catalog.
    pub fn separation_between(&self, id_a: u32, id_b: u32) -> Result<Separation, OrreryError> {
        let a = self.get(id_a).ok_or(OrreryError::UnknownObject(id_a))?;
        let b = self.get(id_b).ok_or(OrreryError::UnknownObject(id_b))?;
        Ok(separation(a, b))
    }
}

#[cfg(test)]
mod spatial_query_test {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::catalog::{CatalogEntry, ObjectKind};

    fn names<'a>(objects: &[&'a CatalogObject]) -> Vec<&'a str> {
        objects.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn test_local_box() {
        let catalog = StarCatalog::bright_stars();
        let bbox: BoundingBox = "-10,-10,-10,10,10,10".parse().unwrap();
        assert_eq!(
            names(&catalog.query(&bbox, None)),
            vec!["Sirius", "Arcturus", "Vega", "Capella", "Procyon"]
        );
    }

    #[test]
    fn test_magnitude_ceiling_is_inclusive() {
        let catalog = StarCatalog::bright_stars();
        let everything = BoundingBox::new(Vector3::repeat(-1e4), Vector3::repeat(1e4)).unwrap();

        assert_eq!(query(&catalog, &everything, None).len(), 8);
        assert_eq!(
            names(&query(&catalog, &everything, Some(0.03))),
            vec!["Sirius", "Canopus", "Arcturus", "Vega"]
        );
        assert_eq!(names(&brighter_than(&catalog, Some(-1.0))), vec!["Sirius"]);
    }

    #[test]
    fn test_missing_magnitude_excluded_by_ceiling() {
        let mut catalog = StarCatalog::new();
        catalog.ingest(
            CatalogEntry {
                name: "Faint".into(),
                kind: ObjectKind::Nebula,
                ra: 0.0,
                dec: 0.0,
                parallax: Some(1000.0),
                magnitude: None,
                spectral_type: None,
            },
            "manual",
        );
        let bbox: BoundingBox = "-2,-2,-2,2,2,2".parse().unwrap();

        assert_eq!(catalog.query(&bbox, None).len(), 1);
        assert!(catalog.query(&bbox, Some(30.0)).is_empty());
    }

    #[test]
    fn test_malformed_box_is_empty() {
        let catalog = StarCatalog::bright_stars();
        let inverted = BoundingBox {
            min: Vector3::repeat(10.0),
            max: Vector3::repeat(-10.0),
        };
        assert!(catalog.query(&inverted, None).is_empty());
    }

    #[test]
    fn test_separation() {
        let catalog = StarCatalog::bright_stars();
        let sirius_procyon = catalog.separation_between(1, 7).unwrap();
        let procyon_sirius = catalog.separation_between(7, 1).unwrap();

        assert_eq!(sirius_procyon, procyon_sirius);
        assert_relative_eq!(
            sirius_procyon.light_years,
            sirius_procyon.parsecs * PARSEC_TO_LIGHT_YEAR,
            epsilon = 1e-12
        );
        assert!(sirius_procyon.parsecs > 1.0 && sirius_procyon.parsecs < 2.0);

        assert_eq!(catalog.separation_between(1, 1).unwrap().parsecs, 0.0);
        assert_eq!(
            catalog.separation_between(1, 42),
            Err(OrreryError::UnknownObject(42))
        );
    }
}

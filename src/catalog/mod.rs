//! # Static catalog
//!
//! Objects with intrinsic sky coordinates (stars, galaxies, ...) whose Cartesian position is
//! computed once, at ingestion, through [`to_cartesian`](crate::coordinates::to_cartesian).
//! Positions are in parsecs. The catalog keeps insertion order, which is the order every query
//! returns results in.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`spatial_query`] | Bounding-box and magnitude filtering, separations between objects |
use std::{collections::HashMap, io::Read};

use itertools::Itertools;
use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{Degree, Magnitude, Milliarcsecond, Parsec},
    coordinates::{CartesianPosition, SphericalCoordinate},
    orrery_errors::OrreryError,
};

pub mod spatial_query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Star,
    Planet,
    Exoplanet,
    Cluster,
    Nebula,
    Galaxy,
}

/// One catalog row before ingestion, as read from CSV.
///
/// Empty `parallax`, `magnitude` and `spectral_type` cells are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: ObjectKind,
    pub ra: Degree,
    pub dec: Degree,
    pub parallax: Option<Milliarcsecond>,
    pub magnitude: Option<Magnitude>,
    pub spectral_type: Option<String>,
}

/// An ingested object. `position` and `distance` are derived and never edited afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogObject {
    pub id: u32,
    pub name: String,
    pub kind: ObjectKind,
    pub sky: SphericalCoordinate,
    pub position: CartesianPosition,
    pub distance: Parsec,
    pub magnitude: Option<Magnitude>,
    pub spectral_type: Option<String>,
    pub source: String,
    pub external_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarCatalog {
    objects: Vec<CatalogObject>,
}

impl StarCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, computing its Cartesian position. Ids are assigned sequentially from 1.
    pub fn ingest(&mut self, entry: CatalogEntry, source: &str) -> &CatalogObject {
        let sky = SphericalCoordinate::new(entry.ra, entry.dec, entry.parallax.unwrap_or(0.0));
        let object = CatalogObject {
            id: self.objects.len() as u32 + 1,
            external_id: entry.name.to_lowercase().replace(' ', "_"),
            name: entry.name,
            kind: entry.kind,
            position: sky.to_cartesian(),
            distance: sky.distance(),
            sky,
            magnitude: entry.magnitude,
            spectral_type: entry.spectral_type,
            source: source.to_string(),
        };
        self.objects.push(object);
        &self.objects[self.objects.len() - 1]
    }

    /// Build a catalog from CSV with a `name,kind,ra,dec,parallax,magnitude,spectral_type`
    /// header. The first malformed row aborts the load.
    pub fn from_csv_reader<R: Read>(reader: R, source: &str) -> Result<Self, OrreryError> {
        let mut catalog = StarCatalog::new();
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        for entry in csv_reader.deserialize::<CatalogEntry>() {
            catalog.ingest(entry?, source);
        }
        debug!(objects = catalog.len(), source, "catalog loaded from CSV");
        Ok(catalog)
    }

    /// A small sample of bright stars (Gaia DR3 style values).
    ///
    /// Solar-system bodies are not catalog objects: their positions come from the resolver.
    pub fn bright_stars() -> Self {
        let stars = [
            ("Sirius", 101.287, -16.716, 379.21, -1.46, "A1V"),
            ("Canopus", 95.988, -52.696, 10.43, -0.74, "A9II"),
            ("Arcturus", 213.915, 19.182, 88.83, -0.05, "K1.5III"),
            ("Vega", 279.234, 38.784, 130.23, 0.03, "A0V"),
            ("Capella", 79.172, 45.998, 76.20, 0.08, "G5III"),
            ("Rigel", 78.634, -8.202, 3.78, 0.13, "B8Ia"),
            ("Procyon", 114.825, 5.225, 284.56, 0.34, "F5IV"),
            ("Betelgeuse", 88.793, 7.407, 5.95, 0.50, "M1-2Ia"),
        ];

        let mut catalog = StarCatalog::new();
        for (name, ra, dec, parallax, magnitude, spectral_type) in stars {
            catalog.ingest(
                CatalogEntry {
                    name: name.into(),
                    kind: ObjectKind::Star,
                    ra,
                    dec,
                    parallax: Some(parallax),
                    magnitude: Some(magnitude),
                    spectral_type: Some(spectral_type.into()),
                },
                "Gaia_DR3_sample",
            );
        }
        catalog
    }

    pub fn get(&self, id: u32) -> Option<&CatalogObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Case-insensitive substring search on names, optionally restricted to one kind.
    pub fn search(&self, pattern: &str, kind: Option<ObjectKind>) -> Vec<&CatalogObject> {
        let pattern = pattern.to_lowercase();
        self.objects
            .iter()
            .filter(|object| object.name.to_lowercase().contains(&pattern))
            .filter(|object| kind.is_none_or(|kind| object.kind == kind))
            .collect()
    }

    /// Distinct kinds present, in order of first appearance.
    pub fn kinds(&self) -> Vec<ObjectKind> {
        self.objects.iter().map(|object| object.kind).unique().collect()
    }

    pub fn counts_by_kind(&self) -> HashMap<ObjectKind, usize> {
        self.objects.iter().map(|object| object.kind).counts()
    }
}

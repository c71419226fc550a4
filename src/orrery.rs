//! # Orrery: catalog, resolver and cache behind one handle
//!
//! [`Orrery`] is the entry point of the crate. It owns:
//!
//! 1. The static [`StarCatalog`], loaded once at construction (CSV file or built-in sample).
//! 2. A [`PositionResolver`] with its [`PositionCache`], [`BodyRegistry`] and
//!    [`EphemerisSource`].
//!
//! Every collaborator that touches the outside world (the ephemeris source, the clock) can be
//! injected through [`Orrery::with_source`], which is how the tests drive it without network
//! access.
//!
//! ```rust, no_run
//! use orrery::{config::OrreryConfig, orrery::Orrery};
//!
//! # async fn demo() -> Result<(), orrery::orrery_errors::OrreryError> {
//! let orrery = Orrery::new(OrreryConfig::default())?;
//!
//! let batch = orrery.resolve_all(None).await?;
//! for res in &batch.resolutions {
//!     println!("{:<8} {}", res.body, res.resolved.origin);
//! }
//!
//! let sirius_vega = orrery.distance_between(1, 4)?;
//! println!("{:.2} ly", sirius_vega.light_years);
//! # Ok(())
//! # }
//! ```
use std::{fs::File, sync::Arc};

use tracing::info;

use crate::{
    cache::PositionCache,
    catalog::{
        spatial_query::{self, Separation},
        CatalogObject, StarCatalog,
    },
    config::OrreryConfig,
    constants::Magnitude,
    coordinates::BoundingBox,
    ephemeris::{
        bodies::BodyRegistry,
        horizons_request::{EphemerisSource, HorizonsClient},
    },
    orrery_errors::OrreryError,
    resolver::{BatchResolution, PositionResolver, Resolution},
    time::{Clock, SystemClock},
};

#[derive(Debug, Clone)]
pub struct Orrery {
    config: OrreryConfig,
    catalog: Arc<StarCatalog>,
    resolver: PositionResolver,
}

impl Orrery {
    /// Build an [`Orrery`] talking to JPL Horizons with the wall clock.
    ///
    /// Arguments
    /// ---------
    /// * `config`: provider, cache and catalog settings
    ///
    /// Return
    /// ------
    /// * The wired instance, or an [`OrreryError`] if the HTTP client cannot be built or the
    ///   catalog file cannot be read.
    pub fn new(config: OrreryConfig) -> Result<Self, OrreryError> {
        let source = Arc::new(HorizonsClient::from_config(&config.horizons)?);
        Orrery::with_source(config, source, Arc::new(SystemClock::new()))
    }

    /// Build an [`Orrery`] around an arbitrary ephemeris source and clock.
    pub fn with_source(
        config: OrreryConfig,
        source: Arc<dyn EphemerisSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, OrreryError> {
        let catalog = Orrery::load_catalog(&config)?;
        let cache = Arc::new(PositionCache::new(config.cache.ttl(), clock.clone()));
        let resolver = PositionResolver::new(
            Arc::new(BodyRegistry::solar_system()),
            source,
            cache,
            clock,
        )
        .with_fetch_timeout(config.horizons.timeout());

        info!(
            catalog_objects = catalog.len(),
            bodies = resolver.registry().len(),
            endpoint = %config.horizons.endpoint,
            "orrery ready"
        );

        Ok(Orrery {
            config,
            catalog: Arc::new(catalog),
            resolver,
        })
    }

    fn load_catalog(config: &OrreryConfig) -> Result<StarCatalog, OrreryError> {
        match &config.catalog.path {
            Some(path) => {
                let source = path.display().to_string();
                StarCatalog::from_csv_reader(File::open(path)?, &source)
            }
            None => Ok(StarCatalog::bright_stars()),
        }
    }

    /// Replace the static catalog.
    pub fn with_catalog(mut self, catalog: StarCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &StarCatalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &PositionResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &PositionCache {
        self.resolver.cache()
    }

    /// See [`PositionResolver::resolve`].
    pub async fn resolve(&self, body: &str, at: Option<&str>) -> Result<Resolution, OrreryError> {
        self.resolver.resolve(body, at).await
    }

    /// See [`PositionResolver::resolve_all`].
    pub async fn resolve_all(&self, at: Option<&str>) -> Result<BatchResolution, OrreryError> {
        self.resolver.resolve_all(at).await
    }

    /// Catalog objects in a box given as `"x_min,y_min,z_min,x_max,y_max,z_max"` (parsecs).
    ///
    /// Arguments
    /// ---------
    /// * `bbox`: the box, `None` for the whole catalog
    /// * `max_magnitude`: optional inclusive brightness ceiling
    ///
    /// Return
    /// ------
    /// * Matching objects in catalog order, or [`OrreryError::InvalidBoundingBox`] if the box
    ///   string does not describe a well-formed box.
    pub fn positions(
        &self,
        bbox: Option<&str>,
        max_magnitude: Option<Magnitude>,
    ) -> Result<Vec<&CatalogObject>, OrreryError> {
        match bbox {
            Some(raw) => {
                let bbox: BoundingBox = raw.parse()?;
                Ok(spatial_query::query(&self.catalog, &bbox, max_magnitude))
            }
            None => Ok(spatial_query::brighter_than(&self.catalog, max_magnitude)),
        }
    }

    /// Separation between two catalog objects, see [`StarCatalog::separation_between`].
    pub fn distance_between(&self, id_a: u32, id_b: u32) -> Result<Separation, OrreryError> {
        self.catalog.separation_between(id_a, id_b)
    }
}

#[cfg(test)]
mod orrery_test {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_catalog_is_seeded() {
        let orrery = Orrery::new(OrreryConfig::default()).unwrap();
        assert_eq!(orrery.catalog().len(), 8);
        assert_eq!(orrery.resolver().registry().len(), 11);
        assert!(orrery.cache().is_empty());
    }

    #[test]
    fn test_catalog_from_file() {
        let path = std::env::temp_dir().join(format!("orrery-catalog-{}.csv", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "name,kind,ra,dec,parallax,magnitude,spectral_type").unwrap();
        writeln!(file, "Proxima Centauri,star,217.429,-62.680,768.07,11.13,M5.5Ve").unwrap();
        drop(file);

        let mut config = OrreryConfig::default();
        config.catalog.path = Some(path.clone());
        let orrery = Orrery::new(config).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(orrery.catalog().len(), 1);
        assert_eq!(orrery.catalog().get(1).unwrap().name, "Proxima Centauri");
        assert_eq!(orrery.positions(None, Some(10.0)).unwrap().len(), 0);
    }

    #[test]
    fn test_missing_catalog_file() {
        let mut config = OrreryConfig::default();
        config.catalog.path = Some("/nonexistent/catalog.csv".into());
        assert!(matches!(
            Orrery::new(config),
            Err(OrreryError::ConfigIo(_))
        ));
    }
}

use approx::assert_relative_eq;
use orrery::{
    catalog::{spatial_query, ObjectKind, StarCatalog},
    constants::PARSEC_TO_LIGHT_YEAR,
    coordinates::BoundingBox,
    orrery_errors::OrreryError,
};

mod common;

use common::{manual_clock, offline_orrery, ScriptedSource};

const CATALOG_CSV: &str = "\
name,kind,ra,dec,parallax,magnitude,spectral_type
Sirius,star,101.287,-16.716,379.21,-1.46,A1V
Proxima Centauri,star,217.429,-62.680,768.07,11.13,M5.5Ve
Barnard's Star,star,269.452,4.693,546.98,9.51,M4V
Andromeda,galaxy,10.685,41.269,,3.44,
Crab Nebula,nebula,83.633,22.015,0.5,8.4,
Unnamed,star,0.0,0.0,1000.0,,
";

fn names(objects: &[&orrery::catalog::CatalogObject]) -> Vec<String> {
    objects.iter().map(|o| o.name.clone()).collect()
}

#[test]
fn test_positions_through_the_facade() {
    let orrery = offline_orrery(ScriptedSource::new(), manual_clock());

    let local = orrery.positions(Some("-3,-3,-3,3,3,3"), None).unwrap();
    assert_eq!(names(&local), vec!["Sirius"]);

    let bright = orrery.positions(None, Some(0.0)).unwrap();
    assert_eq!(names(&bright), vec!["Sirius", "Canopus", "Arcturus"]);

    assert_eq!(orrery.positions(None, None).unwrap().len(), 8);
}

#[test]
fn test_positions_rejects_malformed_boxes() {
    let orrery = offline_orrery(ScriptedSource::new(), manual_clock());

    for raw in ["1,2,3", "a,b,c,d,e,f", "10,0,0,-10,1,1", ""] {
        let err = orrery.positions(Some(raw), None).unwrap_err();
        assert!(matches!(err, OrreryError::InvalidBoundingBox(_)), "{raw:?}");
        assert!(err.is_invalid_input());
    }
}

#[test]
fn test_distance_between() {
    let orrery = offline_orrery(ScriptedSource::new(), manual_clock());

    let sirius_vega = orrery.distance_between(1, 4).unwrap();
    assert_eq!(sirius_vega, orrery.distance_between(4, 1).unwrap());
    assert_relative_eq!(
        sirius_vega.light_years / sirius_vega.parsecs,
        PARSEC_TO_LIGHT_YEAR,
        epsilon = 1e-12
    );

    assert_eq!(
        orrery.distance_between(1, 999),
        Err(OrreryError::UnknownObject(999))
    );
    assert_eq!(
        orrery.distance_between(0, 1),
        Err(OrreryError::UnknownObject(0))
    );
}

#[test]
fn test_loaded_catalog_queries() {
    let catalog = StarCatalog::from_csv_reader(CATALOG_CSV.as_bytes(), "test.csv").unwrap();
    assert_eq!(catalog.len(), 6);

    // within 2 pc of the Sun
    let bbox: BoundingBox = "-2,-2,-2,2,2,2".parse().unwrap();
    let near = spatial_query::query(&catalog, &bbox, None);
    assert_eq!(names(&near), vec!["Proxima Centauri", "Barnard's Star", "Unnamed"]);

    // the magnitude-less object drops out as soon as a ceiling applies
    let near_bright = spatial_query::query(&catalog, &bbox, Some(20.0));
    assert_eq!(names(&near_bright), vec!["Proxima Centauri", "Barnard's Star"]);

    // parallax-less and far objects sit on or beyond the 1000 pc sphere
    let andromeda = catalog.search("andromeda", None)[0];
    assert_relative_eq!(andromeda.position.norm(), 1000.0, epsilon = 1e-9);
    let crab = catalog.search("crab", Some(ObjectKind::Nebula))[0];
    assert_relative_eq!(crab.distance, 2000.0, epsilon = 1e-9);

    let orrery = offline_orrery(ScriptedSource::new(), manual_clock()).with_catalog(catalog);
    assert_eq!(orrery.catalog().kinds(), vec![ObjectKind::Star, ObjectKind::Galaxy, ObjectKind::Nebula]);
    assert_eq!(orrery.catalog().counts_by_kind()[&ObjectKind::Star], 4);
}

//! Built-in API casing sizes
//!
//! A small seed catalog of common API 5CT casing weights for new tallies and
//! demos. Values are nominal catalog figures; a rig's own pipe data should be
//! upserted over these when it differs.

use once_cell::sync::Lazy;

use super::CasingSpecification;

/// Common API casing sizes, smallest first.
pub static API_STANDARD_CASING: Lazy<Vec<CasingSpecification>> = Lazy::new(|| {
    // (size, weight lb/ft, ID, drift, grade, connection, burst, collapse, tensile klb, coupling OD, make-up ft-lb)
    let rows = [
        (4.500, 11.6, 4.000, 3.875, "J-55", "LTC", 5350.0, 4960.0, 184.0, 5.000, 1540.0),
        (5.500, 17.0, 4.892, 4.767, "N-80", "LTC", 7740.0, 6290.0, 397.0, 6.050, 3480.0),
        (7.000, 26.0, 6.276, 6.151, "N-80", "LTC", 7240.0, 5410.0, 604.0, 7.656, 5110.0),
        (9.625, 47.0, 8.681, 8.525, "N-80", "BTC", 6870.0, 4750.0, 1086.0, 10.625, 8930.0),
        (10.750, 45.5, 9.950, 9.794, "K-55", "BTC", 3580.0, 2090.0, 715.0, 11.750, 7400.0),
        (13.375, 61.0, 12.515, 12.359, "K-55", "BTC", 3090.0, 1540.0, 962.0, 14.375, 7250.0),
        (18.625, 87.5, 17.755, 17.567, "K-55", "BTC", 2250.0, 630.0, 1367.0, 20.000, 9000.0),
    ];

    rows.iter()
        .map(|&(size, w, id, drift, grade, conn, burst, collapse, tensile, coupling, torque)| {
            CasingSpecification::new(size, w, id)
                .with_drift(drift)
                .with_grade(grade)
                .with_connection(conn)
                .with_pressure_ratings(burst, collapse)
                .with_tensile(tensile)
                .with_coupling(coupling, torque)
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpecificationCatalog;

    #[test]
    fn test_sizes_are_distinct() {
        let catalog = SpecificationCatalog::api_standard();
        assert_eq!(catalog.len(), API_STANDARD_CASING.len());
    }

    #[test]
    fn test_internal_diameter_below_size() {
        for spec in API_STANDARD_CASING.iter() {
            assert!(spec.internal_diameter_in < spec.size_in, "{}", spec);
            assert!(spec.drift_diameter_in < spec.internal_diameter_in, "{}", spec);
        }
    }

    #[test]
    fn test_surface_casing_lookup() {
        let catalog = SpecificationCatalog::api_standard();
        let spec = catalog.lookup(13.375).unwrap();
        assert_eq!(spec.grade, "K-55");
        assert_eq!(spec.connection, "BTC");
        assert!(catalog.lookup(20.0).is_none());
    }
}

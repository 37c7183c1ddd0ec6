//! Great-circle distance

/// Mean Earth radius (IUGG) in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Haversine distance between two `(latitude, longitude)` points in degrees
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAO_PAULO: (f64, f64) = (-23.5505, -46.6333);
    const RIO: (f64, f64) = (-22.9068, -43.1729);

    #[test]
    fn test_zero_distance() {
        assert!(haversine_km(SAO_PAULO, SAO_PAULO).abs() < 1e-9);
    }

    #[test]
    fn test_sao_paulo_to_rio() {
        // roughly 360 km as the crow flies
        let d = haversine_km(SAO_PAULO, RIO);
        assert!((350.0..370.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let there = haversine_km(SAO_PAULO, RIO);
        let back = haversine_km(RIO, SAO_PAULO);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = haversine_km((0.0, 0.0), (0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}

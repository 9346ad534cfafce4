use crate::domain::model::{Coordinates, RankedSchool, SchoolRecord};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers (haversine).
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = ((d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Rounds a distance to two decimal places for display.
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

/// Orders `records` by ascending distance from `reference`.
///
/// Sorting uses the unrounded distance and is stable, so equal distances keep
/// their input order. Only the attached `distance_km` is rounded.
pub fn rank_by_distance(reference: Coordinates, records: &[SchoolRecord]) -> Vec<RankedSchool> {
    let mut measured: Vec<(f64, &SchoolRecord)> = records
        .iter()
        .map(|record| (haversine_km(reference, record.coordinates()), record))
        .collect();

    measured.sort_by(|a, b| a.0.total_cmp(&b.0));

    measured
        .into_iter()
        .map(|(distance, record)| RankedSchool {
            school: record.clone(),
            distance_km: round_km(distance),
        })
        .collect()
}

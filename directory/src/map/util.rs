use shared_types::Coordinates;

/// Spherical mean of a set of points.
pub fn get_geographic_center(points: &[Coordinates]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }

    let (mut x_total, mut y_total, mut z_total) = (0.0, 0.0, 0.0);
    points.iter().for_each(|point| {
        let lat_rad = point.lat.to_radians();
        let lng_rad = point.lng.to_radians();

        x_total += lat_rad.cos() * lng_rad.cos();
        y_total += lat_rad.cos() * lng_rad.sin();
        z_total += lat_rad.sin();
    });

    let count = points.len() as f64;
    let x_avg = x_total / count;
    let y_avg = y_total / count;
    let z_avg = z_total / count;

    let lng = y_avg.atan2(x_avg).to_degrees();
    let hyp = (x_avg.powi(2) + y_avg.powi(2)).sqrt();
    let lat = z_avg.atan2(hyp).to_degrees();

    Some(Coordinates::new(lat, lng))
}

//! UTM zone lookup and geometry reprojection.
//!
//! Reprojection runs in pure Rust on top of `proj4rs`, with PROJ strings taken from
//! the `crs-definitions` EPSG database, so no system PROJ installation is needed.

use crate::types::{Error, Hemisphere, Result, UtmZone};
use geo::{Coord, Geometry, MapCoords};
use proj4rs::proj::Proj;

/// EPSG code of WGS84 geographic coordinates
pub const WGS84_EPSG: u16 = 4326;

/// UTM zone and hemisphere containing a latitude/longitude (degrees)
pub fn get_utm_zone(latitude: f64, longitude: f64) -> Result<UtmZone> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(Error::Projection(format!(
            "No UTM zone for non-finite coordinate ({}, {})",
            latitude, longitude
        )));
    }

    // 180E belongs to the last zone rather than a 61st
    let number = (1.0 + (longitude + 180.0) / 6.0).floor().clamp(1.0, 60.0) as u8;
    let hemisphere = if latitude < 0.0 { Hemisphere::South } else { Hemisphere::North };

    Ok(UtmZone { number, hemisphere })
}

/// PROJ string for an EPSG code
pub fn get_proj_string(epsg: u16) -> Option<&'static str> {
    crs_definitions::from_code(epsg).map(|def| def.proj4)
}

fn is_geographic(proj_string: &str) -> bool {
    proj_string.contains("+proj=longlat")
}

fn load_proj(epsg: u16) -> Result<(Proj, bool)> {
    let proj_string = get_proj_string(epsg)
        .ok_or_else(|| Error::Projection(format!("EPSG:{} is not in the crs-definitions database", epsg)))?;
    let proj = Proj::from_proj_string(proj_string)
        .map_err(|e| Error::Projection(format!("Invalid projection EPSG:{}: {:?}", epsg, e)))?;

    Ok((proj, is_geographic(proj_string)))
}

/// Reproject every coordinate of a geometry between two EPSG coordinate systems.
///
/// Geographic coordinates are in degrees with x = longitude, y = latitude.
pub fn reproject_geometry(geometry: &Geometry<f64>, source_epsg: u16, target_epsg: u16) -> Result<Geometry<f64>> {
    if source_epsg == target_epsg {
        return Ok(geometry.clone());
    }

    let (source, source_geographic) = load_proj(source_epsg)?;
    let (target, target_geographic) = load_proj(target_epsg)?;
    log::debug!("Reprojecting geometry EPSG:{} -> EPSG:{}", source_epsg, target_epsg);

    let (source, target) = (&source, &target);
    geometry.try_map_coords(|coord: Coord<f64>| -> Result<Coord<f64>> {
        let mut point = if source_geographic {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };

        proj4rs::transform::transform(source, target, &mut point).map_err(|e| {
            Error::Projection(format!(
                "Transform of ({}, {}) from EPSG:{} to EPSG:{} failed: {:?}",
                coord.x, coord.y, source_epsg, target_epsg, e
            ))
        })?;

        Ok(if target_geographic {
            Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
        } else {
            Coord { x: point.0, y: point.1 }
        })
    })
}

/// Reproject a WGS84 lat/lon geometry into the given UTM zone
pub fn convert_geom_latlon_to_utm(geometry: &Geometry<f64>, zone: UtmZone) -> Result<Geometry<f64>> {
    reproject_geometry(geometry, WGS84_EPSG, zone.epsg())
}

/// Reproject a UTM geometry (e.g. EPSG:32615) back to WGS84 lat/lon
pub fn convert_geom_utm_to_latlon(geometry: &Geometry<f64>, source_epsg: u16) -> Result<Geometry<f64>> {
    reproject_geometry(geometry, source_epsg, WGS84_EPSG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo::Point;

    fn point_xy(geometry: &Geometry<f64>) -> (f64, f64) {
        match geometry {
            Geometry::Point(p) => (p.x(), p.y()),
            other => panic!("expected point, got {:?}", other),
        }
    }

    #[test]
    fn test_utm_zone_lookup() {
        assert_eq!(get_utm_zone(42.0, -93.5).unwrap(), UtmZone { number: 15, hemisphere: Hemisphere::North });
        assert_eq!(get_utm_zone(-33.9, 18.4).unwrap(), UtmZone { number: 34, hemisphere: Hemisphere::South });
        assert_eq!(get_utm_zone(0.0, -180.0).unwrap().number, 1);
        assert_eq!(get_utm_zone(0.0, 180.0).unwrap().number, 60);
        assert_eq!(get_utm_zone(0.0, 0.0).unwrap().hemisphere, Hemisphere::North);
    }

    #[test]
    fn test_non_finite_coordinates_have_no_zone() {
        for (lat, lon) in [(f64::NAN, f64::NAN), (42.0, f64::NAN), (f64::INFINITY, 10.0), (0.0, f64::NEG_INFINITY)] {
            assert!(matches!(get_utm_zone(lat, lon), Err(Error::Projection(_))), "zone for ({}, {})", lat, lon);
        }
    }

    #[test]
    fn test_central_meridian_maps_to_false_easting() {
        // Zone 15 central meridian is 93W
        let geometry = Geometry::Point(Point::new(-93.0, 0.0));
        let zone = UtmZone { number: 15, hemisphere: Hemisphere::North };
        let utm = convert_geom_latlon_to_utm(&geometry, zone).unwrap();
        let (x, y) = point_xy(&utm);
        assert_abs_diff_eq!(x, 500_000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_southern_false_northing() {
        let geometry = Geometry::Point(Point::new(21.0, 0.0));
        let zone = UtmZone { number: 34, hemisphere: Hemisphere::South };
        let (x, y) = point_xy(&convert_geom_latlon_to_utm(&geometry, zone).unwrap());
        assert_abs_diff_eq!(x, 500_000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(y, 10_000_000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_utm_roundtrip() {
        let geometry = Geometry::Point(Point::new(-93.45, 42.05));
        let zone = get_utm_zone(42.05, -93.45).unwrap();
        let utm = convert_geom_latlon_to_utm(&geometry, zone).unwrap();
        let back = convert_geom_utm_to_latlon(&utm, zone.epsg()).unwrap();
        let (lon, lat) = point_xy(&back);
        assert_abs_diff_eq!(lon, -93.45, epsilon = 1e-6);
        assert_abs_diff_eq!(lat, 42.05, epsilon = 1e-6);
    }

    #[test]
    fn test_unknown_epsg_is_projection_error() {
        let geometry = Geometry::Point(Point::new(0.0, 0.0));
        assert!(matches!(reproject_geometry(&geometry, 4326, 1), Err(Error::Projection(_))));
    }
}

//! WKT and GeoJSON helpers, plus the URL encoding of search geometries

use crate::types::{BoundingBox, Error, Result};
use geo::{BoundingRect, Centroid, Geometry, LineString, Polygon};
use geojson::GeoJson;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use wkt::{ToWkt, TryFromWkt};

/// Outward margin (degrees) applied to polygon envelopes before querying
pub const GEOMETRY_BUFFER_DEG: f64 = 0.0001;

/// Characters left readable when quoting a WKT string for a URL
const WKT_QUOTE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Parse a WKT string into a geometry
pub fn convert_wkt_to_geometry(geometry_wkt: &str) -> Result<Geometry<f64>> {
    Geometry::<f64>::try_from_wkt_str(geometry_wkt.trim())
        .map_err(|e| Error::Parse(format!("Invalid WKT '{}': {}", geometry_wkt, e)))
}

/// Serialize a geometry back to WKT
pub fn geometry_to_wkt(geometry: &Geometry<f64>) -> String {
    geometry.wkt_string()
}

/// Convert a WKT geometry into the `intersectsWith` fragment of a search URL.
///
/// Polygons are replaced by their envelope grown by [`GEOMETRY_BUFFER_DEG`] so that
/// scenes touching the boundary are not clipped; other geometries are quoted as-is.
pub fn wkt_to_url(geometry_wkt: &str) -> Result<String> {
    let geometry = convert_wkt_to_geometry(geometry_wkt)?;

    let text = match geometry {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
            let bbox = geometry_bounds(&geometry)?;
            let envelope = buffered_envelope(&bbox, GEOMETRY_BUFFER_DEG);
            log::debug!("Query envelope: {:?}", bbox);
            geometry_to_wkt(&Geometry::Polygon(envelope))
        }
        _ => geometry_wkt.to_string(),
    };

    Ok(utf8_percent_encode(&text, WKT_QUOTE_SET).to_string())
}

/// Axis-aligned bounds of a geometry
pub fn geometry_bounds(geometry: &Geometry<f64>) -> Result<BoundingBox> {
    let rect = geometry
        .bounding_rect()
        .ok_or_else(|| Error::Parse("Empty geometry has no bounds".to_string()))?;

    Ok(BoundingBox {
        min_lon: rect.min().x,
        max_lon: rect.max().x,
        min_lat: rect.min().y,
        max_lat: rect.max().y,
    })
}

/// Rectangle covering `bbox` grown by `margin` on every side.
///
/// This is the envelope of a round buffer of the same distance: the extreme
/// points of such a buffer lie exactly `margin` beyond the extreme vertices.
fn buffered_envelope(bbox: &BoundingBox, margin: f64) -> Polygon<f64> {
    let (x0, x1) = (bbox.min_lon - margin, bbox.max_lon + margin);
    let (y0, y1) = (bbox.min_lat - margin, bbox.max_lat + margin);

    Polygon::new(
        LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
        vec![],
    )
}

/// Centroid of a WKT geometry as (latitude, longitude)
pub fn compute_centroid_from_geometry(geometry_wkt: &str) -> Result<(f64, f64)> {
    let geometry = convert_wkt_to_geometry(geometry_wkt)?;
    let centroid = geometry
        .centroid()
        .ok_or_else(|| Error::Parse("Empty geometry has no centroid".to_string()))?;

    Ok((centroid.y(), centroid.x()))
}

/// Convert a GeoJSON geometry (or a feature carrying one) to WKT
pub fn convert_geojson_to_wkt(boundary: &serde_json::Value) -> Result<String> {
    let geojson = GeoJson::from_json_value(boundary.clone())
        .map_err(|e| Error::Parse(format!("Invalid GeoJSON: {}", e)))?;

    let geometry = match geojson {
        GeoJson::Geometry(geometry) => geometry,
        GeoJson::Feature(feature) => feature
            .geometry
            .ok_or_else(|| Error::Parse("GeoJSON feature has no geometry".to_string()))?,
        GeoJson::FeatureCollection(_) => {
            return Err(Error::Parse(
                "Expected a GeoJSON geometry or feature, got a feature collection".to_string(),
            ))
        }
    };

    let geometry: Geometry<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| Error::Parse(format!("Unsupported GeoJSON geometry: {}", e)))?;

    Ok(geometry_to_wkt(&geometry))
}

/// Convert a WKT geometry to a GeoJSON geometry object
pub fn convert_wkt_to_geojson(geometry_wkt: &str) -> Result<serde_json::Value> {
    let geometry = convert_wkt_to_geometry(geometry_wkt)?;
    let geojson = geojson::Geometry::new(geojson::Value::from(&geometry));

    serde_json::to_value(&geojson).map_err(|e| Error::Parse(format!("GeoJSON serialization failed: {}", e)))
}

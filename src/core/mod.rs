//! Query construction and pure geospatial processing

pub mod geometry;
pub mod granule;
pub mod mask;
pub mod projection;
pub mod query;

// Re-export main types
pub use geometry::{
    compute_centroid_from_geometry, convert_geojson_to_wkt, convert_wkt_to_geojson, convert_wkt_to_geometry,
    geometry_to_wkt, wkt_to_url, GEOMETRY_BUFFER_DEG,
};
pub use granule::{get_image_date_from_granule, DOWNLOAD_FILE_TYPE, UNKNOWN_DATE};
pub use mask::{mask_raster, MaskedRaster, Window, DEFAULT_NODATA};
pub use projection::{
    convert_geom_latlon_to_utm, convert_geom_utm_to_latlon, get_utm_zone, reproject_geometry, WGS84_EPSG,
};
pub use query::{build_query, build_query_at, ProductMapping, SEARCH_ENDPOINT};

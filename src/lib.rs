//! asf-query: Sentinel-1 granule search and geospatial helpers
//!
//! Builds queries for the ASF search API, lists the matching granules and
//! transposes them into a column table. Alongside the search client the crate
//! carries the small GIS utilities a SAR pipeline needs around it: WKT/GeoJSON
//! conversion, UTM reprojection, raster masking, GDAL tool invocation and file
//! discovery.
//!
//! ```no_run
//! use asf_query::{build_query, to_table, wkt_to_url, ProductMapping};
//!
//! fn main() -> asf_query::Result<()> {
//!     let geometry = wkt_to_url("POLYGON ((-93.5 42.0, -93.4 42.0, -93.4 42.1, -93.5 42.1, -93.5 42.0))")?;
//!     let query = build_query("2021-06-01", "2021-06-30", "S1A", "IW", &geometry, ProductMapping::S1IwSlc)?;
//!     let table = to_table(&query)?;
//!     println!("{} granules", table.len());
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod io;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use types::{BoundingBox, Error, GeoTransform, Hemisphere, Record, Result, UtmZone};

pub use crate::core::{
    build_query, build_query_at, compute_centroid_from_geometry, convert_geojson_to_wkt, convert_geom_latlon_to_utm,
    convert_geom_utm_to_latlon, convert_wkt_to_geojson, convert_wkt_to_geometry, get_image_date_from_granule,
    get_utm_zone, mask_raster, reproject_geometry, wkt_to_url, MaskedRaster, ProductMapping, SEARCH_ENDPOINT,
};
pub use io::{find_files, list_all, parse_listing, to_table, ClientConfig, ResultTable, SearchClient};

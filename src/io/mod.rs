//! I/O modules: search API client, result tables, files, raster tools and geocoding

pub mod files;
pub mod geocode;
#[cfg(feature = "gdal")]
pub mod raster;
pub mod search;
pub mod table;
pub mod tools;

pub use files::find_files;
pub use geocode::{get_country_state, Location, NominatimGeocoder, ReverseGeocoder};
#[cfg(feature = "gdal")]
pub use raster::{read_mask_image, read_raster, RasterProfile};
pub use search::{list_all, parse_listing, to_table, ClientConfig, SearchClient};
pub use table::{ResultTable, COLUMNS};
pub use tools::{
    gdal_convert_raster_to_shp, reproject_raster_gdalwarp, CommandRunner, PolygonizeRequest, RasterToolRunner,
    ToolInvocation, ToolOutput, WarpRequest,
};

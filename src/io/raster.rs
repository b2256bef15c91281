use crate::core::mask::{mask_raster, MaskedRaster, DEFAULT_NODATA};
use crate::types::{Error, GeoTransform, Result};
use gdal::Dataset;
use geo::Geometry;
use ndarray::Array3;
use std::path::Path;

/// Description of the source raster a mask was read from
#[derive(Debug, Clone)]
pub struct RasterProfile {
    pub width: usize,
    pub height: usize,
    pub count: usize,
    pub projection: String,
    pub geo_transform: GeoTransform,
    pub nodata: Option<f64>,
}

/// Read every band of a raster into a (band, row, col) array
pub fn read_raster<P: AsRef<Path>>(raster_path: P) -> Result<(Array3<f64>, RasterProfile)> {
    log::info!("Reading raster: {}", raster_path.as_ref().display());

    let dataset = Dataset::open(raster_path.as_ref())?;
    let geo_transform = GeoTransform::from_gdal(dataset.geo_transform()?);
    let (width, height) = dataset.raster_size();
    let count = dataset.raster_count() as usize;
    log::debug!("Raster size: {}x{} with {} bands", width, height, count);

    let mut data = Array3::<f64>::zeros((count, height, width));
    let mut nodata = None;
    for band_index in 0..count {
        let band = dataset.rasterband(band_index as isize + 1)?;
        if band_index == 0 {
            nodata = band.no_data_value();
        }
        let buffer = band.read_as::<f64>((0, 0), (width, height), (width, height), None)?;
        let plane = ndarray::Array2::from_shape_vec((height, width), buffer.data)
            .map_err(|e| Error::Raster(format!("Failed to reshape band {}: {}", band_index + 1, e)))?;
        data.index_axis_mut(ndarray::Axis(0), band_index).assign(&plane);
    }

    let profile = RasterProfile {
        width,
        height,
        count,
        projection: dataset.projection(),
        geo_transform,
        nodata,
    };

    Ok((data, profile))
}

/// Read a raster and crop/mask it to `mask_feature` (nodata 0, pixel centres only)
pub fn read_mask_image<P: AsRef<Path>>(
    raster_path: P,
    mask_feature: &Geometry<f64>,
) -> Result<(MaskedRaster, RasterProfile)> {
    let (data, profile) = read_raster(raster_path)?;
    let masked = mask_raster(&data, &profile.geo_transform, mask_feature, DEFAULT_NODATA)?;
    Ok((masked, profile))
}

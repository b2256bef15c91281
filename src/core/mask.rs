use crate::core::geometry::geometry_bounds;
use crate::types::{Error, GeoTransform, Result};
use geo::{Contains, Geometry, MultiPolygon, Point};
use ndarray::{s, Array3};

/// Fill value for pixels outside the mask geometry
pub const DEFAULT_NODATA: f64 = 0.0;

/// Raster cropped to a geometry window, with the transform of that window
#[derive(Debug, Clone)]
pub struct MaskedRaster {
    /// (band, row, col)
    pub data: Array3<f64>,
    pub transform: GeoTransform,
    pub nodata: f64,
}

/// Pixel window (row/col offsets and sizes) inside a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub row_off: usize,
    pub col_off: usize,
    pub rows: usize,
    pub cols: usize,
}

fn polygonal(geometry: &Geometry<f64>) -> Result<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p.clone()])),
        Geometry::MultiPolygon(mp) => Ok(mp.clone()),
        Geometry::Rect(r) => Ok(MultiPolygon::new(vec![r.to_polygon()])),
        _ => Err(Error::Raster("Mask geometry must be a polygon or multipolygon".to_string())),
    }
}

/// Pixel window covering the bounds of `geometry`, clipped to the raster
pub fn geometry_window(
    geometry: &Geometry<f64>,
    transform: &GeoTransform,
    rows: usize,
    cols: usize,
) -> Result<Window> {
    if transform.rotation_x != 0.0 || transform.rotation_y != 0.0 {
        return Err(Error::Raster("Rotated geotransforms are not supported".to_string()));
    }

    let bbox = geometry_bounds(geometry)?;

    let col_a = (bbox.min_lon - transform.top_left_x) / transform.pixel_width;
    let col_b = (bbox.max_lon - transform.top_left_x) / transform.pixel_width;
    let row_a = (bbox.max_lat - transform.top_left_y) / transform.pixel_height;
    let row_b = (bbox.min_lat - transform.top_left_y) / transform.pixel_height;

    let col_start = col_a.min(col_b).floor().max(0.0);
    let col_end = col_a.max(col_b).ceil().min(cols as f64);
    let row_start = row_a.min(row_b).floor().max(0.0);
    let row_end = row_a.max(row_b).ceil().min(rows as f64);

    if col_start >= col_end || row_start >= row_end {
        return Err(Error::Raster("Input shapes do not overlap raster".to_string()));
    }

    Ok(Window {
        row_off: row_start as usize,
        col_off: col_start as usize,
        rows: (row_end - row_start) as usize,
        cols: (col_end - col_start) as usize,
    })
}

/// Crop a (band, row, col) raster to `geometry` and blank out everything outside it.
///
/// A pixel is kept when its centre lies inside the geometry; all other pixels of
/// the cropped window are set to `nodata`.
pub fn mask_raster(
    data: &Array3<f64>,
    transform: &GeoTransform,
    geometry: &Geometry<f64>,
    nodata: f64,
) -> Result<MaskedRaster> {
    let shape = polygonal(geometry)?;
    let (_, rows, cols) = data.dim();
    let window = geometry_window(geometry, transform, rows, cols)?;
    log::debug!("Mask window: {:?}", window);

    let mut cropped = data
        .slice(s![
            ..,
            window.row_off..window.row_off + window.rows,
            window.col_off..window.col_off + window.cols
        ])
        .to_owned();

    let mut masked_pixels = 0usize;
    for r in 0..window.rows {
        for c in 0..window.cols {
            let (x, y) = transform.pixel_center(window.row_off + r, window.col_off + c);
            if !shape.contains(&Point::new(x, y)) {
                cropped.slice_mut(s![.., r, c]).fill(nodata);
                masked_pixels += 1;
            }
        }
    }
    log::debug!("Masked {} of {} pixels", masked_pixels, window.rows * window.cols);

    let window_transform = GeoTransform {
        top_left_x: transform.top_left_x + window.col_off as f64 * transform.pixel_width,
        top_left_y: transform.top_left_y + window.row_off as f64 * transform.pixel_height,
        ..*transform
    };

    Ok(MaskedRaster {
        data: cropped,
        transform: window_transform,
        nodata,
    })
}

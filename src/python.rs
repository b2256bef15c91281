//! Python bindings

use crate::core::{self, ProductMapping};
use crate::io;
use crate::types::Error;
use pyo3::exceptions::{PyConnectionError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

type RecordTuple = (String, String, String, String, String, String);

fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::Parse(_) | Error::Format(_) | Error::Configuration(_) => PyValueError::new_err(format!("{}", e)),
        Error::Transport(_) | Error::Http { .. } => PyConnectionError::new_err(format!("{}", e)),
        other => PyRuntimeError::new_err(format!("{}", other)),
    }
}

#[pyfunction]
#[pyo3(name = "wkt_to_url")]
fn py_wkt_to_url(geometry_wkt: &str) -> PyResult<String> {
    core::wkt_to_url(geometry_wkt).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "get_image_date_from_granule")]
fn py_get_image_date_from_granule(granule: &str) -> (String, String, String) {
    core::get_image_date_from_granule(granule)
}

#[pyfunction]
#[pyo3(name = "build_query")]
fn py_build_query(
    start: &str,
    end: &str,
    platform: &str,
    beam_mode: &str,
    geometry: &str,
    mapping: &str,
) -> PyResult<String> {
    let mapping: ProductMapping = mapping.parse().map_err(to_py_err)?;
    core::build_query(start, end, platform, beam_mode, geometry, mapping).map_err(to_py_err)
}

/// (granule, link, direction, beam, footprint, image_date) tuples
#[pyfunction]
#[pyo3(name = "list_all")]
fn py_list_all(py: Python<'_>, query: &str) -> PyResult<Vec<RecordTuple>> {
    let records = py.allow_threads(|| io::list_all(query)).map_err(to_py_err)?;
    Ok(records
        .into_iter()
        .map(|r| (r.granule_name, r.download_url, r.flight_direction, r.beam_mode, r.footprint, r.image_date))
        .collect())
}

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_wkt_to_url, m)?)?;
    m.add_function(wrap_pyfunction!(py_get_image_date_from_granule, m)?)?;
    m.add_function(wrap_pyfunction!(py_build_query, m)?)?;
    m.add_function(wrap_pyfunction!(py_list_all, m)?)?;
    m.add("SEARCH_ENDPOINT", core::SEARCH_ENDPOINT)?;
    Ok(())
}

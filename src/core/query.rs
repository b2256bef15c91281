//! Search URL construction for the ASF search API

use crate::types::{Error, Result};
use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::str::FromStr;

/// ASF search endpoint; parameters are appended directly after the `?`
pub const SEARCH_ENDPOINT: &str = "https://api.daac.asf.alaska.edu/services/search/param?";

/// Query values keep dates and level lists readable
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b',')
    .remove(b':');

/// Product families the search can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductMapping {
    /// Interferometric Wide swath single look complex
    S1IwSlc,
    /// Ground range detected, high resolution only
    S1Grd,
}

impl ProductMapping {
    pub fn processing_levels(&self) -> &'static [&'static str] {
        match self {
            ProductMapping::S1IwSlc => &["SLC"],
            // GRD_MS, GRD_MD, GRD_FS and GRD_FD are left out on purpose
            ProductMapping::S1Grd => &["GRD_HS", "GRD_HD"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProductMapping::S1IwSlc => "S1_IW_SLC",
            ProductMapping::S1Grd => "S1_GRD",
        }
    }
}

impl std::fmt::Display for ProductMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ProductMapping {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "S1_IW_SLC" => Ok(ProductMapping::S1IwSlc),
            "S1_GRD" => Ok(ProductMapping::S1Grd),
            other => Err(Error::Configuration(format!(
                "Unknown product mapping '{}', expected S1_IW_SLC or S1_GRD",
                other
            ))),
        }
    }
}

/// A query parameter value, either raw text or an already URL-encoded fragment
enum QueryValue {
    Text(String),
    Encoded(String),
}

/// Build a search URL against [`SEARCH_ENDPOINT`].
///
/// `start` and `end` are `YYYY-MM-DD` dates; `geometry` must already be URL-encoded
/// (see [`crate::core::geometry::wkt_to_url`]).
pub fn build_query(
    start: &str,
    end: &str,
    platform: &str,
    beam_mode: &str,
    geometry: &str,
    mapping: ProductMapping,
) -> Result<String> {
    build_query_at(SEARCH_ENDPOINT, start, end, platform, beam_mode, geometry, mapping)
}

/// Build a search URL against an arbitrary endpoint prefix
pub fn build_query_at(
    endpoint: &str,
    start: &str,
    end: &str,
    platform: &str,
    beam_mode: &str,
    geometry: &str,
    mapping: ProductMapping,
) -> Result<String> {
    let params = [
        ("platform", QueryValue::Text(platform.to_string())),
        ("beamMode", QueryValue::Text(beam_mode.to_string())),
        ("processingLevel", QueryValue::Text(mapping.processing_levels().join(","))),
        ("intersectsWith", QueryValue::Encoded(geometry.to_string())),
        ("start", QueryValue::Text(to_search_timestamp(start)?)),
        ("end", QueryValue::Text(to_search_timestamp(end)?)),
        ("output", QueryValue::Text("json".to_string())),
    ];

    let query = params
        .iter()
        .map(|(key, value)| match value {
            QueryValue::Text(text) => format!("{}={}", key, utf8_percent_encode(text, QUERY_VALUE_SET)),
            QueryValue::Encoded(fragment) => format!("{}={}", key, fragment),
        })
        .collect::<Vec<_>>()
        .join("&");

    log::debug!("Built {} query: {}", mapping, query);
    Ok(format!("{}{}", endpoint, query))
}

/// `YYYY-MM-DD` to the `YYYY-MM-DDTHH:MM:SSUTC` form the API expects
fn to_search_timestamp(date: &str) -> Result<String> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| Error::Format(format!("'{}' is not a YYYY-MM-DD date: {}", date, e)))?;
    // chrono tolerates leading whitespace and unpadded fields
    if day.format("%Y-%m-%d").to_string() != date {
        return Err(Error::Format(format!("'{}' is not a zero-padded YYYY-MM-DD date", date)));
    }
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Format(format!("No midnight for date '{}'", date)))?;

    Ok(format!("{}UTC", midnight.format("%Y-%m-%dT%H:%M:%S")))
}

use once_cell::sync::Lazy;
use regex::Regex;

/// Archive type of provider downloads
pub const DOWNLOAD_FILE_TYPE: &str = "zip";

/// Returned when a granule name carries no recognizable acquisition date
pub const UNKNOWN_DATE: (&str, &str, &str) = ("0000", "00", "00");

static GRANULE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"S1[AB].*?_(\d{4})(\d{2})(\d{2})").expect("valid granule date pattern"));

/// Acquisition date (YYYY, MM, DD) encoded in a Sentinel-1 granule name.
///
/// The captured digits are returned verbatim. When the name does not follow the
/// `S1A`/`S1B` convention the sentinel [`UNKNOWN_DATE`] is returned instead.
pub fn get_image_date_from_granule(granule: &str) -> (String, String, String) {
    match GRANULE_DATE.captures(granule) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string(), caps[3].to_string()),
        None => {
            log::debug!("No acquisition date in granule name: {}", granule);
            (
                UNKNOWN_DATE.0.to_string(),
                UNKNOWN_DATE.1.to_string(),
                UNKNOWN_DATE.2.to_string(),
            )
        }
    }
}

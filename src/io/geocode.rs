use crate::types::{Error, Result};
use geo::{Centroid, Geometry};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";

/// Administrative location of a coordinate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub display_name: Option<String>,
}

/// Resolves a latitude/longitude to an administrative location
pub trait ReverseGeocoder {
    fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Location>;
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    display_name: Option<String>,
    address: Option<NominatimAddress>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    country: Option<String>,
    country_code: Option<String>,
    state: Option<String>,
}

/// OpenStreetMap Nominatim reverse geocoder
pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(NOMINATIM_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        Self::build(endpoint.into(), true)
    }

    /// Rebuild the client ignoring HTTP(S)_PROXY from the environment
    pub fn without_proxy(self) -> Result<Self> {
        Self::build(self.endpoint, false)
    }

    fn build(endpoint: String, use_system_proxy: bool) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("asf-query/{} (reverse geocoding)", env!("CARGO_PKG_VERSION")));
        if !use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Location> {
        log::debug!("Reverse geocoding ({}, {})", latitude, longitude);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", "5".to_string()),
            ])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            log::error!("Geocoder error: {}\n{}", status.as_u16(), body);
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_nominatim(&body)
    }
}

fn parse_nominatim(body: &str) -> Result<Location> {
    let parsed: NominatimResponse =
        serde_json::from_str(body).map_err(|e| Error::Parse(format!("Unexpected geocoder response: {}", e)))?;

    if let Some(error) = parsed.error {
        return Err(Error::Geocode(error));
    }

    let address = parsed.address;
    Ok(Location {
        country: address.as_ref().and_then(|a| a.country.clone()),
        country_code: address.as_ref().and_then(|a| a.country_code.clone()),
        state: address.and_then(|a| a.state),
        display_name: parsed.display_name,
    })
}

/// Reverse geocode the centroid of an area of interest
pub fn get_country_state<G: ReverseGeocoder + ?Sized>(aoi: &Geometry<f64>, geocoder: &G) -> Result<Location> {
    let centroid = aoi
        .centroid()
        .ok_or_else(|| Error::Geocode("Area of interest is empty".to_string()))?;

    geocoder.reverse_geocode(centroid.y(), centroid.x())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::convert_wkt_to_geometry;
    use std::cell::Cell;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Answer one request with `status` and `body`, reporting the request line
    fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
            tx.send(request_line).unwrap();
        });

        (format!("http://{}/reverse", addr), rx)
    }

    fn local_geocoder(endpoint: String) -> NominatimGeocoder {
        NominatimGeocoder::with_endpoint(endpoint).unwrap().without_proxy().unwrap()
    }

    #[test]
    fn test_nominatim_request_and_response() {
        let (endpoint, requests) = serve_once(
            "200 OK",
            r#"{"display_name": "Iowa, United States", "address": {"state": "Iowa", "country": "United States"}}"#,
        );
        let location = local_geocoder(endpoint).reverse_geocode(42.5, -93.25).unwrap();
        assert_eq!(location.state.as_deref(), Some("Iowa"));
        assert_eq!(location.country.as_deref(), Some("United States"));

        let request_line = requests.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(
            request_line.starts_with("GET /reverse?format=jsonv2&lat=42.5&lon=-93.25&zoom=5 "),
            "{}",
            request_line
        );
    }

    #[test]
    fn test_nominatim_non_success_status() {
        let (endpoint, _requests) = serve_once("503 Service Unavailable", r#"{"error": "overloaded"}"#);
        match local_geocoder(endpoint).reverse_geocode(0.0, 0.0) {
            Err(Error::Http { status, body }) => {
                assert_eq!(status, 503);
                assert!(body.contains("overloaded"));
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    struct FixedGeocoder {
        seen: Cell<(f64, f64)>,
    }

    impl ReverseGeocoder for FixedGeocoder {
        fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Location> {
            self.seen.set((latitude, longitude));
            Ok(Location {
                country: Some("United States".to_string()),
                state: Some("Iowa".to_string()),
                ..Location::default()
            })
        }
    }

    #[test]
    fn test_centroid_is_geocoded() {
        let aoi = convert_wkt_to_geometry("POLYGON ((-94 41, -92 41, -92 43, -94 43, -94 41))").unwrap();
        let geocoder = FixedGeocoder { seen: Cell::new((0.0, 0.0)) };
        let location = get_country_state(&aoi, &geocoder).unwrap();

        assert_eq!(location.state.as_deref(), Some("Iowa"));
        let (lat, lon) = geocoder.seen.get();
        assert!((lat - 42.0).abs() < 1e-9);
        assert!((lon + 93.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_nominatim_address() {
        let body = r#"{"display_name": "Iowa, United States",
                       "address": {"state": "Iowa", "country": "United States", "country_code": "us"}}"#;
        let location = parse_nominatim(body).unwrap();
        assert_eq!(location.country.as_deref(), Some("United States"));
        assert_eq!(location.country_code.as_deref(), Some("us"));
        assert_eq!(location.state.as_deref(), Some("Iowa"));
    }

    #[test]
    fn test_parse_nominatim_error() {
        let body = r#"{"error": "Unable to geocode"}"#;
        assert!(matches!(parse_nominatim(body), Err(Error::Geocode(_))));
    }
}

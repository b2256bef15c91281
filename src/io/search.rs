use crate::core::geometry::wkt_to_url;
use crate::core::query::{build_query_at, ProductMapping, SEARCH_ENDPOINT};
use crate::io::table::ResultTable;
use crate::types::{Error, Record, Result};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Search client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: SEARCH_ENDPOINT.to_string(),
            timeout: Duration::from_secs(60),
            user_agent: format!("asf-query/{} (Sentinel-1 search)", env!("CARGO_PKG_VERSION")),
            use_system_proxy: true,
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

/// One entry of the provider's result array
#[derive(Debug, Deserialize)]
struct ProviderProduct {
    #[serde(rename = "granuleName")]
    granule_name: String,
    #[serde(rename = "downloadUrl")]
    download_url: String,
    #[serde(rename = "flightDirection")]
    flight_direction: String,
    #[serde(rename = "beamMode")]
    beam_mode: String,
    #[serde(rename = "stringFootprint")]
    string_footprint: String,
    #[serde(rename = "sceneDate")]
    scene_date: String,
}

impl From<ProviderProduct> for Record {
    fn from(p: ProviderProduct) -> Self {
        Record {
            granule_name: p.granule_name,
            download_url: p.download_url,
            flight_direction: p.flight_direction,
            beam_mode: p.beam_mode,
            footprint: p.string_footprint,
            image_date: p.scene_date,
        }
    }
}

/// Blocking client for the ASF search API
pub struct SearchClient {
    client: reqwest::blocking::Client,
    config: ClientConfig,
}

impl SearchClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List every product matching a query URL, in provider order
    pub fn list_all(&self, query: &str) -> Result<Vec<Record>> {
        log::info!("Listing: {}", query);

        let url = Url::parse(query).map_err(|e| Error::Parse(format!("Invalid query URL '{}': {}", query, e)))?;
        let response = self.client.get(url).send()?;
        let status = response.status();
        log::debug!("Response: HTTP {}", status);

        let body = response.text()?;

        if !status.is_success() {
            log::error!("Error: {}\n{}", status.as_u16(), body);
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let records = parse_listing(&body)?;
        log::info!("Found {} products", records.len());
        Ok(records)
    }

    /// List a query and transpose the records into a [`ResultTable`]
    pub fn to_table(&self, query: &str) -> Result<ResultTable> {
        let records = self.list_all(query)?;
        Ok(ResultTable::from_records(&records))
    }

    /// Encode `geometry_wkt`, build the query against the configured endpoint and list it
    pub fn search(
        &self,
        start: &str,
        end: &str,
        platform: &str,
        beam_mode: &str,
        geometry_wkt: &str,
        mapping: ProductMapping,
    ) -> Result<ResultTable> {
        let geometry = wkt_to_url(geometry_wkt)?;
        let query = build_query_at(&self.config.endpoint, start, end, platform, beam_mode, &geometry, mapping)?;
        self.to_table(&query)
    }
}

/// Parse a search response body: a JSON array whose first element holds the products
pub fn parse_listing(body: &str) -> Result<Vec<Record>> {
    let mut pages: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| Error::Parse(format!("Unexpected search response: {}", e)))?;
    log::debug!("Response holds {} result arrays", pages.len());

    if pages.is_empty() {
        return Err(Error::Parse("Search response is an empty array".to_string()));
    }

    let products: Vec<ProviderProduct> = serde_json::from_value(pages.swap_remove(0))
        .map_err(|e| Error::Parse(format!("Unexpected product list: {}", e)))?;

    Ok(products.into_iter().map(Record::from).collect())
}

/// [`SearchClient::list_all`] with the default client settings
pub fn list_all(query: &str) -> Result<Vec<Record>> {
    SearchClient::new(ClientConfig::default())?.list_all(query)
}

/// [`SearchClient::to_table`] with the default client settings
pub fn to_table(query: &str) -> Result<ResultTable> {
    SearchClient::new(ClientConfig::default())?.to_table(query)
}

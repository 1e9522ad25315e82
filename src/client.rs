use log::{debug, info};
use reqwest::{
    blocking::Client,
    header::{ACCEPT, CONTENT_TYPE},
    StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::OutageError,
    outages::{Outage, Site},
};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Blocking client for the monitoring API.  Every request carries the
/// `x-api-key` header.
///
/// Only a 500 response is treated as a failure.  Any other status, 4xx
/// included, is returned to the caller as is.
pub struct MonitoringApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MonitoringApi {
    pub fn new(config: &Config) -> Result<MonitoringApi, OutageError> {
        let client = Client::builder().build()?;
        Ok(MonitoringApi::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &Config) -> MonitoringApi {
        MonitoringApi {
            client,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET the url and parse the body as JSON.
    pub fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, OutageError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()?;
        let status = response.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(OutageError::RemoteServer {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|source| OutageError::MalformedResponse {
            url: url.to_string(),
            status: status.as_u16(),
            source,
        })
    }

    /// POST an already serialized JSON payload, return the status code.
    ///
    /// Only a 500 is an error.  Other 5xx statuses (502, 503, ...) are
    /// returned as `Ok` like any other status, same as for [`Self::fetch`].
    pub fn submit(&self, url: &str, payload: String) -> Result<u16, OutageError> {
        debug!("POST {} ({} bytes)", url, payload.len());
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "*/*")
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()?;
        let status = response.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(OutageError::RemoteServer {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(status.as_u16())
    }

    pub fn get_all_outages(&self) -> Result<Vec<Outage>, OutageError> {
        let outages: Vec<Outage> = self.fetch(&self.url("outages"))?;
        info!("Fetched {} outages", outages.len());
        Ok(outages)
    }

    pub fn get_site_info(&self, site_id: &str) -> Result<Site, OutageError> {
        let site: Site = self.fetch(&self.url(&format!("site-info/{}", site_id)))?;
        info!("Fetched site {} with {} devices", site.id, site.devices.len());
        Ok(site)
    }

    pub fn post_site_outages(&self, site_id: &str, payload: String) -> Result<u16, OutageError> {
        self.submit(&self.url(&format!("site-outages/{}", site_id)), payload)
    }
}

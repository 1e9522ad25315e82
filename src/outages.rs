use std::collections::HashMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::OutageError;

/// Outages that began before 2022-01-01T00:00:00Z are not reported.
pub const CUTOFF: Timestamp = Timestamp::constant(1_640_995_200, 0);

/// An outage of one device.  Several outages can share the same device `id`.
///
/// `begin` and `end` are kept as the text sent by the API and republished
/// unchanged.  Only `begin` is ever parsed, and only for outages of the
/// site's devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outage {
    pub id: String,
    /// Name of the device, only set once the outage is matched to a site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub begin: String,
    pub end: String,
}

impl Outage {
    /// The begin instant.  RFC 3339 with an explicit offset (or `Z`).
    pub fn begin_timestamp(&self) -> Result<Timestamp, OutageError> {
        self.begin
            .parse::<Timestamp>()
            .map_err(|source| OutageError::InvalidTimestamp {
                id: self.id.clone(),
                value: self.begin.clone(),
                source,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub devices: Vec<Device>,
}

/// Keep the outages of the site's devices that began on or after the
/// [`CUTOFF`], and tag each one with its device name.  Input order is kept
/// and duplicates by device id are not collapsed.
///
/// Outages of other devices are skipped without looking at their timestamps.
/// An unparseable `begin` on one of the site's outages is an error.
///
/// If two devices of the site share an id, the last one wins.
pub fn filter_site_outages(outages: &[Outage], site: &Site) -> Result<Vec<Outage>, OutageError> {
    let names: HashMap<&str, &str> = site
        .devices
        .iter()
        .map(|d| (d.id.as_str(), d.name.as_str()))
        .collect();

    let mut selected = Vec::new();
    for outage in outages {
        let Some(name) = names.get(outage.id.as_str()) else {
            continue;
        };
        if outage.begin_timestamp()? >= CUTOFF {
            selected.push(Outage {
                name: Some(name.to_string()),
                ..outage.clone()
            });
        }
    }
    Ok(selected)
}

/// Filter and enrich the outages, then serialize them as the JSON array
/// expected by the site-outages endpoint.
pub fn process_outages(outages: &[Outage], site: &Site) -> Result<String, OutageError> {
    let selected = filter_site_outages(outages, site)?;
    Ok(serde_json::to_string(&selected)?)
}

use log::info;

use crate::{client::MonitoringApi, error::OutageError, outages::process_outages};

/// Fetch all outages and the site info, keep the site's recent outages and
/// post them back.  Returns the status code of the post.  Stops at the first
/// error, nothing is posted if a fetch fails.
pub fn run(api: &MonitoringApi, site_id: &str) -> Result<u16, OutageError> {
    let outages = api.get_all_outages()?;
    let site = api.get_site_info(site_id)?;

    let payload = process_outages(&outages, &site)?;
    info!("Posting outages for site {}", site_id);

    let status = api.post_site_outages(site_id, payload)?;
    info!("Site outages for {} posted with status {}", site_id, status);
    Ok(status)
}

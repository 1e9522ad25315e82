use std::error::Error;

use clap::Parser;
use log::{error, info};
use site_outages::{
    client::MonitoringApi,
    config::{load_dotenv, Config},
    pipeline,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Environment name, e.g., test, prod
    #[arg(short, long, default_value = "prod")]
    env: String,

    /// Site to report on, overrides SITE_ID
    #[arg(short, long)]
    site_id: Option<String>,
}

/// Post the outages of one site, once.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    load_dotenv(&args.env);
    let config = Config::from_env_with_site(args.site_id)?;

    info!("Updating outages for site {} ...", config.site_id);
    let api = MonitoringApi::new(&config)?;
    let status = match pipeline::run(&api, &config.site_id) {
        Ok(status) => status,
        Err(e) => {
            error!("Failed to update outages for site {}: {}", config.site_id, e);
            return Err(Box::new(e));
        }
    };
    println!("{}", status);

    Ok(())
}

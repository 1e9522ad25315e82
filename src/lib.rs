pub mod client;
pub mod config;
pub mod error;
pub mod outages;
pub mod pipeline;

#[cfg(test)]
mod testing;

//! Server configuration, from command-line flags or environment variables.

use std::path::PathBuf;

use clap::Parser;

use crate::http::DEFAULT_COUNTRY_HEADER;
use crate::visits::{VisitLimits, DEFAULT_DAY_WINDOW, DEFAULT_LOG_CAPACITY};

/// Serve visit tracking and stats endpoints.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "VISITS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(short, long, env = "VISITS_PORT", default_value_t = 3000)]
    pub port: u16,

    /// JSON file holding the counters. In-memory when omitted.
    #[arg(short, long, env = "VISITS_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Request header carrying the visitor's country code.
    #[arg(long, env = "VISITS_COUNTRY_HEADER", default_value = DEFAULT_COUNTRY_HEADER)]
    pub country_header: String,

    /// Entries kept in the recent-activity log.
    #[arg(long, env = "VISITS_LOG_CAPACITY", default_value_t = DEFAULT_LOG_CAPACITY, value_parser = parse_limit)]
    pub log_capacity: usize,

    /// Days returned by the stats endpoint.
    #[arg(long, env = "VISITS_DAY_WINDOW", default_value_t = DEFAULT_DAY_WINDOW, value_parser = parse_limit)]
    pub day_window: usize,
}

impl ServerConfig {
    /// `host:port` to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn limits(&self) -> VisitLimits {
        VisitLimits {
            log_capacity: self.log_capacity,
            day_window: self.day_window,
        }
    }
}

fn parse_limit(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser};

pub const DEFAULT_DATA_PATH: &str = "data/netflix_titles.csv";

/// Where the catalog comes from; shared by both binaries.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Catalog CSV with at least `type`, `country` and `release_year` columns
    #[arg(long = "data", env = "NETFLIX_EDA_DATA", default_value = DEFAULT_DATA_PATH)]
    pub path: PathBuf,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "netflix-eda", about = "Interactive dashboard over a Netflix catalog CSV")]
pub struct DashboardConfig {
    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "netflix-eda-web", about = "Server-rendered Netflix catalog explorer")]
pub struct WebConfig {
    #[command(flatten)]
    pub data: DataArgs,

    /// Address the HTTP server listens on
    #[arg(long, env = "NETFLIX_EDA_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_arguments() {
        let cfg = WebConfig::try_parse_from(["netflix-eda-web"]).unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:3000".parse().unwrap());
        // The environment may override the path, so only check it is set.
        assert!(!cfg.data.path.as_os_str().is_empty());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = WebConfig::try_parse_from([
            "netflix-eda-web",
            "--data",
            "/srv/catalog.csv",
            "--bind",
            "0.0.0.0:8080",
        ])
        .unwrap();
        assert_eq!(cfg.data.path, PathBuf::from("/srv/catalog.csv"));
        assert_eq!(cfg.bind.port(), 8080);
    }

    #[test]
    fn rejects_malformed_bind_address() {
        assert!(WebConfig::try_parse_from(["netflix-eda-web", "--bind", "nowhere"]).is_err());
    }
}

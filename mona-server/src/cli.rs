//! Command-line options.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::StaticAssets;

/// Serves the artwork catalogue and its enrichment API.
#[derive(Debug, Clone, Parser)]
#[command(name = "yeux-de-mona", version, about)]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, env = "MONA_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Directory holding the front-end files.
    #[arg(long, env = "MONA_SITE_DIR", default_value = "site")]
    pub site: PathBuf,

    /// Directory holding artwork images.
    #[arg(long, env = "MONA_IMAGES_DIR", default_value = "images")]
    pub images: PathBuf,

    /// Catalogue JSON document.
    #[arg(long, env = "MONA_CATALOGUE", default_value = "site/data/artworks.json")]
    pub catalogue: PathBuf,

    /// YAML configuration file.
    #[arg(long, env = "MONA_CONFIG", default_value = "ai_config.yaml")]
    pub config: PathBuf,
}

impl ServerArgs {
    /// Static directories to serve.
    #[must_use]
    pub fn assets(&self) -> StaticAssets {
        StaticAssets {
            site: self.site.clone(),
            images: self.images.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_site_layout() {
        let args = ServerArgs::try_parse_from(["yeux-de-mona"]).unwrap();
        assert_eq!(args.bind, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(args.catalogue, PathBuf::from("site/data/artworks.json"));
        assert_eq!(args.config, PathBuf::from("ai_config.yaml"));
    }

    #[test]
    fn flags_override_defaults() {
        let args = ServerArgs::try_parse_from([
            "yeux-de-mona",
            "--bind",
            "127.0.0.1:8080",
            "--site",
            "public",
        ])
        .unwrap();
        assert_eq!(args.bind.port(), 8080);
        assert_eq!(args.assets().site, PathBuf::from("public"));
    }
}

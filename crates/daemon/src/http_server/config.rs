use std::net::SocketAddr;

use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // Base URL clients reach us on, for generating blob links
    pub hostname: Url,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, public_url: Option<Url>) -> Self {
        let hostname = public_url.unwrap_or_else(|| {
            Url::parse(&format!("http://localhost:{}", listen_addr.port()))
                .expect("localhost URL must parse")
        });
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, hostname={}",
            listen_addr,
            hostname
        );
        Self {
            listen_addr,
            hostname,
            log_level: tracing::Level::INFO,
        }
    }
}

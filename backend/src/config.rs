use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use shared::Tariff;

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Serve the delivery simulator page and its estimate API"
)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "ENTREGA_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Directory holding the built frontend (index.html, pkg/, leaflet_map.js)
    #[arg(long, env = "ENTREGA_STATIC_DIR", default_value = "frontend")]
    pub static_dir: PathBuf,

    /// Base fare applied when a request omits it
    #[arg(long, env = "ENTREGA_BASE_FARE", default_value_t = 8.0)]
    pub base_fare: f64,

    /// Per-km rate applied when a request omits it
    #[arg(long, env = "ENTREGA_PER_KM", default_value_t = 2.5)]
    pub per_km_rate: f64,

    /// Average speed in km/h applied when a request omits it
    #[arg(long, env = "ENTREGA_SPEED_KMH", default_value_t = 30.0)]
    pub avg_speed_kmh: f64,
}

impl Config {
    pub fn default_tariff(&self) -> Tariff {
        Tariff {
            base_fare: self.base_fare,
            per_km_rate: self.per_km_rate,
            avg_speed_kmh: self.avg_speed_kmh,
            ..Tariff::default()
        }
        .sanitized()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            static_dir: PathBuf::from("frontend"),
            base_fare: 8.0,
            per_km_rate: 2.5,
            avg_speed_kmh: 30.0,
        }
    }
}

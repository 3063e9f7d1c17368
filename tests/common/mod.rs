#![allow(dead_code)]

use handle_check::config::{default_config, AppConfig};
use httpmock::MockServer;

/// Point every platform in `cfg` at `server` under `/<platform>/<handle>`.
pub fn point_at(mut cfg: AppConfig, server: &MockServer) -> AppConfig {
    for p in cfg.platforms.iter_mut() {
        p.base_url = format!("{}/{}/{{handle}}", server.base_url(), p.name);
    }
    cfg
}

/// Shipped defaults aimed at `server`, cache off.
pub fn mock_config(server: &MockServer, timeout_ms: u64) -> AppConfig {
    let mut cfg = point_at(default_config().unwrap(), server);
    cfg.timeout_ms = timeout_ms;
    cfg.cache_ttl_seconds = 0;
    cfg
}

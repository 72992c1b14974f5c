//! Dashboard server command.

use std::net::{SocketAddr, ToSocketAddrs};

use console::style;

use crate::config::Config;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8501;

/// Start the dashboard.
pub async fn cmd_serve(config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or(&config.dashboard.bind);
    let (host, port) = parse_bind_address(bind);
    let addr = resolve(&host, port)?;

    let annotated = config.annotated_path();
    let unannotated = config.data_path();
    if annotated.exists() {
        println!("  {} Data: {}", style("✓").green(), annotated.display());
    } else if unannotated.exists() {
        println!(
            "  {} Data: {} (no sentiment yet)",
            style("!").yellow(),
            unannotated.display()
        );
    } else {
        println!(
            "  {} No data yet. Run `storescrape scrape` to create {}",
            style("!").yellow(),
            unannotated.display()
        );
    }

    println!(
        "{} Starting dashboard at http://{}",
        style("→").cyan(),
        addr
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(config, addr).await
}

fn resolve(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve {}:{}", host, port))
}

/// Parse a bind address that can be:
/// - Just a port: "8080" -> 127.0.0.1:8080
/// - Just a host: "0.0.0.0" -> 0.0.0.0:8501
/// - Host and port: "0.0.0.0:8080" -> 0.0.0.0:8080
fn parse_bind_address(bind: &str) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return (DEFAULT_HOST.to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            let host = if host.is_empty() { DEFAULT_HOST } else { host };
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), DEFAULT_PORT)
}

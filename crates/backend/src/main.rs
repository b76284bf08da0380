pub mod api;
pub mod dashboards;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    system::tracing::initialize()?;

    let config = shared::config::load_config().context("failed to load config.toml")?;

    let store = system::initialization::initialize_dataset_store(&config).await?;
    system::tasks::initialization::start_dataset_refresh(&config, store);

    let app = routes::configure_routes();

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid server address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}

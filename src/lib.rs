pub mod config;
pub mod middleware;
pub mod model;
pub mod recommend;
pub mod server;
pub mod upstream;
pub mod validate;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Upstream client error: {0}")]
    Upstream(#[from] upstream::UpstreamError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config_path: Option<&str>) -> Result<(), ServerError> {
    let config = config::Config::load(config_path)?;

    match config_path {
        Some(path) => info!("Using config file: {}", path),
        None => info!("No config file given, using defaults"),
    }

    let backend = upstream::HttpBackend::new(&config.api)?;
    info!("Recommendation service at {}", backend.url());

    if let Some(ref appdir) = config.appdir {
        info!("Serving static files from {}", appdir);
    }

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls_paths = config
        .tls_paths()
        .map(|(cert, key)| (cert.to_string(), key.to_string()));

    let state = server::AppState::new(config, Arc::new(backend));
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls_paths {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}

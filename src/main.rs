// src/main.rs

//! # did:web Generator - Main Entry Point
//!
//! Loads configuration, wires the collaborator clients and starts the API
//! server.
//!
//! ## Architecture Overview
//! 1. **Wallet Layer**: `KeyManager` mints an RSA keypair per request
//! 2. **Models**: DID Document and signing payload structures
//! 3. **Storage Layer**: `SolidStorage` publishes resources to a Solid POD
//! 4. **Services Layer**: token and signing clients, the publication
//!    pipeline and the HTTP API
//!
//! ## Environment Variables
//! - `SOLID_URL`: POD container receiving uploads (required)
//! - `TOKEN_URL`, `SIGN_API_URL`, `CLIENT_ID`, `CLIENT_SECRET`: (Optional)
//!   enable PDF signing when all four are set
//! - `PORT`: (Optional) listen port (default: 3001)
//! - `RUST_LOG`: (Optional) log filter (default: info)
//!
//! See [`settings`] for the full list.

use crate::settings::Settings;
use crate::services::api_server::ApiServer;
use anyhow::Context;
use dotenv::dotenv;
use std::net::SocketAddr;

// Module declarations (organized by functional domain)
mod settings;      // Startup configuration
mod error;         // Error taxonomy and HTTP error bodies
mod models;        // Data structures
mod services;      // Collaborator clients, pipeline and API
mod storage;       // Solid POD storage layer
mod utils;         // Helper functions
mod wallet;        // Cryptographic key operations

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load `.env` and initialize logging
/// 2. Resolve and validate configuration
/// 3. Build the API server and its clients
/// 4. Serve until the process is stopped
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("invalid configuration")?;
    log::debug!("{:?}", settings);

    let addr: SocketAddr = settings
        .listen_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", settings.listen_addr()))?;

    let api_server = ApiServer::new(&settings).context("failed to build HTTP client")?;

    if api_server.signs_documents() {
        log::info!("PDF signing enabled, publishing to {}", settings.solid_url);
    } else {
        log::info!("PDF signing disabled, publishing to {}", settings.solid_url);
    }
    log::info!("Available endpoints:");
    log::info!("- POST /generate-did");

    api_server.run(addr).await.context("server error")
}

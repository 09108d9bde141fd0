// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{env, net::SocketAddr};

use tracing_subscriber::EnvFilter;

use payments_admin_server::{
    api::router,
    auth::Role,
    config::{DATA_DIR_ENV, HOST_ENV, LOG_FORMAT_ENV, PORT_ENV, SEED_ADMIN_ENV},
    crypto::FieldCipher,
    state::AppState,
    storage::{self, FileStore, StoragePaths, UserRepository},
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var(LOG_FORMAT_ENV)
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    init_tracing();

    // The field-encryption key is mandatory; refusing to start without it
    // beats silently storing card data the service can never read back.
    let cipher = FieldCipher::from_env()
        .expect("PAYMENT_ENCRYPTION_KEY must be set to 32 bytes of base64");

    let data_dir =
        env::var(DATA_DIR_ENV).unwrap_or_else(|_| storage::paths::DATA_ROOT.to_string());
    let mut store = FileStore::new(StoragePaths::new(&data_dir));
    store.initialize().expect("failed to initialize storage");

    if let Ok(name) = env::var(SEED_ADMIN_ENV) {
        match UserRepository::new(&store).create(&name, vec![Role::Admin]) {
            Ok(user) => tracing::info!(user_id = user.id, name = %user.name, "seeded admin user"),
            Err(e) => tracing::error!(error = %e, "failed to seed admin user"),
        }
    }

    let state = AppState::new(store, cipher);
    let app = router(state);

    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("failed to parse bind address");

    tracing::info!(%addr, data_dir = %data_dir, "payments admin server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

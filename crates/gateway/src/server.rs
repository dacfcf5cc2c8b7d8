use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use {
    axum::{
        Router,
        extract::DefaultBodyLimit,
        middleware,
        routing::{delete, get, post},
    },
    tokio::sync::RwLock,
    tower_http::cors::{Any, CorsLayer},
    tracing::{error, info},
};

use {
    wagate_bridge::{BridgeState, ConnectionStatus, StatusBridge, WebhookForwarder},
    wagate_config::WagateConfig,
    wagate_session::MessagingSession,
};

use crate::{auth, bulk::DelaySettings, handlers};

/// Uploads up to 50 MB.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<dyn MessagingSession>,
    pub bridge: Arc<BridgeState>,
    pub api_key: Arc<String>,
    pub delays: Arc<RwLock<DelaySettings>>,
    pub recipients_file: Option<PathBuf>,
    pub version: &'static str,
}

impl AppState {
    pub fn new(
        session: Arc<dyn MessagingSession>,
        bridge: Arc<BridgeState>,
        api_key: String,
        config: &WagateConfig,
    ) -> Self {
        Self {
            session,
            bridge,
            api_key: Arc::new(api_key),
            delays: Arc::new(RwLock::new(DelaySettings {
                delay_min_ms: config.bulk.delay_min_ms,
                delay_max_ms: config.bulk.delay_max_ms,
            })),
            recipients_file: config.bulk.recipients_file.clone(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // QR pairing stays public so a dashboard can poll it pre-auth.
    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/qr-code", get(handlers::qr_code));

    let protected = Router::new()
        .route("/status", get(handlers::status))
        .route("/client-info", get(handlers::client_info))
        .route("/send-message", post(handlers::send_message))
        .route(
            "/send-media",
            post(handlers::send_media).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/send-location", post(handlers::send_location))
        .route("/send-buttons", post(handlers::send_buttons))
        .route("/send-list", post(handlers::send_list))
        .route("/chats", get(handlers::chats))
        .route("/send-bulk", post(handlers::send_bulk))
        .route("/settings/delays", post(handlers::update_delays))
        .route("/set-webhook", post(handlers::set_webhook))
        .route("/remove-webhook", delete(handlers::remove_webhook))
        .route("/logout", post(handlers::logout))
        .route("/disconnect", post(handlers::disconnect))
        .route("/reconnect", post(handlers::reconnect))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    public.merge(protected).layer(cors).with_state(state)
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Start the gateway: wire the bridge to the session's event stream, kick off
/// the initial connect, and serve HTTP until shutdown.
pub async fn start_gateway(
    bind: &str,
    port: u16,
    config: WagateConfig,
    session: Arc<dyn MessagingSession>,
) -> anyhow::Result<()> {
    // API key from environment (takes precedence) or config; refusing to
    // serve without one.
    let api_key = std::env::var("WAGATE_API_KEY")
        .ok()
        .or_else(|| config.auth.api_key.clone())
        .filter(|k| !k.is_empty());
    let Some(api_key) = api_key else {
        anyhow::bail!("no API key configured (set WAGATE_API_KEY or [auth].api_key)");
    };

    let webhook_url = std::env::var("WAGATE_WEBHOOK_URL")
        .ok()
        .or_else(|| config.webhook.url.clone());

    let bridge_state = Arc::new(BridgeState::new(webhook_url.clone()));
    let forwarder = WebhookForwarder::new(
        Arc::clone(&bridge_state),
        Duration::from_secs(config.webhook.timeout_secs),
    );
    let bridge = Arc::new(StatusBridge::new(
        Arc::clone(&bridge_state),
        forwarder,
        Arc::clone(&session),
        Duration::from_secs(config.session.reconnect_delay_secs),
    ));

    // Drain lifecycle events for the lifetime of the process.
    let events = session.subscribe();
    tokio::spawn(wagate_bridge::run(bridge, events));

    let state = AppState::new(
        Arc::clone(&session),
        Arc::clone(&bridge_state),
        api_key,
        &config,
    );
    let app = build_gateway_app(state.clone());

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(version = state.version, %addr, "wagate gateway listening");
    info!(
        webhook = %webhook_url.as_deref().unwrap_or("not set"),
        "webhook forwarding"
    );

    // Initial connect; progress arrives via the event stream.
    let init_session = Arc::clone(&session);
    let init_state = Arc::clone(&bridge_state);
    tokio::spawn(async move {
        if let Err(e) = init_session.initialize().await {
            error!(error = %e, "initial session initialization failed");
            init_state.set_status(ConnectionStatus::AuthFailure).await;
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(
            Arc::clone(&bridge_state),
            Arc::clone(&session),
        ))
        .await?;
    Ok(())
}

/// Resolve on SIGINT/SIGTERM after marking the status and closing the session.
async fn shutdown_signal(bridge: Arc<BridgeState>, session: Arc<dyn MessagingSession>) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(_) => std::future::pending().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, closing session");
    bridge.set_status(ConnectionStatus::ShuttingDown).await;
    if let Err(e) = session.destroy().await {
        error!(error = %e, "failed to destroy session during shutdown");
    }
}

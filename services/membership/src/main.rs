use sea_orm::Database;
use tracing::info;

use registry_core::config::Config as _;
use registry_core::tracing::init_tracing;
use registry_membership::config::MembershipConfig;
use registry_membership::infra::notify::WebhookNotifier;
use registry_membership::infra::storage::FsDocumentStore;
use registry_membership::router::build_router;
use registry_membership::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = MembershipConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        documents: FsDocumentStore {
            dir: config.document_dir.into(),
        },
        notifier: WebhookNotifier {
            client: reqwest::Client::new(),
            webhook_url: config.notify_webhook_url,
        },
        otp_debug_echo: config.otp_debug_echo,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.membership_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("membership service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

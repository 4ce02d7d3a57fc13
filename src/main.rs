use std::sync::Arc;

use torii_gate::config::{environment::Config, init_db};
use torii_gate::modules::auth::crud::MySqlUserStore;
use torii_gate::modules::property::crud::MySqlPropertyStore;
use torii_gate::services::{
    jwt::JwtService,
    mail::SmtpMailer,
    uploads::CloudinaryUploader,
};
use torii_gate::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "torii_gate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url)
        .await
        .expect("Failed to connect to MySQL");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Connected to MySQL");

    let mailer = SmtpMailer::new(&config.smtp).expect("Failed to configure SMTP mailer");
    let uploader = CloudinaryUploader::new(reqwest::Client::new(), &config.uploads);
    let jwt_service = JwtService::new(config.jwt_secret);

    let state = AppState {
        users: Arc::new(MySqlUserStore::new(db.clone())),
        properties: Arc::new(MySqlPropertyStore::new(db)),
        jwt_service,
        mailer: Arc::new(mailer),
        uploader: Arc::new(uploader),
        frontend_url: config.frontend_url,
    };

    let app = torii_gate::create_app(state).await;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Server running on http://{addr}");
    axum::serve(listener, app).await.expect("Server error");
}

//! # Link Registry - نقطه ورود برنامه
//!
//! ترتیب راه‌اندازی: `.env` → tracing → config → فایل لاگ درخواست‌ها → router → سرور

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use link_registry::{
    api::create_router,
    config::{Config, Environment},
    error::{AppError, Result},
    request_log::FileRequestLog,
    services::AppState,
};

/// نقطه ورود اصلی برنامه
///
/// # Errors
/// خطا برمیگردونه اگه:
/// - تنظیمات معتبر نباشن
/// - فایل لاگ درخواست‌ها باز نشه
/// - سرور استارت نشه
#[tokio::main]
async fn main() -> Result<()> {
    // اگه فایل .env نباشه اوکیه
    dotenvy::dotenv().ok();

    init_tracing();

    info!("🚀 Starting Link Registry...");

    let config = Config::from_env()?;
    info!("✅ Configuration loaded successfully");

    let request_log = FileRequestLog::open(&config.request_log_path).await?;
    info!(path = %request_log.path().display(), "✅ Request log opened");

    let addr = config.server_addr();
    let state = AppState::new(config, Arc::new(request_log));
    let app = create_router(state);

    let listener = TcpListener::bind(addr.as_str()).await?;
    info!("🌐 Server listening on http://{}", addr);

    // connect info لازمه تا IP کلاینت در لاگ‌ها ثبت بشه
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Server(e.to_string()))?;

    info!("👋 Server stopped");
    Ok(())
}

/// راه‌اندازی سیستم tracing برای لاگینگ
///
/// - EnvFilter از متغیر `RUST_LOG` میخونه
/// - در production خروجی JSON، در بقیه محیط‌ها فرمت خوانا
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("link_registry=debug,tower_http=debug"));

    let json = Environment::from(std::env::var("ENVIRONMENT").unwrap_or_default()).is_production();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt::layer().json().with_target(true)))
        .with((!json).then(|| {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .pretty()
        }))
        .init();
}

/// منتظر Ctrl+C (و SIGTERM روی unix)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

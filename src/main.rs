#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

use clap::Parser;
use color_eyre::eyre::Result;
use itemdeck_daemon::cors::{build_cors_layer, normalize_origins, DEFAULT_CORS_ORIGINS};
use itemdeck_daemon::grpc_logging::GrpcLoggingLayer;
use itemdeck_daemon::logging::{
    self, default_log_dir, init_logging, parse_rotation, LogConfig, LogFormat,
};
use itemdeck_daemon::rate_limit::RateLimitLayer;
use itemdeck_daemon::server::proto::item_deck_server::ItemDeckServer;
use itemdeck_daemon::server::FILE_DESCRIPTOR_SET;
use itemdeck_daemon::user_config::{self, UserConfig};
use itemdeck_daemon::{ItemDeckService, ItemStore, ListDefaults, SharedItemStore};
use std::path::PathBuf;
use tonic::transport::Server;
use tracing::{info, warn};

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Itemdeck Daemon - searchable, reorderable, multi-select item list service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, env = "ITEMDECK_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins (not recommended for production).
    #[arg(
        long,
        env = "ITEMDECK_CORS_ORIGINS",
        default_value = DEFAULT_CORS_ORIGINS,
        value_delimiter = ','
    )]
    cors_origins: Vec<String>,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "ITEMDECK_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "ITEMDECK_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.itemdeck/logs)
    #[arg(long, env = "ITEMDECK_LOG_DIR")]
    log_dir: Option<String>,

    /// Number of items to seed, overriding the user config
    #[arg(long, env = "ITEMDECK_SEED_COUNT")]
    seed_count: Option<usize>,

    /// Requests each client IP may make per window, overriding the user config
    #[arg(long, env = "ITEMDECK_RATE_LIMIT_MAX", value_parser = clap::value_parser!(u32).range(1..))]
    rate_limit_max: Option<u32>,

    /// Rate limit window in seconds, overriding the user config
    #[arg(long, env = "ITEMDECK_RATE_LIMIT_WINDOW_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    rate_limit_window_secs: Option<u64>,

    /// Turn per-client rate limiting off
    #[arg(long, env = "ITEMDECK_NO_RATE_LIMIT", default_value = "false")]
    no_rate_limit: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Received shutdown signal, stopping server...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let log_config = LogConfig {
        log_dir: args.log_dir.map_or_else(default_log_dir, PathBuf::from),
        format: LogFormat::from(args.log_json),
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };
    let log_file = log_config.log_file();
    logging::set_log_file_path(log_file.to_string_lossy().to_string());

    if let Err(e) = init_logging(&log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    // Load user-level config (~/.itemdeck/config.toml); file is optional.
    let user_cfg = user_config::load_user_config().unwrap_or_else(|e| {
        warn!("Failed to load user config, using defaults: {e}");
        UserConfig::default()
    });

    let addr = args.addr.parse()?;

    let cors_origins = normalize_origins(&args.cors_origins);
    info!("CORS origins: {}", cors_origins.join(", "));
    let cors = build_cors_layer(cors_origins);

    let mut rate_limit = user_cfg.rate_limit.clone();
    if let Some(max_requests) = args.rate_limit_max {
        rate_limit.max_requests = max_requests;
    }
    if let Some(window_secs) = args.rate_limit_window_secs {
        rate_limit.window_secs = window_secs;
    }
    if args.no_rate_limit {
        rate_limit.enabled = false;
    }
    let rate_limit = RateLimitLayer::from_policy(rate_limit.policy().inspect(|policy| {
        info!(
            max_requests = policy.max_requests,
            window_secs = policy.window.as_secs(),
            "Per-client rate limiting enabled"
        );
    }));

    let seed_count =
        user_config::check_seed_count(args.seed_count.unwrap_or(user_cfg.store.seed_count))?;
    let store = SharedItemStore::new(ItemStore::seeded(seed_count));
    info!(items = seed_count, "Item store ready");

    let service = ItemDeckService::new(
        store,
        ListDefaults {
            default_limit: user_cfg.query.default_limit,
        },
    );

    // Create reflection service
    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    info!("Starting itemdeck daemon on {} (gRPC + gRPC-Web)", addr);

    let server_result = Server::builder()
        .accept_http1(true) // Required for gRPC-Web
        .layer(cors)
        .layer(GrpcLoggingLayer)
        .layer(tonic_web::GrpcWebLayer::new())
        .layer(rate_limit)
        .add_service(reflection_service)
        .add_service(ItemDeckServer::new(service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await;

    if let Err(e) = server_result {
        eprintln!();
        eprintln!("Error: Failed to start server on {addr}: {e}");
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e.into());
    }

    info!("Itemdeck daemon stopped");
    Ok(())
}

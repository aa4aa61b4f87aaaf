//! Shorts Factory server binary: HTTP API, worker pool and job sweeper in
//! one process.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shorts_ai::{
    AiConfig, ChatModel, FalClient, GeminiClient, ImageModel, SpeechModel, TtsClient,
    VideoModel, VoiceCatalog,
};
use shorts_api::{create_router, metrics, ApiConfig, AppState};
use shorts_queue::{JobQueue, JobStore, JobSweeper, JobTracker, MemoryJobStore, QueueConfig};
use shorts_worker::{JobExecutor, Pipeline, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("rustls crypto provider was already installed");
    }

    init_tracing();

    if let Err(e) = run().await {
        error!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    if let Ok(directive) = "shorts=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting shorts-api");

    let config = ApiConfig::from_env();
    let ai_config = AiConfig::from_env().context("Failed to load AI service configuration")?;
    let queue_config = QueueConfig::from_env();
    let worker_config = WorkerConfig::from_env();
    info!(
        "API config: host={}, port={}, workers={}, queue={}",
        config.host, config.port, worker_config.max_concurrent_jobs, queue_config.capacity
    );

    // Remote collaborators share one connection pool
    let http = ai_config.http_client()?;
    let chat: Arc<dyn ChatModel> = Arc::new(GeminiClient::new(&ai_config, http.clone()));
    let fal = Arc::new(FalClient::new(&ai_config, http.clone()));
    let images: Arc<dyn ImageModel> = fal.clone();
    let videos: Arc<dyn VideoModel> = fal;
    let speech: Arc<dyn SpeechModel> = Arc::new(TtsClient::new(&ai_config, http));

    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let (queue, receiver) = JobQueue::bounded(queue_config.capacity);
    let tracker = JobTracker::new(Arc::clone(&store), queue);

    let pipeline = Pipeline::new(chat, images, videos, &worker_config);
    let executor = Arc::new(JobExecutor::new(worker_config, tracker.clone(), pipeline));
    let executor_task = {
        let executor = Arc::clone(&executor);
        tokio::spawn(async move { executor.run(receiver).await })
    };

    let (sweeper_shutdown, sweeper_rx) = watch::channel(false);
    let sweeper = JobSweeper::new(store, queue_config.job_ttl, queue_config.sweep_interval);
    let sweeper_task = tokio::spawn(sweeper.run(sweeper_rx));

    let metrics_handle = if config.metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics().context("Failed to install Prometheus recorder")?)
    } else {
        None
    };

    let state = AppState::new(
        config.clone(),
        tracker,
        Arc::new(VoiceCatalog::new(speech)),
    );
    let app = create_router(state, metrics_handle);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped, draining worker pool");
    executor.shutdown();
    let _ = sweeper_shutdown.send(true);

    if let Err(e) = executor_task.await {
        warn!("Job executor task ended abnormally: {}", e);
    }
    if let Err(e) = sweeper_task.await {
        warn!("Job sweeper task ended abnormally: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}

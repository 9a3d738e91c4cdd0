use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use career_quest::adapters::agents::{AiServiceClient, AiServiceConfig, FallbackAgent, LocalAgents};
use career_quest::adapters::auth::JwtSessionValidator;
use career_quest::adapters::http::{api_router, AuthState, HttpSettings};
use career_quest::adapters::storage::{
    FileRoadmapRepository, FileSessionRepository, InMemoryRoadmapRepository,
    InMemorySessionRepository,
};
use career_quest::application::{AptitudeEngine, Collaborators};
use career_quest::config::{AiConfig, AppConfig, StorageBackend, StorageConfig};
use career_quest::ports::{AptitudeSessionRepository, RoadmapRepository};
use career_quest::telemetry::init_tracing;

type Agents = FallbackAgent<AiServiceClient, LocalAgents>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_validated().context("loading configuration")?;
    init_tracing(&config.server.log_level, config.is_production())?;

    let (sessions, roadmaps) = repositories(&config.storage)?;
    let agents = Arc::new(agents(&config.ai)?);

    let engine = Arc::new(AptitudeEngine::new(
        Collaborators {
            sessions,
            roadmaps: roadmaps.clone(),
            generator: agents.clone(),
            evaluator: agents.clone(),
            analyzer: agents.clone(),
            stage_generator: agents,
        },
        config.aptitude.session_ttl_mins,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = engine.sweeper();
    let sweep_interval = config.aptitude.sweep_interval();
    let sweeper_task = tokio::spawn(async move { sweeper.run(sweep_interval, shutdown_rx).await });

    let validator: AuthState = Arc::new(JwtSessionValidator::new(config.auth.jwt_secret.clone()));
    let settings = HttpSettings {
        cors_origins: config.server.cors_origins_list(),
        request_timeout: config.server.request_timeout(),
    };
    let app = api_router(engine, roadmaps, validator, &settings);

    let addr = config
        .server
        .socket_addr()
        .context("invalid server host/port")?;
    info!(%addr, environment = ?config.server.environment, "starting career-quest");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "server exited");
            err
        })?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper_task.await {
        tracing::warn!(error = %e, "session sweeper did not stop cleanly");
    }

    Ok(())
}

fn repositories(
    storage: &StorageConfig,
) -> anyhow::Result<(Arc<dyn AptitudeSessionRepository>, Arc<dyn RoadmapRepository>)> {
    match storage.backend {
        StorageBackend::Memory => {
            info!("using in-memory storage");
            Ok((
                Arc::new(InMemorySessionRepository::new()),
                Arc::new(InMemoryRoadmapRepository::new()),
            ))
        }
        StorageBackend::File => {
            let dir = &storage.data_dir;
            info!(data_dir = %dir.display(), "using file storage");
            Ok((
                Arc::new(FileSessionRepository::new(dir)),
                Arc::new(FileRoadmapRepository::new(dir)),
            ))
        }
    }
}

fn agents(ai: &AiConfig) -> anyhow::Result<Agents> {
    let Some(url) = ai.service_url() else {
        info!("no agent service configured, using local agents only");
        return Ok(FallbackAgent::local_only(LocalAgents::new()));
    };

    let mut service = AiServiceConfig::new(url).with_timeout(ai.timeout());
    if let Some(key) = &ai.api_key {
        service = service.with_api_key(key.clone());
    }
    let client = AiServiceClient::new(service).context("building agent service client")?;
    info!(base_url = %url, "agent service configured with local fallback");
    Ok(FallbackAgent::new(client, LocalAgents::new(), ai.timeout()))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

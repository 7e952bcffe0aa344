use std::{process, sync::Arc};

use caltrade::{
    application::{
        accounts::AccountService,
        error::AppError,
        listings::ListingService,
        seed::{AccountSeeder, SeedAccount},
    },
    cache::{CacheAside, CacheConfig, CacheSweeper, MemoryCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Seed(_) => run_seed(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    if settings.seed.enabled {
        seed_accounts(&repositories, &settings.seed).await?;
    }

    let cache_config = CacheConfig::from(&settings.cache);
    let memory = Arc::new(MemoryCache::new());
    let cache = CacheAside::new(memory.clone(), &cache_config);
    let sweeper = cache_config
        .is_enabled()
        .then(|| CacheSweeper::start(memory, cache_config.sweep_interval));

    let listings = Arc::new(ListingService::new(
        repositories.clone(),
        repositories.clone(),
        cache,
    ));
    let accounts = Arc::new(AccountService::new(
        repositories.clone(),
        repositories.clone(),
        repositories.clone(),
    ));

    let state = ApiState {
        listings,
        accounts,
        health: repositories,
    };

    let served = serve_http(&settings, state).await;

    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }

    served
}

async fn run_seed(settings: config::Settings) -> Result<(), AppError> {
    if settings.seed.accounts.is_empty() {
        warn!("No seed accounts configured");
        return Ok(());
    }

    let repositories = init_repositories(&settings).await?;
    seed_accounts(&repositories, &settings.seed).await
}

async fn seed_accounts(
    repositories: &Arc<PostgresRepositories>,
    seed: &config::SeedSettings,
) -> Result<(), AppError> {
    let accounts: Vec<SeedAccount> = seed.accounts.iter().map(SeedAccount::from).collect();
    let seeder = AccountSeeder::new(repositories.clone(), repositories.clone());

    let report = seeder
        .apply(&accounts)
        .await
        .map_err(|err| AppError::validation(format!("failed to seed accounts: {err}")))?;

    info!(
        created = report.created,
        updated = report.updated,
        unchanged = report.unchanged,
        "Seed accounts applied"
    );
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or(InfraError::MissingDatabaseUrl)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(InfraError::Connect)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let addr = settings.server.addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| InfraError::Bind { addr, source })?;

    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InfraError::Serve)?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

use std::{process, sync::Arc};

use chunt_schedule::{
    application::{
        admin_auth::AdminAuthenticator,
        error::AppError,
        repos::{ScheduleStore, StoreHealth},
        schedule::ScheduleService,
    },
    cache::{CacheConfig, ScheduleCache, SystemClock},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
    },
};
use tokio::try_join;
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
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let cache_config = CacheConfig::from(&settings.cache);
    if cache_config.is_enabled() && cache_config.ttl().is_none() {
        warn!(
            target = "chunt_schedule::serve",
            "Cache TTL disabled; snapshots are only invalidated by store modification times"
        );
    }

    let store: Arc<dyn ScheduleStore> = repositories.clone();
    let health: Arc<dyn StoreHealth> = repositories.clone();
    let cache = Arc::new(ScheduleCache::new(cache_config.clone(), Arc::new(SystemClock)));
    let schedule = Arc::new(ScheduleService::new(cache, store));

    schedule.trigger().warmup_on_startup().await;

    let refresh_handle = cache_config
        .auto_refresh_interval()
        .map(|interval| schedule.trigger().spawn_auto_refresh(interval));

    let auth = AdminAuthenticator::new(settings.admin.api_key.as_deref());
    if !auth.is_configured() {
        warn!(
            target = "chunt_schedule::serve",
            "No admin API key configured; admin routes will refuse every request"
        );
    }

    let http_state = HttpState {
        schedule: schedule.clone(),
    };
    let admin_state = AdminState {
        schedule,
        auth: Arc::new(auth),
        health,
    };

    let result = serve_http(&settings, http_state, admin_state).await;

    if let Some(handle) = refresh_handle {
        handle.abort();
        let _ = handle.await;
    }

    result
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings).await?;
    info!(target = "chunt_schedule::migrate", "Migrations applied");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "chunt_schedule::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "Listening"
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

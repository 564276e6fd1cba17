use std::{io, process, sync::Arc};

use quire::{
    application::{
        archive::{ContentArchive, export_archive, import_archive},
        error::AppError,
        services::ContentServices,
    },
    cache::{CacheConfig, build_cache},
    config,
    infra::{error::InfraError, memory::InMemoryRepositories, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        AppError::from(InfraError::configuration(format!(
            "failed to load configuration: {err}"
        )))
    })?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args.command {
        config::Command::Import(args) => run_import(settings, args),
    }
}

fn run_import(settings: config::Settings, args: config::ImportArgs) -> Result<(), AppError> {
    let cache = build_cache(&CacheConfig::from(&settings.cache));
    let services = ContentServices::new(Arc::new(InMemoryRepositories::new()), cache);

    let archive = ContentArchive::read(&args.file)?;
    let report = import_archive(&services, &archive)?;

    if let Some(out) = args.out.as_ref() {
        let normalized = export_archive(&services)?;
        normalized.write(out)?;
        info!(path = %out.display(), "normalized archive written");
    }

    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &report)
        .map_err(|err| AppError::from(InfraError::Io(err.into())))?;
    println!();
    Ok(())
}

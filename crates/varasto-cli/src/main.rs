use std::path::PathBuf;

use clap::Parser;
use cli::{Args, Commands};
use error::{CliError, CliResult};
use logging::setup_logging;
use tracing::{debug, info};
use varasto_config::config::{generate_default_config, set_config_path, Config};
use varasto_db::{backup_database, connection::default_database_path, ensure_database};
use varasto_server::AppState;
use varasto_utils::path::resolve_path;

mod cli;
mod error;
mod logging;
mod utils;

/// `--database` wins over `VARASTO_DB` and the config file.
fn database_path(flag: Option<&str>, config: &Config) -> CliResult<Option<PathBuf>> {
    match flag {
        Some(path) => Ok(Some(resolve_path(path)?)),
        None => Ok(config.get_db_path()?),
    }
}

async fn blocking<T, F>(f: F) -> CliResult<T>
where
    F: FnOnce() -> CliResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| CliError::Task(err.to_string()))?
}

async fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        utils::disable_color();
    }

    if let Some(ref c) = args.config {
        set_config_path(c)?;
    }

    let config = Config::new()?;
    debug!("{config:?}");

    match args.command {
        Commands::Serve {
            database,
            host,
            port,
            request_log,
        } => {
            let db_path = database_path(database.as_deref(), &config)?;
            let db_path = blocking(move || Ok(ensure_database(db_path.as_deref())?)).await?;

            let state = AppState::new(db_path, config.page_size);
            let host = host.unwrap_or(config.host);
            varasto_server::serve(
                state,
                &host,
                port.unwrap_or(config.port),
                request_log || config.request_logging,
            )
            .await?;
        }
        Commands::Backup {
            destination,
            database,
        } => {
            let source = match database_path(database.as_deref(), &config)? {
                Some(path) => path,
                None => default_database_path()?,
            };
            let destination = resolve_path(&destination)?;
            blocking(move || Ok(backup_database(&source, &destination)?)).await?;
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Commands::DefConfig => {
            let path = generate_default_config()?;
            info!("Edit {} to change the defaults", path.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli().await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_database_flag_wins() {
        std::env::set_var("VARASTO_DB", "/srv/env.sqlite3");
        let config = Config {
            database: Some("/srv/config.sqlite3".into()),
            ..Config::default()
        };

        assert_eq!(
            database_path(Some("/srv/flag.sqlite3"), &config).unwrap(),
            Some(PathBuf::from("/srv/flag.sqlite3"))
        );
        assert_eq!(
            database_path(None, &config).unwrap(),
            Some(PathBuf::from("/srv/env.sqlite3"))
        );
        std::env::remove_var("VARASTO_DB");
        assert_eq!(
            database_path(None, &config).unwrap(),
            Some(PathBuf::from("/srv/config.sqlite3"))
        );
    }

    #[tokio::test]
    async fn test_blocking_propagates_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("db.sqlite3");

        let result = blocking(move || Ok(ensure_database(Some(missing.as_path()))?)).await;
        assert!(matches!(
            result,
            Err(CliError::Database(varasto_db::DbError::MissingParent(_)))
        ));
    }
}

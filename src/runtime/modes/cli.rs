//! CLI mode
//!
//! One-off commands that run against the configured store directly,
//! without starting the HTTP server.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::ViewCounterError;
use crate::runtime::lifetime::startup::prepare_startup;
use crate::services::ViewService;

const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ViewCounterError> for CliError {
    fn from(err: ViewCounterError) -> Self {
        match err {
            ViewCounterError::NotFound(msg) => CliError::CommandError(msg),
            other => CliError::StorageError(other.to_string()),
        }
    }
}

/// Run a CLI command against the global configuration
pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    let config = crate::config::get_config();
    run_cli_with(&config, cmd).await
}

/// Run a CLI command with an explicit configuration
pub async fn run_cli_with(config: &StaticConfig, cmd: Commands) -> Result<(), CliError> {
    // 生成配置不需要连接存储
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_generate(output_path, force);
    }

    let service = connect(config).await?;
    let result = run_with_service(&service, cmd).await;

    if let Err(e) = service.store().close().await {
        tracing::warn!("Failed to close storage: {}", e);
    }
    result
}

async fn connect(config: &StaticConfig) -> Result<Arc<ViewService>, CliError> {
    let ctx = prepare_startup(config)
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))?;
    Ok(ctx.view_service)
}

async fn run_with_service(service: &ViewService, cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Register { url } => {
            let id = service.register(&url).await?;
            println!(
                "{} Registered {} as {}",
                "✓".bold().green(),
                crate::utils::normalize_url(&url).blue().underline(),
                id.cyan()
            );
        }
        Commands::View { id, client } => {
            let outcome = service.increment_view(&id, &client, Utc::now()).await?;
            if outcome.counted {
                println!(
                    "{} View counted for {}: {} views",
                    "✓".bold().green(),
                    id.cyan(),
                    outcome.views.to_string().yellow()
                );
            } else {
                println!(
                    "{} Session active for {}, not counted: {} views",
                    "ℹ".bold().blue(),
                    id.cyan(),
                    outcome.views.to_string().yellow()
                );
            }
        }
        Commands::Stats { id, url } => {
            let stats = match (id, url) {
                (Some(id), _) => service.get_stats(&id).await?,
                (None, Some(url)) => service.get_stats_by_url(&url).await?,
                (None, None) => {
                    return Err(CliError::CommandError(
                        "Either an ID or --url is required".to_string(),
                    ));
                }
            };
            println!(
                "{} {} views",
                stats.url.blue().underline(),
                stats.views.to_string().yellow()
            );
        }
        Commands::Serve | Commands::Config { .. } => {
            return Err(CliError::CommandError(
                "Command is not available in CLI mode".to_string(),
            ));
        }
    }
    Ok(())
}

/// 生成示例配置文件
fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());

    if !force && Path::new(&path).exists() {
        return Err(CliError::CommandError(format!(
            "File already exists: {} (use --force to overwrite)",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default().save_to_file(&path).map_err(|e| {
        CliError::CommandError(format!("Unable to write configuration file: {}", e))
    })?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memory_config() -> StaticConfig {
        let mut config = StaticConfig::default();
        config.database.database_url = "memory://".to_string();
        config
    }

    #[tokio::test]
    async fn test_config_generate_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.toml");
        let path_str = path.to_str().unwrap().to_string();

        let cmd = Commands::Config {
            action: ConfigCommands::Generate {
                output_path: Some(path_str.clone()),
                force: false,
            },
        };
        run_cli_with(&memory_config(), cmd).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("cooldown_secs"));
    }

    #[tokio::test]
    async fn test_config_generate_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.toml");
        std::fs::write(&path, "keep").unwrap();

        let result = config_generate(Some(path.to_str().unwrap().to_string()), false);
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep");

        config_generate(Some(path.to_str().unwrap().to_string()), true).unwrap();
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_view_unknown_id_is_command_error() {
        let cmd = Commands::View {
            id: "missing".to_string(),
            client: "cli".to_string(),
        };
        let err = run_cli_with(&memory_config(), cmd).await.unwrap_err();
        assert!(matches!(err, CliError::CommandError(msg) if msg == "URL ID not found"));
    }

    #[tokio::test]
    async fn test_register_then_stats_by_url() {
        let service = connect(&memory_config()).await.unwrap();
        run_with_service(
            &service,
            Commands::Register {
                url: "https://x.com/".to_string(),
            },
        )
        .await
        .unwrap();
        run_with_service(
            &service,
            Commands::Stats {
                id: None,
                url: Some("x.com".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(service.store().count_urls().await.unwrap(), 1);
    }
}

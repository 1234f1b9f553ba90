//! CLI command implementations

pub mod config;
pub mod ingredient;
pub mod logs;
pub mod recipe;
pub mod tag;
pub mod user;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use recipebox_core::config::Config;
use recipebox_core::{Account, EntryPoint, LogEvent, LoggingService, RecipeboxContext};
use uuid::Uuid;

/// Get the logging service for CLI operations
///
/// Returns None when logging is disabled or fails to initialize
/// (logging should never block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    let enabled = Config::load(&data_dir).map(|c| c.logging_enabled).unwrap_or(true);
    if !enabled {
        return None;
    }
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the recipebox directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RECIPEBOX_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".recipebox"))
        .ok_or_else(|| anyhow!("Could not find home directory; set RECIPEBOX_DIR"))
}

/// Get or create recipebox context
pub fn get_context() -> Result<RecipeboxContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create recipebox directory: {:?}", data_dir))?;

    RecipeboxContext::new(&data_dir).context("Failed to initialize recipebox context")
}

/// Resolve the account a command acts on behalf of
pub fn owner(ctx: &RecipeboxContext, email: &str) -> Result<Account> {
    Ok(ctx.account_service.get_by_email(email)?)
}

/// Parse a list of record ids given on the command line
pub fn parse_ids(values: &[String]) -> Result<Vec<Uuid>> {
    values
        .iter()
        .map(|v| {
            Uuid::parse_str(v.trim()).with_context(|| format!("Invalid id: {}", v.trim()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        let id = Uuid::new_v4();
        let parsed = parse_ids(&[format!(" {} ", id)]).unwrap();
        assert_eq!(parsed, vec![id]);
        assert!(parse_ids(&["not-an-id".to_string()]).is_err());
        assert!(parse_ids(&[]).unwrap().is_empty());
    }
}

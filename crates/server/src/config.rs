use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use server_api::DEFAULT_BOARD_NAME;

pub const CONFIG_FILE: &str = "server.toml";
const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_MAX_BODY_BYTES: i64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub board_name: String,
    pub max_body_bytes: usize,
    pub log_filter: String,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    server_bind: String,
    database_url: Option<String>,
    board_name: String,
    max_body_bytes: usize,
    log_filter: String,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let env: HashMap<String, String> = std::env::vars().collect();
    settings_from_sources(Path::new(CONFIG_FILE), &env)
}

/// Layers defaults, the optional TOML file, `APP__*` variables and finally the
/// bare `DATABASE_URL` / `SERVER_BIND` variables.
pub(crate) fn settings_from_sources(
    config_file: &Path,
    env: &HashMap<String, String>,
) -> anyhow::Result<Settings> {
    let raw: RawSettings = Config::builder()
        .set_default("server_bind", DEFAULT_BIND)?
        .set_default("board_name", DEFAULT_BOARD_NAME)?
        .set_default("max_body_bytes", DEFAULT_MAX_BODY_BYTES)?
        .set_default("log_filter", "info")?
        .add_source(
            File::from(config_file)
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        )
        .set_override_option("database_url", env.get("DATABASE_URL").cloned())?
        .set_override_option("server_bind", env.get("SERVER_BIND").cloned())?
        .build()
        .with_context(|| format!("failed to read configuration from '{}'", config_file.display()))?
        .try_deserialize()
        .context("invalid server configuration")?;

    let Some(database_url) = raw
        .database_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
    else {
        bail!("database url is not configured; set DATABASE_URL or database_url in {CONFIG_FILE}");
    };

    let board_name = raw.board_name.trim().to_string();
    if board_name.is_empty() {
        bail!("board_name must not be empty");
    }

    Ok(Settings {
        server_bind: raw.server_bind,
        database_url,
        board_name,
        max_body_bytes: raw.max_body_bytes,
        log_filter: raw.log_filter,
    })
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

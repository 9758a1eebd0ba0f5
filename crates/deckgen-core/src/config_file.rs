use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerSection>,
    pub extraction: Option<ExtractionSection>,
    pub client: Option<ClientSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    /// Socket address to listen on, e.g. `0.0.0.0:3000`.
    pub bind: Option<String>,
    pub cors_allow_any_origin: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionSection {
    pub max_file_size_bytes: Option<u64>,
    pub max_pages: Option<usize>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSection {
    pub server_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub webhook_url: Option<String>,
}

/// Platform config directory path: `<config_dir>/deckgen/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("deckgen").join("config.toml"))
}

/// Load config by cascading CWD `.deckgen.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".deckgen.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// First `Some` of `field` taken from the overlay section, then the base one.
fn pick<S, T>(overlay: Option<&S>, base: Option<&S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bs, os) = (base.server.as_ref(), overlay.server.as_ref());
    let (be, oe) = (base.extraction.as_ref(), overlay.extraction.as_ref());
    let (bc, oc) = (base.client.as_ref(), overlay.client.as_ref());

    ConfigFile {
        server: Some(ServerSection {
            bind: pick(os, bs, |s| s.bind.clone()),
            cors_allow_any_origin: pick(os, bs, |s| s.cors_allow_any_origin),
        }),
        extraction: Some(ExtractionSection {
            max_file_size_bytes: pick(oe, be, |e| e.max_file_size_bytes),
            max_pages: pick(oe, be, |e| e.max_pages),
            timeout_secs: pick(oe, be, |e| e.timeout_secs),
        }),
        client: Some(ClientSection {
            server_url: pick(oc, bc, |c| c.server_url.clone()),
            request_timeout_secs: pick(oc, bc, |c| c.request_timeout_secs),
            webhook_url: pick(oc, bc, |c| c.webhook_url.clone()),
        }),
    }
}

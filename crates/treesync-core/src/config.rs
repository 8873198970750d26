use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Address of the official passive tree page that embeds the tree document.
pub const DEFAULT_TREE_ADDRESS: &str = "https://www.pathofexile.com/passive-skill-tree/";

/// Base URL that node sprite sheets are fetched from.
pub const DEFAULT_SPRITE_URL: &str = "http://www.pathofexile.com/image/passive-skill/";

/// HTTP client parameters (optional `[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole request, body included.
    pub timeout_secs: u64,
    /// Maximum redirects followed per request.
    pub max_redirections: u32,
    /// Optional User-Agent header; libcurl sends none by default.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 300,
            max_redirections: 10,
            user_agent: Some(concat!("treesync/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

/// Global configuration loaded from `~/.config/treesync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreesyncConfig {
    /// Data directory holding `SkillTree.json`, `Opts.json` and `Assets/`.
    /// When unset, `~/.local/share/treesync` is used.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Download into `Temp/` and swap into place instead of writing live files.
    pub use_staging: bool,
    /// Page the tree document is extracted from.
    pub tree_address: String,
    /// Base URL for node sprite sheets.
    pub sprite_url: String,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for TreesyncConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            use_staging: true,
            tree_address: DEFAULT_TREE_ADDRESS.to_string(),
            sprite_url: DEFAULT_SPRITE_URL.to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl TreesyncConfig {
    /// Data directory from config, else the XDG data home.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("treesync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// `~/.local/share/treesync`.
pub fn default_data_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("treesync")?;
    Ok(xdg_dirs.get_data_home().join("treesync"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TreesyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TreesyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TreesyncConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TreesyncConfig::default();
        assert!(cfg.use_staging);
        assert!(cfg.data_dir.is_none());
        assert_eq!(cfg.tree_address, DEFAULT_TREE_ADDRESS);
        assert_eq!(cfg.sprite_url, DEFAULT_SPRITE_URL);
        assert_eq!(cfg.http.max_redirections, 10);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = TreesyncConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TreesyncConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.use_staging, cfg.use_staging);
        assert_eq!(parsed.tree_address, cfg.tree_address);
        assert_eq!(parsed.http.timeout_secs, cfg.http.timeout_secs);
        assert_eq!(parsed.http.user_agent, cfg.http.user_agent);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            data_dir = "/srv/tree"
            use_staging = false
            tree_address = "https://br.pathofexile.com/passive-skill-tree/"
            sprite_url = "http://mirror.example.com/passive-skill/"
        "#;
        let cfg: TreesyncConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.data_dir.as_deref(), Some(std::path::Path::new("/srv/tree")));
        assert!(!cfg.use_staging);
        assert_eq!(cfg.sprite_url, "http://mirror.example.com/passive-skill/");
        // Missing [http] section falls back to defaults.
        assert_eq!(cfg.http.connect_timeout_secs, 15);
        assert_eq!(cfg.resolve_data_dir().unwrap(), PathBuf::from("/srv/tree"));
    }

    #[test]
    fn config_toml_http_section() {
        let toml = r#"
            use_staging = true
            tree_address = "https://www.pathofexile.com/passive-skill-tree/"
            sprite_url = "http://www.pathofexile.com/image/passive-skill/"

            [http]
            connect_timeout_secs = 5
            timeout_secs = 60
            max_redirections = 3
        "#;
        let cfg: TreesyncConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.http.connect_timeout_secs, 5);
        assert_eq!(cfg.http.timeout_secs, 60);
        assert_eq!(cfg.http.max_redirections, 3);
        assert!(cfg.http.user_agent.is_none());
    }
}

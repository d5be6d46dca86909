//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Application directory under the platform config dir
const APP_DIR: &str = "mirai-bot";

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["mirai.toml", ".mirai.toml"];

/// Prefix of environment overrides
const ENV_PREFIX: &str = "MIRAI_";

/// Where configuration is read from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Global config file (XDG)
    pub global: Option<PathBuf>,
    /// Directory searched for project config files
    pub project_dir: Option<PathBuf>,
    /// Explicit `--config` path
    pub explicit: Option<PathBuf>,
    /// Merge `MIRAI_*` environment variables last
    pub env: bool,
}

impl ConfigSources {
    /// Standard sources: XDG global, current directory, environment.
    pub fn standard(explicit: Option<&PathBuf>) -> Self {
        Self {
            global: ConfigLoader::global_config_path(),
            project_dir: Some(PathBuf::from(".")),
            explicit: explicit.cloned(),
            env: true,
        }
    }

    /// Project config file found under `project_dir`, if any.
    pub fn project_file(&self) -> Option<PathBuf> {
        let dir = self.project_dir.as_deref()?;
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all standard sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `MIRAI_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./mirai.toml` or `./.mirai.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/mirai-bot/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_from(&ConfigSources::standard(config_path))
    }

    /// Load configuration from the given sources.
    pub fn load_from(sources: &ConfigSources) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = sources.global.as_deref().filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = sources.project_file() {
            figment = figment.merge(Toml::file(project_path));
        }

        // An explicit path must exist
        if let Some(path) = &sources.explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        if sources.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/mirai-bot/config.toml if set,
    /// otherwise the platform config directory equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}*", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        match ConfigSources::standard(None).project_file() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./mirai.toml or ./.mirai.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn isolated(dir: &TempDir) -> ConfigSources {
        ConfigSources {
            global: Some(dir.path().join("global").join("config.toml")),
            project_dir: Some(dir.path().to_path_buf()),
            explicit: None,
            env: false,
        }
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.poller.interval_ms, 200);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("mirai-bot"));
    }

    #[test]
    fn test_load_without_files_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from(&isolated(&dir)).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let sources = isolated(&dir);
        let global = sources.global.clone().unwrap();
        fs::create_dir_all(global.parent().unwrap()).unwrap();
        fs::write(
            &global,
            "[gateway]\nport = 9000\nauth_key = \"global\"\n[poller]\nbatch_size = 5\n",
        )
        .unwrap();
        fs::write(dir.path().join("mirai.toml"), "[gateway]\nauth_key = \"project\"\n").unwrap();

        let config = ConfigLoader::load_from(&sources).unwrap();

        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.auth_key, "project");
        assert_eq!(config.poller.batch_size, 5);
    }

    #[test]
    fn test_hidden_project_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".mirai.toml"), "[listen]\nscope = \"friend\"\n").unwrap();

        let config = ConfigLoader::load_from(&isolated(&dir)).unwrap();
        assert_eq!(config.listen.scope, "friend");
    }

    #[test]
    fn test_explicit_path_has_highest_file_priority() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mirai.toml"), "[gateway]\nbot_id = 1\n").unwrap();
        let explicit = dir.path().join("custom.toml");
        fs::write(&explicit, "[gateway]\nbot_id = 2\n[bot]\necho = true\n").unwrap();

        let mut sources = isolated(&dir);
        sources.explicit = Some(explicit);
        let config = ConfigLoader::load_from(&sources).unwrap();

        assert_eq!(config.gateway.bot_id, 2);
        assert!(config.bot.echo);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut sources = isolated(&dir);
        sources.explicit = Some(dir.path().join("nope.toml"));

        assert!(ConfigLoader::load_from(&sources).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mirai.toml"), "[gateway]\nport = \"eighty\"\n").unwrap();

        assert!(ConfigLoader::load_from(&isolated(&dir)).is_err());
    }
}

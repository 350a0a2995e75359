use serde::{Deserialize, Serialize};

use crate::errors::{LinkstatError, Result};
use crate::utils::{MAX_CODE_LENGTH, MIN_CODE_LENGTH, is_valid_url};

/// ENV 前缀，分隔符 `__`，示例：LINKSTAT__SERVER__PORT=9999
pub const ENV_PREFIX: &str = "LINKSTAT";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（启动时加载一次）
///
/// 优先级：PORT/HOSTNAME > LINKSTAT__* > config.toml > 默认值
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: StaticConfig = settings.try_deserialize()?;
        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }

        // 3. 兼容 PORT / HOSTNAME
        config.apply_legacy_env(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("HOSTNAME").ok().as_deref(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Apply the plain `PORT` and `HOSTNAME` variables.
    ///
    /// `HOSTNAME` only counts when it is an http(s) URL; container runtimes
    /// set it to a bare machine name, which must not end up in shortlinks.
    pub fn apply_legacy_env(&mut self, port: Option<&str>, hostname: Option<&str>) {
        if let Some(port) = port {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => eprintln!("[WARN] Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(hostname) = hostname.map(str::trim).filter(|h| !h.is_empty()) {
            if is_valid_url(hostname) {
                self.server.public_base_url = Some(hostname.to_string());
            } else {
                eprintln!(
                    "[WARN] Ignoring HOSTNAME '{}': not an http(s) base URL",
                    hostname
                );
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let links = &self.links;
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&links.code_length) {
            return Err(LinkstatError::config(format!(
                "links.code_length must be between {} and {}, got {}",
                MIN_CODE_LENGTH, MAX_CODE_LENGTH, links.code_length
            )));
        }
        if links.default_validity_minutes <= 0 {
            return Err(LinkstatError::config(
                "links.default_validity_minutes must be positive",
            ));
        }
        if links.max_code_attempts == 0 {
            return Err(LinkstatError::config(
                "links.max_code_attempts must be at least 1",
            ));
        }
        if let Some(base) = &self.server.public_base_url
            && !is_valid_url(base)
        {
            return Err(LinkstatError::config(format!(
                "server.public_base_url must be an http(s) URL, got '{}'",
                base
            )));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Origin used to build shortlinks; `http://localhost:<port>` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl ServerConfig {
    pub fn public_base(&self) -> String {
        match &self.public_base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}

/// 短链接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_validity_minutes")]
    pub default_validity_minutes: i64,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Append-only log file; empty disables file output.
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_validity_minutes() -> i64 {
    30
}

fn default_code_length() -> usize {
    crate::utils::DEFAULT_CODE_LENGTH
}

fn default_max_code_attempts() -> usize {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> String {
    "access.log".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_cors_enabled() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> usize {
    3600
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            public_base_url: None,
            workers: default_workers(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            default_validity_minutes: default_validity_minutes(),
            code_length: default_code_length(),
            max_code_attempts: default_max_code_attempts(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            enable_rotation: false,
            max_backups: default_max_backups(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_allowed_origins(),
            max_age: default_cors_max_age(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.public_base(), "http://localhost:3000");
        assert_eq!(config.links.default_validity_minutes, 30);
        assert_eq!(config.links.code_length, 6);
        assert_eq!(config.logging.file, "access.log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_legacy_port_moves_default_base() {
        let mut config = StaticConfig::default();
        config.apply_legacy_env(Some("8088"), None);
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.public_base(), "http://localhost:8088");
    }

    #[test]
    fn test_legacy_hostname_requires_url() {
        let mut config = StaticConfig::default();
        config.apply_legacy_env(None, Some("build-box-42"));
        assert_eq!(config.server.public_base_url, None);

        config.apply_legacy_env(None, Some("https://sho.rt/"));
        assert_eq!(config.server.public_base(), "https://sho.rt");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = StaticConfig::default();
        config.apply_legacy_env(Some("eighty"), None);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_validate_rejects_bad_links_section() {
        let mut config = StaticConfig::default();
        config.links.code_length = 3;
        assert!(matches!(config.validate(), Err(LinkstatError::Config(_))));

        let mut config = StaticConfig::default();
        config.links.default_validity_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.links.max_code_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_config_round_trips() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.cors.allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linkstat.toml");
        std::fs::write(
            &path,
            "[server]\nport = 4100\npublic_base_url = \"https://go.example\"\n\n[links]\ncode_length = 8\n",
        )
        .unwrap();

        let mut config: StaticConfig = config::Config::builder()
            .add_source(config::File::from(path.as_path()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        config.apply_legacy_env(None, None);

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.server.public_base(), "https://go.example");
        assert_eq!(config.links.code_length, 8);
        assert_eq!(config.links.default_validity_minutes, 30);
    }
}

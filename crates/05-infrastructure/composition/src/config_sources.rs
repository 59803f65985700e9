//! 配置加载
//!
//! 按顺序合并可选的 TOML 配置文件与带前缀的环境变量，后者优先。
//! 嵌套键使用双下划线分隔，例如 `ADSP_MVC__SERVLET__PATH=/api`。

use infrastructure_common::{ConfigError, ConfigResult, EngineSettings};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "ADSP";

/// 配置加载器
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self {
            file: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

impl SettingsLoader {
    /// 创建使用默认前缀的加载器
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定配置文件，文件必须存在
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// 指定环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// 加载并验证配置
    pub fn load(&self) -> ConfigResult<EngineSettings> {
        let mut builder = config::Config::builder();
        match &self.file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                debug!("添加配置文件: {}", path.display());
                builder = builder.add_source(config::File::from(path.as_path()));
            }
            None => {
                builder = builder.add_source(config::File::with_name("config/app").required(false));
            }
        }
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("scan.base_packages"),
        );

        let settings: EngineSettings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                error!("配置加载失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        validate(&settings)?;
        info!(
            "配置加载完成, 前端控制器路径: {}",
            settings.mvc.servlet.path
        );
        Ok(settings)
    }
}

/// 从可选的配置文件与 `ADSP_` 环境变量加载配置
pub fn load_settings(path: Option<&Path>) -> ConfigResult<EngineSettings> {
    let loader = SettingsLoader::new();
    match path {
        Some(path) => loader.with_file(path).load(),
        None => loader.load(),
    }
}

fn validate(settings: &EngineSettings) -> ConfigResult<()> {
    let path = &settings.mvc.servlet.path;
    if !path.starts_with('/') {
        return Err(ConfigError::ValidationError {
            message: format!("前端控制器路径必须以 / 开头: {}", path),
        });
    }
    if path.contains('*') {
        return Err(ConfigError::ValidationError {
            message: format!("前端控制器路径不能包含通配符: {}", path),
        });
    }
    Ok(())
}

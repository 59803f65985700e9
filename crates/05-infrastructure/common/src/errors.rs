//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件扫描失败: {message}")]
    ScanError { message: String },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },

    #[error("组件元数据无效: {type_name}, 原因: {message}")]
    InvalidMetadata { type_name: String, message: String },

    #[error("组件属性互斥: {type_name}, {first} 与 {second} 不能同时设置")]
    MutuallyExclusiveAttributes {
        type_name: String,
        first: String,
        second: String,
    },

    #[error("组件名称已被占用: {name}")]
    DuplicateComponentName { name: String },

    #[error("组件不存在: {name}")]
    ComponentNotFound { name: String },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }

    /// 创建元数据无效错误
    pub fn invalid_metadata(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// 是否为编写错误（候选组件的声明本身有误）
    pub fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMetadata { .. } | Self::MutuallyExclusiveAttributes { .. }
        )
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

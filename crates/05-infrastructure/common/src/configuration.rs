//! 配置相关的基础类型定义
//!
//! 启动流程读取的配置节，每一节都有可直接使用的默认值

use serde::{Deserialize, Serialize};

/// 根配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// 前端控制器相关配置
    pub mvc: WebMvcSettings,
    /// HTTP 相关配置
    pub http: HttpSettings,
    /// 组件扫描配置
    pub scan: ScanSettings,
}

/// 前端控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebMvcSettings {
    /// 是否分发 OPTIONS 请求
    pub dispatch_options_request: bool,
    /// 是否分发 TRACE 请求
    pub dispatch_trace_request: bool,
    /// 找不到处理器时是否抛出错误
    pub throw_exception_if_no_handler_found: bool,
    /// 前端控制器的映射配置
    pub servlet: ServletSettings,
}

impl Default for WebMvcSettings {
    fn default() -> Self {
        Self {
            dispatch_options_request: true,
            dispatch_trace_request: false,
            throw_exception_if_no_handler_found: false,
            servlet: ServletSettings::default(),
        }
    }
}

/// 前端控制器的映射配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServletSettings {
    /// 映射路径
    pub path: String,
    /// 启动加载顺序，负数表示首次请求时加载
    pub load_on_startup: i64,
}

impl Default for ServletSettings {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            load_on_startup: -1,
        }
    }
}

impl ServletSettings {
    /// 由映射路径推导出的 URL 模式
    ///
    /// 根路径映射为 `/`，其他路径映射为 `path/*`
    pub fn servlet_mapping(&self) -> String {
        let path = self.path.trim_end_matches('/');
        if path.is_empty() {
            "/".to_string()
        } else {
            format!("{}/*", path)
        }
    }
}

/// HTTP 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// 是否记录请求详情
    pub log_request_details: bool,
}

/// 组件扫描配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// 组件目录文件路径
    pub catalog: Option<String>,
    /// 额外的扫描根路径
    pub base_packages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servlet_mapping() {
        let mut settings = ServletSettings::default();
        assert_eq!(settings.servlet_mapping(), "/");

        settings.path = "/api".to_string();
        assert_eq!(settings.servlet_mapping(), "/api/*");

        settings.path = "/api/".to_string();
        assert_eq!(settings.servlet_mapping(), "/api/*");
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: EngineSettings = serde_json::from_value(serde_json::json!({
            "mvc": { "servlet": { "path": "/app" } }
        }))
        .unwrap();

        assert_eq!(settings.mvc.servlet.path, "/app");
        assert_eq!(settings.mvc.servlet.load_on_startup, -1);
        assert!(settings.mvc.dispatch_options_request);
        assert!(!settings.http.log_request_details);
    }
}

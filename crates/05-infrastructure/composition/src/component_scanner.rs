//! 组件扫描和发现功能
//!
//! 从组件目录中按根路径枚举候选组件。目录可以从 TOML 文件加载：
//!
//! ```toml
//! [[component]]
//! type = "app::web::HelloServlet"
//! marker = "web_servlet"
//!
//! [component.attributes]
//! url_patterns = ["/hello"]
//! ```

use di_abstractions::{is_under_root, CandidateIter, CandidateScanner, MarkerFilter};
use infrastructure_common::{
    AnnotationAttributes, CandidateUnit, ComponentError, ComponentResult, MarkerKind,
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// 组件目录
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentCatalog {
    /// 目录条目
    #[serde(default, rename = "component")]
    pub components: Vec<CatalogEntry>,
}

/// 组件目录条目
///
/// 未携带标记的条目是普通类型，扫描时总是被过滤掉
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    /// 完整类型路径
    #[serde(rename = "type")]
    pub type_name: String,
    /// 携带的标记
    #[serde(default)]
    pub marker: Option<MarkerKind>,
    /// 标记属性
    #[serde(default)]
    pub attributes: AnnotationAttributes,
}

impl CatalogEntry {
    fn to_candidate(&self) -> Option<CandidateUnit> {
        self.marker.map(|marker| CandidateUnit {
            type_name: self.type_name.clone(),
            marker,
            attributes: self.attributes.clone(),
        })
    }
}

/// 基于组件目录的扫描器
#[derive(Debug, Clone, Default)]
pub struct CatalogScanner {
    catalog: ComponentCatalog,
}

impl CatalogScanner {
    /// 创建空的扫描器
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 TOML 文本解析组件目录
    pub fn from_toml_str(content: &str) -> ComponentResult<Self> {
        let catalog: ComponentCatalog = toml::from_str(content)
            .map_err(|e| ComponentError::scan_error(format!("组件目录解析失败: {}", e)))?;
        debug!("解析组件目录, 共 {} 个条目", catalog.components.len());
        Ok(Self { catalog })
    }

    /// 从文件加载组件目录
    pub fn load(path: impl AsRef<Path>) -> ComponentResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ComponentError::scan_error(format!("无法读取组件目录 {}: {}", path.display(), e))
        })?;
        let scanner = Self::from_toml_str(&content)?;
        info!(
            "加载组件目录: {} ({} 个条目)",
            path.display(),
            scanner.catalog.components.len()
        );
        Ok(scanner)
    }

    /// 添加带标记的候选组件
    pub fn with_candidate(mut self, candidate: CandidateUnit) -> Self {
        self.catalog.components.push(CatalogEntry {
            type_name: candidate.type_name,
            marker: Some(candidate.marker),
            attributes: candidate.attributes,
        });
        self
    }

    /// 添加不带标记的普通类型
    pub fn with_plain_type(mut self, type_name: impl Into<String>) -> Self {
        self.catalog.components.push(CatalogEntry {
            type_name: type_name.into(),
            marker: None,
            attributes: AnnotationAttributes::new(),
        });
        self
    }

    /// 当前目录内容
    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }
}

impl CandidateScanner for CatalogScanner {
    fn scan<'a>(&'a self, root: &'a str, filter: &'a MarkerFilter) -> CandidateIter<'a> {
        if filter.is_empty() {
            warn!("标记过滤器为空, 根路径 {} 下不会发现任何组件", root);
        }
        Box::new(
            self.catalog
                .components
                .iter()
                .filter(move |entry| is_under_root(&entry.type_name, root))
                .filter_map(CatalogEntry::to_candidate)
                .filter(move |candidate| filter.matches(candidate)),
        )
    }

    fn name(&self) -> &str {
        "CatalogScanner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::AttributeValue;
    use std::io::Write;

    const CATALOG: &str = r#"
[[component]]
type = "app::web::HelloServlet"
marker = "web_servlet"

[component.attributes]
url_patterns = ["/hello"]
load_on_startup = 1

[[component.attributes.init_params]]
name = "greeting"
value = "hi"

[[component]]
type = "app::web::AuditFilter"
marker = "web_filter"

[[component]]
type = "app::web::Helper"

[[component]]
type = "other::SessionListener"
marker = "web_listener"
"#;

    fn all_markers() -> MarkerFilter {
        [
            MarkerKind::WebServlet,
            MarkerKind::WebFilter,
            MarkerKind::WebListener,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parse_catalog() {
        let scanner = CatalogScanner::from_toml_str(CATALOG).unwrap();
        let entries = &scanner.catalog().components;

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].marker, Some(MarkerKind::WebServlet));
        assert_eq!(
            entries[0].attributes.get("load_on_startup"),
            Some(&AttributeValue::Integer(1))
        );
        assert!(matches!(
            entries[0].attributes.get("init_params"),
            Some(AttributeValue::Nested(groups)) if groups.len() == 1
        ));
        assert_eq!(entries[2].marker, None);
    }

    #[test]
    fn test_scan_filters_by_root_and_marker() {
        let scanner = CatalogScanner::from_toml_str(CATALOG).unwrap();
        let filter = MarkerFilter::new().include(MarkerKind::WebServlet);

        let found: Vec<String> = scanner
            .scan("app", &filter)
            .map(|c| c.type_name)
            .collect();
        assert_eq!(found, vec!["app::web::HelloServlet"]);

        let all = all_markers();
        let found: Vec<String> = scanner.scan("app::web", &all).map(|c| c.type_name).collect();
        assert_eq!(found, vec!["app::web::HelloServlet", "app::web::AuditFilter"]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let scanner = CatalogScanner::new()
            .with_candidate(CandidateUnit::new("app::A", MarkerKind::WebServlet))
            .with_plain_type("app::B");
        let filter = all_markers();

        assert_eq!(scanner.scan("app", &filter).count(), 1);
        assert_eq!(scanner.scan("app", &filter).count(), 1);
        assert_eq!(scanner.scan("unknown", &filter).count(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let scanner = CatalogScanner::load(file.path()).unwrap();

        assert_eq!(scanner.catalog().components.len(), 4);
    }

    #[test]
    fn test_invalid_catalog() {
        let result = CatalogScanner::from_toml_str("[[component]]\nmarker = \"web_servlet\"\n");
        assert!(matches!(result, Err(ComponentError::ScanError { .. })));

        let missing = CatalogScanner::load("/nonexistent/catalog.toml");
        assert!(matches!(missing, Err(ComponentError::ScanError { .. })));
    }
}

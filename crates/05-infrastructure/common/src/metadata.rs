//! 元数据定义
//!
//! 扫描器发现的候选组件以及它们携带的标记属性

use crate::errors::{ComponentError, ComponentResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 模块路径分隔符
pub const PATH_SEPARATOR: &str = "::";

/// 获取类型所在的命名空间（最后一个 `::` 之前的部分）
pub fn namespace_of(type_name: &str) -> &str {
    type_name
        .rfind(PATH_SEPARATOR)
        .map_or("", |index| &type_name[..index])
}

/// 标记类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Servlet 标记
    WebServlet,
    /// 过滤器标记
    WebFilter,
    /// 监听器标记
    WebListener,
}

impl MarkerKind {
    /// 标记名称
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::WebServlet => "web_servlet",
            MarkerKind::WebFilter => "web_filter",
            MarkerKind::WebListener => "web_listener",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 标记属性集合
pub type AnnotationAttributes = BTreeMap<String, AttributeValue>;

/// 标记属性值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// 布尔值
    Bool(bool),
    /// 整数
    Integer(i64),
    /// 文本
    Text(String),
    /// 文本列表
    TextList(Vec<String>),
    /// 重复出现的属性组，例如初始化参数
    Nested(Vec<AnnotationAttributes>),
}

impl AttributeValue {
    fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Text(_) => "text",
            AttributeValue::TextList(_) => "text list",
            AttributeValue::Nested(_) => "nested attributes",
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(values: Vec<&str>) -> Self {
        Self::TextList(values.into_iter().map(str::to_string).collect())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// 候选组件
///
/// 一次扫描中发现的带标记的代码单元，分发给处理器后即被丢弃
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateUnit {
    /// 完整类型路径，例如 `app::web::HelloServlet`
    pub type_name: String,
    /// 携带的标记
    pub marker: MarkerKind,
    /// 标记上声明的属性
    pub attributes: AnnotationAttributes,
}

impl CandidateUnit {
    /// 创建新的候选组件
    pub fn new(type_name: impl Into<String>, marker: MarkerKind) -> Self {
        Self {
            type_name: type_name.into(),
            marker,
            attributes: AnnotationAttributes::new(),
        }
    }

    /// 添加属性
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// 所在命名空间
    pub fn namespace(&self) -> &str {
        namespace_of(&self.type_name)
    }

    /// 读取文本属性，缺失时返回 `None`
    pub fn text(&self, key: &str) -> ComponentResult<Option<&str>> {
        match self.attributes.get(key) {
            None => Ok(None),
            Some(AttributeValue::Text(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(self.type_mismatch(key, "text", other)),
        }
    }

    /// 读取文本列表属性，缺失时视为空列表
    pub fn text_list(&self, key: &str) -> ComponentResult<Vec<String>> {
        match self.attributes.get(key) {
            None => Ok(Vec::new()),
            Some(AttributeValue::Text(value)) => Ok(vec![value.clone()]),
            Some(AttributeValue::TextList(values)) => Ok(values.clone()),
            Some(AttributeValue::Nested(groups)) if groups.is_empty() => Ok(Vec::new()),
            Some(other) => Err(self.type_mismatch(key, "text list", other)),
        }
    }

    /// 读取整数属性
    pub fn integer(&self, key: &str) -> ComponentResult<Option<i64>> {
        match self.attributes.get(key) {
            None => Ok(None),
            Some(AttributeValue::Integer(value)) => Ok(Some(*value)),
            Some(other) => Err(self.type_mismatch(key, "integer", other)),
        }
    }

    /// 读取布尔属性
    pub fn flag(&self, key: &str) -> ComponentResult<Option<bool>> {
        match self.attributes.get(key) {
            None => Ok(None),
            Some(AttributeValue::Bool(value)) => Ok(Some(*value)),
            Some(other) => Err(self.type_mismatch(key, "bool", other)),
        }
    }

    /// 读取重复属性组，缺失或空数组时视为没有属性组
    pub fn groups(&self, key: &str) -> ComponentResult<&[AnnotationAttributes]> {
        match self.attributes.get(key) {
            None => Ok(&[]),
            Some(AttributeValue::Nested(groups)) => Ok(groups),
            Some(AttributeValue::TextList(values)) if values.is_empty() => Ok(&[]),
            Some(other) => Err(self.type_mismatch(key, "nested attributes", other)),
        }
    }

    fn type_mismatch(&self, key: &str, expected: &str, actual: &AttributeValue) -> ComponentError {
        ComponentError::invalid_metadata(
            &self.type_name,
            format!("属性 {} 期望 {}, 实际为 {}", key, expected, actual.kind()),
        )
    }
}

impl fmt::Display for CandidateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (@{})", self.type_name, self.marker)
    }
}

//! 标记组件处理器
//!
//! 每个处理器识别一种标记，把候选组件的属性提取为类型化的规格，
//! 再生成对应的注册包装描述符。处理器不读取注册表，也不评估任何条件。

use crate::servlet_types;
use infrastructure_common::{
    AnnotationAttributes, AttributeValue, CandidateUnit, ComponentDescriptor, ComponentError,
    ComponentResult, ConstructorArg, MarkerKind,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// 组件处理器 trait
pub trait ComponentHandler {
    /// 处理的标记类型
    fn marker(&self) -> MarkerKind;

    /// 是否识别此候选组件
    fn recognizes(&self, candidate: &CandidateUnit) -> bool {
        candidate.marker == self.marker()
    }

    /// 提取属性并生成待注册的描述符
    ///
    /// 描述符名称只是首选名称，注册时会避开已占用的名称
    fn handle(&self, candidate: &CandidateUnit) -> ComponentResult<Vec<ComponentDescriptor>>;
}

/// 默认处理器列表，构建一次后不再修改
pub fn default_handlers() -> Vec<Box<dyn ComponentHandler>> {
    vec![
        Box::new(WebServletHandler),
        Box::new(WebFilterHandler),
        Box::new(WebListenerHandler),
    ]
}

/// 提取 URL 模式
///
/// `url_patterns` 与 `value` 互斥；两者都为空时返回空列表
pub fn extract_url_patterns(candidate: &CandidateUnit) -> ComponentResult<Vec<String>> {
    let value = candidate.text_list("value")?;
    let url_patterns = candidate.text_list("url_patterns")?;
    if !url_patterns.is_empty() {
        if !value.is_empty() {
            return Err(ComponentError::MutuallyExclusiveAttributes {
                type_name: candidate.type_name.clone(),
                first: "url_patterns".to_string(),
                second: "value".to_string(),
            });
        }
        return Ok(url_patterns);
    }
    Ok(value)
}

/// 提取初始化参数，同名参数以最后一个为准
pub fn extract_init_parameters(
    candidate: &CandidateUnit,
) -> ComponentResult<BTreeMap<String, String>> {
    let mut parameters = BTreeMap::new();
    for group in candidate.groups("init_params")? {
        let name = group_text(candidate, group, "name")?;
        let value = group_text(candidate, group, "value")?;
        parameters.insert(name, value);
    }
    Ok(parameters)
}

fn group_text(
    candidate: &CandidateUnit,
    group: &AnnotationAttributes,
    key: &str,
) -> ComponentResult<String> {
    match group.get(key) {
        Some(AttributeValue::Text(text)) => Ok(text.clone()),
        Some(_) => Err(ComponentError::invalid_metadata(
            &candidate.type_name,
            format!("init_params 中的 {} 必须是文本", key),
        )),
        None => Err(ComponentError::invalid_metadata(
            &candidate.type_name,
            format!("init_params 缺少 {}", key),
        )),
    }
}

/// 名称属性非空时使用它，否则使用候选组件的类型路径
fn determine_name(candidate: &CandidateUnit, key: &str) -> ComponentResult<String> {
    Ok(candidate
        .text(key)?
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(candidate.type_name.as_str())
        .to_string())
}

/// Servlet 规格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServletSpec {
    /// 注册名称
    pub name: String,
    /// URL 映射
    pub url_patterns: Vec<String>,
    /// 启动加载顺序
    pub load_on_startup: i64,
    /// 初始化参数
    pub init_parameters: BTreeMap<String, String>,
    /// 是否支持异步
    pub async_supported: bool,
}

/// `web_servlet` 标记处理器
#[derive(Debug, Clone, Copy, Default)]
pub struct WebServletHandler;

impl WebServletHandler {
    /// 提取 Servlet 规格
    pub fn extract(&self, candidate: &CandidateUnit) -> ComponentResult<ServletSpec> {
        Ok(ServletSpec {
            name: determine_name(candidate, "name")?,
            url_patterns: extract_url_patterns(candidate)?,
            load_on_startup: candidate.integer("load_on_startup")?.unwrap_or(-1),
            init_parameters: extract_init_parameters(candidate)?,
            async_supported: candidate.flag("async_supported")?.unwrap_or(false),
        })
    }

    fn descriptor(&self, candidate: &CandidateUnit, spec: ServletSpec) -> ComponentDescriptor {
        ComponentDescriptor::new(spec.name.clone(), servlet_types::servlet_registration_bean())
            .with_constructor_arg(ConstructorArg::Text(candidate.type_name.clone()))
            .with_property("name", ConstructorArg::Text(spec.name))
            .with_property("url_mappings", ConstructorArg::TextList(spec.url_patterns))
            .with_property("load_on_startup", ConstructorArg::Integer(spec.load_on_startup))
            .with_property("init_parameters", ConstructorArg::Parameters(spec.init_parameters))
            .with_property("async_supported", ConstructorArg::Bool(spec.async_supported))
            .with_source(candidate.type_name.clone())
    }
}

impl ComponentHandler for WebServletHandler {
    fn marker(&self) -> MarkerKind {
        MarkerKind::WebServlet
    }

    fn handle(&self, candidate: &CandidateUnit) -> ComponentResult<Vec<ComponentDescriptor>> {
        let spec = self.extract(candidate)?;
        Ok(vec![self.descriptor(candidate, spec)])
    }
}

/// 过滤器分发类型，顺序与声明顺序一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DispatcherType {
    /// 转发
    Forward,
    /// 包含
    Include,
    /// 普通请求
    Request,
    /// 异步分发
    Async,
    /// 错误页分发
    Error,
}

impl DispatcherType {
    /// 分发类型名称
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatcherType::Forward => "FORWARD",
            DispatcherType::Include => "INCLUDE",
            DispatcherType::Request => "REQUEST",
            DispatcherType::Async => "ASYNC",
            DispatcherType::Error => "ERROR",
        }
    }
}

impl FromStr for DispatcherType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FORWARD" => Ok(DispatcherType::Forward),
            "INCLUDE" => Ok(DispatcherType::Include),
            "REQUEST" => Ok(DispatcherType::Request),
            "ASYNC" => Ok(DispatcherType::Async),
            "ERROR" => Ok(DispatcherType::Error),
            other => Err(format!("未知的分发类型: {}", other)),
        }
    }
}

impl fmt::Display for DispatcherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 过滤器规格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// 注册名称
    pub name: String,
    /// URL 模式
    pub url_patterns: Vec<String>,
    /// 作用的 Servlet 名称
    pub servlet_names: Vec<String>,
    /// 处理的分发类型
    pub dispatcher_types: BTreeSet<DispatcherType>,
    /// 初始化参数
    pub init_parameters: BTreeMap<String, String>,
    /// 是否支持异步
    pub async_supported: bool,
}

/// `web_filter` 标记处理器
#[derive(Debug, Clone, Copy, Default)]
pub struct WebFilterHandler;

impl WebFilterHandler {
    /// 提取过滤器规格
    pub fn extract(&self, candidate: &CandidateUnit) -> ComponentResult<FilterSpec> {
        Ok(FilterSpec {
            name: determine_name(candidate, "filter_name")?,
            url_patterns: extract_url_patterns(candidate)?,
            servlet_names: candidate.text_list("servlet_names")?,
            dispatcher_types: Self::extract_dispatcher_types(candidate)?,
            init_parameters: extract_init_parameters(candidate)?,
            async_supported: candidate.flag("async_supported")?.unwrap_or(false),
        })
    }

    /// 未声明时默认只处理 REQUEST；显式声明为空列表时不处理任何分发类型
    fn extract_dispatcher_types(
        candidate: &CandidateUnit,
    ) -> ComponentResult<BTreeSet<DispatcherType>> {
        if !candidate.attributes.contains_key("dispatcher_types") {
            return Ok(BTreeSet::from([DispatcherType::Request]));
        }
        candidate
            .text_list("dispatcher_types")?
            .iter()
            .map(|s| {
                s.parse::<DispatcherType>()
                    .map_err(|message| ComponentError::invalid_metadata(&candidate.type_name, message))
            })
            .collect()
    }

    fn descriptor(&self, candidate: &CandidateUnit, spec: FilterSpec) -> ComponentDescriptor {
        let dispatcher_types = spec
            .dispatcher_types
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        ComponentDescriptor::new(spec.name.clone(), servlet_types::filter_registration_bean())
            .with_constructor_arg(ConstructorArg::Text(candidate.type_name.clone()))
            .with_property("name", ConstructorArg::Text(spec.name))
            .with_property("url_patterns", ConstructorArg::TextList(spec.url_patterns))
            .with_property("servlet_names", ConstructorArg::TextList(spec.servlet_names))
            .with_property("dispatcher_types", ConstructorArg::TextList(dispatcher_types))
            .with_property("init_parameters", ConstructorArg::Parameters(spec.init_parameters))
            .with_property("async_supported", ConstructorArg::Bool(spec.async_supported))
            .with_source(candidate.type_name.clone())
    }
}

impl ComponentHandler for WebFilterHandler {
    fn marker(&self) -> MarkerKind {
        MarkerKind::WebFilter
    }

    fn handle(&self, candidate: &CandidateUnit) -> ComponentResult<Vec<ComponentDescriptor>> {
        let spec = self.extract(candidate)?;
        Ok(vec![self.descriptor(candidate, spec)])
    }
}

/// 监听器规格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSpec {
    /// 描述信息
    pub description: Option<String>,
}

/// `web_listener` 标记处理器
#[derive(Debug, Clone, Copy, Default)]
pub struct WebListenerHandler;

impl WebListenerHandler {
    /// 提取监听器规格
    pub fn extract(&self, candidate: &CandidateUnit) -> ComponentResult<ListenerSpec> {
        Ok(ListenerSpec {
            description: candidate
                .text("value")?
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

impl ComponentHandler for WebListenerHandler {
    fn marker(&self) -> MarkerKind {
        MarkerKind::WebListener
    }

    fn handle(&self, candidate: &CandidateUnit) -> ComponentResult<Vec<ComponentDescriptor>> {
        let spec = self.extract(candidate)?;
        let mut descriptor = ComponentDescriptor::new(
            format!("{}Registrar", candidate.type_name),
            servlet_types::servlet_listener_registration_bean(),
        )
        .with_constructor_arg(ConstructorArg::Text(candidate.type_name.clone()))
        .with_source(candidate.type_name.clone());
        if let Some(description) = spec.description {
            descriptor = descriptor.with_property("description", ConstructorArg::Text(description));
        }
        Ok(vec![descriptor])
    }
}

//! 组件描述符定义
//!
//! 注册表中保存的都是描述符，而不是组件实例；实例化由外部容器负责

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// 组件类型标签
///
/// 记录组件自身的类型名以及它可以赋值到的父类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeTag {
    /// 类型名称
    pub name: String,
    /// 可赋值到的父类型
    pub supertypes: Vec<String>,
}

impl TypeTag {
    /// 创建新的类型标签
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
        }
    }

    /// 添加父类型
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// 检查是否可以赋值到指定类型
    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.name == type_name || self.supertypes.iter().any(|s| s == type_name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 组件角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    /// 应用组件
    #[default]
    Application,
    /// 基础设施组件，只在框架内部使用
    Infrastructure,
}

/// 构造参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstructorArg {
    /// 按名称引用另一个组件
    Reference(String),
    /// 文本
    Text(String),
    /// 整数
    Integer(i64),
    /// 布尔值
    Bool(bool),
    /// 文本列表
    TextList(Vec<String>),
    /// 去重且有序的文本集合
    TextSet(BTreeSet<String>),
    /// 名称到值的参数映射
    Parameters(BTreeMap<String, String>),
}

impl ConstructorArg {
    /// 以文本集合形式读取
    pub fn as_text_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::TextSet(set) => Some(set),
            _ => None,
        }
    }

    /// 以引用形式读取
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }
}

/// 组件描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDescriptor {
    /// 组件名称，在注册表内唯一
    pub name: String,
    /// 组件类型
    pub type_tag: TypeTag,
    /// 组件角色
    pub role: ComponentRole,
    /// 有序的构造参数
    pub constructor_args: Vec<ConstructorArg>,
    /// 命名的属性值
    pub properties: BTreeMap<String, ConstructorArg>,
    /// 描述符来源（候选组件类型或自动配置名称）
    pub source: Option<String>,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            role: ComponentRole::Application,
            constructor_args: Vec::new(),
            properties: BTreeMap::new(),
            source: None,
        }
    }

    /// 设置角色
    pub fn with_role(mut self, role: ComponentRole) -> Self {
        self.role = role;
        self
    }

    /// 追加构造参数
    pub fn with_constructor_arg(mut self, arg: ConstructorArg) -> Self {
        self.constructor_args.push(arg);
        self
    }

    /// 设置属性
    pub fn with_property(mut self, key: impl Into<String>, value: ConstructorArg) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// 设置来源
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 修改名称，其余内容保持不变
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 读取属性
    pub fn property(&self, key: &str) -> Option<&ConstructorArg> {
        self.properties.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_assignability() {
        let tag = TypeTag::new("DispatcherServletRegistrationBean").extends("ServletRegistrationBean");

        assert!(tag.is_assignable_to("DispatcherServletRegistrationBean"));
        assert!(tag.is_assignable_to("ServletRegistrationBean"));
        assert!(!tag.is_assignable_to("FilterRegistrationBean"));
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = ComponentDescriptor::new("hello", TypeTag::new("HelloServlet"))
            .with_role(ComponentRole::Infrastructure)
            .with_constructor_arg(ConstructorArg::Reference("other".to_string()))
            .with_property("name", ConstructorArg::Text("hello".to_string()))
            .with_source("app::HelloServlet");

        assert_eq!(descriptor.role, ComponentRole::Infrastructure);
        assert_eq!(descriptor.constructor_args[0].as_reference(), Some("other"));
        assert_eq!(
            descriptor.property("name"),
            Some(&ConstructorArg::Text("hello".to_string()))
        );
        assert_eq!(descriptor.renamed("hello#1").name, "hello#1");
    }
}

//! 组件扫描声明
//!
//! 同一个扫描键的多次声明合并为一个注册协调器描述符，
//! 根路径集合保存在该描述符的第一个构造参数中

use crate::servlet_types;
use di_abstractions::{ComponentRegistry, RegistryView};
use infrastructure_common::{
    namespace_of, ComponentDescriptor, ComponentError, ComponentResult, ComponentRole, ConstructorArg,
};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// 默认扫描键，即注册协调器的组件名称
pub const DEFAULT_SCAN_KEY: &str = "servletComponentRegisteringPostProcessor";

/// 一次扫描声明
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanDeclaration {
    /// 发出声明的类型
    pub declaring_type: String,
    /// 显式声明的根路径
    pub base_packages: Vec<String>,
    /// 以其所在命名空间作为根路径的类型
    pub base_package_types: Vec<String>,
}

impl ScanDeclaration {
    /// 创建扫描声明
    pub fn new(declaring_type: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            ..Self::default()
        }
    }

    /// 添加根路径
    pub fn with_base_package(mut self, package: impl Into<String>) -> Self {
        self.base_packages.push(package.into());
        self
    }

    /// 添加以其命名空间作为根路径的类型
    pub fn with_base_package_type(mut self, type_name: impl Into<String>) -> Self {
        self.base_package_types.push(type_name.into());
        self
    }

    /// 需要扫描的根路径
    ///
    /// 没有声明任何根路径时使用声明类型所在的命名空间
    pub fn packages_to_scan(&self) -> BTreeSet<String> {
        let mut packages: BTreeSet<String> = self
            .base_packages
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        packages.extend(
            self.base_package_types
                .iter()
                .map(|t| namespace_of(t).to_string()),
        );
        if packages.is_empty() {
            packages.insert(namespace_of(&self.declaring_type).to_string());
        }
        packages
    }
}

/// 扫描声明注册器
pub struct ServletComponentScanRegistrar;

impl ServletComponentScanRegistrar {
    /// 以默认扫描键声明扫描
    pub fn declare_scan(
        registry: &mut dyn ComponentRegistry,
        declaration: &ScanDeclaration,
    ) -> ComponentResult<()> {
        Self::declare_scan_for(registry, DEFAULT_SCAN_KEY, declaration)
    }

    /// 以指定扫描键声明扫描
    ///
    /// 扫描键已存在时合并根路径，否则注册新的协调器描述符
    pub fn declare_scan_for(
        registry: &mut dyn ComponentRegistry,
        key: &str,
        declaration: &ScanDeclaration,
    ) -> ComponentResult<()> {
        let packages = declaration.packages_to_scan();
        let claimed_by = registry.get(key).map(|existing| {
            (
                existing
                    .type_tag
                    .is_assignable_to(servlet_types::SERVLET_COMPONENT_REGISTERING_POST_PROCESSOR),
                existing.type_tag.name.clone(),
            )
        });
        match claimed_by {
            Some((true, _)) => {
                debug!("合并扫描根路径到 {}: {:?}", key, packages);
                registry.merge_constructor_args(key, &mut |args| merge_packages(args, &packages))
            }
            Some((false, type_name)) => Err(ComponentError::RegistrationError {
                type_name,
                message: format!("扫描键 {} 已被其他组件占用", key),
            }),
            None => {
                info!("注册组件扫描: {} -> {:?}", key, packages);
                registry.insert(coordinator_descriptor(key, packages, &declaration.declaring_type))
            }
        }
    }
}

fn coordinator_descriptor(
    key: &str,
    packages: BTreeSet<String>,
    declaring_type: &str,
) -> ComponentDescriptor {
    ComponentDescriptor::new(key, servlet_types::servlet_component_registering_post_processor())
        .with_role(ComponentRole::Infrastructure)
        .with_constructor_arg(ConstructorArg::TextSet(packages))
        .with_source(declaring_type)
}

fn merge_packages(args: &mut Vec<ConstructorArg>, packages: &BTreeSet<String>) {
    match args.first_mut() {
        Some(ConstructorArg::TextSet(existing)) => existing.extend(packages.iter().cloned()),
        _ => args.insert(0, ConstructorArg::TextSet(packages.clone())),
    }
}

/// 读取扫描键对应的根路径集合
pub fn packages_of(descriptor: &ComponentDescriptor) -> BTreeSet<String> {
    descriptor
        .constructor_args
        .first()
        .and_then(ConstructorArg::as_text_set)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_impl::DefaultComponentRegistry;
    use infrastructure_common::TypeTag;

    fn roots(registry: &DefaultComponentRegistry, key: &str) -> Vec<String> {
        packages_of(registry.get(key).unwrap()).into_iter().collect()
    }

    #[test]
    fn test_packages_default_to_declaring_namespace() {
        let declaration = ScanDeclaration::new("app::config::ServletConfig");
        assert_eq!(
            declaration.packages_to_scan(),
            BTreeSet::from(["app::config".to_string()])
        );

        let explicit = ScanDeclaration::new("app::config::ServletConfig")
            .with_base_package("app::web")
            .with_base_package_type("lib::filters::Marker");
        assert_eq!(
            explicit.packages_to_scan(),
            BTreeSet::from(["app::web".to_string(), "lib::filters".to_string()])
        );
    }

    #[test]
    fn test_declarations_merge_into_one_descriptor() {
        let mut registry = DefaultComponentRegistry::new();
        let first = ScanDeclaration::new("app::A").with_base_package("p1");
        let second = ScanDeclaration::new("app::B").with_base_package("p2");

        ServletComponentScanRegistrar::declare_scan_for(&mut registry, "A", &first).unwrap();
        ServletComponentScanRegistrar::declare_scan_for(&mut registry, "A", &second).unwrap();
        ServletComponentScanRegistrar::declare_scan_for(&mut registry, "A", &first).unwrap();

        assert_eq!(registry.names(), vec!["A"]);
        assert_eq!(roots(&registry, "A"), vec!["p1", "p2"]);
    }

    #[test]
    fn test_merge_is_commutative() {
        let declarations = [
            ScanDeclaration::new("x::A").with_base_package("p1"),
            ScanDeclaration::new("x::B").with_base_package("p2"),
            ScanDeclaration::new("x::C"),
        ];

        let mut forward = DefaultComponentRegistry::new();
        for d in &declarations {
            ServletComponentScanRegistrar::declare_scan(&mut forward, d).unwrap();
        }
        let mut backward = DefaultComponentRegistry::new();
        for d in declarations.iter().rev() {
            ServletComponentScanRegistrar::declare_scan(&mut backward, d).unwrap();
        }

        assert_eq!(
            roots(&forward, DEFAULT_SCAN_KEY),
            roots(&backward, DEFAULT_SCAN_KEY)
        );
        assert_eq!(roots(&forward, DEFAULT_SCAN_KEY), vec!["p1", "p2", "x"]);
    }

    #[test]
    fn test_key_claimed_by_other_component() {
        let mut registry = DefaultComponentRegistry::new();
        registry
            .insert(ComponentDescriptor::new(DEFAULT_SCAN_KEY, TypeTag::new("Unrelated")))
            .unwrap();

        let result = ServletComponentScanRegistrar::declare_scan(
            &mut registry,
            &ScanDeclaration::new("app::A"),
        );

        assert!(matches!(result, Err(ComponentError::RegistrationError { .. })));
    }
}

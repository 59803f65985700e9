//! # 组件注册表具体实现
//!
//! 提供按名称索引、按注册顺序保存描述符的内存注册表

use di_abstractions::{ComponentRegistry, ConstructorArgMerge, RegistryView};
use infrastructure_common::{ComponentDescriptor, ComponentError, ComponentResult};
use std::collections::HashMap;
use tracing::debug;

/// 内存组件注册表
///
/// 启动阶段单线程使用，不需要加锁
#[derive(Debug, Default)]
pub struct DefaultComponentRegistry {
    /// 按注册顺序保存的描述符
    descriptors: Vec<ComponentDescriptor>,
    /// 名称到下标的索引
    index: HashMap<String, usize>,
}

impl DefaultComponentRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 按注册顺序遍历所有描述符
    pub fn descriptors(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.descriptors.iter()
    }

    /// 所有组件名称，按注册顺序返回
    pub fn names(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.name.clone()).collect()
    }
}

impl RegistryView for DefaultComponentRegistry {
    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn names_of_type(&self, type_name: &str) -> Vec<String> {
        self.descriptors
            .iter()
            .filter(|d| d.type_tag.is_assignable_to(type_name))
            .map(|d| d.name.clone())
            .collect()
    }

    fn get(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    fn len(&self) -> usize {
        self.descriptors.len()
    }
}

impl ComponentRegistry for DefaultComponentRegistry {
    fn insert(&mut self, descriptor: ComponentDescriptor) -> ComponentResult<()> {
        if self.index.contains_key(&descriptor.name) {
            return Err(ComponentError::DuplicateComponentName {
                name: descriptor.name,
            });
        }
        debug!(
            "注册组件: {} ({}, {:?})",
            descriptor.name, descriptor.type_tag, descriptor.role
        );
        self.index
            .insert(descriptor.name.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    fn merge_constructor_args(
        &mut self,
        name: &str,
        merge: ConstructorArgMerge<'_>,
    ) -> ComponentResult<()> {
        let position = *self
            .index
            .get(name)
            .ok_or_else(|| ComponentError::ComponentNotFound {
                name: name.to_string(),
            })?;
        merge(&mut self.descriptors[position].constructor_args);
        debug!("合并组件构造参数: {}", name);
        Ok(())
    }

    fn as_view(&self) -> &dyn RegistryView {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure_common::{ConstructorArg, TypeTag};

    fn servlet(name: &str) -> ComponentDescriptor {
        ComponentDescriptor::new(name, TypeTag::new("HelloServlet").extends("Servlet"))
    }

    #[test]
    fn test_names_keep_insertion_order() {
        let mut registry = DefaultComponentRegistry::new();
        registry.insert(servlet("c")).unwrap();
        registry.insert(servlet("a")).unwrap();
        registry.insert(servlet("b")).unwrap();

        assert_eq!(registry.names(), vec!["c", "a", "b"]);
        assert_eq!(registry.get("a").unwrap().name, "a");
    }

    #[test]
    fn test_merge_missing_component() {
        let mut registry = DefaultComponentRegistry::new();
        let result = registry.merge_constructor_args("missing", &mut |args| {
            args.push(ConstructorArg::Bool(true));
        });

        assert!(matches!(result, Err(ComponentError::ComponentNotFound { .. })));
    }
}

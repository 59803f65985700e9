//! 组件注册表抽象接口

use infrastructure_common::{ComponentDescriptor, ComponentResult, ConstructorArg};

/// 注册表只读视图
///
/// 条件只能通过此接口读取注册表，没有任何修改能力
pub trait RegistryView {
    /// 检查指定名称的组件是否存在（任意类型）
    fn contains(&self, name: &str) -> bool;

    /// 获取可赋值到指定类型的所有组件名称，按注册顺序返回
    fn names_of_type(&self, type_name: &str) -> Vec<String>;

    /// 检查是否至少存在一个指定类型的组件
    fn has_type(&self, type_name: &str) -> bool {
        !self.names_of_type(type_name).is_empty()
    }

    /// 获取组件描述符
    fn get(&self, name: &str) -> Option<&ComponentDescriptor>;

    /// 已注册的组件数量
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 构造参数合并函数
pub type ConstructorArgMerge<'a> = &'a mut dyn FnMut(&mut Vec<ConstructorArg>);

/// 组件注册表 trait
///
/// 由外部容器提供；注册引擎只依赖插入、合并与只读查询
pub trait ComponentRegistry: RegistryView {
    /// 插入组件描述符，名称已被占用时返回错误
    fn insert(&mut self, descriptor: ComponentDescriptor) -> ComponentResult<()>;

    /// 合并已有组件的构造参数
    ///
    /// 这是修改已注册描述符的唯一途径
    fn merge_constructor_args(
        &mut self,
        name: &str,
        merge: ConstructorArgMerge<'_>,
    ) -> ComponentResult<()>;

    /// 获取只读视图
    fn as_view(&self) -> &dyn RegistryView;
}

/// 生成不与已有组件冲突的名称
///
/// 名称未被占用时直接返回，否则依次尝试 `name#1`、`name#2` ...
pub fn generate_unique_name(view: &dyn RegistryView, base: &str) -> String {
    if !view.contains(base) {
        return base.to_string();
    }
    let mut counter = 1usize;
    loop {
        let candidate = format!("{}#{}", base, counter);
        if !view.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// 以不冲突的名称插入组件描述符，返回最终使用的名称
pub fn insert_with_unique_name(
    registry: &mut dyn ComponentRegistry,
    descriptor: ComponentDescriptor,
) -> ComponentResult<String> {
    let name = generate_unique_name(registry.as_view(), &descriptor.name);
    let descriptor = if name == descriptor.name {
        descriptor
    } else {
        descriptor.renamed(name.clone())
    };
    registry.insert(descriptor)?;
    Ok(name)
}

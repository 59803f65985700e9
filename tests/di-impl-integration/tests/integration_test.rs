//! 组件注册表实现的集成测试

use di_abstractions::{insert_with_unique_name, ComponentRegistry, RegistryView};
use di_impl::DefaultComponentRegistry;
use infrastructure_common::{
    ComponentDescriptor, ComponentError, ComponentRole, ConstructorArg, TypeTag,
};
use std::collections::BTreeSet;

fn registration_bean(name: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(name, TypeTag::new("ServletRegistrationBean"))
}

fn dispatcher_registration(name: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(
        name,
        TypeTag::new("DispatcherServletRegistrationBean").extends("ServletRegistrationBean"),
    )
}

#[test]
fn test_insert_and_query() {
    let mut registry = DefaultComponentRegistry::new();

    registry.insert(registration_bean("custom")).unwrap();
    registry
        .insert(ComponentDescriptor::new("dispatcherServlet", TypeTag::new("DispatcherServlet")))
        .unwrap();

    assert!(registry.contains("custom"));
    assert!(registry.contains("dispatcherServlet"));
    assert!(!registry.contains("missing"));
    assert_eq!(registry.len(), 2);

    assert_eq!(registry.names_of_type("ServletRegistrationBean"), vec!["custom"]);
    assert!(registry.has_type("DispatcherServlet"));
    assert!(!registry.has_type("FilterRegistrationBean"));
}

#[test]
fn test_names_of_type_follows_assignability_and_order() {
    let mut registry = DefaultComponentRegistry::new();

    registry.insert(dispatcher_registration("second")).unwrap();
    registry.insert(registration_bean("first")).unwrap();

    // 子类型同样计入父类型的查询结果，顺序为注册顺序
    assert_eq!(
        registry.names_of_type("ServletRegistrationBean"),
        vec!["second", "first"]
    );
    assert_eq!(
        registry.names_of_type("DispatcherServletRegistrationBean"),
        vec!["second"]
    );
}

#[test]
fn test_duplicate_name_is_rejected() {
    let mut registry = DefaultComponentRegistry::new();
    registry.insert(registration_bean("custom")).unwrap();

    let result = registry.insert(dispatcher_registration("custom"));

    assert!(matches!(
        result,
        Err(ComponentError::DuplicateComponentName { ref name }) if name == "custom"
    ));
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.get("custom").unwrap().type_tag.name,
        "ServletRegistrationBean"
    );
}

#[test]
fn test_merge_constructor_args() {
    let mut registry = DefaultComponentRegistry::new();
    let paths: BTreeSet<String> = ["app::a".to_string()].into_iter().collect();
    registry
        .insert(
            ComponentDescriptor::new("scanner", TypeTag::new("Scanner"))
                .with_role(ComponentRole::Infrastructure)
                .with_constructor_arg(ConstructorArg::TextSet(paths)),
        )
        .unwrap();

    registry
        .merge_constructor_args("scanner", &mut |args| {
            if let Some(ConstructorArg::TextSet(set)) = args.first_mut() {
                set.insert("app::b".to_string());
            }
        })
        .unwrap();

    let merged = registry.get("scanner").unwrap().constructor_args[0]
        .as_text_set()
        .unwrap();
    assert_eq!(merged.len(), 2);
    assert!(merged.contains("app::b"));
}

#[test]
fn test_insert_with_unique_name() {
    let mut registry = DefaultComponentRegistry::new();

    let first = insert_with_unique_name(&mut registry, registration_bean("hello")).unwrap();
    let second = insert_with_unique_name(&mut registry, registration_bean("hello")).unwrap();
    let third = insert_with_unique_name(&mut registry, registration_bean("hello")).unwrap();

    assert_eq!(first, "hello");
    assert_eq!(second, "hello#1");
    assert_eq!(third, "hello#2");
    assert_eq!(registry.names_of_type("ServletRegistrationBean").len(), 3);
}

//! 前端控制器自动配置
//!
//! 两个具名槽位：前端控制器 `dispatcherServlet` 与发布它的注册包装
//! `dispatcherServletRegistration`。两者都在所有普通注册之后评估，
//! 只在不与已有组件冲突时才提供默认实现。

use crate::conditional::ConditionalRegistration;
use crate::servlet_types;
use di_abstractions::{
    AllOf, Condition, ConditionMessage, ConditionOutcome, OnComponentCondition, RegistryView,
    LOWEST_PRECEDENCE,
};
use infrastructure_common::{
    ComponentDescriptor, ComponentRole, ConstructorArg, EngineSettings,
};

/// 前端控制器的默认名称
pub const DEFAULT_DISPATCHER_SERVLET_BEAN_NAME: &str = "dispatcherServlet";
/// 前端控制器注册包装的默认名称
pub const DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME: &str = "dispatcherServletRegistration";

/// 槽位条件的评估顺序，晚于所有普通条件
pub const DISPATCHER_CONDITION_ORDER: i32 = LOWEST_PRECEDENCE - 10;

const AUTO_CONFIGURATION: &str = "DispatcherServletAutoConfiguration";

/// 前端控制器槽位条件
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDispatcherServletCondition;

impl Condition for DefaultDispatcherServletCondition {
    fn name(&self) -> &str {
        "DefaultDispatcherServletCondition"
    }

    fn evaluate(&self, registry: &dyn RegistryView) -> ConditionOutcome {
        let message = ConditionMessage::for_condition("Default DispatcherServlet");
        let dispatch_servlet_beans = registry.names_of_type(servlet_types::DISPATCHER_SERVLET);
        if dispatch_servlet_beans
            .iter()
            .any(|name| name == DEFAULT_DISPATCHER_SERVLET_BEAN_NAME)
        {
            return ConditionOutcome::no_match(
                message
                    .found("dispatcher servlet bean")
                    .items([DEFAULT_DISPATCHER_SERVLET_BEAN_NAME]),
            );
        }
        if registry.contains(DEFAULT_DISPATCHER_SERVLET_BEAN_NAME) {
            return ConditionOutcome::no_match(
                message
                    .found("non dispatcher servlet bean")
                    .items([DEFAULT_DISPATCHER_SERVLET_BEAN_NAME]),
            );
        }
        if dispatch_servlet_beans.is_empty() {
            return ConditionOutcome::matched(message.did_not_find("dispatcher servlet beans").at_all());
        }
        // 已有的非默认实例保持不变，仍然以默认名称追加一个
        ConditionOutcome::matched(
            message
                .found_plural("dispatcher servlet bean", "dispatcher servlet beans")
                .items_quoted(&dispatch_servlet_beans)
                .append(&format!(
                    "and none is named {}",
                    DEFAULT_DISPATCHER_SERVLET_BEAN_NAME
                )),
        )
    }

    fn order(&self) -> i32 {
        DISPATCHER_CONDITION_ORDER
    }
}

/// 前端控制器注册包装槽位条件
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatcherServletRegistrationCondition;

impl DispatcherServletRegistrationCondition {
    fn start_message() -> ConditionMessage {
        ConditionMessage::for_condition("DispatcherServlet Registration")
    }

    fn check_default_dispatcher_name(registry: &dyn RegistryView) -> ConditionOutcome {
        let servlets = registry.names_of_type(servlet_types::DISPATCHER_SERVLET);
        let contains_dispatcher_bean = registry.contains(DEFAULT_DISPATCHER_SERVLET_BEAN_NAME);
        if contains_dispatcher_bean
            && !servlets
                .iter()
                .any(|name| name == DEFAULT_DISPATCHER_SERVLET_BEAN_NAME)
        {
            return ConditionOutcome::no_match(
                Self::start_message()
                    .found("non dispatcher servlet")
                    .items([DEFAULT_DISPATCHER_SERVLET_BEAN_NAME]),
            );
        }
        ConditionOutcome::matched_silently()
    }

    fn check_servlet_registration(registry: &dyn RegistryView) -> ConditionOutcome {
        let message = Self::start_message();
        let registrations = registry.names_of_type(servlet_types::SERVLET_REGISTRATION_BEAN);
        let contains_registration_bean =
            registry.contains(DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME);
        if registrations.is_empty() {
            if contains_registration_bean {
                return ConditionOutcome::no_match(
                    message
                        .found("non servlet registration bean")
                        .items([DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME]),
                );
            }
            return ConditionOutcome::matched(
                message.did_not_find("servlet registration bean").at_all(),
            );
        }
        if registrations
            .iter()
            .any(|name| name == DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME)
        {
            return ConditionOutcome::no_match(
                message
                    .found("servlet registration bean")
                    .items([DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME]),
            );
        }
        if contains_registration_bean {
            return ConditionOutcome::no_match(
                message
                    .found("non servlet registration bean")
                    .items([DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME]),
            );
        }
        ConditionOutcome::matched(
            message
                .found("servlet registration beans")
                .items_quoted(&registrations)
                .append(&format!(
                    "and none is named {}",
                    DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME
                )),
        )
    }
}

impl Condition for DispatcherServletRegistrationCondition {
    fn name(&self) -> &str {
        "DispatcherServletRegistrationCondition"
    }

    fn evaluate(&self, registry: &dyn RegistryView) -> ConditionOutcome {
        let outcome = Self::check_default_dispatcher_name(registry);
        if !outcome.is_match() {
            return outcome;
        }
        Self::check_servlet_registration(registry)
    }

    fn order(&self) -> i32 {
        DISPATCHER_CONDITION_ORDER
    }
}

/// 默认前端控制器描述符
pub fn dispatcher_servlet_descriptor(settings: &EngineSettings) -> ComponentDescriptor {
    let mvc = &settings.mvc;
    ComponentDescriptor::new(
        DEFAULT_DISPATCHER_SERVLET_BEAN_NAME,
        servlet_types::dispatcher_servlet(),
    )
    .with_property(
        "dispatch_options_request",
        ConstructorArg::Bool(mvc.dispatch_options_request),
    )
    .with_property(
        "dispatch_trace_request",
        ConstructorArg::Bool(mvc.dispatch_trace_request),
    )
    .with_property(
        "throw_exception_if_no_handler_found",
        ConstructorArg::Bool(mvc.throw_exception_if_no_handler_found),
    )
    .with_property(
        "enable_logging_request_details",
        ConstructorArg::Bool(settings.http.log_request_details),
    )
    .with_source(AUTO_CONFIGURATION)
}

/// 默认前端控制器注册包装描述符
pub fn dispatcher_servlet_registration_descriptor(settings: &EngineSettings) -> ComponentDescriptor {
    let servlet = &settings.mvc.servlet;
    ComponentDescriptor::new(
        DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME,
        servlet_types::dispatcher_servlet_registration_bean(),
    )
    .with_role(ComponentRole::Infrastructure)
    .with_constructor_arg(ConstructorArg::Reference(
        DEFAULT_DISPATCHER_SERVLET_BEAN_NAME.to_string(),
    ))
    .with_constructor_arg(ConstructorArg::Text(servlet.path.clone()))
    .with_property(
        "name",
        ConstructorArg::Text(DEFAULT_DISPATCHER_SERVLET_BEAN_NAME.to_string()),
    )
    .with_property(
        "load_on_startup",
        ConstructorArg::Integer(servlet.load_on_startup),
    )
    .with_property(
        "url_mappings",
        ConstructorArg::TextList(vec![servlet.servlet_mapping()]),
    )
    .with_source(AUTO_CONFIGURATION)
}

/// 前端控制器的两个条件注册，按声明顺序返回
///
/// 注册包装还要求默认前端控制器已经存在
pub fn dispatcher_servlet_registrations(settings: &EngineSettings) -> Vec<ConditionalRegistration> {
    vec![
        ConditionalRegistration::new(
            DEFAULT_DISPATCHER_SERVLET_BEAN_NAME,
            DefaultDispatcherServletCondition,
            dispatcher_servlet_descriptor(settings),
        ),
        ConditionalRegistration::new(
            DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME,
            AllOf::new("DispatcherServletRegistration")
                .and(DispatcherServletRegistrationCondition)
                .and(OnComponentCondition::new(
                    servlet_types::DISPATCHER_SERVLET,
                    DEFAULT_DISPATCHER_SERVLET_BEAN_NAME,
                )),
            dispatcher_servlet_registration_descriptor(settings),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::ComponentRegistry;
    use di_impl::DefaultComponentRegistry;
    use infrastructure_common::TypeTag;

    fn registry_with(descriptors: Vec<ComponentDescriptor>) -> DefaultComponentRegistry {
        let mut registry = DefaultComponentRegistry::new();
        for descriptor in descriptors {
            registry.insert(descriptor).unwrap();
        }
        registry
    }

    fn custom_dispatcher(name: &str) -> ComponentDescriptor {
        ComponentDescriptor::new(name, servlet_types::dispatcher_servlet())
    }

    fn custom_registration(name: &str) -> ComponentDescriptor {
        ComponentDescriptor::new(name, servlet_types::servlet_registration_bean())
    }

    fn unrelated(name: &str) -> ComponentDescriptor {
        ComponentDescriptor::new(name, TypeTag::new("Unrelated"))
    }

    #[test]
    fn test_stage_a_empty_registry() {
        let outcome = DefaultDispatcherServletCondition.evaluate(&registry_with(vec![]));

        assert!(outcome.is_match());
        assert_eq!(
            outcome.reason_trail(),
            ["Default DispatcherServlet did not find dispatcher servlet beans"]
        );
    }

    #[test]
    fn test_stage_a_default_already_present() {
        let registry = registry_with(vec![custom_dispatcher(DEFAULT_DISPATCHER_SERVLET_BEAN_NAME)]);
        let outcome = DefaultDispatcherServletCondition.evaluate(&registry);

        assert!(!outcome.is_match());
        assert_eq!(
            outcome.reason_trail(),
            ["Default DispatcherServlet found dispatcher servlet bean dispatcherServlet"]
        );
    }

    #[test]
    fn test_stage_a_name_claimed_by_other_type() {
        let registry = registry_with(vec![unrelated(DEFAULT_DISPATCHER_SERVLET_BEAN_NAME)]);
        let outcome = DefaultDispatcherServletCondition.evaluate(&registry);

        assert!(!outcome.is_match());
        assert_eq!(
            outcome.reason_trail(),
            ["Default DispatcherServlet found non dispatcher servlet bean dispatcherServlet"]
        );
    }

    #[test]
    fn test_stage_a_permissive_with_other_instances() {
        let registry = registry_with(vec![custom_dispatcher("a"), custom_dispatcher("b")]);
        let outcome = DefaultDispatcherServletCondition.evaluate(&registry);

        assert!(outcome.is_match());
        assert_eq!(
            outcome.reason_trail(),
            ["Default DispatcherServlet found dispatcher servlet beans 'a', 'b' and none is named dispatcherServlet"]
        );
    }

    #[test]
    fn test_stage_b_branches() {
        let condition = DispatcherServletRegistrationCondition;

        let empty = condition.evaluate(&registry_with(vec![]));
        assert!(empty.is_match());
        assert_eq!(
            empty.reason_trail(),
            ["DispatcherServlet Registration did not find servlet registration bean"]
        );

        let claimed = condition.evaluate(&registry_with(vec![unrelated(
            DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME,
        )]));
        assert!(!claimed.is_match());

        let present = condition.evaluate(&registry_with(vec![custom_registration(
            DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME,
        )]));
        assert!(!present.is_match());
        assert_eq!(
            present.reason_trail(),
            ["DispatcherServlet Registration found servlet registration bean dispatcherServletRegistration"]
        );

        let custom_and_claimed = condition.evaluate(&registry_with(vec![
            custom_registration("custom"),
            unrelated(DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME),
        ]));
        assert!(!custom_and_claimed.is_match());

        let custom = condition.evaluate(&registry_with(vec![custom_registration("custom")]));
        assert!(custom.is_match());
        assert_eq!(
            custom.reason_trail(),
            ["DispatcherServlet Registration found servlet registration beans 'custom' and none is named dispatcherServletRegistration"]
        );
    }

    #[test]
    fn test_stage_b_rechecks_dispatcher_name() {
        let registry = registry_with(vec![unrelated(DEFAULT_DISPATCHER_SERVLET_BEAN_NAME)]);
        let outcome = DispatcherServletRegistrationCondition.evaluate(&registry);

        assert!(!outcome.is_match());
        assert_eq!(
            outcome.reason_trail(),
            ["DispatcherServlet Registration found non dispatcher servlet dispatcherServlet"]
        );
    }

    #[test]
    fn test_conditions_run_after_ordinary_conditions() {
        let registrations = dispatcher_servlet_registrations(&EngineSettings::default());

        assert!(registrations.iter().all(|r| r.order() == DISPATCHER_CONDITION_ORDER));
        assert!(DISPATCHER_CONDITION_ORDER > di_abstractions::DEFAULT_ORDER);
    }

    #[test]
    fn test_provisioned_descriptors_follow_settings() {
        let mut settings = EngineSettings::default();
        settings.mvc.servlet.path = "/api".to_string();
        settings.mvc.servlet.load_on_startup = 1;
        settings.http.log_request_details = true;

        let servlet = dispatcher_servlet_descriptor(&settings);
        assert!(servlet.type_tag.is_assignable_to(servlet_types::HTTP_SERVLET));
        assert_eq!(
            servlet.property("dispatch_options_request"),
            Some(&ConstructorArg::Bool(true))
        );
        assert_eq!(
            servlet.property("enable_logging_request_details"),
            Some(&ConstructorArg::Bool(true))
        );

        let registration = dispatcher_servlet_registration_descriptor(&settings);
        assert!(registration
            .type_tag
            .is_assignable_to(servlet_types::SERVLET_REGISTRATION_BEAN));
        assert_eq!(
            registration.constructor_args,
            vec![
                ConstructorArg::Reference("dispatcherServlet".to_string()),
                ConstructorArg::Text("/api".to_string()),
            ]
        );
        assert_eq!(
            registration.property("url_mappings"),
            Some(&ConstructorArg::TextList(vec!["/api/*".to_string()]))
        );
        assert_eq!(
            registration.property("load_on_startup"),
            Some(&ConstructorArg::Integer(1))
        );
    }
}

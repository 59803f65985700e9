//! Servlet 相关的组件类型

use infrastructure_common::TypeTag;

/// Servlet 基类
pub const HTTP_SERVLET: &str = "HttpServlet";
/// 前端控制器
pub const DISPATCHER_SERVLET: &str = "DispatcherServlet";
/// Servlet 注册包装
pub const SERVLET_REGISTRATION_BEAN: &str = "ServletRegistrationBean";
/// 前端控制器注册包装
pub const DISPATCHER_SERVLET_REGISTRATION_BEAN: &str = "DispatcherServletRegistrationBean";
/// 过滤器注册包装
pub const FILTER_REGISTRATION_BEAN: &str = "FilterRegistrationBean";
/// 监听器注册包装
pub const SERVLET_LISTENER_REGISTRATION_BEAN: &str = "ServletListenerRegistrationBean";
/// 组件注册协调器
pub const SERVLET_COMPONENT_REGISTERING_POST_PROCESSOR: &str =
    "ServletComponentRegisteringPostProcessor";

/// 前端控制器类型
pub fn dispatcher_servlet() -> TypeTag {
    TypeTag::new(DISPATCHER_SERVLET).extends(HTTP_SERVLET)
}

/// Servlet 注册包装类型
pub fn servlet_registration_bean() -> TypeTag {
    TypeTag::new(SERVLET_REGISTRATION_BEAN)
}

/// 前端控制器的注册包装类型，同时也是普通的 Servlet 注册包装
pub fn dispatcher_servlet_registration_bean() -> TypeTag {
    TypeTag::new(DISPATCHER_SERVLET_REGISTRATION_BEAN).extends(SERVLET_REGISTRATION_BEAN)
}

/// 过滤器注册包装类型
pub fn filter_registration_bean() -> TypeTag {
    TypeTag::new(FILTER_REGISTRATION_BEAN)
}

/// 监听器注册包装类型
pub fn servlet_listener_registration_bean() -> TypeTag {
    TypeTag::new(SERVLET_LISTENER_REGISTRATION_BEAN)
}

/// 组件注册协调器类型
pub fn servlet_component_registering_post_processor() -> TypeTag {
    TypeTag::new(SERVLET_COMPONENT_REGISTERING_POST_PROCESSOR)
}

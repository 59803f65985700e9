//! # 基础设施组合层
//!
//! Servlet 组件注册引擎的组合层，把扫描声明、组件扫描、标记处理与
//! 前端控制器的条件注册组合成一次完整的启动流程。
//!
//! ## 主要功能
//!
//! - **扫描声明**: 同一扫描键的多次声明合并为一个注册协调器
//! - **组件扫描**: 从组件目录中发现带标记的候选组件
//! - **标记处理**: 把 Servlet、过滤器与监听器标记转换为注册包装描述符
//! - **条件注册**: 在不冲突时提供默认的前端控制器及其注册包装
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_impl::DefaultComponentRegistry;
//! use infrastructure_composition::{
//!     CatalogScanner, ScanDeclaration, ServletApplicationBootstrapper,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = DefaultComponentRegistry::new();
//!
//!     let report = ServletApplicationBootstrapper::new()
//!         .declare_scan(ScanDeclaration::new("app::config::ServletConfig").with_base_package("app::web"))
//!         .with_scanner(CatalogScanner::load("catalog.toml")?)
//!         .bootstrap(&mut registry)?;
//!
//!     for name in report.provisioned() {
//!         println!("默认组件: {}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod component_scanner;
pub mod conditional;
pub mod config_sources;
pub mod coordinator;
pub mod dispatcher;
pub mod scan_registrar;
pub mod servlet_handlers;
pub mod servlet_types;

// 重新导出主要类型
pub use bootstrapper::{BootstrapReport, ServletApplicationBootstrapper};
pub use component_scanner::{CatalogEntry, CatalogScanner, ComponentCatalog};
pub use conditional::{apply_conditional_registrations, ConditionEvaluation, ConditionalRegistration};
pub use config_sources::{load_settings, SettingsLoader};
pub use coordinator::{ApplicationContext, RegistrationCoordinator, ScanReport, SkipReason};
pub use dispatcher::{
    dispatcher_servlet_registrations, DefaultDispatcherServletCondition,
    DispatcherServletRegistrationCondition, DEFAULT_DISPATCHER_SERVLET_BEAN_NAME,
    DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME,
};
pub use scan_registrar::{ScanDeclaration, ServletComponentScanRegistrar, DEFAULT_SCAN_KEY};
pub use servlet_handlers::{
    default_handlers, ComponentHandler, DispatcherType, FilterSpec, ListenerSpec, ServletSpec,
    WebFilterHandler, WebListenerHandler, WebServletHandler,
};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;

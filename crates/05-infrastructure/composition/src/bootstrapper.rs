//! 基础设施启动器

use crate::component_scanner::CatalogScanner;
use crate::conditional::{apply_conditional_registrations, ConditionEvaluation, ConditionalRegistration};
use crate::coordinator::{ApplicationContext, RegistrationCoordinator, ScanReport};
use crate::dispatcher::dispatcher_servlet_registrations;
use crate::scan_registrar::{ScanDeclaration, ServletComponentScanRegistrar, DEFAULT_SCAN_KEY};
use crate::servlet_handlers::default_handlers;
use di_abstractions::{CandidateScanner, ComponentRegistry, RegistryView, WebEnvironment};
use infrastructure_common::{ComponentDescriptor, EngineSettings, InfrastructureResult};
use serde::Serialize;
use tracing::{debug, info, warn};

/// 来自配置文件的扫描声明使用的声明者名称
const SETTINGS_DECLARING_TYPE: &str = "settings::scan";

/// 启动报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct BootstrapReport {
    /// 组件扫描结果，没有任何扫描声明时为空
    pub scan: Option<ScanReport>,
    /// 条件评估记录，按评估顺序排列
    pub evaluations: Vec<ConditionEvaluation>,
}

impl BootstrapReport {
    /// 由条件注册提供的组件名称
    pub fn provisioned(&self) -> impl Iterator<Item = &str> {
        self.evaluations
            .iter()
            .filter_map(|e| e.provisioned.as_deref())
    }

    /// 以 JSON 格式输出
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Servlet 应用启动器
///
/// 负责协调显式声明、组件扫描与条件注册的先后顺序
pub struct ServletApplicationBootstrapper {
    settings: EngineSettings,
    declarations: Vec<ComponentDescriptor>,
    scans: Vec<ScanDeclaration>,
    scanner: Option<Box<dyn CandidateScanner>>,
    conditional_registrations: Vec<ConditionalRegistration>,
    environment: Box<dyn WebEnvironment>,
    dispatcher_auto_configuration: bool,
}

impl Default for ServletApplicationBootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ServletApplicationBootstrapper {
    /// 创建新的启动器
    pub fn new() -> Self {
        Self {
            settings: EngineSettings::default(),
            declarations: Vec::new(),
            scans: Vec::new(),
            scanner: None,
            conditional_registrations: Vec::new(),
            environment: Box::new(ApplicationContext::headless_web()),
            dispatcher_auto_configuration: true,
        }
    }

    /// 设置引擎配置
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 注册显式声明的组件
    pub fn register_component(mut self, descriptor: ComponentDescriptor) -> Self {
        self.declarations.push(descriptor);
        self
    }

    /// 声明组件扫描
    pub fn declare_scan(mut self, declaration: ScanDeclaration) -> Self {
        self.scans.push(declaration);
        self
    }

    /// 设置候选组件扫描器
    ///
    /// 未设置时使用配置中的组件目录
    pub fn with_scanner(mut self, scanner: impl CandidateScanner + 'static) -> Self {
        self.scanner = Some(Box::new(scanner));
        self
    }

    /// 添加条件注册
    pub fn add_conditional_registration(mut self, registration: ConditionalRegistration) -> Self {
        self.conditional_registrations.push(registration);
        self
    }

    /// 设置应用上下文
    pub fn with_environment(mut self, environment: impl WebEnvironment + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    /// 是否启用前端控制器自动配置
    pub fn with_dispatcher_auto_configuration(mut self, enabled: bool) -> Self {
        self.dispatcher_auto_configuration = enabled;
        self
    }

    /// 执行启动流程
    pub fn bootstrap(
        self,
        registry: &mut dyn ComponentRegistry,
    ) -> InfrastructureResult<BootstrapReport> {
        info!("开始启动 Servlet 应用组件注册");

        // 第一步：显式声明的组件
        for descriptor in &self.declarations {
            debug!("注册显式声明的组件: {}", descriptor.name);
            registry.insert(descriptor.clone())?;
        }

        // 第二步：扫描声明
        for declaration in self.scan_declarations() {
            ServletComponentScanRegistrar::declare_scan(registry, &declaration)?;
        }

        // 第三步：组件扫描
        let scan = self.run_scan(registry)?;

        // 第四步：条件注册
        let mut registrations = Vec::new();
        if self.dispatcher_auto_configuration {
            registrations.extend(dispatcher_servlet_registrations(&self.settings));
        }
        registrations.extend(self.conditional_registrations);
        let evaluations = apply_conditional_registrations(&registrations, registry)?;

        let report = BootstrapReport { scan, evaluations };
        info!(
            "组件注册完成, 注册表共 {} 个组件, 条件注册 {} 个",
            registry.len(),
            report.provisioned().count()
        );
        Ok(report)
    }

    fn scan_declarations(&self) -> Vec<ScanDeclaration> {
        let mut declarations = self.scans.clone();
        if !self.settings.scan.base_packages.is_empty() {
            declarations.push(ScanDeclaration {
                declaring_type: SETTINGS_DECLARING_TYPE.to_string(),
                base_packages: self.settings.scan.base_packages.clone(),
                base_package_types: Vec::new(),
            });
        }
        declarations
    }

    fn run_scan(
        &self,
        registry: &mut dyn ComponentRegistry,
    ) -> InfrastructureResult<Option<ScanReport>> {
        let Some(mut coordinator) =
            RegistrationCoordinator::from_registry(registry.as_view(), DEFAULT_SCAN_KEY, default_handlers())
        else {
            debug!("没有组件扫描声明");
            return Ok(None);
        };

        let report = match &self.scanner {
            Some(scanner) => coordinator.run(self.environment.as_ref(), scanner.as_ref(), registry)?,
            None => {
                let scanner = self.catalog_scanner()?;
                coordinator.run(self.environment.as_ref(), &scanner, registry)?
            }
        };
        Ok(Some(report))
    }

    fn catalog_scanner(&self) -> InfrastructureResult<CatalogScanner> {
        match &self.settings.scan.catalog {
            Some(path) => Ok(CatalogScanner::load(path)?),
            None => {
                warn!("未配置组件扫描器或组件目录, 扫描不会发现任何组件");
                Ok(CatalogScanner::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{
        DEFAULT_DISPATCHER_SERVLET_BEAN_NAME, DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME,
    };
    use di_impl::DefaultComponentRegistry;
    use infrastructure_common::InfrastructureError;

    #[test]
    fn test_bootstrap_empty_application() {
        let mut registry = DefaultComponentRegistry::new();

        let report = ServletApplicationBootstrapper::new()
            .bootstrap(&mut registry)
            .unwrap();

        assert!(report.scan.is_none());
        assert_eq!(
            report.provisioned().collect::<Vec<_>>(),
            vec![
                DEFAULT_DISPATCHER_SERVLET_BEAN_NAME,
                DEFAULT_DISPATCHER_SERVLET_REGISTRATION_BEAN_NAME
            ]
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_auto_configuration_can_be_disabled() {
        let mut registry = DefaultComponentRegistry::new();

        let report = ServletApplicationBootstrapper::new()
            .with_dispatcher_auto_configuration(false)
            .bootstrap(&mut registry)
            .unwrap();

        assert!(report.evaluations.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_settings_base_packages_are_scanned() {
        let mut registry = DefaultComponentRegistry::new();
        let mut settings = EngineSettings::default();
        settings.scan.base_packages = vec!["app::web".to_string()];

        let report = ServletApplicationBootstrapper::new()
            .with_settings(settings)
            .bootstrap(&mut registry)
            .unwrap();

        let scan = report.scan.unwrap();
        assert_eq!(scan.roots, vec!["app::web"]);
        assert!(registry.contains(DEFAULT_SCAN_KEY));
    }

    #[test]
    fn test_missing_catalog_is_fatal() {
        let mut registry = DefaultComponentRegistry::new();
        let mut settings = EngineSettings::default();
        settings.scan.catalog = Some("/nonexistent/catalog.toml".to_string());

        let result = ServletApplicationBootstrapper::new()
            .with_settings(settings)
            .declare_scan(ScanDeclaration::new("app::Config"))
            .bootstrap(&mut registry);

        assert!(matches!(
            result,
            Err(InfrastructureError::ComponentError { .. })
        ));
    }
}

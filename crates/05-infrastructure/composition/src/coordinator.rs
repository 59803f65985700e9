//! 组件注册协调器
//!
//! 在无服务端口的 Web 上下文中执行一次扫描，把候选组件分发给处理器，
//! 再以不冲突的名称写入注册表

use crate::scan_registrar::packages_of;
use crate::servlet_handlers::{default_handlers, ComponentHandler};
use di_abstractions::{
    insert_with_unique_name, CandidateScanner, ComponentRegistry, MarkerFilter, RegistryView,
    WebEnvironment,
};
use infrastructure_common::{ComponentDescriptor, ComponentResult};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tracing::{debug, info, warn};

/// 应用上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationContext {
    /// 非 Web 应用
    NonWeb,
    /// Web 应用，`serving` 表示是否已绑定服务端口
    Web { serving: bool },
}

impl ApplicationContext {
    /// 尚未绑定端口的 Web 上下文
    pub fn headless_web() -> Self {
        ApplicationContext::Web { serving: false }
    }
}

impl WebEnvironment for ApplicationContext {
    fn is_headless_web_context(&self) -> bool {
        matches!(self, ApplicationContext::Web { serving: false })
    }
}

/// 扫描被跳过的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// 不是无服务端口的 Web 上下文
    NotHeadlessWebContext,
    /// 已经执行过
    AlreadyCompleted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotHeadlessWebContext => f.write_str("不是无服务端口的 Web 上下文"),
            SkipReason::AlreadyCompleted => f.write_str("扫描已经执行过"),
        }
    }
}

/// 扫描报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// 扫描的根路径
    pub roots: Vec<String>,
    /// 分发的候选组件数量
    pub candidates: usize,
    /// 实际写入注册表的组件名称
    pub registered: Vec<String>,
    /// 跳过原因，执行过扫描时为空
    pub skipped: Option<SkipReason>,
}

impl ScanReport {
    /// 创建跳过扫描的报告
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    /// 扫描是否被跳过
    pub fn was_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// 组件注册协调器
///
/// 每个实例最多执行一次扫描
pub struct RegistrationCoordinator {
    packages: BTreeSet<String>,
    handlers: Vec<Box<dyn ComponentHandler>>,
    completed: bool,
}

impl RegistrationCoordinator {
    /// 使用给定根路径与处理器创建协调器
    pub fn new<I, S>(packages: I, handlers: Vec<Box<dyn ComponentHandler>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
            handlers,
            completed: false,
        }
    }

    /// 使用默认处理器创建协调器
    pub fn with_default_handlers<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(packages, default_handlers())
    }

    /// 从注册表中的协调器描述符创建
    ///
    /// 扫描键不存在时返回 `None`
    pub fn from_registry(
        view: &dyn RegistryView,
        key: &str,
        handlers: Vec<Box<dyn ComponentHandler>>,
    ) -> Option<Self> {
        view.get(key)
            .map(|descriptor| Self::new(packages_of(descriptor), handlers))
    }

    /// 合并更多根路径
    pub fn register<I, S>(&mut self, packages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.extend(packages.into_iter().map(Into::into));
    }

    /// 当前的扫描根路径
    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }

    /// 是否已经完成扫描
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// 所有处理器识别的标记并集
    pub fn marker_filter(&self) -> MarkerFilter {
        self.handlers.iter().map(|h| h.marker()).collect()
    }

    /// 执行扫描与注册
    ///
    /// 所有候选组件都提取完成后才写入注册表，
    /// 任一候选组件声明有误时整个扫描中止且注册表保持不变
    pub fn run(
        &mut self,
        environment: &dyn WebEnvironment,
        scanner: &dyn CandidateScanner,
        registry: &mut dyn ComponentRegistry,
    ) -> ComponentResult<ScanReport> {
        if !environment.is_headless_web_context() {
            debug!("跳过组件扫描: {}", SkipReason::NotHeadlessWebContext);
            return Ok(ScanReport::skipped(SkipReason::NotHeadlessWebContext));
        }
        if self.completed {
            debug!("跳过组件扫描: {}", SkipReason::AlreadyCompleted);
            return Ok(ScanReport::skipped(SkipReason::AlreadyCompleted));
        }

        let filter = self.marker_filter();
        info!(
            "开始组件扫描, 扫描器: {}, 根路径: {:?}",
            scanner.name(),
            self.packages
        );

        let mut seen = HashSet::new();
        let mut candidates = 0usize;
        let mut pending: Vec<ComponentDescriptor> = Vec::new();
        for root in &self.packages {
            for candidate in scanner.scan(root, &filter) {
                // 同一类型可以携带多个标记，每个标记各自分发一次
                if !seen.insert((candidate.type_name.clone(), candidate.marker)) {
                    debug!("候选组件已在其他根路径下处理: {}", candidate);
                    continue;
                }
                candidates += 1;
                for handler in self.handlers.iter().filter(|h| h.recognizes(&candidate)) {
                    let descriptors = handler.handle(&candidate).map_err(|e| {
                        warn!("候选组件 {} 处理失败: {}", candidate.type_name, e);
                        e
                    })?;
                    pending.extend(descriptors);
                }
            }
        }

        let mut registered = Vec::with_capacity(pending.len());
        for descriptor in pending {
            let name = insert_with_unique_name(registry, descriptor)?;
            debug!("注册扫描到的组件: {}", name);
            registered.push(name);
        }
        self.completed = true;

        info!(
            "组件扫描完成, 候选组件 {} 个, 注册 {} 个",
            candidates,
            registered.len()
        );
        Ok(ScanReport {
            roots: self.packages.iter().cloned().collect(),
            candidates,
            registered,
            skipped: None,
        })
    }
}

impl fmt::Debug for RegistrationCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markers: Vec<String> = self.handlers.iter().map(|h| h.marker().to_string()).collect();
        f.debug_struct("RegistrationCoordinator")
            .field("packages", &self.packages)
            .field("handlers", &markers)
            .field("completed", &self.completed)
            .finish()
    }
}

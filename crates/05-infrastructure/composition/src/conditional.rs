//! 条件注册
//!
//! 每个条件注册在所有显式声明与扫描结果写入之后，按条件顺序评估一次，
//! 匹配时写入预先构建的描述符

use di_abstractions::{ComponentRegistry, Condition, ConditionOutcome};
use infrastructure_common::{ComponentDescriptor, ComponentResult};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// 受条件保护的组件注册
pub struct ConditionalRegistration {
    id: String,
    condition: Box<dyn Condition>,
    provision: ComponentDescriptor,
}

impl ConditionalRegistration {
    /// 创建条件注册
    pub fn new(
        id: impl Into<String>,
        condition: impl Condition + 'static,
        provision: ComponentDescriptor,
    ) -> Self {
        Self {
            id: id.into(),
            condition: Box::new(condition),
            provision,
        }
    }

    /// 注册标识
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 评估顺序，取自条件
    pub fn order(&self) -> i32 {
        self.condition.order()
    }

    /// 匹配时注册的描述符
    pub fn provision(&self) -> &ComponentDescriptor {
        &self.provision
    }

    /// 评估条件，匹配时注册描述符
    pub fn apply(
        &self,
        registry: &mut dyn ComponentRegistry,
    ) -> ComponentResult<ConditionEvaluation> {
        let outcome = self.condition.evaluate(registry.as_view());
        debug!("条件 {} 评估结果: {}", self.condition.name(), outcome);

        let provisioned = if outcome.is_match() {
            registry.insert(self.provision.clone())?;
            info!("条件匹配, 注册默认组件: {}", self.provision.name);
            Some(self.provision.name.clone())
        } else {
            info!("条件不匹配, 跳过组件 {}: {}", self.provision.name, outcome);
            None
        };
        Ok(ConditionEvaluation::new(&self.id, self.order(), &outcome, provisioned))
    }
}

impl fmt::Debug for ConditionalRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalRegistration")
            .field("id", &self.id)
            .field("condition", &self.condition.name())
            .field("order", &self.order())
            .field("provision", &self.provision.name)
            .finish()
    }
}

/// 条件评估记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionEvaluation {
    /// 注册标识
    pub id: String,
    /// 评估顺序
    pub order: i32,
    /// 是否匹配
    pub matched: bool,
    /// 诊断说明
    pub reason_trail: Vec<String>,
    /// 匹配时注册的组件名称
    pub provisioned: Option<String>,
}

impl ConditionEvaluation {
    fn new(id: &str, order: i32, outcome: &ConditionOutcome, provisioned: Option<String>) -> Self {
        Self {
            id: id.to_string(),
            order,
            matched: outcome.is_match(),
            reason_trail: outcome.reason_trail().to_vec(),
            provisioned,
        }
    }
}

/// 按条件顺序依次评估所有条件注册
///
/// 顺序相同的条件注册保持声明顺序
pub fn apply_conditional_registrations(
    registrations: &[ConditionalRegistration],
    registry: &mut dyn ComponentRegistry,
) -> ComponentResult<Vec<ConditionEvaluation>> {
    let mut ordered: Vec<&ConditionalRegistration> = registrations.iter().collect();
    ordered.sort_by_key(|r| r.order());
    let mut evaluations = Vec::with_capacity(ordered.len());
    for registration in ordered {
        evaluations.push(registration.apply(&mut *registry)?);
    }
    Ok(evaluations)
}

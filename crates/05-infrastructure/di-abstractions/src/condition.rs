//! 条件抽象接口
//!
//! 条件是注册表内容上的纯函数，决定是否要注册某个组件

use crate::registry::RegistryView;
use std::fmt;

/// 最低优先级
pub const LOWEST_PRECEDENCE: i32 = i32::MAX;
/// 普通条件的默认顺序
pub const DEFAULT_ORDER: i32 = 0;

/// 条件评估结果
///
/// `reason_trail` 只用于诊断，不参与控制流
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionOutcome {
    matched: bool,
    reason_trail: Vec<String>,
}

impl ConditionOutcome {
    /// 匹配
    pub fn matched(message: impl Into<String>) -> Self {
        Self {
            matched: true,
            reason_trail: vec![message.into()],
        }
    }

    /// 不匹配
    pub fn no_match(message: impl Into<String>) -> Self {
        Self {
            matched: false,
            reason_trail: vec![message.into()],
        }
    }

    /// 匹配，但不附带说明
    pub fn matched_silently() -> Self {
        Self {
            matched: true,
            reason_trail: Vec::new(),
        }
    }

    /// 是否匹配
    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// 诊断说明
    pub fn reason_trail(&self) -> &[String] {
        &self.reason_trail
    }

    /// 合并另一个结果的说明与匹配状态
    fn and_then(mut self, next: ConditionOutcome) -> Self {
        self.matched = next.matched;
        self.reason_trail.extend(next.reason_trail);
        self
    }
}

impl fmt::Display for ConditionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.matched { "匹配" } else { "不匹配" };
        write!(f, "{}: {}", state, self.reason_trail.join("; "))
    }
}

/// 条件 trait
pub trait Condition {
    /// 条件名称
    fn name(&self) -> &str;

    /// 基于当前注册表内容评估条件
    fn evaluate(&self, registry: &dyn RegistryView) -> ConditionOutcome;

    /// 评估顺序，数值越大越晚评估
    fn order(&self) -> i32 {
        DEFAULT_ORDER
    }
}

/// 短路与组合条件
///
/// 按顺序评估，遇到第一个不匹配即停止
pub struct AllOf {
    name: String,
    conditions: Vec<Box<dyn Condition>>,
}

impl AllOf {
    /// 创建空的组合条件
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
        }
    }

    /// 追加条件
    pub fn and(mut self, condition: impl Condition + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }
}

impl fmt::Debug for AllOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.conditions.iter().map(|c| c.name()).collect();
        f.debug_struct("AllOf")
            .field("name", &self.name)
            .field("conditions", &names)
            .finish()
    }
}

impl Condition for AllOf {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, registry: &dyn RegistryView) -> ConditionOutcome {
        let mut outcome = ConditionOutcome::matched_silently();
        for condition in &self.conditions {
            outcome = outcome.and_then(condition.evaluate(registry));
            if !outcome.is_match() {
                break;
            }
        }
        outcome
    }

    fn order(&self) -> i32 {
        self.conditions
            .iter()
            .map(|c| c.order())
            .max()
            .unwrap_or(DEFAULT_ORDER)
    }
}

/// 要求存在指定名称且类型匹配的组件
#[derive(Debug, Clone)]
pub struct OnComponentCondition {
    type_name: String,
    name: String,
}

impl OnComponentCondition {
    /// 要求存在指定类型与名称的组件
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

impl Condition for OnComponentCondition {
    fn name(&self) -> &str {
        "OnComponent"
    }

    fn evaluate(&self, registry: &dyn RegistryView) -> ConditionOutcome {
        let message = ConditionMessage::for_condition(format!(
            "@ConditionalOnComponent (types: {}; names: {})",
            self.type_name, self.name
        ));
        if registry.names_of_type(&self.type_name).contains(&self.name) {
            ConditionOutcome::matched(message.found("component").items([&self.name]))
        } else {
            ConditionOutcome::no_match(message.did_not_find("component").items([&self.name]))
        }
    }
}

/// 条件说明构建器
#[derive(Debug, Clone)]
pub struct ConditionMessage {
    condition: String,
}

impl ConditionMessage {
    /// 为指定条件开始构建说明
    pub fn for_condition(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
        }
    }

    /// "found ..."
    pub fn found(self, article: &str) -> ItemsBuilder {
        self.found_plural(article, article)
    }

    /// "found ..."，多个条目时使用复数形式
    pub fn found_plural(self, singular: &str, plural: &str) -> ItemsBuilder {
        ItemsBuilder::new(self.condition, "found", singular, plural)
    }

    /// "did not find ..."
    pub fn did_not_find(self, article: &str) -> ItemsBuilder {
        ItemsBuilder::new(self.condition, "did not find", article, article)
    }
}

/// 条目说明构建器
#[derive(Debug, Clone)]
pub struct ItemsBuilder {
    condition: String,
    reason: &'static str,
    singular: String,
    plural: String,
}

impl ItemsBuilder {
    fn new(condition: String, reason: &'static str, singular: &str, plural: &str) -> Self {
        Self {
            condition,
            reason,
            singular: singular.to_string(),
            plural: plural.to_string(),
        }
    }

    /// 不列出具体条目
    pub fn at_all(self) -> Message {
        self.render(Vec::new())
    }

    /// 列出条目
    pub fn items<I, S>(self, items: I) -> Message
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = items.into_iter().map(|s| s.as_ref().to_string()).collect();
        self.render(items)
    }

    /// 列出加引号的条目
    pub fn items_quoted<I, S>(self, items: I) -> Message
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = items
            .into_iter()
            .map(|s| format!("'{}'", s.as_ref()))
            .collect();
        self.render(items)
    }

    fn render(self, items: Vec<String>) -> Message {
        let article = if items.len() <= 1 {
            &self.singular
        } else {
            &self.plural
        };
        let mut text = format!("{} {} {}", self.condition, self.reason, article);
        if !items.is_empty() {
            text.push(' ');
            text.push_str(&items.join(", "));
        }
        Message(text)
    }
}

/// 条件说明文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(String);

impl Message {
    /// 追加说明
    pub fn append(self, text: &str) -> Self {
        Message(format!("{} {}", self.0, text))
    }

    /// 消息文本
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Message> for String {
    fn from(message: Message) -> Self {
        message.0
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! 组件扫描器抽象接口
//!
//! 扫描器按根路径枚举候选组件，只返回携带已识别标记的候选

use infrastructure_common::{CandidateUnit, MarkerKind};
use std::collections::BTreeSet;

/// 候选组件迭代器
pub type CandidateIter<'a> = Box<dyn Iterator<Item = CandidateUnit> + 'a>;

/// 组件扫描器 trait
///
/// 每次调用都返回一个新的、有限的惰性序列
pub trait CandidateScanner {
    /// 扫描指定根路径下满足过滤条件的候选组件
    fn scan<'a>(&'a self, root: &'a str, filter: &'a MarkerFilter) -> CandidateIter<'a>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

/// 标记过滤器
///
/// 所有处理器识别条件的并集
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerFilter {
    markers: BTreeSet<MarkerKind>,
}

impl MarkerFilter {
    /// 创建空的过滤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加标记
    pub fn include(mut self, marker: MarkerKind) -> Self {
        self.markers.insert(marker);
        self
    }

    /// 检查候选组件是否携带任一已包含的标记
    pub fn matches(&self, candidate: &CandidateUnit) -> bool {
        self.markers.contains(&candidate.marker)
    }

    /// 包含的标记
    pub fn markers(&self) -> impl Iterator<Item = MarkerKind> + '_ {
        self.markers.iter().copied()
    }

    /// 是否不包含任何标记
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl FromIterator<MarkerKind> for MarkerFilter {
    fn from_iter<I: IntoIterator<Item = MarkerKind>>(iter: I) -> Self {
        Self {
            markers: iter.into_iter().collect(),
        }
    }
}

/// 检查类型路径是否位于指定根路径之下
///
/// `app::web::Hello` 位于 `app` 与 `app::web` 之下，不位于 `app::we` 之下
pub fn is_under_root(type_name: &str, root: &str) -> bool {
    let namespace = infrastructure_common::namespace_of(type_name);
    if root.is_empty() {
        return true;
    }
    namespace == root
        || namespace
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with(infrastructure_common::PATH_SEPARATOR))
}

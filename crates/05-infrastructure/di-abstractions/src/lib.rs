//! # Dependency Injection Abstractions
//!
//! 组件注册引擎的抽象层，定义注册表、扫描器、条件与运行环境的接口。
//!
//! ## 核心接口
//!
//! - [`RegistryView`] - 注册表只读视图
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`CandidateScanner`] - 候选组件扫描器接口
//! - [`Condition`] - 注册条件接口
//! - [`WebEnvironment`] - 运行环境前置条件

pub mod condition;
pub mod environment;
pub mod registry;
pub mod scanner;

pub use condition::*;
pub use environment::*;
pub use registry::*;
pub use scanner::*;

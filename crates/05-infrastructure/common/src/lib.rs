//! # Infrastructure Common
//!
//! 组件注册引擎的公共类型。
//!
//! ## 核心类型
//!
//! - [`ComponentDescriptor`] - 注册表中的组件描述符
//! - [`TypeTag`] - 组件类型及其可赋值的父类型
//! - [`CandidateUnit`] - 扫描发现的候选组件
//! - [`EngineSettings`] - 启动流程使用的配置
//! - [`ComponentError`] - 组件注册错误

pub mod component;
pub mod configuration;
pub mod errors;
pub mod metadata;

pub use component::*;
pub use configuration::*;
pub use errors::*;
pub use metadata::*;

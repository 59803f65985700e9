//! 运行环境抽象接口

/// 运行环境 trait
///
/// 提供注册流程的环境前置条件
pub trait WebEnvironment {
    /// 是否为尚未绑定服务端口的 Web 上下文
    ///
    /// 只有在这种上下文中才执行组件扫描，避免启动前后两个阶段重复发现
    fn is_headless_web_context(&self) -> bool;
}

impl<T: WebEnvironment + ?Sized> WebEnvironment for &T {
    fn is_headless_web_context(&self) -> bool {
        (**self).is_headless_web_context()
    }
}

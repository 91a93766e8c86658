use crate::validation::Validate;
use std::any::Any;

/// 可被中介者分发的请求
///
/// 命令与查询只是约定上的区分：命令通常以 `()` 作为响应，查询返回视图数据。
/// 每个请求类型在中介者中最多对应一个处理器，以请求的具体类型作为路由键。
///
/// ```rust
/// use mediator_application::request::Request;
///
/// struct Ping;
///
/// impl Request for Ping {
///     const NAME: &'static str = "Ping";
///     type Response = &'static str;
/// }
/// ```
pub trait Request: Send + Sync + 'static {
    /// 请求名称，用于日志与错误信息
    const NAME: &'static str;

    type Response: Send + 'static;

    /// 自校验请求返回 `Some(self)`
    fn as_validate(&self) -> Option<&dyn Validate> {
        None
    }
}

/// 类型擦除后的请求视图，供行为链在不知道具体类型的情况下访问
pub trait DynRequest: Send + Sync {
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn validation(&self) -> Option<&dyn Validate>;
}

impl<R: Request> DynRequest for R {
    fn name(&self) -> &'static str {
        R::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn validation(&self) -> Option<&dyn Validate> {
        Request::as_validate(self)
    }
}

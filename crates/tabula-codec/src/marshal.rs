//! 顶层便捷入口：进程级默认注册中心与 `marshal`/`unmarshal`。

use alloc::string::String;
use core::any::Any;

use spin::Once;

use crate::error::CodecError;
use crate::registry::Registry;

static DEFAULT_REGISTRY: Once<Registry> = Once::new();

/// 返回进程级默认注册中心，首次访问时以全部内建标量初始化。
///
/// # 设计背景（Why）
/// - 顶层 [`marshal`]/[`unmarshal`] 以及 [`crate::context::Context::new`]
///   需要一个众所周知的查找起点；以显式单例实现，避免隐式线程局部状态。
///
/// # 并发契约（What）
/// - 初始化由 [`spin::Once`] 保证恰好发生一次，之后的访问无锁；
/// - 向默认注册中心追加用户注册属于**构造阶段**行为：须在任何并发使用开始前、
///   由单一线程完成（与 [`Registry`] 的阶段契约一致）。
pub fn default_registry() -> &'static Registry {
    DEFAULT_REGISTRY.call_once(Registry::with_builtin_scalars)
}

/// 查询默认注册中心，将 `value` 编码为文本。
///
/// # 契约说明（What）
/// - 以 `T` 的静态类型为键解析编码器（显式注册优先，底层标量别名次之）；
/// - 查找失败返回 `codec.no_coder`；编码器自身的错误原样传播。
///
/// # 示例（Examples）
/// ```rust
/// assert_eq!(tabula_codec::marshal(&-7i64).unwrap(), "-7");
/// assert_eq!(tabula_codec::marshal(&true).unwrap(), "true");
/// ```
pub fn marshal<T>(value: &T) -> Result<String, CodecError>
where
    T: Any + Send + Sync,
{
    default_registry().marshal(value)
}

/// 查询默认注册中心，将 `text` 解码写入调用方提供的存储。
///
/// # 契约说明（What）
/// - 以出参的指向类型为键解析解码器，回退规则与 [`marshal`] 对称；
/// - 内建解码器仅在成功路径写入 `out`，失败时 `out` 保持调用前的值；
///   用户解码器的写入纪律由其自身实现约定。
///
/// # 示例（Examples）
/// ```rust
/// let mut count = 0i64;
/// tabula_codec::unmarshal("-7", &mut count).unwrap();
/// assert_eq!(count, -7);
/// ```
pub fn unmarshal<T>(text: &str, out: &mut T) -> Result<(), CodecError>
where
    T: Any + Send + Sync,
{
    default_registry().unmarshal(text, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;

    struct NoCoderHere;

    #[test]
    fn default_registry_is_a_stable_singleton() {
        // Why: 顶层入口与上下文都依赖同一实例，多次访问必须返回同一地址。
        assert!(core::ptr::eq(default_registry(), default_registry()));
    }

    #[test]
    fn marshal_round_trips_builtin_scalar() {
        assert_eq!(marshal(&-7i64).unwrap(), "-7");
        let mut decoded = 0i64;
        unmarshal("-7", &mut decoded).unwrap();
        assert_eq!(decoded, -7);
    }

    #[test]
    fn unresolved_type_reports_no_coder() {
        let err = marshal(&NoCoderHere).expect_err("no coder");
        assert_eq!(err.code(), codes::CODEC_NO_CODER);

        let mut out = NoCoderHere;
        let err = unmarshal("anything", &mut out).expect_err("no coder");
        assert_eq!(err.code(), codes::CODEC_NO_CODER);
    }
}

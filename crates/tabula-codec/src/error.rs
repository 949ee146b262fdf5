//! 编解码错误域：稳定错误码 + 人类可读消息 + 底层原因链。

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use core::fmt;

use crate::key::TypeKey;

/// 错误链中底层原因的统一盒装形态。
///
/// # 契约说明（What）
/// - 要求 `Send + Sync + 'static`，以便错误跨线程传递并进入上层聚合管线；
/// - 采用 [`core::error::Error`] 作为链路抽象，`no_std + alloc` 环境同样可用，
///   且与 `thiserror` 等生态派生宏直接兼容。
pub type ErrorCause = Box<dyn core::error::Error + Send + Sync + 'static>;

/// `CodecError` 表示编解码核心的稳定错误域，是所有可观察错误的最终形态。
///
/// # 设计背景（Why）
/// - 注册中心、内建标量编解码器与用户自定义编解码器在不同层次产生的故障，
///   需要合流为统一的错误码，以便日志、指标与上层治理系统执行精确分类；
/// - 核心需兼容 `no_std + alloc` 场景，因此错误链基于 [`core::error::Error`] 而非 `std`。
///
/// # 逻辑解析（How）
/// - 结构体以 Builder 风格方法叠加底层原因，并通过 `source()` 暴露完整链路；
/// - 错误码 `code` 始终为 `'static` 字符串，承载稳定语义；`message` 面向排障人员，
///   在适用场景下携带触发错误的原始输入。
///
/// # 契约说明（What）
/// - **前置条件**：调用方必须使用 [`codes`] 模块或遵循 `<域>.<语义>` 约定的自定义码值；
/// - **返回值**：构造函数返回拥有所有权的 `CodecError`，可安全跨线程移动（`Send + Sync + 'static`）；
/// - **传播承诺**：用户编解码器返回的 `CodecError` 原样穿透注册中心，框架不吞并、不改写。
///
/// # 设计取舍与风险（Trade-offs）
/// - 采用 `Cow<'static, str>` 保存消息，静态文案零分配，动态文案仅一次堆分配；
/// - 错误码与消息分离，避免调用方通过解析自然语言推断语义。
#[derive(Debug)]
pub struct CodecError {
    code: &'static str,
    message: Cow<'static, str>,
    cause: Option<ErrorCause>,
}

impl CodecError {
    /// 构造编解码错误。
    ///
    /// # 契约说明（What）
    /// - **输入参数**：
    ///   - `code`：遵循 `<域>.<语义>` 约定的稳定错误码，推荐取自 [`codes`]；
    ///   - `message`：面向排障人员的描述，可为 `&'static str` 或堆分配字符串；
    /// - **后置条件**：返回的错误默认不含底层原因，可通过 [`with_cause`](Self::with_cause) 补充。
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// 附带底层原因并返回新的错误。
    pub fn with_cause(mut self, cause: impl core::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// 获取稳定错误码。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 获取人类可读消息。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取底层原因（若有）。
    pub fn cause(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn core::error::Error + 'static))
    }

    /// 构造“查无编解码器”错误，消息携带目标类型名。
    pub(crate) fn no_coder(key: TypeKey) -> Self {
        Self::new(
            codes::CODEC_NO_CODER,
            format!("no coder registered for `{}`", key.name()),
        )
    }

    /// 构造对象层下转型失败错误，消息同时指明期望与实际类型。
    pub(crate) fn type_mismatch(expected: TypeKey, actual: TypeKey) -> Self {
        Self::new(
            codes::CODEC_TYPE_MISMATCH,
            format!(
                "expected value of type `{}`, got `{}`",
                expected.name(),
                actual.name()
            ),
        )
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl core::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.cause()
    }
}

/// 框架内置的错误码常量集合，确保可观测性系统具有稳定识别符。
///
/// # 设计背景（Why）
/// - 错误码遵循 `<域>.<语义>` 命名约定，方便在跨组件日志中检索与聚合；
/// - 调用方收到这些错误码后，可据此区分“输入不可解析”“数值越界”“注册缺失”等处置路径，
///   无需解析消息文本。
///
/// # 契约说明（What）
/// - 码值一经发布即保持稳定；新增语义只追加新常量，不复用既有码值。
pub mod codes {
    /// 查找（含底层标量回退）未命中任何编解码器。
    pub const CODEC_NO_CODER: &str = "codec.no_coder";
    /// 解码输入无法按目标类型的文本形式解析。
    pub const CODEC_PARSE: &str = "codec.parse";
    /// 数值解析成功但超出目标宽度的可表示范围。
    pub const CODEC_VALUE_OUT_OF_RANGE: &str = "codec.value_out_of_range";
    /// 布尔解码输入不属于受支持的字面量集合。
    pub const CODEC_UNSUPPORTED_VALUE: &str = "codec.unsupported_value";
    /// 对象层传入的值与注册键的静态类型不一致。
    pub const CODEC_TYPE_MISMATCH: &str = "codec.type_mismatch";
    /// 别名注册指向的底层类型不是受认可的内建标量。
    pub const CODEC_ALIAS_TARGET: &str = "codec.alias_target";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("backing store unavailable")]
    struct BackingStoreError;

    #[test]
    fn display_carries_message_and_code() {
        // Why: 排障人员依赖 Display 同时看到语义描述与稳定码值。
        let err = CodecError::new(codes::CODEC_PARSE, "integer literal `x7` is malformed");
        assert_eq!(
            alloc::format!("{err}"),
            "integer literal `x7` is malformed (codec.parse)"
        );
    }

    #[test]
    fn cause_chain_is_reachable_via_source() {
        // Why: 用户编解码器常以 thiserror 派生自有错误，链路必须可经 `source()` 回溯。
        let err = CodecError::new(codes::CODEC_PARSE, "decode failed").with_cause(BackingStoreError);
        let source = core::error::Error::source(&err).expect("cause present");
        assert_eq!(alloc::format!("{source}"), "backing store unavailable");
    }
}

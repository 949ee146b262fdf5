//! 注册中心：类型键到编解码函数对的分发表，含底层标量别名回退。

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;

use spin::RwLock;

use crate::coder::{self, CoderPair, DecodeCoder, EncodeCoder, ErasedDecode, ErasedEncode};
use crate::context::Context;
use crate::error::{CodecError, codes};
use crate::key::TypeKey;
use crate::scalar;
use crate::value::DynValue;

/// 别名桥接的编码方向：先重释为底层标量，再交由其 trampoline。
type EncodeBridge =
    dyn Fn(&Context<'_>, &dyn DynValue, &ErasedEncode) -> Result<String, CodecError> + Send + Sync;

/// 别名桥接的解码方向：底层标量先解入临时量，再重释写回调用方存储。
type DecodeBridge = dyn Fn(&Context<'_>, &str, &mut dyn DynValue, &ErasedDecode) -> Result<(), CodecError>
    + Send
    + Sync;

/// 别名登记项：目标标量键 + 双向重释桥接。
#[derive(Clone)]
struct AliasCoder {
    target: TypeKey,
    encode_bridge: Arc<EncodeBridge>,
    decode_bridge: Arc<DecodeBridge>,
}

#[derive(Default)]
struct RegistryState {
    coders: BTreeMap<TypeKey, CoderPair>,
    aliases: BTreeMap<TypeKey, AliasCoder>,
}

/// `Registry` 维护类型键到编解码函数对的映射，并负责带回退语义的查找。
///
/// # 设计初衷（Why）
/// - 模式推断与代码生成两个上游以异构标量值为最小单元，需要一个可扩展的
///   “类型 → (编码, 解码)” 分发点，而非散落各处的 `match`；
/// - 用户自定义标量（底层表示为某内建标量的新类型）应当在未显式注册时
///   自动回退到底层标量的编解码器，避免逐一手写样板。
///
/// # 行为逻辑（How）
/// 1. `register` 在单态化点捕获类型键，存入归一化后的函数对，重复注册静默覆盖；
/// 2. `register_alias` 登记“新类型 ↔ 底层标量”的双向重释函数；
/// 3. `encoder`/`decoder` 先查显式表（显式注册优先于一切回退），未命中再经
///    别名表桥接底层标量的函数对，两者皆空则返回 `None`。
///
/// # 并发与生命周期契约
/// - **构造阶段**：单线程完成全部 `register*` 调用；
/// - **使用阶段**：任意线程并发调用查找与编解码入口；
/// - 内部 [`spin::RwLock`] 保证跨阶段调用依旧内存安全，但“使用阶段再注册”
///   属于契约外行为，需要调用方自行串行化；
/// - 函数对注册后不再变更；查找返回的包装对象克隆 `Arc` 句柄，不借用锁。
///
/// # 契约说明（What）
/// - **后置条件**：`encoder`/`decoder` 返回 `Some` 即可直接调用，无需再次判空；
/// - **错误语义**：查找本身不报错，`None` 表示“无显式注册且无可用回退”。
pub struct Registry {
    state: RwLock<RegistryState>,
}

impl Registry {
    /// 构造空注册中心。
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// 构造已预置全部内建标量编解码器的注册中心。
    ///
    /// # 语义说明
    /// - 进程级默认注册中心即由本入口构造；需要隔离环境的测试同样复用它。
    pub fn with_builtin_scalars() -> Self {
        let registry = Self::new();
        scalar::register_builtin_scalars(&registry);
        registry
    }

    /// 注册 `T` 的编解码函数对，重复注册以后写覆盖先写且不报错。
    ///
    /// # 契约说明（What）
    /// - 签名校验已由 [`EncodeCoder`]/[`DecodeCoder`] 的构造函数在编译期完成，
    ///   本入口不存在运行时拒绝路径；
    /// - **前置条件**：处于构造阶段（见类型级并发契约）；
    /// - **后置条件**：`TypeKey::of::<T>()` 的后续查找命中新函数对。
    pub fn register<T>(&self, encode: EncodeCoder<T>, decode: DecodeCoder<T>)
    where
        T: Any + Send + Sync,
    {
        let key = TypeKey::of::<T>();
        let pair = CoderPair::from_parts(encode, decode);
        self.state.write().coders.insert(key, pair);
    }

    /// 登记用户标量 `U` 与其底层内建标量 `P` 的别名关系。
    ///
    /// # 设计初衷（Why）
    /// - 宿主语言不存在内建的“底层类型”关系，因此以显式注册替代结构性发现：
    ///   调用方提供两个重释函数，声明 `U` 的存储表示即 `P`。
    ///
    /// # 行为逻辑（How）
    /// - 编码方向：`U` 值经 `into_base` 重释为 `P` 后交给 `P` 的编码器；
    /// - 解码方向：`P` 的解码器先解入 `P::default()` 临时量，再经 `from_base`
    ///   重释写入调用方的 `U` 存储；
    /// - 桥接在查找时与 `P` 当期注册的函数对组合，`P` 被覆盖注册后别名自动跟随。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：`P` 必须属于受认可的内建标量集合，否则返回
    ///   [`codes::CODEC_ALIAS_TARGET`]；
    /// - **后置条件**：`U` 无显式注册时，其查找经本别名回退成功；
    ///   显式注册始终优先于别名（保留用户意图）。
    pub fn register_alias<U, P>(
        &self,
        into_base: impl Fn(&U) -> P + Send + Sync + 'static,
        from_base: impl Fn(P) -> U + Send + Sync + 'static,
    ) -> Result<(), CodecError>
    where
        U: Any + Send + Sync,
        P: Any + Send + Sync + Default,
    {
        let key = TypeKey::of::<U>();
        let target = TypeKey::of::<P>();
        if !scalar::is_builtin_scalar(target) {
            return Err(CodecError::new(
                codes::CODEC_ALIAS_TARGET,
                format!(
                    "alias target `{}` for `{}` is not a built-in scalar",
                    target.name(),
                    key.name()
                ),
            ));
        }

        let encode_bridge: Arc<EncodeBridge> = Arc::new(move |ctx, value, base| {
            let typed = coder::downcast_ref::<U>(value)?;
            let base_value = into_base(typed);
            base(ctx, &base_value)
        });
        let decode_bridge: Arc<DecodeBridge> = Arc::new(move |ctx, text, out, base| {
            let mut scratch = P::default();
            base(ctx, text, &mut scratch)?;
            let typed = coder::downcast_mut::<U>(out)?;
            *typed = from_base(scratch);
            Ok(())
        });

        self.state.write().aliases.insert(
            key,
            AliasCoder {
                target,
                encode_bridge,
                decode_bridge,
            },
        );
        Ok(())
    }

    /// 解析 `key` 的编码器：显式注册优先，其次别名回退，两者皆空返回 `None`。
    pub fn encoder(&self, key: TypeKey) -> Option<TextEncoder> {
        let state = self.state.read();
        if let Some(pair) = state.coders.get(&key) {
            return Some(TextEncoder {
                key,
                run: Arc::clone(&pair.encode),
            });
        }
        let alias = state.aliases.get(&key)?;
        let base = state.coders.get(&alias.target)?;
        let bridge = Arc::clone(&alias.encode_bridge);
        let base_run = Arc::clone(&base.encode);
        Some(TextEncoder {
            key,
            run: Arc::new(move |ctx, value| bridge(ctx, value, base_run.as_ref())),
        })
    }

    /// 解析 `key` 的解码器，回退规则与 [`encoder`](Self::encoder) 对称。
    pub fn decoder(&self, key: TypeKey) -> Option<TextDecoder> {
        let state = self.state.read();
        if let Some(pair) = state.coders.get(&key) {
            return Some(TextDecoder {
                key,
                run: Arc::clone(&pair.decode),
            });
        }
        let alias = state.aliases.get(&key)?;
        let base = state.coders.get(&alias.target)?;
        let bridge = Arc::clone(&alias.decode_bridge);
        let base_run = Arc::clone(&base.decode);
        Some(TextDecoder {
            key,
            run: Arc::new(move |ctx, text, out| bridge(ctx, text, out, base_run.as_ref())),
        })
    }

    /// 仅返回为 `key` 显式注册的函数对，不应用任何回退。
    ///
    /// # 语义说明
    /// - 测试与自省场景使用：克隆出的句柄携带注册时的风味标签。
    pub fn explicit(&self, key: TypeKey) -> Option<CoderPair> {
        self.state.read().coders.get(&key).cloned()
    }

    /// 泛型便捷层：将 `value` 编码为文本，查找失败报 `codec.no_coder`。
    pub fn marshal<T>(&self, value: &T) -> Result<String, CodecError>
    where
        T: Any + Send + Sync,
    {
        let key = TypeKey::of::<T>();
        let encoder = self.encoder(key).ok_or_else(|| CodecError::no_coder(key))?;
        encoder.encode_text(&Context::bound(self), value)
    }

    /// 泛型便捷层：将 `text` 解码入调用方存储，查找失败报 `codec.no_coder`。
    pub fn unmarshal<T>(&self, text: &str, out: &mut T) -> Result<(), CodecError>
    where
        T: Any + Send + Sync,
    {
        let key = TypeKey::of::<T>();
        let decoder = self.decoder(key).ok_or_else(|| CodecError::no_coder(key))?;
        decoder.decode_text(&Context::bound(self), text, out)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// `TextEncoder` 是绑定到单个函数对的稳定编码入口。
///
/// # 契约说明（What）
/// - 由 [`Registry::encoder`] 构造，内部仅持有 `Arc` 句柄，不借用注册中心的锁；
/// - 递归编码在本类型上发生：用户编码器可经
///   `ctx.registry().encoder(sub_key)` 为子值求取编码器后继续调用。
#[derive(Clone)]
pub struct TextEncoder {
    key: TypeKey,
    run: Arc<ErasedEncode>,
}

impl TextEncoder {
    /// 返回绑定的类型键。
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// 对象层编码入口：值的动态类型须与绑定键一致。
    pub fn encode_text(&self, ctx: &Context<'_>, value: &dyn DynValue) -> Result<String, CodecError> {
        (self.run)(ctx, value)
    }

    /// 泛型层编码入口，等价于 [`encode_text`](Self::encode_text) 的类型安全包装。
    pub fn encode<T>(&self, ctx: &Context<'_>, value: &T) -> Result<String, CodecError>
    where
        T: Any + Send + Sync,
    {
        self.encode_text(ctx, value)
    }
}

/// `TextDecoder` 是绑定到单个函数对的稳定解码入口。
///
/// # 契约说明（What）
/// - 解码经 `out` 写入调用方自有存储；本类型与底层函数均不在调用结束后保留该引用。
#[derive(Clone)]
pub struct TextDecoder {
    key: TypeKey,
    run: Arc<ErasedDecode>,
}

impl TextDecoder {
    /// 返回绑定的类型键。
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// 对象层解码入口：出参的动态类型须与绑定键一致。
    pub fn decode_text(
        &self,
        ctx: &Context<'_>,
        text: &str,
        out: &mut dyn DynValue,
    ) -> Result<(), CodecError> {
        (self.run)(ctx, text, out)
    }

    /// 泛型层解码入口，等价于 [`decode_text`](Self::decode_text) 的类型安全包装。
    pub fn decode<T>(&self, ctx: &Context<'_>, text: &str, out: &mut T) -> Result<(), CodecError>
    where
        T: Any + Send + Sync,
    {
        self.decode_text(ctx, text, out)
    }
}

//! 编解码函数的签名风味、类型擦除 trampoline 与成对存储。

use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;
use core::marker::PhantomData;

use crate::context::Context;
use crate::error::CodecError;
use crate::key::TypeKey;
use crate::value::DynValue;

/// 编解码函数的签名风味。
///
/// # 设计背景（Why）
/// - 简单标量的编解码器不关心调用上下文，强制所有实现者接收 [`Context`] 会徒增样板；
/// - 递归编码器（如列表、嵌套记录）则必须经由上下文取得注册中心与缩进等调用态；
/// - 两种风味在注册时被归一化为统一的内部调用约定，调用期不再做风味分发，
///   此标签仅作为注册元数据保留，供 `explicit` 自省与测试断言。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoderFlavor {
    /// 朴素风味：不接收上下文。
    Plain,
    /// 上下文风味：首参为 [`Context`]。
    Contextual,
}

/// 归一化后的编码 trampoline：统一接收上下文与对象层值。
pub(crate) type ErasedEncode =
    dyn Fn(&Context<'_>, &dyn DynValue) -> Result<String, CodecError> + Send + Sync;

/// 归一化后的解码 trampoline：统一接收上下文、文本与对象层出参。
pub(crate) type ErasedDecode =
    dyn Fn(&Context<'_>, &str, &mut dyn DynValue) -> Result<(), CodecError> + Send + Sync;

/// 将对象层值还原为 `&T`，失败时返回 `codec.type_mismatch`。
pub(crate) fn downcast_ref<T: Any>(value: &dyn DynValue) -> Result<&T, CodecError> {
    let actual = value.type_key();
    value
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| CodecError::type_mismatch(TypeKey::of::<T>(), actual))
}

/// 将对象层出参还原为 `&mut T`，失败时返回 `codec.type_mismatch`。
pub(crate) fn downcast_mut<T: Any>(value: &mut dyn DynValue) -> Result<&mut T, CodecError> {
    let actual = DynValue::type_key(&*value);
    value
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or_else(|| CodecError::type_mismatch(TypeKey::of::<T>(), actual))
}

/// `EncodeCoder<T>` 承载一个已归一化的编码函数及其风味标签。
///
/// # 设计初衷（Why）
/// - 注册签名校验在本类型的构造函数处由编译器完成：只有两种受认可的函数形状
///   能构造出实例，不存在“运行时拒绝畸形签名”的路径；
/// - 构造时立即生成类型擦除 trampoline，注册中心无需了解 `T` 即可存储与调用。
///
/// # 行为逻辑（How）
/// - [`plain`](Self::plain) 包装 `Fn(&T) -> Result<String, _>`，trampoline 忽略上下文；
/// - [`contextual`](Self::contextual) 包装 `Fn(&Context, &T) -> Result<String, _>`；
/// - 两者都先做下转型还原具体类型，再调用用户函数。
///
/// # 契约说明（What）
/// - **后置条件**：trampoline 满足 `Send + Sync + 'static`，可存入进程级注册中心；
/// - 用户函数返回的错误原样向上传播，框架不改写。
pub struct EncodeCoder<T> {
    pub(crate) run: Arc<ErasedEncode>,
    pub(crate) flavor: CoderFlavor,
    _marker: PhantomData<fn(&T)>,
}

impl<T> EncodeCoder<T>
where
    T: Any + Send + Sync,
{
    /// 包装朴素风味编码函数。
    pub fn plain<F>(encode: F) -> Self
    where
        F: Fn(&T) -> Result<String, CodecError> + Send + Sync + 'static,
    {
        let run: Arc<ErasedEncode> = Arc::new(move |_ctx, value| {
            let typed = downcast_ref::<T>(value)?;
            encode(typed)
        });
        Self {
            run,
            flavor: CoderFlavor::Plain,
            _marker: PhantomData,
        }
    }

    /// 包装上下文风味编码函数。
    pub fn contextual<F>(encode: F) -> Self
    where
        F: Fn(&Context<'_>, &T) -> Result<String, CodecError> + Send + Sync + 'static,
    {
        let run: Arc<ErasedEncode> = Arc::new(move |ctx, value| {
            let typed = downcast_ref::<T>(value)?;
            encode(ctx, typed)
        });
        Self {
            run,
            flavor: CoderFlavor::Contextual,
            _marker: PhantomData,
        }
    }
}

/// `DecodeCoder<T>` 承载一个已归一化的解码函数及其风味标签。
///
/// # 契约说明（What）
/// - 解码方向经 `&mut T` 写入调用方自有存储；trampoline 在调用返回后不保留该引用，
///   借用规则使违反该约束的实现无法通过编译；
/// - 其余约定与 [`EncodeCoder`] 对称。
pub struct DecodeCoder<T> {
    pub(crate) run: Arc<ErasedDecode>,
    pub(crate) flavor: CoderFlavor,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T> DecodeCoder<T>
where
    T: Any + Send + Sync,
{
    /// 包装朴素风味解码函数。
    pub fn plain<F>(decode: F) -> Self
    where
        F: Fn(&str, &mut T) -> Result<(), CodecError> + Send + Sync + 'static,
    {
        let run: Arc<ErasedDecode> = Arc::new(move |_ctx, text, out| {
            let typed = downcast_mut::<T>(out)?;
            decode(text, typed)
        });
        Self {
            run,
            flavor: CoderFlavor::Plain,
            _marker: PhantomData,
        }
    }

    /// 包装上下文风味解码函数。
    pub fn contextual<F>(decode: F) -> Self
    where
        F: Fn(&Context<'_>, &str, &mut T) -> Result<(), CodecError> + Send + Sync + 'static,
    {
        let run: Arc<ErasedDecode> = Arc::new(move |ctx, text, out| {
            let typed = downcast_mut::<T>(out)?;
            decode(ctx, text, typed)
        });
        Self {
            run,
            flavor: CoderFlavor::Contextual,
            _marker: PhantomData,
        }
    }
}

/// `CoderPair` 是注册中心为单个类型键存储的编码/解码函数对。
///
/// # 契约说明（What）
/// - 成对存储归一化后的 trampoline 与双向风味标签；
/// - 注册后不可变：克隆仅复制 `Arc` 句柄，调用期零锁；
/// - 允许双向风味混搭（朴素编码搭配上下文解码等）。
#[derive(Clone)]
pub struct CoderPair {
    pub(crate) encode: Arc<ErasedEncode>,
    pub(crate) decode: Arc<ErasedDecode>,
    encode_flavor: CoderFlavor,
    decode_flavor: CoderFlavor,
}

impl CoderPair {
    pub(crate) fn from_parts<T>(encode: EncodeCoder<T>, decode: DecodeCoder<T>) -> Self {
        Self {
            encode: encode.run,
            decode: decode.run,
            encode_flavor: encode.flavor,
            decode_flavor: decode.flavor,
        }
    }

    /// 返回编码方向的注册风味。
    pub fn encode_flavor(&self) -> CoderFlavor {
        self.encode_flavor
    }

    /// 返回解码方向的注册风味。
    pub fn decode_flavor(&self) -> CoderFlavor {
        self.decode_flavor
    }
}

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![allow(private_bounds)]
#![warn(missing_docs)]

//! `tabula-codec` 提供类型标签驱动的文本标量编解码注册中心。
//!
//! # 教案背景（Why）
//! - 模式推断需要逐列尝试“该文本能否按候选标量解析”，转换器生成需要把字面默认值
//!   格式化为源码文本；两者共享同一套“类型 → (编码, 解码)”映射，本 crate 即该映射的
//!   唯一权威实现；
//! - 将分发收敛到注册中心而非散落的 `match`，使用户自定义标量（底层表示为某内建
//!   标量的新类型）能以一次注册或一次别名登记接入全部上游。
//!
//! # 使用概览（How）
//! - 顶层 [`marshal`]/[`unmarshal`] 查询进程级默认注册中心，覆盖内建标量的常规场景；
//! - 需要隔离环境或自定义映射时，构造 [`Registry`] 并经 [`Context::bound`] 绑定；
//! - 递归编码器经 [`Context::registry`] 为子值求取编码器，并以
//!   [`Context::with_value`] 派生携带缩进等调用态的子上下文。
//!
//! # 合约说明（What）
//! - 内建标量的文本形式是跨实现的固定契约：整数十进制最简、浮点定点六位小数、
//!   布尔小写单词、文本恒等；
//! - 所有错误携带 `codec.*` 稳定错误码（见 [`error::codes`]），用户编解码器返回的
//!   错误原样穿透；
//! - 注册中心遵循“构造阶段单线程写、使用阶段任意并发读”的阶段契约。
//!
//! # 风险提示与后续（Trade-offs）
//! - 浮点的定点六位小数形式对极大数量级有损，往返相等性以该舍入为模；
//! - 本 crate 不拥有任何文件、网络或命令行表面，宿主系统自行负责 I/O 与观测聚合。

extern crate alloc;

mod scalar;
mod sealed;

pub mod coder;
pub mod context;
pub mod error;
pub mod key;
pub mod marshal;
pub mod prelude;
pub mod registry;
pub mod value;

pub use coder::{CoderFlavor, CoderPair, DecodeCoder, EncodeCoder};
pub use context::Context;
pub use error::{CodecError, ErrorCause, codes};
pub use key::TypeKey;
pub use marshal::{default_registry, marshal, unmarshal};
pub use registry::{Registry, TextDecoder, TextEncoder};
pub use value::DynValue;

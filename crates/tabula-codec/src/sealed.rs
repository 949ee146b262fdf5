//! 内部 sealed 模块用于控制外部扩展边界。
//!
//! # 设计背景（Why）
//! - `tabula-codec` 对外暴露可在对象层实现的 Trait（如 [`crate::value::DynValue`]），
//!   需要在 SemVer 框架下保持未来演进空间。
//! - 通过统一的 `Sealed` 标记，我们能够在不破坏公开 API 的情况下，为 Trait 增加默认方法或强化约束。
//!
//! # 逻辑解析（How）
//! - 定义私有模块级 Trait `Sealed`，并对所有类型提供 blanket 实现。
//! - 对外可见的 Trait 通过 `: crate::sealed::Sealed` 间接依赖该标记，确保调用方无法绕过框架的演化控制。
//!
//! # 契约说明（What）
//! - `Sealed` 无需调用方显式实现；任意类型默认满足该约束。
//! - 公共 Trait 要求的前置条件、返回契约仍在各自定义处描述，此模块仅负责封装“实现许可”。
pub(crate) trait Sealed {}

impl<T: ?Sized> Sealed for T {}

//! 对象层值抽象：类型擦除后仍携带类型键的值视图。

use core::any::Any;

use crate::key::TypeKey;
use crate::sealed::Sealed;

/// `DynValue` 为对象层提供“带类型键的类型擦除值”接口。
///
/// # 设计初衷（Why）
/// - 注册中心按 [`TypeKey`] 分发，而递归编码场景（如列表编码器逐元素求取子编码器）
///   需要在不知道具体泛型的情况下携带异构元素；
/// - 裸 `dyn Any` 只保留 `TypeId`，丢失诊断所需的类型名；本 Trait 在擦除边界同时
///   保留两者，与泛型层在功能上保持等价。
///
/// # 行为逻辑（How）
/// - `type_key` 由 blanket 实现于单态化点捕获，无需手工实现；
/// - `as_any` / `as_any_mut` 暴露下转型入口，供编解码 trampoline 还原具体类型；
/// - 解码方向通过 `&mut dyn DynValue` 写入调用方自有存储，借用规则保证回调
///   无法在调用结束后继续持有该引用。
///
/// # 契约说明（What）
/// - 任意 `T: Any + Send + Sync` 自动获得实现，调用方不应（也不能）手工实现本 Trait；
/// - **注意**：`Box<dyn DynValue>` 自身也满足实现条件，经由智能指针调用 `type_key`
///   时请先 `as_ref()` 解引用到内部值，否则得到的是盒子类型的键。
pub trait DynValue: Any + Send + Sync + Sealed {
    /// 返回被擦除值的静态类型键。
    fn type_key(&self) -> TypeKey;

    /// 以 `dyn Any` 视图暴露只读引用，供下转型还原具体类型。
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// 以 `dyn Any` 视图暴露可变引用，供解码方向写入调用方存储。
    fn as_any_mut(&mut self) -> &mut (dyn Any + Send + Sync);
}

impl<T> DynValue for T
where
    T: Any + Send + Sync,
{
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn as_any_mut(&mut self) -> &mut (dyn Any + Send + Sync) {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::string::String;

    #[test]
    fn blanket_impl_captures_concrete_key() {
        // Why: 擦除边界必须保真地携带原始类型键，否则注册中心无法回查编解码器。
        let value = String::from("row");
        let erased: &dyn DynValue = &value;
        assert_eq!(erased.type_key(), TypeKey::of::<String>());
        assert!(erased.as_any().downcast_ref::<String>().is_some());
    }

    #[test]
    fn boxed_trait_object_requires_deref() {
        // Why: 记录智能指针的已知陷阱——盒子自身也实现本 Trait。
        let boxed: Box<dyn DynValue> = Box::new(42u8);
        assert_eq!(boxed.as_ref().type_key(), TypeKey::of::<u8>());
    }
}

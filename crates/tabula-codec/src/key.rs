//! 类型键：注册中心字典的规范化类型标识。

use core::any::{Any, TypeId};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

/// `TypeKey` 是一个值的静态类型在注册中心中的规范化身份。
///
/// # 设计背景（Why）
/// - 注册中心需要以“类型”为字典键完成分发，而宿主语言的类型同一性由
///   [`core::any::TypeId`] 在单态化调用点给出；
/// - 仅有 `TypeId` 不利于排障：错误消息与日志需要类型名，因此同时捕获
///   [`core::any::type_name`] 作为诊断信息。
///
/// # 契约说明（What）
/// - 两个值共享同一 `TypeKey` 当且仅当它们的静态类型在 `TypeId` 意义下相同；
///   `T`、`&T`、`Box<T>` 互为不同键；
/// - 相等、排序与哈希仅基于 `TypeId`；捕获的类型名不参与同一性判定
///   （不同编译单元对同一类型给出的名称字符串可能存在差异，但 `TypeId` 不变）。
///
/// # 设计取舍与风险（Trade-offs）
/// - `type_name` 的输出格式不受语义化版本保障，仅可用于诊断文本，禁止据其做逻辑分支。
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// 在泛型调用点捕获 `T` 的类型键。
    ///
    /// # 契约说明（What）
    /// - `T` 需满足 `Any`（即 `'static`）；非 `'static` 借用类型无法充当注册键；
    /// - 对同一 `T` 的多次调用返回相等的键。
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// 返回底层 [`TypeId`]。
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 返回捕获时的完整类型名（含模块路径），仅供诊断。
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 返回类型名的末段（去除模块路径），适合嵌入面向用户的输出。
    ///
    /// # 风险提示（Trade-offs）
    /// - 对携带泛型参数的类型名，末段截断可能包含参数残片；诊断场景可接受。
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

//! 调用上下文：注册中心引用 + 不可变命名绑定链。

use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::any::Any;

use crate::marshal::default_registry;
use crate::registry::Registry;

/// 单个命名绑定：名称 + 类型擦除后的值。
struct Binding {
    name: Cow<'static, str>,
    value: Box<dyn Any + Send + Sync>,
}

/// `Context` 聚合一次编解码树中流动的调用元数据：注册中心引用与命名值链。
///
/// # 设计初衷（Why）
/// - 递归编码器需要从上下文回查注册中心，以便为子值求取编解码器；
/// - 缩进、分隔符等逐层演化的调用态必须随递归传递，且回调返回后父层状态不得被篡改，
///   因此绑定链采用“派生子上下文、父层只读”的不可变结构。
///
/// # 架构定位（Role）
/// - 位于 `tabula-codec::context` 模块，是编解码 trampoline 的首个参数；
/// - 由顶层 `marshal`/`unmarshal` 在调用树根部创建，由递归编码器按需派生。
///
/// # 关键逻辑（How）
/// - 内部保存注册中心引用、可选的父上下文引用与至多一个本层绑定；
/// - [`with_value`](Self::with_value) 以借用父层的方式构造子层，零拷贝、不回写；
/// - [`value`](Self::value) 自最近绑定向根方向查找，命中即返回，实现“就近覆盖”。
///
/// # 契约说明（What）
/// - **前置条件**：派生链上的父上下文必须在子上下文存活期内保持有效（借用规则静态保证）；
/// - **后置条件**：`with_value` 返回后父上下文的既有绑定不发生任何变化；
/// - **生命周期**：上下文仅存活于单棵编解码树的调用期内，不得持久化或跨线程共享。
///
/// # 设计取舍与风险（Trade-offs）
/// - 每个绑定一次堆分配换取值类型的完全开放；绑定链通常极短（缩进一类），线性查找开销可忽略；
/// - 选择借用父层而非引用计数，使派生在栈上即可完成，也让“子不改父”成为编译期事实。
pub struct Context<'a> {
    registry: &'a Registry,
    parent: Option<&'a Context<'a>>,
    binding: Option<Binding>,
}

impl Context<'static> {
    /// 构造空上下文，绑定进程级默认注册中心。
    pub fn new() -> Self {
        Self::bound(default_registry())
    }
}

impl Default for Context<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Context<'a> {
    /// 构造空上下文，绑定调用方提供的注册中心。
    ///
    /// # 语义说明
    /// - 测试与多注册中心场景使用本入口；常规路径经 [`Context::new`] 走默认注册中心。
    pub fn bound(registry: &'a Registry) -> Self {
        Self {
            registry,
            parent: None,
            binding: None,
        }
    }

    /// 派生携带新绑定的子上下文；父上下文保持不变。
    ///
    /// # 契约说明（What）
    /// - **输入**：`name` 为绑定名（静态或堆分配字符串均可）；`value` 为任意 `'static` 值；
    /// - **后置条件**：子上下文对 `name` 的查找返回新值，其余名称沿父链解析；
    ///   同名绑定表现为“就近遮蔽”，父层原值在父上下文中依旧可见。
    pub fn with_value(&self, name: impl Into<Cow<'static, str>>, value: impl Any + Send + Sync) -> Context<'_> {
        Context {
            registry: self.registry,
            parent: Some(self),
            binding: Some(Binding {
                name: name.into(),
                value: Box::new(value),
            }),
        }
    }

    /// 按名称查找绑定值，自最近绑定向根方向搜索。
    pub fn value(&self, name: &str) -> Option<&(dyn Any + Send + Sync)> {
        if let Some(binding) = &self.binding
            && binding.name == name
        {
            return Some(binding.value.as_ref());
        }
        self.parent.and_then(|parent| parent.value(name))
    }

    /// 按名称查找并下转型为 `V` 的便捷入口；类型不符时视同未命中。
    pub fn value_of<V: Any>(&self, name: &str) -> Option<&V> {
        self.value(name).and_then(|value| value.downcast_ref::<V>())
    }

    /// 返回本上下文绑定的注册中心。
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }
}

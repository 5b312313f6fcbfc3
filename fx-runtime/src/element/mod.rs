//! # Element 模块
//!
//! 可动画元素的接口定义与默认实现。
//!
//! ## 核心概念
//!
//! - `Node`: 底层节点（真正接收属性/样式写入的一方，例如 DOM 节点或场景图节点）
//! - `Animatable`: Animator 所需的元素接口（读起点、写中间值、销毁信号）
//! - `SvgElement`: 矢量元素，持有属性写入器（setter 表、写入抑制缓存、变换合成）
//! - `HtmlElement`: 非矢量元素，数值以带单位的样式写入

mod html;
mod node;
pub mod setters;
mod svg;
pub mod symbol;
mod transform;

use std::cell::RefCell;
use std::rc::Rc;

pub use html::HtmlElement;
pub use node::{MemoryNode, Node, NodeWrite};
pub use setters::{Setter, SetterTable, WriterState};
pub use svg::SvgElement;
pub use symbol::{SYMBOL_KEYS, SymbolFn, SymbolOptions, SymbolRegistry};
pub use transform::{TRANSFORM_KEYS, TransformState};

use crate::path::MorphHints;
use crate::value::{AttrValue, Attrs};

/// 元素种类
///
/// 每种元素在构造时绑定一张 setter 表，同一种类共享同一张表。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 路径形状（含符号标记）
    Path,
    /// 文本
    Text,
    /// 分组
    Group,
}

/// 可动画元素接口
///
/// 元素通过实现此 trait 暴露动画需要的读写能力；Animator 只持有弱引用，
/// 不延长元素的生命周期。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Gauge {
///     angle: f64,
///     dead: bool,
/// }
///
/// impl Animatable for Gauge {
///     fn is_destroyed(&self) -> bool {
///         self.dead
///     }
///
///     fn current(&self, property: &str) -> AttrValue {
///         match property {
///             "angle" => AttrValue::Number(self.angle),
///             _ => AttrValue::Number(0.0),
///         }
///     }
///
///     fn commit(&mut self, property: &str, value: AttrValue) {
///         if property == "angle" {
///             self.angle = value.as_number().unwrap_or(self.angle);
///         }
///     }
///
///     fn apply(&mut self, attrs: &Attrs) {
///         for (key, value) in attrs.iter() {
///             self.commit(key, value.clone());
///         }
///     }
/// }
/// ```
pub trait Animatable: 'static {
    /// 元素是否已销毁
    ///
    /// 已销毁的元素不再接收任何写入，相关 Animator 在下一次 step 时结束。
    fn is_destroyed(&self) -> bool;

    /// 读取属性当前值，作为动画起点
    fn current(&self, property: &str) -> AttrValue;

    /// 写入动画产生的值
    fn commit(&mut self, property: &str, value: AttrValue);

    /// 直接写入一批属性
    fn apply(&mut self, attrs: &Attrs);

    /// 数值写入时附加的单位（例如 `px`）
    fn unit_for(&self, _property: &str) -> Option<&'static str> {
        None
    }

    /// 路径形变提示
    fn morph_hints(&self) -> MorphHints {
        MorphHints::default()
    }

    /// 起止值相同时是否仍然执行动画
    fn force_animate(&self, _property: &str) -> bool {
        false
    }
}

/// 共享的元素引用
pub type ElementRef = Rc<RefCell<dyn Animatable>>;

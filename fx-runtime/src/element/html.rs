//! # Html 模块
//!
//! 非矢量元素：属性以内联样式写入，除 `opacity` 外的数值都带 `px` 单位。

use std::cell::RefCell;
use std::rc::Rc;

use super::Animatable;
use super::node::{MemoryNode, Node};
use crate::value::{AttrValue, Attrs};

/// 非矢量元素
#[derive(Debug, Default)]
pub struct HtmlElement<N: Node = MemoryNode> {
    node: N,
    destroyed: bool,
}

impl<N: Node> HtmlElement<N> {
    /// 创建元素
    pub fn new(node: N) -> Self {
        Self {
            node,
            destroyed: false,
        }
    }

    /// 包装为共享引用
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// 底层节点
    pub fn node(&self) -> &N {
        &self.node
    }

    /// 底层节点（可变）
    pub fn node_mut(&mut self) -> &mut N {
        &mut self.node
    }

    /// 读取样式，数字形态（含 `px`）解析为数值，缺省为 `0`
    pub fn get(&self, property: &str) -> AttrValue {
        match self.node.style(property) {
            Some(raw) => match AttrValue::Text(raw.clone()).as_number() {
                Some(n) => AttrValue::Number(n),
                None => AttrValue::Text(raw),
            },
            None => AttrValue::Number(0.0),
        }
    }

    /// 写入样式
    pub fn css(&mut self, attrs: &Attrs) {
        if self.destroyed {
            return;
        }
        for (key, value) in attrs.iter() {
            let serialized = match (value, self.unit_for(key)) {
                (AttrValue::Number(n), Some(unit)) => format!("{}{}", n, unit),
                _ => value.to_string(),
            };
            self.node.set_style(key, &serialized);
        }
    }

    /// 销毁元素
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }
}

impl<N: Node> Animatable for HtmlElement<N> {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn current(&self, property: &str) -> AttrValue {
        self.get(property)
    }

    fn commit(&mut self, property: &str, value: AttrValue) {
        self.css(&Attrs::new().with(property, value));
    }

    fn apply(&mut self, attrs: &Attrs) {
        self.css(attrs);
    }

    fn unit_for(&self, property: &str) -> Option<&'static str> {
        (property != "opacity").then_some("px")
    }
}

//! # Svg 模块
//!
//! 矢量元素与属性写入器。

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, warn};

use super::node::{MemoryNode, Node};
use super::setters::{SetterTable, WriterState};
use super::symbol::{SYMBOL_KEYS, SymbolFn, SymbolOptions, SymbolRegistry};
use super::transform::TransformState;
use super::{Animatable, ElementKind};
use crate::path::MorphHints;
use crate::value::{AttrValue, Attrs};

/// 符号形状状态
#[derive(Debug, Clone)]
struct SymbolShape {
    name: String,
    draw: SymbolFn,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    options: SymbolOptions,
}

impl SymbolShape {
    fn set(&mut self, key: &str, value: &AttrValue) {
        let number = value.as_number();
        match key {
            "x" => self.x = number.unwrap_or(self.x),
            "y" => self.y = number.unwrap_or(self.y),
            "width" => self.width = number.unwrap_or(self.width),
            "height" => self.height = number.unwrap_or(self.height),
            other => {
                self.options.set(other, number);
            }
        }
    }

    fn path(&self) -> AttrValue {
        AttrValue::Path((self.draw)(
            self.x,
            self.y,
            self.width,
            self.height,
            &self.options,
        ))
    }
}

/// 矢量元素
///
/// 所有属性写入都经过 [`SvgElement::set_all`]：
/// 普通属性按 setter 表分派，符号几何参数合并后只重绘一次路径，
/// 变换分量合并后只合成一次 `transform`。
#[derive(Debug)]
pub struct SvgElement<N: Node = MemoryNode> {
    node: N,
    setters: &'static SetterTable,
    state: WriterState,
    symbol: Option<SymbolShape>,
    hints: MorphHints,
    force_animate: HashSet<String>,
    destroyed: bool,
}

impl<N: Node> SvgElement<N> {
    /// 创建指定种类的元素
    pub fn new(kind: ElementKind, node: N) -> Self {
        Self {
            node,
            setters: SetterTable::for_kind(kind),
            state: WriterState::default(),
            symbol: None,
            hints: MorphHints::default(),
            force_animate: HashSet::new(),
            destroyed: false,
        }
    }

    /// 路径元素
    pub fn path(node: N) -> Self {
        Self::new(ElementKind::Path, node)
    }

    /// 文本元素
    pub fn text(node: N) -> Self {
        Self::new(ElementKind::Text, node)
    }

    /// 分组元素
    pub fn group(node: N) -> Self {
        Self::new(ElementKind::Group, node)
    }

    /// 符号元素，符号名未注册时返回 `None`
    pub fn symbol(node: N, name: &str, registry: &SymbolRegistry) -> Option<Self> {
        let Some(draw) = registry.get(name) else {
            warn!(symbol = name, "未注册的符号");
            return None;
        };
        let mut element = Self::path(node);
        element.symbol = Some(SymbolShape {
            name: name.to_string(),
            draw,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            options: SymbolOptions::default(),
        });
        Some(element)
    }

    /// 包装为共享引用
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// 元素种类
    pub fn kind(&self) -> ElementKind {
        self.setters.kind()
    }

    /// 符号名
    pub fn symbol_name(&self) -> Option<&str> {
        self.symbol.as_ref().map(|s| s.name.as_str())
    }

    /// 底层节点
    pub fn node(&self) -> &N {
        &self.node
    }

    /// 底层节点（可变）
    pub fn node_mut(&mut self) -> &mut N {
        &mut self.node
    }

    /// 当前变换状态
    pub fn transform(&self) -> &TransformState {
        &self.state.transform
    }

    /// 设置路径形变提示
    pub fn set_morph_hints(&mut self, hints: MorphHints) {
        self.hints = hints;
    }

    /// 标记属性在起止值相同时仍然执行动画
    pub fn set_force_animate(&mut self, property: &str, force: bool) {
        if force {
            self.force_animate.insert(property.to_string());
        } else {
            self.force_animate.remove(property);
        }
    }

    /// 销毁元素，之后的写入全部忽略
    pub fn destroy(&mut self) {
        if !self.destroyed {
            debug!(kind = ?self.kind(), "元素已销毁");
        }
        self.destroyed = true;
    }

    /// 写入一批属性
    pub fn set_all(&mut self, attrs: &Attrs) {
        if self.destroyed {
            debug!(count = attrs.len(), "忽略对已销毁元素的写入");
            return;
        }

        let mut symbol_dirty = false;
        let mut transform_dirty = false;
        let mut touches_origin = false;

        for (key, value) in attrs.iter() {
            if let Some(symbol) = self.symbol.as_mut() {
                if SYMBOL_KEYS.contains(&key) {
                    symbol.set(key, value);
                    self.state.fields.insert(key.to_string(), value.clone());
                    symbol_dirty = true;
                    touches_origin |= key == "x" || key == "y";
                    continue;
                }
            }

            touches_origin |= key == "x" || key == "y";
            let setter = self.setters.get(key);
            transform_dirty |= setter(&mut self.state, &mut self.node, key, value);
        }

        if symbol_dirty {
            if let Some(path) = self.symbol.as_ref().map(SymbolShape::path) {
                let setter = self.setters.get("d");
                setter(&mut self.state, &mut self.node, "d", &path);
            }
        }

        if transform_dirty || (touches_origin && self.state.transform.is_rotated()) {
            self.update_transform();
        }
    }

    /// 读取属性
    ///
    /// 查找顺序：对齐缓存 → 内存字段（含变换分量）→ 节点属性 → `0`。
    pub fn get(&self, key: &str) -> AttrValue {
        if let Some(value) = self.state.aligned.get(key) {
            return value.clone();
        }
        if TransformState::is_transform_key(key) {
            if let Some(value) = self.state.transform.get(key) {
                return value;
            }
        }
        if let Some(value) = self.state.fields.get(key) {
            return value.clone();
        }
        match self.node.attribute(key) {
            Some(raw) => AttrValue::from_raw(&raw),
            None => AttrValue::Number(0.0),
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.state.fields.get(key) {
            Some(value) => value.as_number(),
            None => self
                .node
                .attribute(key)
                .and_then(|raw| AttrValue::from_raw(&raw).as_number()),
        }
    }

    fn update_transform(&mut self) {
        let size = (
            self.number("width").unwrap_or(0.0),
            self.number("height").unwrap_or(0.0),
        );
        let origin = (self.number("x"), self.number("y"));
        let composed = self.state.transform.compose(size, origin);

        if self.state.written.get("transform") != Some(&composed) {
            self.node.set_attribute("transform", &composed);
            self.state.written.insert("transform".to_string(), composed);
        }
    }
}

impl<N: Node> Animatable for SvgElement<N> {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn current(&self, property: &str) -> AttrValue {
        self.get(property)
    }

    fn commit(&mut self, property: &str, value: AttrValue) {
        self.set_all(&Attrs::new().with(property, value));
    }

    fn apply(&mut self, attrs: &Attrs) {
        self.set_all(attrs);
    }

    fn morph_hints(&self) -> MorphHints {
        self.hints.clone()
    }

    fn force_animate(&self, property: &str) -> bool {
        self.force_animate.contains(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_lookup_order() {
        let mut el = SvgElement::text(MemoryNode::new());
        assert_eq!(el.get("missing"), AttrValue::Number(0.0));

        el.node_mut().set_attribute("x", "12.5");
        assert_eq!(el.get("x"), AttrValue::Number(12.5));

        el.set_all(&Attrs::new().with("fill", "#ff0000").with("align", "left"));
        assert_eq!(el.get("fill"), AttrValue::Text("#ff0000".into()));
        assert_eq!(el.get("align"), AttrValue::Text("left".into()));
        assert_eq!(el.node().attribute("text-anchor").as_deref(), Some("start"));
    }

    #[test]
    fn test_transform_written_once_per_batch() {
        let mut el = SvgElement::group(MemoryNode::new());
        el.set_all(
            &Attrs::new()
                .with("translateX", 10)
                .with("translateY", 20)
                .with("rotation", 45)
                .with("scaleX", 2),
        );

        assert_eq!(el.node().write_count("transform"), 1);
        assert_eq!(
            el.node().attribute("transform").as_deref(),
            Some("translate(10,20) rotate(45 0 0) scale(2 1)")
        );
        assert_eq!(el.get("translateX"), AttrValue::Number(10.0));
    }

    #[test]
    fn test_moving_rotated_element_recomposes_transform() {
        let mut el = SvgElement::text(MemoryNode::new());
        el.set_all(&Attrs::new().with("rotation", 90));
        el.set_all(&Attrs::new().with("x", 5).with("y", 6));

        assert_eq!(el.node().write_count("transform"), 2);
        assert_eq!(
            el.node().attribute("transform").as_deref(),
            Some("translate(0,0) rotate(90 5 6)")
        );
    }

    #[test]
    fn test_symbol_redrawn_once_per_batch() {
        let registry = SymbolRegistry::new();
        let mut el = SvgElement::symbol(MemoryNode::new(), "square", &registry).unwrap();
        el.set_all(
            &Attrs::new()
                .with("x", 1)
                .with("y", 2)
                .with("width", 3)
                .with("height", 4),
        );

        assert_eq!(el.node().write_count("d"), 1);
        assert_eq!(el.node().write_count("x"), 0);
        assert_eq!(
            el.node().attribute("d").as_deref(),
            Some("M 1 2 L 4 2 L 4 6 L 1 6 Z")
        );
        assert_eq!(el.get("width"), AttrValue::Number(3.0));
    }

    #[test]
    fn test_unknown_symbol() {
        let registry = SymbolRegistry::new();
        assert!(SvgElement::symbol(MemoryNode::new(), "hexagon", &registry).is_none());
    }

    #[test]
    fn test_destroyed_element_ignores_writes() {
        let mut el = SvgElement::path(MemoryNode::new());
        el.destroy();
        el.set_all(&Attrs::new().with("d", "M 0 0 L 1 1"));
        assert!(el.node().writes().is_empty());
        assert!(el.is_destroyed());
    }
}

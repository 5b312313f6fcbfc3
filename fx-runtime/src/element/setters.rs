//! # Setters 模块
//!
//! 属性写入分派表。
//!
//! 每种元素种类对应一张静态 setter 表，首次使用时构建；
//! 表中没有的属性走默认 setter（序列化后直接写入节点属性）。

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::warn;

use super::node::Node;
use super::transform::{TRANSFORM_KEYS, TransformState};
use super::ElementKind;
use crate::path::PathData;
use crate::value::AttrValue;

/// 空路径或非法路径的替代值
const EMPTY_PATH: &str = "M 0 0";

/// 属性写入器的内存状态
///
/// 与底层节点分开保存，setter 可以同时借用两者。
#[derive(Debug, Clone, Default)]
pub struct WriterState {
    /// 内存字段（优先于节点属性被读取）
    pub fields: HashMap<String, AttrValue>,
    /// 对齐缓存（例如 `align`），读取时优先级最高
    pub aligned: HashMap<String, AttrValue>,
    /// 已写入节点的序列化值，用于写入抑制
    pub written: HashMap<String, String>,
    /// 变换状态
    pub transform: TransformState,
}

/// setter 函数
///
/// 返回值表示是否需要重新合成变换。
pub type Setter = fn(&mut WriterState, &mut dyn Node, &str, &AttrValue) -> bool;

/// setter 分派表
pub struct SetterTable {
    kind: ElementKind,
    setters: HashMap<&'static str, Setter>,
}

static PATH_SETTERS: LazyLock<SetterTable> = LazyLock::new(|| SetterTable::build(ElementKind::Path));
static TEXT_SETTERS: LazyLock<SetterTable> = LazyLock::new(|| SetterTable::build(ElementKind::Text));
static GROUP_SETTERS: LazyLock<SetterTable> =
    LazyLock::new(|| SetterTable::build(ElementKind::Group));

impl SetterTable {
    /// 获取某种元素的 setter 表
    pub fn for_kind(kind: ElementKind) -> &'static SetterTable {
        match kind {
            ElementKind::Path => &PATH_SETTERS,
            ElementKind::Text => &TEXT_SETTERS,
            ElementKind::Group => &GROUP_SETTERS,
        }
    }

    fn build(kind: ElementKind) -> Self {
        let mut setters: HashMap<&'static str, Setter> = HashMap::new();

        setters.insert("opacity", field_setter);
        setters.insert("fill", field_setter);
        setters.insert("stroke", field_setter);
        setters.insert("stroke-width", field_setter);
        setters.insert("visibility", visibility_setter);
        for key in TRANSFORM_KEYS {
            setters.insert(key, transform_setter);
        }

        match kind {
            ElementKind::Path => {
                setters.insert("d", path_setter);
            }
            ElementKind::Text => {
                setters.insert("text", text_setter);
                setters.insert("align", align_setter);
            }
            ElementKind::Group => {}
        }

        Self { kind, setters }
    }

    /// 所属元素种类
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// 是否注册了专用 setter
    pub fn contains(&self, key: &str) -> bool {
        self.setters.contains_key(key)
    }

    /// 查找 setter，未注册的属性返回默认 setter
    pub fn get(&self, key: &str) -> Setter {
        self.setters.get(key).copied().unwrap_or(default_setter)
    }
}

impl std::fmt::Debug for SetterTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.setters.keys().collect();
        keys.sort();
        f.debug_struct("SetterTable")
            .field("kind", &self.kind)
            .field("keys", &keys)
            .finish()
    }
}

/// 默认 setter：序列化后写入节点属性
fn default_setter(_state: &mut WriterState, node: &mut dyn Node, key: &str, value: &AttrValue) -> bool {
    node.set_attribute(key, &value.to_string());
    false
}

/// 同时记录内存字段并写入节点属性
fn field_setter(state: &mut WriterState, node: &mut dyn Node, key: &str, value: &AttrValue) -> bool {
    state.fields.insert(key.to_string(), value.clone());
    node.set_attribute(key, &value.to_string());
    false
}

fn visibility_setter(
    state: &mut WriterState,
    node: &mut dyn Node,
    key: &str,
    value: &AttrValue,
) -> bool {
    state.fields.insert(key.to_string(), value.clone());
    let serialized = value.to_string();
    if serialized == "inherit" {
        node.remove_attribute(key);
    } else {
        node.set_attribute(key, &serialized);
    }
    false
}

/// 变换分量只更新状态，由写入器统一合成
fn transform_setter(
    state: &mut WriterState,
    _node: &mut dyn Node,
    key: &str,
    value: &AttrValue,
) -> bool {
    state.transform.set(key, value)
}

/// 路径 setter
///
/// 空值或含 NaN 的值替换为 `M 0 0`；序列化结果与上次写入相同时跳过节点写入。
fn path_setter(state: &mut WriterState, node: &mut dyn Node, key: &str, value: &AttrValue) -> bool {
    let path = match value {
        AttrValue::Path(p) => p.clone(),
        other => {
            let raw = other.to_string();
            PathData::parse(&raw).unwrap_or_else(|e| {
                warn!(error = %e, value = %raw, "路径解析失败，使用空路径");
                PathData::new()
            })
        }
    };

    let mut serialized = path.to_string();
    if serialized.is_empty() || serialized.contains("NaN") {
        serialized = EMPTY_PATH.to_string();
    }

    if state.written.get(key) != Some(&serialized) {
        node.set_attribute(key, &serialized);
        state.written.insert(key.to_string(), serialized);
    }
    state.fields.insert(key.to_string(), AttrValue::Path(path));
    false
}

/// 文本 setter：内容未变化时不写入
fn text_setter(state: &mut WriterState, node: &mut dyn Node, key: &str, value: &AttrValue) -> bool {
    let serialized = value.to_string();
    if state.written.get(key) != Some(&serialized) {
        node.set_text(&serialized);
        state.written.insert(key.to_string(), serialized);
    }
    state.fields.insert(key.to_string(), value.clone());
    false
}

/// 对齐 setter：缓存对齐值，并映射为 `text-anchor`
fn align_setter(state: &mut WriterState, node: &mut dyn Node, key: &str, value: &AttrValue) -> bool {
    let anchor = match value.to_string().as_str() {
        "left" => "start",
        "right" => "end",
        _ => "middle",
    };
    state.aligned.insert(key.to_string(), value.clone());
    node.set_attribute("text-anchor", anchor);
    false
}

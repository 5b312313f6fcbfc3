//! # Node 模块
//!
//! 底层节点接口，以及记录全部写入的内存实现。

use std::collections::HashMap;

/// 底层节点
///
/// 所有值都以序列化后的字符串写入，与 DOM 的 `setAttribute` 语义一致。
pub trait Node: 'static {
    /// 设置属性
    fn set_attribute(&mut self, name: &str, value: &str);

    /// 读取属性
    fn attribute(&self, name: &str) -> Option<String>;

    /// 移除属性
    fn remove_attribute(&mut self, name: &str);

    /// 设置样式
    fn set_style(&mut self, name: &str, value: &str);

    /// 读取样式
    fn style(&self, name: &str) -> Option<String>;

    /// 设置文本内容
    fn set_text(&mut self, text: &str);
}

/// 一次底层写入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeWrite {
    /// 属性写入
    Attribute { name: String, value: String },
    /// 属性移除
    Removed { name: String },
    /// 样式写入
    Style { name: String, value: String },
    /// 文本写入
    Text(String),
}

/// 内存节点
///
/// 保存当前属性/样式，并按顺序记录每一次写入，便于无渲染环境下观察写入行为。
#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    text: Option<String>,
    writes: Vec<NodeWrite>,
}

impl MemoryNode {
    /// 创建空节点
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部写入记录
    pub fn writes(&self) -> &[NodeWrite] {
        &self.writes
    }

    /// 某个属性被写入的次数
    pub fn write_count(&self, name: &str) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, NodeWrite::Attribute { name: n, .. } if n == name))
            .count()
    }

    /// 某个样式被写入的次数
    pub fn style_write_count(&self, name: &str) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, NodeWrite::Style { name: n, .. } if n == name))
            .count()
    }

    /// 当前文本内容
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// 清空写入记录（保留当前状态）
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl Node for MemoryNode {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
        self.writes.push(NodeWrite::Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
        self.writes.push(NodeWrite::Removed {
            name: name.to_string(),
        });
    }

    fn set_style(&mut self, name: &str, value: &str) {
        self.styles.insert(name.to_string(), value.to_string());
        self.writes.push(NodeWrite::Style {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn style(&self, name: &str) -> Option<String> {
        self.styles.get(name).cloned()
    }

    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
        self.writes.push(NodeWrite::Text(text.to_string()));
    }
}

//! # Value 模块
//!
//! 属性值与属性批次。
//!
//! 元素属性在写入底层节点前统一序列化成字符串；读取时数字形态的字符串会被解析回数字。

use std::fmt;

use crate::path::PathData;

/// 属性值
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// 数值
    Number(f64),
    /// 字符串（颜色、对齐方式、文本等）
    Text(String),
    /// 布尔标记（例如 `inverted`）
    Bool(bool),
    /// 路径
    Path(PathData),
    /// 原始 2D 仿射矩阵 `[a, b, c, d, e, f]`
    Matrix([f64; 6]),
}

impl AttrValue {
    /// 尝试按数值解释
    ///
    /// 字符串会去掉 `px` 后缀后再解析，例如 `"150px"` → `150`。
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(s) => parse_number(&s.replace("px", "")),
            AttrValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            AttrValue::Path(_) | AttrValue::Matrix(_) => None,
        }
    }

    /// 按布尔解释（数值非零即为真）
    pub fn as_bool(&self) -> bool {
        match self {
            AttrValue::Bool(b) => *b,
            AttrValue::Number(n) => *n != 0.0,
            AttrValue::Text(s) => !s.is_empty() && s != "false" && s != "0",
            AttrValue::Path(p) => !p.is_empty(),
            AttrValue::Matrix(_) => true,
        }
    }

    /// 从底层节点读回的字符串构造值：数字形态的字符串解析为数值
    pub fn from_raw(raw: &str) -> Self {
        if is_numeric_like(raw) {
            if let Some(n) = parse_number(raw) {
                return AttrValue::Number(n);
            }
        }
        AttrValue::Text(raw.to_string())
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Text(s) => write!(f, "{}", s),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Path(p) => write!(f, "{}", p),
            AttrValue::Matrix(m) => write!(
                f,
                "{},{},{},{},{},{}",
                m[0], m[1], m[2], m[3], m[4], m[5]
            ),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Number(value as f64)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<PathData> for AttrValue {
    fn from(value: PathData) -> Self {
        AttrValue::Path(value)
    }
}

impl From<[f64; 6]> for AttrValue {
    fn from(value: [f64; 6]) -> Self {
        AttrValue::Matrix(value)
    }
}

/// 字符串是否只由数字、负号和小数点组成
pub(crate) fn is_numeric_like(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == '.')
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// 属性批次
///
/// 保持插入顺序；同名键后写覆盖先写。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    entries: Vec<(String, AttrValue)>,
}

impl Attrs {
    /// 创建空批次
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个属性（链式）
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// 插入或覆盖一个属性
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 查询属性
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// 是否包含某个键
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 按插入顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 所有键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

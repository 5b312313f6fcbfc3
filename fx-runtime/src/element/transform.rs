//! # Transform 模块
//!
//! 变换状态，记录平移、旋转、缩放、矩阵与倒置标记，并合成为一条 `transform` 属性字符串。

use crate::value::AttrValue;

/// 参与变换合成的属性名
pub const TRANSFORM_KEYS: [&str; 9] = [
    "translateX",
    "translateY",
    "rotation",
    "rotationOriginX",
    "rotationOriginY",
    "scaleX",
    "scaleY",
    "matrix",
    "inverted",
];

/// 变换状态
///
/// 所有分量都是可选的：未设置的分量不出现在合成结果中（平移除外，始终输出）。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformState {
    /// 平移 x
    pub translate_x: Option<f64>,
    /// 平移 y
    pub translate_y: Option<f64>,
    /// 旋转角度（度）
    pub rotation: Option<f64>,
    /// 旋转中心 x
    pub rotation_origin_x: Option<f64>,
    /// 旋转中心 y
    pub rotation_origin_y: Option<f64>,
    /// 缩放 x
    pub scale_x: Option<f64>,
    /// 缩放 y
    pub scale_y: Option<f64>,
    /// 原始仿射矩阵
    pub matrix: Option<[f64; 6]>,
    /// 倒置（坐标轴交换）
    pub inverted: bool,
}

impl TransformState {
    /// 是否为变换属性
    pub fn is_transform_key(key: &str) -> bool {
        TRANSFORM_KEYS.contains(&key)
    }

    /// 是否带有非零旋转
    pub fn is_rotated(&self) -> bool {
        self.rotation.is_some_and(|r| r != 0.0)
    }

    /// 设置一个分量，返回值是否发生变化
    pub fn set(&mut self, key: &str, value: &AttrValue) -> bool {
        let before = *self;
        match key {
            "translateX" => self.translate_x = value.as_number(),
            "translateY" => self.translate_y = value.as_number(),
            "rotation" => self.rotation = value.as_number(),
            "rotationOriginX" => self.rotation_origin_x = value.as_number(),
            "rotationOriginY" => self.rotation_origin_y = value.as_number(),
            "scaleX" => self.scale_x = value.as_number(),
            "scaleY" => self.scale_y = value.as_number(),
            "matrix" => {
                self.matrix = match value {
                    AttrValue::Matrix(m) => Some(*m),
                    _ => None,
                }
            }
            "inverted" => self.inverted = value.as_bool(),
            _ => return false,
        }
        before != *self
    }

    /// 读取一个分量
    pub fn get(&self, key: &str) -> Option<AttrValue> {
        let number = |n: Option<f64>| n.map(AttrValue::Number);
        match key {
            "translateX" => number(self.translate_x),
            "translateY" => number(self.translate_y),
            "rotation" => number(self.rotation),
            "rotationOriginX" => number(self.rotation_origin_x),
            "rotationOriginY" => number(self.rotation_origin_y),
            "scaleX" => number(self.scale_x),
            "scaleY" => number(self.scale_y),
            "matrix" => self.matrix.map(AttrValue::Matrix),
            "inverted" => Some(AttrValue::Bool(self.inverted)),
            _ => None,
        }
    }

    /// 合成 `transform` 属性字符串
    ///
    /// 顺序固定为：平移 → 矩阵 → 旋转（或倒置）→ 缩放。
    /// `size` 为元素宽高，倒置时加到平移上；`origin` 为元素的 x/y 属性，
    /// 作为未显式设置旋转中心时的回退值。
    pub fn compose(&self, size: (f64, f64), origin: (Option<f64>, Option<f64>)) -> String {
        let mut translate_x = self.translate_x.unwrap_or(0.0);
        let mut translate_y = self.translate_y.unwrap_or(0.0);
        if self.inverted {
            translate_x += size.0;
            translate_y += size.1;
        }

        let mut parts = vec![format!("translate({},{})", translate_x, translate_y)];

        if let Some(m) = self.matrix {
            parts.push(format!(
                "matrix({},{},{},{},{},{})",
                m[0], m[1], m[2], m[3], m[4], m[5]
            ));
        }

        if self.inverted {
            parts.push("rotate(90) scale(-1,1)".to_string());
        } else if let Some(rotation) = self.rotation.filter(|r| *r != 0.0) {
            let ox = self.rotation_origin_x.or(origin.0).unwrap_or(0.0);
            let oy = self.rotation_origin_y.or(origin.1).unwrap_or(0.0);
            parts.push(format!("rotate({} {} {})", rotation, ox, oy));
        }

        if self.scale_x.is_some() || self.scale_y.is_some() {
            parts.push(format!(
                "scale({} {})",
                self.scale_x.unwrap_or(1.0),
                self.scale_y.unwrap_or(1.0)
            ));
        }

        parts.join(" ")
    }
}

//! # Color 模块
//!
//! 颜色插值协作者。
//!
//! 动画系统只消费"在位置 p 处混合两个颜色"这一个操作；默认实现用
//! `csscolorparser` 解析 CSS 颜色（十六进制、`rgb()`/`rgba()`、`hsl()`、颜色名），
//! 无法解析的颜色直接返回目标字符串。

use std::fmt;

/// 颜色插值接口
pub trait ColorTween {
    /// 计算 `from` 到 `to` 在 `pos`（0.0 - 1.0）处的颜色字符串
    fn tween(&self, from: &str, to: &str, pos: f64) -> String;
}

/// RGBA 颜色（通道 0-255，alpha 0.0-1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// 解析 CSS 颜色字符串
    pub fn parse(input: &str) -> Option<Self> {
        csscolorparser::parse(input.trim()).ok().map(Self::from)
    }

    /// 线性混合
    pub fn lerp(&self, to: &Self, pos: f64) -> Self {
        Self {
            r: self.r + (to.r - self.r) * pos,
            g: self.g + (to.g - self.g) * pos,
            b: self.b + (to.b - self.b) * pos,
            a: self.a + (to.a - self.a) * pos,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 1.0 {
            write!(
                f,
                "rgb({},{},{})",
                self.r.round(),
                self.g.round(),
                self.b.round()
            )
        } else {
            write!(
                f,
                "rgba({},{},{},{})",
                self.r.round(),
                self.g.round(),
                self.b.round(),
                self.a
            )
        }
    }
}

impl From<csscolorparser::Color> for Rgba {
    fn from(color: csscolorparser::Color) -> Self {
        Self {
            r: color.r * 255.0,
            g: color.g * 255.0,
            b: color.b * 255.0,
            a: color.a,
        }
    }
}

/// 默认颜色插值实现
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbaTween;

impl ColorTween for RgbaTween {
    fn tween(&self, from: &str, to: &str, pos: f64) -> String {
        match (Rgba::parse(from), Rgba::parse(to)) {
            (Some(a), Some(b)) => a.lerp(&b, pos).to_string(),
            _ if to.is_empty() => "none".to_string(),
            _ => to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        let red = Rgba::parse("#ff0000").unwrap();
        assert_eq!((red.r, red.g, red.b, red.a), (255.0, 0.0, 0.0, 1.0));
        assert_eq!(Rgba::parse("#f00"), Some(red));
        assert_eq!(Rgba::parse("rgb(255, 0, 0)"), Some(red));
        assert_eq!(Rgba::parse("rgba(255,0,0,0.5)").unwrap().a, 0.5);
        assert_eq!(Rgba::parse(" red "), Some(red));
        assert_eq!(Rgba::parse("url(#grad)"), None);
    }

    #[test]
    fn test_tween_named_colors() {
        let tween = RgbaTween;
        assert_eq!(tween.tween("black", "white", 0.5), "rgb(128,128,128)");
        assert_eq!(tween.tween("red", "blue", 1.0), "rgb(0,0,255)");
    }

    #[test]
    fn test_tween_midpoint() {
        let tween = RgbaTween;
        assert_eq!(tween.tween("#000000", "#ffffff", 0.5), "rgb(128,128,128)");
        assert_eq!(
            tween.tween("rgba(0,0,0,0)", "rgba(0,0,0,1)", 0.5),
            "rgba(0,0,0,0.5)"
        );
    }

    #[test]
    fn test_tween_unparseable_returns_target() {
        let tween = RgbaTween;
        assert_eq!(tween.tween("url(#grad)", "#ffffff", 0.3), "#ffffff");
        assert_eq!(tween.tween("#000", "", 0.3), "none");
    }
}

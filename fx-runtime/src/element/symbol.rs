//! # Symbol 模块
//!
//! 符号标记：由几何参数（x/y/宽高/半径/角度）生成路径的形状。

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::path::PathData;

/// 参与符号几何计算的属性名
pub const SYMBOL_KEYS: [&str; 10] = [
    "x", "y", "width", "height", "r", "start", "end", "innerR", "anchorX", "anchorY",
];

/// 圆的三次贝塞尔近似系数
const KAPPA: f64 = 0.552_284_749_8;

/// 符号的附加几何参数
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SymbolOptions {
    /// 半径
    pub r: Option<f64>,
    /// 起始角（弧度）
    pub start: Option<f64>,
    /// 结束角（弧度）
    pub end: Option<f64>,
    /// 内半径
    pub inner_r: Option<f64>,
    /// 锚点 x
    pub anchor_x: Option<f64>,
    /// 锚点 y
    pub anchor_y: Option<f64>,
}

impl SymbolOptions {
    /// 按属性名设置参数，返回是否为已知参数
    pub fn set(&mut self, key: &str, value: Option<f64>) -> bool {
        let slot = match key {
            "r" => &mut self.r,
            "start" => &mut self.start,
            "end" => &mut self.end,
            "innerR" => &mut self.inner_r,
            "anchorX" => &mut self.anchor_x,
            "anchorY" => &mut self.anchor_y,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// 符号生成函数：`(x, y, width, height, options) -> path`
pub type SymbolFn = fn(f64, f64, f64, f64, &SymbolOptions) -> PathData;

/// 符号注册表
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    symbols: HashMap<String, SymbolFn>,
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        let mut registry = Self {
            symbols: HashMap::new(),
        };
        registry.register("circle", circle);
        registry.register("square", square);
        registry.register("triangle", triangle);
        registry.register("triangle-down", triangle_down);
        registry.register("diamond", diamond);
        registry.register("arc", arc);
        registry
    }
}

impl SymbolRegistry {
    /// 创建带内置符号的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册（或覆盖）符号
    pub fn register(&mut self, name: impl Into<String>, symbol: SymbolFn) {
        self.symbols.insert(name.into(), symbol);
    }

    /// 查找符号
    pub fn get(&self, name: &str) -> Option<SymbolFn> {
        self.symbols.get(name).copied()
    }

    /// 已注册的符号名（排序后）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.symbols.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn circle(x: f64, y: f64, w: f64, h: f64, _options: &SymbolOptions) -> PathData {
    let (rx, ry) = (w / 2.0, h / 2.0);
    let (cx, cy) = (x + rx, y + ry);
    let (kx, ky) = (KAPPA * rx, KAPPA * ry);

    PathData::new()
        .move_to(cx + rx, cy)
        .curve_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)
        .curve_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)
        .curve_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)
        .curve_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)
        .close()
}

fn square(x: f64, y: f64, w: f64, h: f64, _options: &SymbolOptions) -> PathData {
    PathData::new()
        .move_to(x, y)
        .line_to(x + w, y)
        .line_to(x + w, y + h)
        .line_to(x, y + h)
        .close()
}

fn triangle(x: f64, y: f64, w: f64, h: f64, _options: &SymbolOptions) -> PathData {
    PathData::new()
        .move_to(x + w / 2.0, y)
        .line_to(x + w, y + h)
        .line_to(x, y + h)
        .close()
}

fn triangle_down(x: f64, y: f64, w: f64, h: f64, _options: &SymbolOptions) -> PathData {
    PathData::new()
        .move_to(x, y)
        .line_to(x + w, y)
        .line_to(x + w / 2.0, y + h)
        .close()
}

fn diamond(x: f64, y: f64, w: f64, h: f64, _options: &SymbolOptions) -> PathData {
    PathData::new()
        .move_to(x + w / 2.0, y)
        .line_to(x + w, y + h / 2.0)
        .line_to(x + w / 2.0, y + h)
        .line_to(x, y + h / 2.0)
        .close()
}

/// 圆弧（扇形/环形）：以 (x, y) 为圆心，`start`/`end` 为角度范围
fn arc(x: f64, y: f64, w: f64, h: f64, options: &SymbolOptions) -> PathData {
    let start = options.start.unwrap_or(0.0);
    let end = options.end.unwrap_or(0.0) - 0.001;
    let rx = options.r.unwrap_or(w);
    let ry = options.r.unwrap_or(if h > 0.0 { h } else { w });
    let long_arc = if end - start - PI < 0.001 { 0.0 } else { 1.0 };

    let mut path = PathData::new().move_to(x + rx * start.cos(), y + ry * start.sin());
    path.push(
        'A',
        &[rx, ry, 0.0, long_arc, 1.0, x + rx * end.cos(), y + ry * end.sin()],
    );

    if let Some(inner) = options.inner_r {
        path.push('L', &[x + inner * end.cos(), y + inner * end.sin()]);
        path.push(
            'A',
            &[
                inner,
                inner,
                0.0,
                long_arc,
                0.0,
                x + inner * start.cos(),
                y + inner * start.sin(),
            ],
        );
    }

    path.close()
}

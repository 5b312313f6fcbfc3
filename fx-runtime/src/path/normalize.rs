//! # Normalize 模块
//!
//! 把任意路径记录改写成只含绝对坐标 `M`/`L`/`C` 的形式，供形变对齐使用。
//!
//! - 相对命令转为绝对坐标
//! - `H`/`V` 转为 `L`，`Q`/`T`/`S` 转为 `C`，`A` 拆成若干段三次贝塞尔
//! - 一条命令携带多组参数时拆成多条记录（`M` 之后的组视为 `L`）
//! - 路径中间的闭合命令改写成回到子路径起点的直线

use std::f64::consts::{FRAC_PI_2, PI};

use tracing::debug;

use super::data::Segment;

/// 命令的参数个数
fn arity(command: char) -> Option<usize> {
    match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => Some(2),
        'H' | 'V' => Some(1),
        'S' | 'Q' => Some(4),
        'C' => Some(6),
        'A' => Some(7),
        'Z' => Some(0),
        _ => None,
    }
}

/// 绘制游标
#[derive(Debug, Default)]
struct Cursor {
    x: f64,
    y: f64,
    /// 当前子路径起点
    start: (f64, f64),
    /// 上一段三次曲线的第二控制点（供 `S` 反射）
    cubic_ctrl: Option<(f64, f64)>,
    /// 上一段二次曲线的控制点（供 `T` 反射）
    quad_ctrl: Option<(f64, f64)>,
}

impl Cursor {
    fn reflect(ctrl: Option<(f64, f64)>, x: f64, y: f64) -> (f64, f64) {
        match ctrl {
            Some((cx, cy)) => (2.0 * x - cx, 2.0 * y - cy),
            None => (x, y),
        }
    }
}

/// 改写为绝对坐标的 `M`/`L`/`C` 记录
///
/// 调用方需先去掉末尾的闭合命令；剩下的 `Z` 都按直线处理。
pub(crate) fn normalize(segments: &[Segment]) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    let mut cursor = Cursor::default();

    for segment in segments {
        let Some(width) = arity(segment.command) else {
            debug!(command = %segment.command, "未知路径命令，已忽略");
            continue;
        };

        if width == 0 {
            let (sx, sy) = cursor.start;
            out.push(line(sx, sy));
            cursor.x = sx;
            cursor.y = sy;
            cursor.cubic_ctrl = None;
            cursor.quad_ctrl = None;
            continue;
        }

        let relative = segment.command.is_ascii_lowercase();
        let mut command = segment.command.to_ascii_uppercase();

        for chunk in segment.values.chunks_exact(width) {
            push_chunk(&mut out, &mut cursor, command, relative, chunk);
            if command == 'M' {
                command = 'L';
            }
        }
    }

    out
}

fn push_chunk(out: &mut Vec<Segment>, cursor: &mut Cursor, command: char, relative: bool, v: &[f64]) {
    let (ox, oy) = if relative {
        (cursor.x, cursor.y)
    } else {
        (0.0, 0.0)
    };
    let (x0, y0) = (cursor.x, cursor.y);
    let mut cubic_ctrl = None;
    let mut quad_ctrl = None;

    let (x, y) = match command {
        'M' => {
            let (x, y) = (ox + v[0], oy + v[1]);
            out.push(Segment {
                command: 'M',
                values: vec![x, y],
            });
            cursor.start = (x, y);
            (x, y)
        }
        'L' => {
            let (x, y) = (ox + v[0], oy + v[1]);
            out.push(line(x, y));
            (x, y)
        }
        'H' => {
            let x = if relative { x0 + v[0] } else { v[0] };
            out.push(line(x, y0));
            (x, y0)
        }
        'V' => {
            let y = if relative { y0 + v[0] } else { v[0] };
            out.push(line(x0, y));
            (x0, y)
        }
        'C' => {
            let c1 = (ox + v[0], oy + v[1]);
            let c2 = (ox + v[2], oy + v[3]);
            let (x, y) = (ox + v[4], oy + v[5]);
            out.push(cubic(c1, c2, (x, y)));
            cubic_ctrl = Some(c2);
            (x, y)
        }
        'S' => {
            let c1 = Cursor::reflect(cursor.cubic_ctrl, x0, y0);
            let c2 = (ox + v[0], oy + v[1]);
            let (x, y) = (ox + v[2], oy + v[3]);
            out.push(cubic(c1, c2, (x, y)));
            cubic_ctrl = Some(c2);
            (x, y)
        }
        'Q' => {
            let q = (ox + v[0], oy + v[1]);
            let (x, y) = (ox + v[2], oy + v[3]);
            out.push(quad_to_cubic((x0, y0), q, (x, y)));
            quad_ctrl = Some(q);
            (x, y)
        }
        'T' => {
            let q = Cursor::reflect(cursor.quad_ctrl, x0, y0);
            let (x, y) = (ox + v[0], oy + v[1]);
            out.push(quad_to_cubic((x0, y0), q, (x, y)));
            quad_ctrl = Some(q);
            (x, y)
        }
        'A' => {
            let (x, y) = (ox + v[5], oy + v[6]);
            let arc = Arc {
                rx: v[0],
                ry: v[1],
                rotation: v[2],
                large: v[3] != 0.0,
                sweep: v[4] != 0.0,
            };
            out.extend(arc.to_cubics((x0, y0), (x, y)));
            (x, y)
        }
        _ => (x0, y0),
    };

    cursor.x = x;
    cursor.y = y;
    cursor.cubic_ctrl = cubic_ctrl;
    cursor.quad_ctrl = quad_ctrl;
}

fn line(x: f64, y: f64) -> Segment {
    Segment {
        command: 'L',
        values: vec![x, y],
    }
}

fn cubic(c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) -> Segment {
    Segment {
        command: 'C',
        values: vec![c1.0, c1.1, c2.0, c2.1, end.0, end.1],
    }
}

fn quad_to_cubic(p0: (f64, f64), q: (f64, f64), p: (f64, f64)) -> Segment {
    let c1 = ((p0.0 + 2.0 * q.0) / 3.0, (p0.1 + 2.0 * q.1) / 3.0);
    let c2 = ((p.0 + 2.0 * q.0) / 3.0, (p.1 + 2.0 * q.1) / 3.0);
    cubic(c1, c2, p)
}

/// 椭圆弧参数（SVG 端点形式）
#[derive(Debug, Clone, Copy)]
struct Arc {
    rx: f64,
    ry: f64,
    /// x 轴旋转角（度）
    rotation: f64,
    large: bool,
    sweep: bool,
}

impl Arc {
    /// 转为中心参数形式后按不超过 90° 一段拆成三次贝塞尔
    fn to_cubics(self, from: (f64, f64), to: (f64, f64)) -> Vec<Segment> {
        let (x0, y0) = from;
        let (x, y) = to;
        if x0 == x && y0 == y {
            return Vec::new();
        }

        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();
        if rx == 0.0 || ry == 0.0 {
            return vec![line(x, y)];
        }

        let phi = self.rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        let dx2 = (x0 - x) / 2.0;
        let dy2 = (y0 - y) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
        let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
        let sign = if self.large == self.sweep { -1.0 } else { 1.0 };
        let coef = sign * (num / den).max(0.0).sqrt();
        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;

        let cx = cos_phi * cxp - sin_phi * cyp + (x0 + x) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (y0 + y) / 2.0;

        let u = ((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v = ((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let theta = u.1.atan2(u.0);
        let mut delta = (u.0 * v.1 - u.1 * v.0).atan2(u.0 * v.0 + u.1 * v.1);
        if !self.sweep && delta > 0.0 {
            delta -= 2.0 * PI;
        } else if self.sweep && delta < 0.0 {
            delta += 2.0 * PI;
        }

        let count = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = delta / count as f64;
        let t = 4.0 / 3.0 * (step / 4.0).tan();

        let point = |a: f64| {
            let (sin_a, cos_a) = a.sin_cos();
            (
                cx + rx * cos_a * cos_phi - ry * sin_a * sin_phi,
                cy + rx * cos_a * sin_phi + ry * sin_a * cos_phi,
            )
        };
        let tangent = |a: f64| {
            let (sin_a, cos_a) = a.sin_cos();
            (
                -rx * sin_a * cos_phi - ry * cos_a * sin_phi,
                -rx * sin_a * sin_phi + ry * cos_a * cos_phi,
            )
        };

        (0..count)
            .map(|i| {
                let a1 = theta + step * i as f64;
                let a2 = a1 + step;
                let p1 = point(a1);
                let d1 = tangent(a1);
                let d2 = tangent(a2);
                let p2 = if i + 1 == count { (x, y) } else { point(a2) };
                cubic(
                    (p1.0 + t * d1.0, p1.1 + t * d1.1),
                    (p2.0 - t * d2.0, p2.1 - t * d2.1),
                    p2,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathData;

    fn normalized(s: &str) -> String {
        let segments = PathData::parse(s).unwrap().segments();
        PathData::from_segments(&normalize(&segments)).to_string()
    }

    #[test]
    fn test_absolute_lines_untouched() {
        assert_eq!(normalized("M 0 0 L 10 10 C 1 2 3 4 5 6"), "M 0 0 L 10 10 C 1 2 3 4 5 6");
    }

    #[test]
    fn test_relative_and_axis_commands() {
        assert_eq!(normalized("m 1 1 l 10 10 h 5 v -3"), "M 1 1 L 11 11 L 16 11 L 16 8");
        assert_eq!(normalized("M 0 0 H 10 V 10"), "M 0 0 L 10 0 L 10 10");
    }

    #[test]
    fn test_repeated_parameters_split() {
        assert_eq!(normalized("M 0 0 5 5 10 0"), "M 0 0 L 5 5 L 10 0");
    }

    #[test]
    fn test_inner_close_returns_to_subpath_start() {
        assert_eq!(
            normalized("M 0 0 L 10 10 Z M 20 20 L 30 30"),
            "M 0 0 L 10 10 L 0 0 M 20 20 L 30 30"
        );
    }

    #[test]
    fn test_quadratic_becomes_cubic() {
        assert_eq!(normalized("M 0 0 Q 3 3 6 0"), "M 0 0 C 2 2 4 2 6 0");
    }

    #[test]
    fn test_smooth_cubic_reflects_control() {
        assert_eq!(
            normalized("M 0 0 C 0 1 1 2 2 2 S 4 1 4 0"),
            "M 0 0 C 0 1 1 2 2 2 C 3 2 4 1 4 0"
        );
    }

    #[test]
    fn test_arc_becomes_cubics_ending_on_target() {
        // 半圆：两段 90° 曲线
        let segments = PathData::parse("M 0 0 A 5 5 0 0 1 10 0").unwrap().segments();
        let out = normalize(&segments);
        assert_eq!(out.len(), 3);
        assert!(out[1..].iter().all(|s| s.command == 'C' && s.values.len() == 6));
        assert_eq!(out[2].end_point(), Some((10.0, 0.0)));
        // 中点位于圆弧顶端
        let (mx, my) = out[1].end_point().unwrap();
        assert!((mx - 5.0).abs() < 1e-9);
        assert!((my.abs() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_command_and_partial_chunk_dropped() {
        assert_eq!(normalized("M 0 0 X 1 1 L 5"), "M 0 0");
    }
}

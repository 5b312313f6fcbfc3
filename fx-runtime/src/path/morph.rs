//! # Morph 模块
//!
//! 把两条点数、方向都可能不同的路径轮廓对齐成等长、命令位置一致的两组 token，
//! 之后逐下标线性插值即可得到连续的形状过渡。
//!
//! ## 对齐步骤
//!
//! 1. 改写为绝对坐标的 `M`/`L`/`C` 记录（相对命令、`H`/`V`、二次曲线、圆弧、中途闭合）
//! 2. 若任一路径含曲线命令，把所有 `M`/`L` 记录补齐为曲线宽度（6 个参数）
//! 3. 按 x 坐标检测窗口平移的方向与距离；检测失败视为旧路径为空。
//!    x 坐标优先取调用方提供的提示，否则取各记录终点的 x
//! 4. 按平移量在缺少前导点的一侧复制首点，在另一侧复制末点，面积图在中点处镜像补齐
//! 5. 最后把仍然较短的一侧补齐到等长
//!
//! 第 1、2 步之后每条记录的参数个数一致，记录数相等即 token 数相等。
//!
//! 旧路径为空时，起始形状退化为目标首点上的一个点，形状从无到有地展开。

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::data::{PathData, PathToken, Segment};
use super::normalize::normalize;

/// 曲线记录的参数个数
const CURVE_WIDTH: usize = 6;

/// x 坐标比较容差
const X_EPSILON: f64 = 1e-9;

/// 形变提示
///
/// 由持有数据窗口的一方（例如折线/面积序列）在动画前设置。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MorphHints {
    /// 旧路径各数据点的 x 坐标；未提供时取路径记录终点的 x
    pub start_x: Option<Vec<f64>>,
    /// 新路径各数据点的 x 坐标
    pub end_x: Option<Vec<f64>>,
    /// 是否为面积图（上沿 + 回程下沿）
    pub is_area: bool,
}

impl MorphHints {
    /// 面积图提示
    pub fn area() -> Self {
        Self {
            is_area: true,
            ..Self::default()
        }
    }

    /// 设置数据窗口 x 坐标
    pub fn with_window(mut self, start_x: Vec<f64>, end_x: Vec<f64>) -> Self {
        self.start_x = Some(start_x);
        self.end_x = Some(end_x);
        self
    }
}

/// 对齐结果
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPaths {
    /// 对齐后的起始路径
    pub start: PathData,
    /// 对齐后的目标路径
    pub end: PathData,
}

/// 对齐两条路径
///
/// 对任意输入，返回的两条路径 token 数相同，且命令 token 出现在相同下标。
pub fn align(from: &PathData, to: &PathData, hints: &MorphHints) -> AlignedPaths {
    let mut raw_start = from.segments();
    let mut raw_end = to.segments();

    strip_close(&mut raw_start);
    let target_closed = strip_close(&mut raw_end);

    let mut start = normalize(&raw_start);
    let mut end = normalize(&raw_end);

    let bezier = has_curve(&start) || has_curve(&end);
    if bezier {
        widen(&mut start);
        widen(&mut end);
    }

    let is_area = hints.is_area;
    let position_factor = if is_area { 2 } else { 1 };

    if !start.is_empty() && !end.is_empty() {
        let (start_x, end_x) = match (&hints.start_x, &hints.end_x) {
            (Some(start_x), Some(end_x)) => (Cow::Borrowed(start_x), Cow::Borrowed(end_x)),
            _ => (
                Cow::Owned(record_x(&start, is_area)),
                Cow::Owned(record_x(&end, is_area)),
            ),
        };

        match detect_shift(&start_x, &end_x) {
            Some(Shift { amount, reverse }) => {
                let full_len = end.len() + amount * position_factor;
                if reverse {
                    insert_leading(&mut start, full_len, is_area);
                    append_trailing(&mut end, full_len, is_area, bezier);
                } else {
                    insert_leading(&mut end, full_len, is_area);
                    append_trailing(&mut start, full_len, is_area, bezier);
                }
            }
            None => {
                debug!(
                    start_points = start_x.len(),
                    end_points = end_x.len(),
                    "数据窗口无法对齐，从空路径展开"
                );
                start.clear();
            }
        }
    }

    equalize(&mut start, &mut end, is_area, bezier);

    if target_closed {
        start.push(close_segment());
        end.push(close_segment());
    }

    AlignedPaths {
        start: PathData::from_segments(&start),
        end: PathData::from_segments(&end),
    }
}

/// 逐下标插值两条已对齐的路径
///
/// 两侧都是数值时线性插值，否则直接取目标一侧的 token；
/// 长度不一致时无法插值，直接返回目标路径。
pub fn interpolate(start: &PathData, end: &PathData, pos: f64) -> PathData {
    if start.len() != end.len() {
        return end.clone();
    }

    let tokens = start
        .tokens()
        .iter()
        .zip(end.tokens())
        .map(|(from, to)| match (from, to) {
            (PathToken::Value(a), PathToken::Value(b)) => PathToken::Value(a + (b - a) * pos),
            (_, to) => *to,
        })
        .collect();

    PathData::from_tokens(tokens)
}

/// 窗口平移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shift {
    /// 平移的数据点个数
    amount: usize,
    /// 是否向左平移（新点从左侧进入）
    reverse: bool,
}

/// 检测数据窗口平移
///
/// - 正向：旧窗口第 i 个 x 等于新窗口首个 x，新点从右侧进入
/// - 反向：旧窗口首个 x 出现在新窗口的尾部窗口中，新点从左侧进入
fn detect_shift(start_x: &[f64], end_x: &[f64]) -> Option<Shift> {
    let first_end = *end_x.first()?;
    let first_start = *start_x.first()?;

    for i in 0..start_x.len() {
        if same_x(start_x[i], first_end) {
            return Some(Shift {
                amount: i,
                reverse: false,
            });
        }

        let tail_index = (end_x.len() + i).checked_sub(start_x.len());
        if let Some(&x) = tail_index.and_then(|index| end_x.get(index))
            && same_x(first_start, x)
        {
            return Some(Shift {
                amount: i,
                reverse: true,
            });
        }
    }

    None
}

/// 取记录终点的 x；面积图只取上沿
fn record_x(segments: &[Segment], is_area: bool) -> Vec<f64> {
    let count = if is_area {
        segments.len().div_ceil(2)
    } else {
        segments.len()
    };
    segments[..count].iter().filter_map(Segment::end_x).collect()
}

fn same_x(a: f64, b: f64) -> bool {
    (a - b).abs() <= X_EPSILON
}

fn has_curve(segments: &[Segment]) -> bool {
    segments.iter().any(|s| s.command == 'C')
}

fn is_close(segment: &Segment) -> bool {
    segment.command.eq_ignore_ascii_case(&'Z')
}

fn close_segment() -> Segment {
    Segment {
        command: 'Z',
        values: Vec::new(),
    }
}

/// 去掉末尾的闭合命令，返回是否存在
fn strip_close(segments: &mut Vec<Segment>) -> bool {
    let mut closed = false;
    while segments.last().is_some_and(is_close) {
        segments.pop();
        closed = true;
    }
    closed
}

/// 把 `M`/`L` 记录补齐为曲线宽度：`x y` → `x y x y x y`
fn widen(segments: &mut [Segment]) {
    for segment in segments.iter_mut() {
        let is_move_or_line = matches!(segment.command, 'M' | 'L');
        if is_move_or_line && segment.values.len() == 2 {
            let (x, y) = (segment.values[0], segment.values[1]);
            segment.values = vec![x, y, x, y, x, y];
        }
    }
}

/// 在开头复制首点直到达到目标长度
///
/// 面积图同时在末尾复制回程终点，保持填充区域闭合。
fn insert_leading(segments: &mut Vec<Segment>, full_len: usize, is_area: bool) {
    while !segments.is_empty() && segments.len() < full_len {
        let first = segments[0].clone();
        segments[0].command = 'L';
        segments.insert(0, first);

        if is_area && segments.len() < full_len {
            if let Some(last) = segments.last().cloned() {
                segments.push(last);
            }
        }
    }
    if let Some(first) = segments.first_mut() {
        first.command = 'M';
    }
}

/// 在逻辑末尾复制末点直到达到目标长度
///
/// 普通路径插在最后；面积图插在上沿与下沿交界处，同时复制两侧的点。
fn append_trailing(segments: &mut Vec<Segment>, full_len: usize, is_area: bool, bezier: bool) {
    let position_factor = if is_area { 2 } else { 1 };

    while !segments.is_empty() && segments.len() < full_len {
        let mid = (segments.len() / position_factor).max(1);
        let upper = (mid - 1 + position_factor).min(segments.len());
        let mut slice: Vec<Segment> = segments[mid - 1..upper].to_vec();
        slice.truncate(full_len - segments.len());

        if slice[0].command == 'M' {
            slice[0].command = 'L';
        }
        // 复制出的曲线段首控制点落在终点上，避免在接缝处鼓包
        if bezier && slice[0].values.len() == CURVE_WIDTH {
            slice[0].values[0] = slice[0].values[4];
            slice[0].values[1] = slice[0].values[5];
        }

        segments.splice(mid..mid, slice);
    }
}

/// 把较短的一侧补齐到等长
fn equalize(start: &mut Vec<Segment>, end: &mut Vec<Segment>, is_area: bool, bezier: bool) {
    if start.is_empty() && end.is_empty() {
        return;
    }
    if start.is_empty() {
        *start = degenerate(end);
    } else if end.is_empty() {
        *end = degenerate(start);
    }

    let target = start.len().max(end.len());
    append_trailing(start, target, is_area, bezier);
    append_trailing(end, target, is_area, bezier);
}

/// 以 `template` 的命令布局构造退化路径：所有坐标都落在其首点上
fn degenerate(template: &[Segment]) -> Vec<Segment> {
    let (x, y) = template
        .iter()
        .find_map(Segment::end_point)
        .unwrap_or((0.0, 0.0));

    template
        .iter()
        .map(|segment| Segment {
            command: segment.command,
            values: segment
                .values
                .iter()
                .enumerate()
                .map(|(i, _)| if i % 2 == 0 { x } else { y })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> PathData {
        PathData::parse(s).unwrap()
    }

    /// 两条路径等长且命令位置一致
    fn assert_aligned(aligned: &AlignedPaths) {
        assert_eq!(aligned.start.len(), aligned.end.len());
        for (a, b) in aligned.start.tokens().iter().zip(aligned.end.tokens()) {
            assert_eq!(a.is_command(), b.is_command(), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_same_layout_is_untouched() {
        let from = path("M 0 0 L 10 10 L 20 0");
        let to = path("M 0 5 L 10 15 L 20 5");
        let aligned = align(&from, &to, &MorphHints::default());
        assert_eq!(aligned.start, from);
        assert_eq!(aligned.end, to);
    }

    #[test]
    fn test_triangle_to_star() {
        let triangle = path("M 0 0 L 10 0 L 5 10 Z");
        let star = path("M 5 0 L 7 4 L 10 4 L 7 6 L 8 10 L 5 7 L 2 10 L 3 6 L 0 4 L 3 4 Z");
        let aligned = align(&triangle, &star, &MorphHints::default());
        assert_aligned(&aligned);
        // 三角形首点 x 出现在星形尾部，按左移一个点处理
        insta::assert_snapshot!(aligned.end.to_string(), @"M 5 0 L 7 4 L 10 4 L 7 6 L 8 10 L 5 7 L 2 10 L 3 6 L 0 4 L 3 4 L 3 4 Z");
        assert!(aligned.start.has_command('Z'));
    }

    #[test]
    fn test_same_first_x_keeps_target() {
        let square = path("M 0 0 L 10 0 L 10 10 Z");
        let house = path("M 0 0 L 5 -5 L 10 0 L 10 10 L 0 10 Z");
        let aligned = align(&square, &house, &MorphHints::default());
        assert_aligned(&aligned);
        assert_eq!(aligned.end, house);
    }

    #[test]
    fn test_mixed_command_widths_align() {
        let pairs = [
            ("M 0 0 L 10 10 Z M 20 20 L 30 30", "M 0 0 L 1 1 L 2 2 L 3 3 L 4 4"),
            ("m 0 0 l 10 10", "M 0 0 C 1 1 2 2 3 3"),
            ("M 0 0 H 10 V 10 H 0 Z", "M 0 0 C 1 1 2 2 3 3 L 5 5"),
            (
                "M 10 0 A 10 10 0 0 1 0 10 Z",
                "M 10 0 A 10 10 0 0 1 0 10 L 0 5 A 5 5 0 0 0 5 0 Z",
            ),
            ("M 0 0 Q 5 5 10 0 T 20 0", "M 0 0 L 20 0"),
        ];
        for (a, b) in pairs {
            assert_aligned(&align(&path(a), &path(b), &MorphHints::default()));
            assert_aligned(&align(&path(b), &path(a), &MorphHints::default()));
        }
    }

    #[test]
    fn test_longer_start_pads_end() {
        let from = path("M 0 0 L 1 1 L 2 2 L 3 3");
        let to = path("M 0 0 L 5 5");
        let aligned = align(&from, &to, &MorphHints::default());
        assert_aligned(&aligned);
        insta::assert_snapshot!(aligned.end.to_string(), @"M 0 0 L 5 5 L 5 5 L 5 5");
    }

    #[test]
    fn test_empty_from_grows_from_first_point() {
        let to = path("M 3 4 L 10 10 L 20 0");
        let aligned = align(&PathData::new(), &to, &MorphHints::default());
        assert_aligned(&aligned);
        insta::assert_snapshot!(aligned.start.to_string(), @"M 3 4 L 3 4 L 3 4");
        assert_eq!(aligned.end, to);
    }

    #[test]
    fn test_forward_shift() {
        // 窗口右移两个点：0 1 2 3 → 2 3 4 5
        let from = path("M 0 0 L 1 1 L 2 2 L 3 3");
        let to = path("M 2 2 L 3 3 L 4 4 L 5 5");
        let hints = MorphHints::default()
            .with_window(vec![0.0, 1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0, 5.0]);
        let aligned = align(&from, &to, &hints);
        assert_aligned(&aligned);
        insta::assert_snapshot!(aligned.end.to_string(), @"M 2 2 L 2 2 L 2 2 L 3 3 L 4 4 L 5 5");
        insta::assert_snapshot!(aligned.start.to_string(), @"M 0 0 L 1 1 L 2 2 L 3 3 L 3 3 L 3 3");
    }

    #[test]
    fn test_forward_shift_without_hints() {
        let from = path("M 0 0 L 1 1 L 2 2 L 3 3");
        let to = path("M 2 2 L 3 3 L 4 4 L 5 5");
        let aligned = align(&from, &to, &MorphHints::default());
        assert_aligned(&aligned);
        insta::assert_snapshot!(aligned.end.to_string(), @"M 2 2 L 2 2 L 2 2 L 3 3 L 4 4 L 5 5");
        insta::assert_snapshot!(aligned.start.to_string(), @"M 0 0 L 1 1 L 2 2 L 3 3 L 3 3 L 3 3");
    }

    #[test]
    fn test_unrelated_shapes_without_hints_grow_from_empty() {
        let from = path("M 0 0 L 1 1");
        let to = path("M 10 10 L 11 11");
        let aligned = align(&from, &to, &MorphHints::default());
        insta::assert_snapshot!(aligned.start.to_string(), @"M 10 10 L 10 10");
    }

    #[test]
    fn test_explicit_hints_override_record_x() {
        // 记录的 x 无法对齐，提示声明窗口未平移
        let from = path("M 0 0 L 1 1");
        let to = path("M 10 10 L 11 11");
        let hints = MorphHints::default().with_window(vec![0.0, 1.0], vec![0.0, 1.0]);
        let aligned = align(&from, &to, &hints);
        assert_eq!(aligned.start, from);
        assert_eq!(aligned.end, to);
    }

    #[test]
    fn test_reverse_shift() {
        // 窗口左移两个点：2 3 4 → 0 1 2
        let from = path("M 2 2 L 3 3 L 4 4");
        let to = path("M 0 0 L 1 1 L 2 2");
        let hints =
            MorphHints::default().with_window(vec![2.0, 3.0, 4.0], vec![0.0, 1.0, 2.0]);
        let aligned = align(&from, &to, &hints);
        assert_aligned(&aligned);
        insta::assert_snapshot!(aligned.start.to_string(), @"M 2 2 L 2 2 L 2 2 L 3 3 L 4 4");
        insta::assert_snapshot!(aligned.end.to_string(), @"M 0 0 L 1 1 L 2 2 L 2 2 L 2 2");
    }

    #[test]
    fn test_unrelated_window_falls_back_to_empty() {
        let from = path("M 0 0 L 1 1");
        let to = path("M 10 10 L 11 11");
        let hints = MorphHints::default().with_window(vec![0.0, 1.0], vec![10.0, 11.0]);
        let aligned = align(&from, &to, &hints);
        assert_aligned(&aligned);
        insta::assert_snapshot!(aligned.start.to_string(), @"M 10 10 L 10 10");
    }

    #[test]
    fn test_area_padding_is_mirrored() {
        // 上沿 3 点 + 下沿 3 点 → 上沿 4 点 + 下沿 4 点
        let from = path("M 0 0 L 1 1 L 2 2 L 2 9 L 1 9 L 0 9");
        let to = path("M 1 1 L 2 2 L 3 3 L 3 9 L 2 9 L 1 9");
        let hints = MorphHints::area().with_window(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]);
        let aligned = align(&from, &to, &hints);
        assert_aligned(&aligned);
        insta::assert_snapshot!(aligned.end.to_string(), @"M 1 1 L 1 1 L 2 2 L 3 3 L 3 9 L 2 9 L 1 9 L 1 9");
        insta::assert_snapshot!(aligned.start.to_string(), @"M 0 0 L 1 1 L 2 2 L 2 2 L 2 9 L 2 9 L 1 9 L 0 9");
    }

    #[test]
    fn test_curves_widen_lines() {
        let from = path("M 0 0 L 10 10");
        let to = path("M 0 0 C 1 1 2 2 10 10 C 11 11 12 12 20 20");
        let aligned = align(&from, &to, &MorphHints::default());
        assert_aligned(&aligned);
        // M 与 L 被补齐为 6 个参数
        assert_eq!(aligned.end.len(), 3 * 7);
        assert_eq!(&aligned.start.to_string()[..17], "M 0 0 0 0 0 0 L 1");
    }

    #[test]
    fn test_interpolate_midpoint() {
        let start = path("M 0 0 L 10 20");
        let end = path("M 10 10 L 20 40");
        let mid = interpolate(&start, &end, 0.5);
        assert_eq!(mid.to_string(), "M 5 5 L 15 30");
    }

    #[test]
    fn test_interpolate_takes_target_on_mismatch() {
        let start = PathData::from_tokens(vec![
            PathToken::Command('M'),
            PathToken::Value(0.0),
            PathToken::Command('L'),
        ]);
        let end = PathData::from_tokens(vec![
            PathToken::Command('M'),
            PathToken::Command('L'),
            PathToken::Value(4.0),
        ]);
        let mid = interpolate(&start, &end, 0.5);
        assert_eq!(mid, end);
    }

    #[test]
    fn test_interpolate_length_mismatch_returns_target() {
        let start = path("M 0 0");
        let end = path("M 0 0 L 1 1");
        assert_eq!(interpolate(&start, &end, 0.3), end);
    }
}

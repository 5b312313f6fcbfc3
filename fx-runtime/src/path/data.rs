//! # Path Data
//!
//! 路径轮廓的 token 表示：单字母命令与数值坐标交替出现。

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// 路径 token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathToken {
    /// 命令字母（`M`/`L`/`C`/`Z` 等）
    Command(char),
    /// 数值坐标
    Value(f64),
}

impl PathToken {
    /// 是否为命令
    pub fn is_command(&self) -> bool {
        matches!(self, PathToken::Command(_))
    }

    /// 取数值
    pub fn value(&self) -> Option<f64> {
        match self {
            PathToken::Value(v) => Some(*v),
            PathToken::Command(_) => None,
        }
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Command(c) => write!(f, "{}", c),
            PathToken::Value(v) => write!(f, "{}", v),
        }
    }
}

/// 一条路径记录：命令字母加上它后面的全部数值参数
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segment {
    pub command: char,
    pub values: Vec<f64>,
}

impl Segment {
    /// 记录终点的 x 坐标
    pub fn end_x(&self) -> Option<f64> {
        let len = self.values.len();
        (len >= 2).then(|| self.values[len - 2])
    }

    /// 记录终点
    pub fn end_point(&self) -> Option<(f64, f64)> {
        let len = self.values.len();
        (len >= 2).then(|| (self.values[len - 2], self.values[len - 1]))
    }
}

/// 路径轮廓
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    tokens: Vec<PathToken>,
}

impl PathData {
    /// 创建空路径
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 token 列表构造
    pub fn from_tokens(tokens: Vec<PathToken>) -> Self {
        Self { tokens }
    }

    /// 解析路径字符串
    ///
    /// 支持空格/逗号分隔以及紧凑写法（`M0,0L10-5`）。
    pub fn parse(source: &str) -> Result<Self, PathError> {
        let mut tokens = Vec::new();
        let mut number = String::new();

        fn flush(number: &mut String, tokens: &mut Vec<PathToken>) -> Result<(), PathError> {
            if number.is_empty() {
                return Ok(());
            }
            let value = number
                .parse::<f64>()
                .map_err(|_| PathError::InvalidToken {
                    index: tokens.len(),
                    token: number.clone(),
                })?;
            tokens.push(PathToken::Value(value));
            number.clear();
            Ok(())
        }

        for c in source.chars() {
            match c {
                'e' | 'E' if !number.is_empty() => number.push(c),
                c if c.is_ascii_alphabetic() => {
                    flush(&mut number, &mut tokens)?;
                    tokens.push(PathToken::Command(c));
                }
                c if c.is_whitespace() || c == ',' => flush(&mut number, &mut tokens)?,
                '-' | '+' if !number.is_empty() && !number.ends_with(['e', 'E']) => {
                    flush(&mut number, &mut tokens)?;
                    number.push(c);
                }
                c if c.is_ascii_digit() || matches!(c, '.' | '-' | '+') => number.push(c),
                other => {
                    return Err(PathError::InvalidToken {
                        index: tokens.len(),
                        token: other.to_string(),
                    });
                }
            }
        }
        flush(&mut number, &mut tokens)?;

        if let Some(PathToken::Value(v)) = tokens.first() {
            return Err(PathError::MissingCommand {
                token: v.to_string(),
            });
        }

        Ok(Self { tokens })
    }

    /// 全部 token
    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    /// token 数量
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// 是否为空路径
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// 是否包含某个命令
    pub fn has_command(&self, command: char) -> bool {
        self.tokens.contains(&PathToken::Command(command))
    }

    /// 追加命令与参数
    pub fn push(&mut self, command: char, values: &[f64]) {
        self.tokens.push(PathToken::Command(command));
        self.tokens
            .extend(values.iter().copied().map(PathToken::Value));
    }

    /// 移动到
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.push('M', &[x, y]);
        self
    }

    /// 直线到
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.push('L', &[x, y]);
        self
    }

    /// 三次贝塞尔曲线到
    pub fn curve_to(mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        self.push('C', &[x1, y1, x2, y2, x, y]);
        self
    }

    /// 闭合
    pub fn close(mut self) -> Self {
        self.push('Z', &[]);
        self
    }

    /// 按命令拆分为记录
    ///
    /// 开头出现的孤立数值（没有所属命令）会被丢弃。
    pub(crate) fn segments(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        for token in &self.tokens {
            match token {
                PathToken::Command(c) => segments.push(Segment {
                    command: *c,
                    values: Vec::new(),
                }),
                PathToken::Value(v) => {
                    if let Some(last) = segments.last_mut() {
                        last.values.push(*v);
                    }
                }
            }
        }
        segments
    }

    /// 由记录重新拼接
    pub(crate) fn from_segments(segments: &[Segment]) -> Self {
        let mut data = Self::new();
        for segment in segments {
            data.push(segment.command, &segment.values);
        }
        data
    }
}

impl FromStr for PathData {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spaced() {
        let path = PathData::parse("M 0 0 L 10 20 Z").unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(path.tokens()[0], PathToken::Command('M'));
        assert_eq!(path.tokens()[5], PathToken::Value(20.0));
        assert_eq!(path.to_string(), "M 0 0 L 10 20 Z");
    }

    #[test]
    fn test_parse_compact() {
        let path = PathData::parse("M0,0L10-5C1.5e1 2 3 4 5 6").unwrap();
        insta::assert_snapshot!(path.to_string(), @"M 0 0 L 10 -5 C 15 2 3 4 5 6");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PathData::parse("M 0 0 L 1.2.3 4"),
            Err(PathError::InvalidToken { .. })
        ));
        assert!(matches!(
            PathData::parse("10 10 L 0 0"),
            Err(PathError::MissingCommand { .. })
        ));
        assert!(matches!(
            PathData::parse("M 0 0 # 1"),
            Err(PathError::InvalidToken { .. })
        ));
        assert!(PathData::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_builder_and_segments() {
        let path = PathData::new().move_to(0.0, 0.0).line_to(5.0, 6.0).close();
        let segments = path.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].end_point(), Some((5.0, 6.0)));
        assert_eq!(segments[2].end_x(), None);
        assert_eq!(PathData::from_segments(&segments), path);
    }
}

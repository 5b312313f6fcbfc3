//! # Path 模块
//!
//! 路径轮廓的解析、序列化与形变对齐。

mod data;
pub mod morph;
mod normalize;

pub use data::{PathData, PathToken};
pub use morph::{AlignedPaths, MorphHints, align, interpolate};

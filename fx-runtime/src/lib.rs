//! # Fx Runtime
//!
//! 矢量图形元素的属性动画与属性写入引擎。
//!
//! ## 架构概述
//!
//! ```text
//! Scheduler ──tick──► Animator ──commit──► Element (AttributeWriter) ──► Node
//!                        │                     │
//!                        ├─ path::align        ├─ setter 表
//!                        └─ ColorTween         └─ transform 合成 / 写入抑制
//! ```
//!
//! 整个子系统是单线程、协作式的：调度器由帧源驱动，
//! Animator 的 `step` 一次执行完毕，停止只设置标记，下一帧才真正移除。
//!
//! ## 模块结构
//!
//! - [`animation`]：Animator、批次、调度器、帧源
//! - [`element`]：元素接口、SVG/HTML 元素、setter 表、符号、变换
//! - [`path`]：路径解析与形变对齐
//! - [`color`]：颜色插值
//! - [`easing`]：缓动函数
//! - [`value`]：属性值与属性批次
//! - [`config`]：运行时配置
//! - [`error`]：错误类型定义

pub mod animation;
pub mod color;
pub mod config;
pub mod easing;
pub mod element;
pub mod error;
pub mod path;
pub mod value;

// 重导出核心类型
pub use animation::{
    AnimationOptions, AnimationState, Animator, FrameSource, IntervalFrameSource, ManualClock,
    Scheduler, StepEvent,
};
pub use color::{ColorTween, Rgba, RgbaTween};
pub use config::FxConfig;
pub use easing::EasingFunction;
pub use element::{
    Animatable, ElementKind, ElementRef, HtmlElement, MemoryNode, Node, SvgElement, SymbolRegistry,
};
pub use error::{ConfigError, FxError, FxResult, PathError};
pub use path::{AlignedPaths, MorphHints, PathData, PathToken};
pub use value::{AttrValue, Attrs};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _config = FxConfig::default();
        let _options = AnimationOptions::new(100.0).with_easing(EasingFunction::Linear);
        let _attrs = Attrs::new().with("x", 1).with("fill", "#fff");
        let _path = PathData::new().move_to(0.0, 0.0).line_to(1.0, 1.0);
        let _element = SvgElement::path(MemoryNode::new()).into_shared();
    }
}

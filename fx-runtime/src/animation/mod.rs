//! # Animation 模块
//!
//! 属性动画：时间轴、缓动、批次完成与帧调度。
//!
//! ## 核心概念
//!
//! - `Animator`: 单个元素单个属性的动画实例（数值 / 颜色 / 路径三种插值）
//! - `Batch`: 一次 `animate` 调用启动的 Animator 共享的完成状态
//! - `Scheduler`: 持有活动 Animator 列表，每帧推进一次
//! - `FrameSource`: 时钟与帧请求
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let clock = Rc::new(ManualClock::default());
//! let scheduler = Scheduler::new(clock.clone());
//! let rect = SvgElement::path(MemoryNode::new()).into_shared();
//!
//! scheduler.animate(
//!     &rect,
//!     Attrs::new().with("width", 150),
//!     AnimationOptions::new(300.0).on_complete(|| info!("done")),
//! );
//!
//! clock.advance(16.0);
//! scheduler.tick();
//! ```

mod animator;
mod batch;
mod frame;
mod options;
mod scheduler;

pub use animator::{AnimationState, Animator, Timing};
pub use batch::Batch;
pub use frame::{DEFAULT_FRAME_INTERVAL, FrameSource, IntervalFrameSource, ManualClock};
pub use options::{AnimationOptions, CompleteCallback, StepCallback, StepEvent};
pub use scheduler::{AnimatorId, Scheduler, current_value};

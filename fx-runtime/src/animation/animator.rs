//! # Animator 模块
//!
//! 单个元素单个属性的动画实例。
//!
//! Animator 只持有元素的弱引用：元素被释放或销毁后，下一次 `step` 直接结束，
//! 不再写入任何值，也不触发完成回调。

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::batch::Batch;
use super::options::StepEvent;
use crate::color::ColorTween;
use crate::easing::EasingFunction;
use crate::element::{Animatable, ElementRef};
use crate::path::{self, PathData};
use crate::value::AttrValue;

/// 动画状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// 尚未启动
    #[default]
    Pending,
    /// 正在播放
    Playing,
    /// 已到达终点
    Completed,
    /// 已停止（外部停止或元素失效）
    Stopped,
}

impl AnimationState {
    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped)
    }
}

/// 时长与缓动
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// 时长（毫秒）
    pub duration: f64,
    /// 缓动函数
    pub easing: EasingFunction,
}

/// 插值方式
#[derive(Debug, Clone, PartialEq)]
enum Interpolation {
    /// 数值线性插值，可附带单位
    Number {
        from: f64,
        to: f64,
        unit: Option<&'static str>,
    },
    /// 颜色，由 ColorTween 计算
    Color { from: String, to: String },
    /// 路径：对齐后的起止路径与原始目标
    Path {
        start: PathData,
        end: PathData,
        target: PathData,
    },
    /// 目标无法插值，终点直接写入
    Snap { to: AttrValue },
}

#[derive(Debug)]
struct Progress {
    interpolation: Option<Interpolation>,
    start_time: f64,
    now: f64,
    pos: f64,
    state: AnimationState,
}

/// 属性动画实例
pub struct Animator {
    element: Weak<RefCell<dyn Animatable>>,
    property: String,
    timing: Timing,
    stopped: Cell<bool>,
    progress: RefCell<Progress>,
    batch: Rc<Batch>,
    color: Rc<dyn ColorTween>,
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("property", &self.property)
            .field("timing", &self.timing)
            .field("stopped", &self.stopped.get())
            .field("progress", &self.progress.borrow())
            .finish()
    }
}

/// 判断是否为颜色属性
fn is_color_property(property: &str) -> bool {
    matches!(property, "fill" | "stroke")
}

impl Animator {
    /// 创建 Animator（尚未启动）
    pub fn new(
        element: &ElementRef,
        property: impl Into<String>,
        timing: Timing,
        batch: Rc<Batch>,
        color: Rc<dyn ColorTween>,
    ) -> Self {
        Self {
            element: Rc::downgrade(element),
            property: property.into(),
            timing,
            stopped: Cell::new(false),
            progress: RefCell::new(Progress {
                interpolation: None,
                start_time: 0.0,
                now: 0.0,
                pos: 0.0,
                state: AnimationState::Pending,
            }),
            batch,
            color,
        }
    }

    /// 属性名
    pub fn property(&self) -> &str {
        &self.property
    }

    /// 是否作用于给定元素
    pub fn targets(&self, element: &ElementRef) -> bool {
        std::ptr::addr_eq(self.element.as_ptr(), Rc::as_ptr(element))
    }

    /// 当前状态
    pub fn state(&self) -> AnimationState {
        self.progress.borrow().state
    }

    /// 当前数值（路径/颜色动画为进度本身）
    pub fn now(&self) -> f64 {
        self.progress.borrow().now
    }

    /// 当前进度
    pub fn pos(&self) -> f64 {
        self.progress.borrow().pos
    }

    /// 停止：不再写入，也不会触发完成回调
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    /// 是否已被停止
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    /// 启动
    ///
    /// 返回 `false` 表示起止值相同被短路：批次中该属性直接标记完成，
    /// 不需要注册到调度器。
    pub fn start(&self, now: f64, from: AttrValue, to: AttrValue) -> bool {
        let Some(element) = self.element.upgrade() else {
            self.progress.borrow_mut().state = AnimationState::Stopped;
            return false;
        };

        let (force, unit, hints) = {
            let el = element.borrow();
            (
                el.force_animate(&self.property),
                el.unit_for(&self.property),
                el.morph_hints(),
            )
        };
        drop(element);

        let interpolation = if self.property == "d" {
            let from_path = to_path(&from);
            let target = to_path(&to);
            let aligned = path::align(&from_path, &target, &hints);
            Interpolation::Path {
                start: aligned.start,
                end: aligned.end,
                target,
            }
        } else if is_color_property(&self.property) {
            Interpolation::Color {
                from: from.to_string(),
                to: to.to_string(),
            }
        } else {
            match to.as_number() {
                Some(to_n) => Interpolation::Number {
                    from: from.as_number().unwrap_or(0.0),
                    to: to_n,
                    unit,
                },
                None => Interpolation::Snap { to: to.clone() },
            }
        };

        let unchanged = match &interpolation {
            Interpolation::Number { from, to, .. } => from == to,
            Interpolation::Color { from, to } => from == to,
            Interpolation::Path { .. } | Interpolation::Snap { .. } => false,
        };

        if unchanged && !force {
            trace!(property = %self.property, "起止值相同，跳过动画");
            self.progress.borrow_mut().state = AnimationState::Completed;
            self.batch.finish(&self.property);
            return false;
        }

        let mut progress = self.progress.borrow_mut();
        progress.now = match &interpolation {
            Interpolation::Number { from, .. } => *from,
            _ => 0.0,
        };
        progress.interpolation = Some(interpolation);
        progress.start_time = now;
        progress.pos = 0.0;
        progress.state = AnimationState::Playing;
        true
    }

    /// 推进到时间 `now`
    ///
    /// `force_end` 为真时直接跳到终点。返回 `true` 表示仍需继续 tick。
    pub fn step(&self, now: f64, force_end: bool) -> bool {
        if self.stopped.get() {
            self.progress.borrow_mut().state = AnimationState::Stopped;
            return false;
        }
        if self.progress.borrow().state != AnimationState::Playing {
            return false;
        }

        let element = match self.element.upgrade() {
            Some(element) if !element.borrow().is_destroyed() => element,
            _ => {
                debug!(property = %self.property, "元素已销毁，结束动画");
                self.progress.borrow_mut().state = AnimationState::Stopped;
                return false;
            }
        };

        let (value, current, pos, finished) = {
            let mut progress = self.progress.borrow_mut();
            let elapsed = now - progress.start_time;
            let Some(interpolation) = progress.interpolation.as_ref() else {
                return false;
            };
            let finished = force_end
                || elapsed >= self.timing.duration
                || matches!(interpolation, Interpolation::Snap { .. });

            let pos = if finished {
                1.0
            } else {
                self.timing.easing.apply(elapsed / self.timing.duration)
            };
            let current = match interpolation {
                Interpolation::Number { to, .. } if finished => *to,
                Interpolation::Number { from, to, .. } => from + (to - from) * pos,
                _ => pos,
            };
            let value = self.value_at(interpolation, current, pos, finished);

            progress.pos = pos;
            progress.now = current;
            if finished {
                progress.state = AnimationState::Completed;
            }
            (value, current, pos, finished)
        };

        element.borrow_mut().commit(&self.property, value);
        drop(element);

        self.batch.notify_step(&StepEvent {
            property: &self.property,
            now: current,
            pos,
        });

        if finished {
            trace!(property = %self.property, "动画完成");
            self.batch.finish(&self.property);
            return false;
        }
        true
    }

    fn value_at(
        &self,
        interpolation: &Interpolation,
        current: f64,
        pos: f64,
        finished: bool,
    ) -> AttrValue {
        match interpolation {
            Interpolation::Number { unit: Some(unit), .. } => {
                AttrValue::Text(format!("{}{}", current, unit))
            }
            Interpolation::Number { unit: None, .. } => AttrValue::Number(current),
            Interpolation::Color { from, to } => {
                AttrValue::Text(self.color.tween(from, to, pos))
            }
            Interpolation::Path { target, .. } if finished => AttrValue::Path(target.clone()),
            Interpolation::Path { start, end, .. } => {
                AttrValue::Path(path::interpolate(start, end, pos))
            }
            Interpolation::Snap { to } => to.clone(),
        }
    }
}

/// 把属性值解释为路径，无法解析时视为空路径
fn to_path(value: &AttrValue) -> PathData {
    match value {
        AttrValue::Path(p) => p.clone(),
        AttrValue::Text(s) => PathData::parse(s).unwrap_or_else(|e| {
            debug!(error = %e, "路径解析失败，按空路径处理");
            PathData::new()
        }),
        _ => PathData::new(),
    }
}

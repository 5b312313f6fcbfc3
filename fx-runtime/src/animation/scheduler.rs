//! # Scheduler 模块
//!
//! 全局 tick 调度器。
//!
//! 所有运行中的 Animator 保存在一个有序列表里，每帧按注册顺序推进一次。
//! tick 期间可以安全地 `animate`/`stop`/`attr`：
//! 新注册的 Animator 在同一帧内就会被推进，被停止的在下一帧从列表移除。

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use tracing::{debug, trace};

use super::animator::{Animator, Timing};
use super::batch::Batch;
use super::frame::{FrameSource, IntervalFrameSource};
use super::options::AnimationOptions;
use crate::color::{ColorTween, RgbaTween};
use crate::config::FxConfig;
use crate::element::{Animatable, ElementRef};
use crate::value::{AttrValue, Attrs};

new_key_type! {
    /// Animator 句柄
    pub struct AnimatorId;
}

struct SchedulerInner {
    animators: SlotMap<AnimatorId, Rc<Animator>>,
    order: Vec<AnimatorId>,
    running: bool,
    enabled: bool,
}

/// 动画调度器
///
/// 可以廉价克隆，克隆体共享同一个活动列表。
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
    frames: Rc<dyn FrameSource>,
    color: Rc<dyn ColorTween>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("active", &inner.order.len())
            .field("running", &inner.running)
            .field("enabled", &inner.enabled)
            .finish()
    }
}

thread_local! {
    static DEFAULT_SCHEDULER: Scheduler = Scheduler::new(Rc::new(IntervalFrameSource::default()));
}

impl Scheduler {
    /// 使用给定帧源创建调度器
    pub fn new(frames: Rc<dyn FrameSource>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                animators: SlotMap::with_key(),
                order: Vec::new(),
                running: false,
                enabled: true,
            })),
            frames,
            color: Rc::new(RgbaTween),
        }
    }

    /// 按配置创建调度器（固定间隔帧源）
    pub fn from_config(config: &FxConfig) -> Self {
        let scheduler = Self::new(Rc::new(IntervalFrameSource::new(config.frame_interval())));
        scheduler.set_enabled(config.enabled);
        scheduler
    }

    /// 替换颜色插值实现
    pub fn with_color_tween(mut self, color: Rc<dyn ColorTween>) -> Self {
        self.color = color;
        self
    }

    /// 访问当前线程的默认调度器
    pub fn with_default<R>(f: impl FnOnce(&Scheduler) -> R) -> R {
        DEFAULT_SCHEDULER.with(f)
    }

    /// 启用或关闭动画
    ///
    /// 关闭时 `animate` 同步跳到终值。
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.borrow_mut().enabled = enabled;
    }

    /// 动画是否启用
    pub fn is_enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    /// 帧源
    pub fn frames(&self) -> &Rc<dyn FrameSource> {
        &self.frames
    }

    /// 为元素的一批属性启动动画
    ///
    /// 同一元素同一属性上已有的动画会先被停止。
    /// 起止值相同（且未强制）的属性立即在批次中标记完成；
    /// 全部属性都被短路时，完成回调在本函数返回前触发。
    pub fn animate<E: Animatable>(
        &self,
        element: &Rc<RefCell<E>>,
        properties: Attrs,
        options: AnimationOptions,
    ) {
        let element: ElementRef = element.clone();
        let AnimationOptions {
            duration,
            easing,
            complete,
            step,
        } = options;
        let timing = Timing {
            duration: duration.max(0.0),
            easing,
        };
        let batch = Rc::new(Batch::new(properties.keys(), complete, step));
        let force_end = !self.is_enabled();
        let now = self.frames.now();

        for (property, target) in properties.iter() {
            self.stop_matching(&element, Some(property));

            let from = element.borrow().current(property);
            let animator = Rc::new(Animator::new(
                &element,
                property,
                timing,
                batch.clone(),
                self.color.clone(),
            ));

            if !animator.start(now, from, target.clone()) {
                continue;
            }
            if animator.step(now, force_end) {
                self.register(animator);
            }
        }
    }

    /// 停止元素上的动画
    ///
    /// `property` 为 `None` 时停止该元素的全部动画。被停止的动画不再写入，也不触发完成回调。
    pub fn stop<E: Animatable>(&self, element: &Rc<RefCell<E>>, property: Option<&str>) {
        let element: ElementRef = element.clone();
        self.stop_matching(&element, property);
    }

    /// 直接写入属性
    ///
    /// 先停止这些属性上正在运行的动画，避免下一帧被动画覆盖。
    pub fn attr<E: Animatable>(&self, element: &Rc<RefCell<E>>, attrs: &Attrs) {
        let shared: ElementRef = element.clone();
        for key in attrs.keys() {
            self.stop_matching(&shared, Some(key));
        }
        shared.borrow_mut().apply(attrs);
    }

    /// 元素（的某个属性）上是否有运行中的动画
    pub fn is_animating<E: Animatable>(
        &self,
        element: &Rc<RefCell<E>>,
        property: Option<&str>,
    ) -> bool {
        let element: ElementRef = element.clone();
        self.inner.borrow().animators.values().any(|animator| {
            !animator.is_stopped()
                && animator.targets(&element)
                && property.is_none_or(|p| animator.property() == p)
        })
    }

    /// 活动列表中的 Animator 数量（含已停止、待下一帧移除的）
    pub fn active_count(&self) -> usize {
        self.inner.borrow().order.len()
    }

    /// 是否有帧循环在运行
    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// 推进一帧
    pub fn tick(&self) {
        let now = self.frames.now();
        // 本帧回调中新注册的 Animator 已在 animate 中走过第一步，下一帧再推进
        let count = self.inner.borrow().order.len();

        for index in 0..count {
            let next = {
                let inner = self.inner.borrow();
                let Some(&id) = inner.order.get(index) else {
                    break;
                };
                inner.animators.get(id).map(|a| (id, a.clone()))
            };

            let Some((id, animator)) = next else {
                continue;
            };
            if !animator.step(now, false) {
                self.inner.borrow_mut().animators.remove(id);
            }
        }

        let still_running = {
            let mut inner = self.inner.borrow_mut();
            let SchedulerInner {
                animators,
                order,
                running,
                ..
            } = &mut *inner;
            order.retain(|id| animators.contains_key(*id));
            *running = !order.is_empty();
            *running
        };

        if still_running {
            self.frames.request_frame();
        } else {
            debug!("动画队列已清空，停止 tick");
        }
    }

    /// 持续 tick 直到没有运行中的动画
    pub fn run_until_idle(&self) {
        while self.frames.wait_for_frame() {
            self.tick();
        }
    }

    fn register(&self, animator: Rc<Animator>) {
        let start_loop = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.animators.insert(animator);
            inner.order.push(id);
            trace!(?id, "注册 Animator");
            !std::mem::replace(&mut inner.running, true)
        };
        if start_loop {
            self.frames.request_frame();
        }
    }

    fn stop_matching(&self, element: &ElementRef, property: Option<&str>) {
        let inner = self.inner.borrow();
        for animator in inner.animators.values() {
            if animator.targets(element) && property.is_none_or(|p| animator.property() == p) {
                animator.stop();
            }
        }
    }
}

/// 读取元素属性的便捷函数
pub fn current_value<E: Animatable>(element: &Rc<RefCell<E>>, property: &str) -> AttrValue {
    element.borrow().current(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::frame::ManualClock;
    use crate::easing::EasingFunction;
    use crate::element::{MemoryNode, SvgElement};
    use std::cell::Cell;

    fn setup() -> (Rc<ManualClock>, Scheduler) {
        let clock = Rc::new(ManualClock::default());
        let scheduler = Scheduler::new(clock.clone());
        (clock, scheduler)
    }

    fn linear(duration: f64) -> AnimationOptions {
        AnimationOptions::new(duration).with_easing(EasingFunction::Linear)
    }

    #[test]
    fn test_register_requests_single_frame() {
        let (clock, scheduler) = setup();
        let el = SvgElement::group(MemoryNode::new()).into_shared();

        scheduler.animate(&el, Attrs::new().with("x", 10).with("y", 20), linear(100.0));

        assert_eq!(scheduler.active_count(), 2);
        assert!(scheduler.is_running());
        assert_eq!(clock.frame_requests(), 1);
    }

    #[test]
    fn test_tick_removes_finished_and_stops_loop() {
        let (clock, scheduler) = setup();
        let el = SvgElement::group(MemoryNode::new()).into_shared();

        scheduler.animate(&el, Attrs::new().with("x", 10), linear(100.0));
        clock.set(50.0);
        scheduler.tick();
        assert_eq!(current_value(&el, "x"), AttrValue::Number(5.0));
        assert!(scheduler.is_running());

        clock.set(100.0);
        scheduler.tick();
        assert_eq!(current_value(&el, "x"), AttrValue::Number(10.0));
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_animate_replaces_running_animation() {
        let (clock, scheduler) = setup();
        let el = SvgElement::group(MemoryNode::new()).into_shared();

        scheduler.animate(&el, Attrs::new().with("x", 100), linear(100.0));
        clock.set(50.0);
        scheduler.tick();
        scheduler.animate(&el, Attrs::new().with("x", 0), linear(100.0));
        assert!(scheduler.is_animating(&el, Some("x")));

        clock.set(100.0);
        scheduler.tick();
        assert_eq!(current_value(&el, "x"), AttrValue::Number(25.0));
        assert_eq!(scheduler.active_count(), 1);
    }

    #[test]
    fn test_animate_from_complete_callback() {
        let (clock, scheduler) = setup();
        let el = SvgElement::group(MemoryNode::new()).into_shared();
        let chained = Rc::new(Cell::new(false));

        let inner_scheduler = scheduler.clone();
        let inner_el = el.clone();
        let flag = chained.clone();
        scheduler.animate(
            &el,
            Attrs::new().with("x", 10),
            linear(100.0).on_complete(move || {
                inner_scheduler.animate(
                    &inner_el,
                    Attrs::new().with("y", 10),
                    linear(100.0).on_complete(move || flag.set(true)),
                );
            }),
        );

        clock.set(100.0);
        scheduler.tick();
        assert!(scheduler.is_animating(&el, Some("y")));
        assert!(!chained.get());
        // 新动画在本帧只写入一次
        assert_eq!(el.borrow().node().write_count("y"), 1);

        clock.set(200.0);
        scheduler.tick();
        assert!(chained.get());
        assert_eq!(current_value(&el, "y"), AttrValue::Number(10.0));
    }

    #[test]
    fn test_disabled_scheduler_jumps_to_end() {
        let (clock, scheduler) = setup();
        scheduler.set_enabled(false);
        let el = SvgElement::group(MemoryNode::new()).into_shared();
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();

        scheduler.animate(
            &el,
            Attrs::new().with("opacity", 0.5),
            linear(1000.0).on_complete(move || flag.set(true)),
        );

        assert!(done.get());
        assert_eq!(current_value(&el, "opacity"), AttrValue::Number(0.5));
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(clock.frame_requests(), 0);
    }

    #[test]
    fn test_attr_stops_written_keys_only() {
        let (clock, scheduler) = setup();
        let el = SvgElement::group(MemoryNode::new()).into_shared();

        scheduler.animate(&el, Attrs::new().with("x", 100).with("y", 100), linear(100.0));
        scheduler.attr(&el, &Attrs::new().with("x", 7));
        assert!(!scheduler.is_animating(&el, Some("x")));
        assert!(scheduler.is_animating(&el, Some("y")));

        clock.set(50.0);
        scheduler.tick();
        assert_eq!(current_value(&el, "x"), AttrValue::Number(7.0));
        assert_eq!(current_value(&el, "y"), AttrValue::Number(50.0));
    }

    #[test]
    fn test_run_until_idle_with_manual_clock() {
        let clock = Rc::new(ManualClock::new(10.0));
        let scheduler = Scheduler::new(clock.clone());
        let el = SvgElement::group(MemoryNode::new()).into_shared();

        scheduler.animate(&el, Attrs::new().with("x", 30), linear(35.0));
        scheduler.run_until_idle();

        assert_eq!(current_value(&el, "x"), AttrValue::Number(30.0));
        assert_eq!(clock.now(), 40.0);
        assert!(!scheduler.is_running());
    }
}

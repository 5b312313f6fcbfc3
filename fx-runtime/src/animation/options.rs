//! # Options 模块
//!
//! 单次 `animate` 调用的动画参数。

use std::fmt;
use std::rc::Rc;

use crate::config::FxConfig;
use crate::easing::EasingFunction;

/// 每一帧写入后触发的事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent<'a> {
    /// 属性名
    pub property: &'a str,
    /// 当前数值（路径/颜色动画为进度本身）
    pub now: f64,
    /// 缓动后的进度（0.0 - 1.0）
    pub pos: f64,
}

/// 完成回调
pub type CompleteCallback = Box<dyn FnOnce()>;

/// 逐帧回调
pub type StepCallback = Rc<dyn Fn(&StepEvent<'_>)>;

/// 动画参数
pub struct AnimationOptions {
    /// 时长（毫秒）
    pub duration: f64,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 整批属性全部完成后调用一次
    pub complete: Option<CompleteCallback>,
    /// 每个属性每一帧写入后调用
    pub step: Option<StepCallback>,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self::from_config(&FxConfig::default())
    }
}

impl fmt::Debug for AnimationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationOptions")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("complete", &self.complete.is_some())
            .field("step", &self.step.is_some())
            .finish()
    }
}

impl AnimationOptions {
    /// 指定时长，其余取默认值
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    /// 以配置中的默认时长与缓动创建
    pub fn from_config(config: &FxConfig) -> Self {
        Self {
            duration: config.duration,
            easing: config.easing,
            complete: None,
            step: None,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置完成回调
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.complete = Some(Box::new(callback));
        self
    }

    /// 设置逐帧回调
    pub fn on_step(mut self, callback: impl Fn(&StepEvent<'_>) + 'static) -> Self {
        self.step = Some(Rc::new(callback));
        self
    }
}

//! # Frame 模块
//!
//! 帧源：为调度器提供单调时钟，并接收"请在下一帧调用 tick"的请求。

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

/// 无显示器帧回调时的默认 tick 间隔
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(13);

/// 帧源
pub trait FrameSource {
    /// 当前时间（毫秒，单调递增）
    fn now(&self) -> f64;

    /// 请求在下一帧调用一次 tick
    fn request_frame(&self);

    /// 阻塞到下一帧，返回是否有待处理的帧请求
    ///
    /// 调用会消费掉当前的帧请求。
    fn wait_for_frame(&self) -> bool;
}

/// 手动时钟
///
/// 时间只在调用 `set`/`advance` 或 `wait_for_frame` 时前进，便于确定性测试。
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<f64>,
    frame_step: f64,
    pending: Cell<bool>,
    requests: Cell<usize>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl ManualClock {
    /// 创建时钟，`frame_step` 为每次 `wait_for_frame` 前进的毫秒数
    pub fn new(frame_step: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            frame_step,
            pending: Cell::new(false),
            requests: Cell::new(0),
        }
    }

    /// 设置当前时间
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    /// 前进一段时间
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// 累计收到的帧请求次数
    pub fn frame_requests(&self) -> usize {
        self.requests.get()
    }

    /// 是否有未消费的帧请求
    pub fn has_pending_frame(&self) -> bool {
        self.pending.get()
    }
}

impl FrameSource for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn request_frame(&self) {
        self.pending.set(true);
        self.requests.set(self.requests.get() + 1);
    }

    fn wait_for_frame(&self) -> bool {
        if !self.pending.replace(false) {
            return false;
        }
        self.advance(self.frame_step);
        true
    }
}

/// 固定间隔帧源
///
/// 以真实时间为时钟，`wait_for_frame` 睡眠一个间隔。
#[derive(Debug)]
pub struct IntervalFrameSource {
    origin: Instant,
    interval: Duration,
    pending: Cell<bool>,
}

impl Default for IntervalFrameSource {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl IntervalFrameSource {
    /// 创建帧源
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
            pending: Cell::new(false),
        }
    }

    /// tick 间隔
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameSource for IntervalFrameSource {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn request_frame(&self) {
        self.pending.set(true);
    }

    fn wait_for_frame(&self) -> bool {
        if !self.pending.replace(false) {
            return false;
        }
        thread::sleep(self.interval);
        true
    }
}

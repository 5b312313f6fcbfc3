//! # Batch 模块
//!
//! 同一次 `animate` 调用启动的一组 Animator 共享的完成状态。

use std::cell::RefCell;
use std::fmt;

use super::options::{CompleteCallback, StepCallback, StepEvent};

/// 动画批次
///
/// 记录每个属性是否完成；全部完成时取出完成回调调用一次。
/// 回调调用时不持有任何内部借用，回调里可以安全地再次 `animate`。
pub struct Batch {
    done: RefCell<Vec<(String, bool)>>,
    complete: RefCell<Option<CompleteCallback>>,
    step: Option<StepCallback>,
}

impl fmt::Debug for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("done", &self.done.borrow())
            .field("complete", &self.complete.borrow().is_some())
            .finish()
    }
}

impl Batch {
    /// 创建批次
    pub fn new<'a>(
        properties: impl IntoIterator<Item = &'a str>,
        complete: Option<CompleteCallback>,
        step: Option<StepCallback>,
    ) -> Self {
        Self {
            done: RefCell::new(
                properties
                    .into_iter()
                    .map(|p| (p.to_string(), false))
                    .collect(),
            ),
            complete: RefCell::new(complete),
            step,
        }
    }

    /// 标记属性完成；整批完成时触发完成回调
    pub fn finish(&self, property: &str) {
        let all_done = {
            let mut done = self.done.borrow_mut();
            if let Some(entry) = done.iter_mut().find(|(p, _)| p == property) {
                entry.1 = true;
            }
            done.iter().all(|(_, d)| *d)
        };

        if all_done {
            let callback = self.complete.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        }
    }

    /// 是否全部完成
    pub fn is_complete(&self) -> bool {
        self.done.borrow().iter().all(|(_, d)| *d)
    }

    /// 调用逐帧回调
    pub fn notify_step(&self, event: &StepEvent<'_>) {
        if let Some(step) = &self.step {
            step(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_complete_fires_once_after_all_properties() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let batch = Batch::new(
            ["x", "y"],
            Some(Box::new(move || counter.set(counter.get() + 1))),
            None,
        );

        batch.finish("x");
        assert_eq!(fired.get(), 0);
        assert!(!batch.is_complete());

        batch.finish("y");
        batch.finish("y");
        assert_eq!(fired.get(), 1);
        assert!(batch.is_complete());
    }

    #[test]
    fn test_step_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let batch = Batch::new(
            ["opacity"],
            None,
            Some(Rc::new(move |e: &StepEvent<'_>| {
                sink.borrow_mut().push((e.property.to_string(), e.pos))
            })),
        );

        batch.notify_step(&StepEvent {
            property: "opacity",
            now: 0.5,
            pos: 0.5,
        });
        assert_eq!(*seen.borrow(), vec![("opacity".to_string(), 0.5)]);
    }
}

//! # Config 模块
//!
//! 动画运行时配置。
//!
//! ## 配置优先级
//!
//! 1. 单次调用传入的 `AnimationOptions`（最高）
//! 2. 配置文件 (fx.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::easing::EasingFunction;
use crate::error::ConfigError;

/// 动画运行时配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxConfig {
    /// 是否启用动画
    ///
    /// 关闭后所有动画在 `animate` 返回前同步跳到终值并触发完成回调。
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 默认时长（毫秒）
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// 默认缓动函数名，未知名称回退到 `easeInOutSine`
    #[serde(default, deserialize_with = "deserialize_easing")]
    pub easing: EasingFunction,

    /// 无显示器帧回调时的 tick 间隔（毫秒）
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

// 默认值函数
fn default_enabled() -> bool {
    true
}

fn default_duration() -> f64 {
    500.0
}

fn default_frame_interval_ms() -> u64 {
    13
}

fn deserialize_easing<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EasingFunction, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(EasingFunction::from_name(&name))
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            duration: default_duration(),
            easing: EasingFunction::default(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl FxConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "默认时长必须是非负有限值: {}",
                self.duration
            )));
        }

        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "tick 间隔必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// tick 间隔
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

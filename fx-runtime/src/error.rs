//! # Error 模块
//!
//! 定义 fx-runtime 中使用的错误类型。
//!
//! 动画执行路径本身不向调用方抛出错误（元素销毁、路径畸形、起止值相同都在内部降级处理），
//! 这里的错误只出现在边界上：路径字符串解析与配置文件读写。

use thiserror::Error;

/// 路径解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// 无法识别的 token
    #[error("第 {index} 个 token 无效：'{token}'")]
    InvalidToken { index: usize, token: String },

    /// 路径没有以命令开头
    #[error("路径必须以命令字母开头，实际为 '{token}'")]
    MissingCommand { token: String },
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

/// fx-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    /// 路径错误
    #[error("路径错误: {0}")]
    Path(#[from] PathError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type FxResult<T> = Result<T, FxError>;

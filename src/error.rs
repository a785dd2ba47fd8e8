//! 错误类型定义
//!
//! 提供扩展策略层各操作的错误类型。
//!
//! 策略函数本身（时间戳合并、回写限流）永远不会失败：QoS 提示缺失或格式
//! 错误时静默回退为"不限流"。这里的错误只来自配置路径——挂载选项解析和
//! 属性表的注册/读写。

use core::fmt;

/// 扩展策略层操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// I/O 错误（扩展属性读取失败等）
    Io,
    /// 无效参数（选项值或属性写入值无法解析为整数）
    InvalidInput,
    /// 内存不足
    OutOfMemory,
    /// 属性不存在或未激活
    NotFound,
    /// 属性为只读
    PermissionDenied,
    /// 属性命名空间注册冲突
    AlreadyExists,
    /// 不支持的挂载选项
    Unsupported,
    /// 无效状态
    InvalidState,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;

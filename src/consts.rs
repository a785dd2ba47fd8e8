//! 扩展策略层常量定义
//!
//! 这个模块包含扩展策略层的所有常量定义，包括：
//! - 时间戳合并相关常量
//! - 回写限流相关常量
//! - 挂载选项 token

//=============================================================================
// 时间戳合并
//=============================================================================

/// `delayupdatetime` 不带值时使用的默认合并延迟（毫秒）
pub const EXT_DEFAULT_DELAY_UPDATE_TIME: u32 = 1000;

/// 每秒毫秒数
pub const MSEC_PER_SEC: i64 = 1000;

/// 每毫秒纳秒数
pub const NSEC_PER_MSEC: i64 = 1_000_000;

//=============================================================================
// 回写限流
//=============================================================================

/// 页大小（4096 字节）
pub const PAGE_SIZE: usize = 4096;

/// 最小回写块（页数）
///
/// 固定为 4MB，与内核回写路径的 MIN_WRITEBACK_PAGES 保持兼容；
/// 被限流的文件每轮回写至少仍能推进一个最小块，避免饿死。
pub const EXT_MIN_WB_PAGES: i64 = (0x40_0000 / PAGE_SIZE) as i64;

/// QoS 提示（nice）的上限，超出的值被钳制到这里
pub const EXT_MAX_WB_NICE: u64 = 255;

/// 存放 QoS 提示的扩展属性名（user 命名空间）
pub const WB_NICE_XATTR_NAME: &str = "wbnice";

/// QoS 提示值缓冲区大小（字节）
///
/// 提示是一个短的 ASCII 十进制串；长度达到或超过该值的属性视为超长，
/// 静默回退为不限流。
pub const EXT_WB_NICE_BUF_SIZE: usize = 256;

/// "不设上限"的页预算哨兵值（显式同步请求）
///
/// 显式同步的正确性优先于限流，预算等于该值时原样返回。
pub const NR_TO_WRITE_UNBOUNDED: i64 = i64::MAX;

//=============================================================================
// 挂载选项
//=============================================================================

/// 选项串中 token 的分隔符
pub const EXT_OPT_SEPARATOR: char = ';';

/// 时间戳合并选项 token
pub const EXT_OPT_DELAY_UPDATE_TIME: &str = "delayupdatetime";

/// 回写限流选项 token
pub const EXT_OPT_WB_NICE: &str = "wbnice";

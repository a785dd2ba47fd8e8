//! 策略函数
//!
//! 宿主文件系统在发出元数据更新 / 调度回写的线程上同步、内联地调用
//! 这两个策略；它们自身不引入并发，也不阻塞（除配置快照的短锁外），
//! 并且永远不会失败——配置异常一律回退为"按原样放行"。
//!
//! - [`timestamp`] - 时间戳合并判定
//! - [`writeback`] - 按 QoS 提示限流回写预算

/// 时间戳合并判定
pub mod timestamp;

/// 回写限流
pub mod writeback;

//! 时间戳合并判定
//!
//! 对每一次元数据更新请求判定：立即应用，还是因为距上次更新太近而抑制。
//! 抑制只是返回 `false`——实际"不持久化"由宿主完成。
//!
//! # 判定顺序
//!
//! 按顺序命中即返回，`true` 表示立即应用：
//!
//! 1. 合并未启用，或延迟为 0 → 应用
//! 2. 更新包含版本计数器（VERSION）→ 应用（版本编码因果顺序，永不抑制）
//! 3. 更新包含访问时间（ATIME）→ 应用（atime 语义由宿主定义为即时）
//! 4. 更新包含 ctime 且距存量 ctime ≥ 延迟 → 应用（恰好相等也应用）
//! 5. 更新包含 mtime 且距存量 mtime ≥ 延迟 → 应用
//! 6. 其余情况 → 抑制

use crate::config::ExtConfigCell;
use crate::types::{InodeTimes, Timespec, UpdateFlags};

/// 判定一次元数据更新是否立即应用
///
/// # 参数
///
/// * `times` - inode 当前持久化的时间戳
/// * `new` - 请求写入的时间戳
/// * `flags` - 更新类型标志
/// * `cell` - 卷的配置单元
///
/// # 返回
///
/// `true` 表示宿主应立即应用更新；`false` 表示本次更新被抑制。
///
/// 整个判定只在入口处取一次配置快照，中途不会重读；并发的配置修改
/// 最早从下一次调用开始生效。
pub fn should_update_time(
    times: &InodeTimes,
    new: Timespec,
    flags: UpdateFlags,
    cell: &ExtConfigCell,
) -> bool {
    let cfg = cell.snapshot();

    if !cfg.delay_update_time_active() {
        return true;
    }
    let delay = cfg.delay_update_time as i64;

    if flags.contains(UpdateFlags::VERSION) {
        return true;
    }

    if flags.contains(UpdateFlags::ATIME) {
        return true;
    }

    if flags.contains(UpdateFlags::CTIME) && times.ctime.elapsed_ms(&new) >= delay {
        return true;
    }

    if flags.contains(UpdateFlags::MTIME) && times.mtime.elapsed_ms(&new) >= delay {
        return true;
    }

    false
}

//! 数据结构定义
//!
//! 策略函数与宿主文件系统之间共享的值类型：时间戳、inode 存量时间、
//! 更新类型标志和回写控制记录。

use bitflags::bitflags;

use crate::consts::{MSEC_PER_SEC, NSEC_PER_MSEC};

/// 秒 + 纳秒表示的时间戳
///
/// 与内核 `struct timespec` 同构。字段允许为负 / 乱序：合并判定必须容忍
/// `requested < current` 的输入（时钟回拨），此时经过时间为负，永远不会
/// 满足"≥ 延迟"。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timespec {
    /// 秒
    pub sec: i64,
    /// 纳秒
    pub nsec: i64,
}

impl Timespec {
    /// 创建时间戳
    pub const fn new(sec: i64, nsec: i64) -> Self {
        Self { sec, nsec }
    }

    /// 计算从 `self` 到 `new` 经过的毫秒数（向零截断）
    ///
    /// `(new.sec - self.sec) * 1000 + (new.nsec - self.nsec) / 1_000_000`
    ///
    /// `new` 早于 `self` 时返回负值。
    pub fn elapsed_ms(&self, new: &Timespec) -> i64 {
        (new.sec - self.sec) * MSEC_PER_SEC + (new.nsec - self.nsec) / NSEC_PER_MSEC
    }
}

/// inode 的存量时间戳
///
/// 宿主在元数据更新钩子中提供 inode 当前持久化的三个时间戳，
/// 合并判定据此计算距上次更新经过的时间。
#[derive(Debug, Clone, Copy, Default)]
pub struct InodeTimes {
    /// 访问时间
    pub atime: Timespec,
    /// 修改时间
    pub mtime: Timespec,
    /// 状态改变时间
    pub ctime: Timespec,
}

bitflags! {
    /// 元数据更新类型标志
    ///
    /// 对应内核 `update_time` 路径的 `S_ATIME` / `S_MTIME` / `S_CTIME` /
    /// `S_VERSION` 标志位。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UpdateFlags: u32 {
        /// 访问时间更新
        const ATIME   = 0x01;
        /// 修改时间更新
        const MTIME   = 0x02;
        /// 状态改变时间更新
        const CTIME   = 0x04;
        /// inode 版本计数器更新（编码因果顺序，永不抑制）
        const VERSION = 0x08;
    }
}

/// 回写控制记录
///
/// 对应内核 `struct writeback_control` 中策略层关心的部分：
/// 本轮允许回写的脏页预算。限流策略原地改写 `nr_to_write`。
#[derive(Debug, Clone, Copy)]
pub struct WritebackControl {
    /// 本轮允许回写的页数；`NR_TO_WRITE_UNBOUNDED` 表示显式同步（不限流）
    pub nr_to_write: i64,
}

impl WritebackControl {
    /// 创建指定预算的回写控制记录
    pub const fn new(nr_to_write: i64) -> Self {
        Self { nr_to_write }
    }
}

//! 扩展配置记录
//!
//! 每个挂载了扩展选项的卷持有一份 [`ExtConfig`]，由互斥锁保护
//! （[`ExtConfigCell`]）。配置在挂载/重挂载时由选项解析器写入，
//! 运行期通过属性表（[`crate::attr`]）读写，策略函数在每次判定
//! 开始时取一次快照。
//!
//! # 并发契约
//!
//! - 临界区极短：一次字段读写或一次整条记录的拷贝，从不在持锁期间
//!   解析字符串或遍历属性表。
//! - 通过属性表进行的读写彼此线性化（锁串行）。
//! - 策略函数每次判定只做一次快照读取，判定中途不会重读配置，
//!   与内核 `READ_ONCE` 的"读一次"语义一致。

use bitflags::bitflags;
use spin::Mutex;

use crate::consts::EXT_DEFAULT_DELAY_UPDATE_TIME;

bitflags! {
    /// 扩展挂载选项标志
    ///
    /// 不变式：标志位跨挂载/重挂载只增不减（累积 OR）。重挂载无法关闭
    /// 已启用的行为；运行期关闭通过属性写入（`wb_enable = 0` /
    /// `delay_update_time = 0`）完成。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ExtOptFlags: u32 {
        /// 卷已用扩展选项初始化；未置位时其余行为全部关闭
        const VALID             = 0x01;
        /// 时间戳合并（delayupdatetime）已启用
        const DELAY_UPDATE_TIME = 0x02;
        /// 回写限流（wbnice）已启用
        const WB_NICE           = 0x04;
    }
}

/// 扩展配置记录（每卷一份）
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtConfig {
    /// 选项标志
    pub opts: ExtOptFlags,
    /// ctime/mtime 更新的最小间隔（毫秒）；0 表示即使标志置位也不合并
    pub delay_update_time: u32,
    /// 回写限流的第二道开关；非零才限流
    pub wb_enable: u32,
}

impl ExtConfig {
    /// 时间戳合并是否生效（标志置位且延迟非零）
    pub fn delay_update_time_active(&self) -> bool {
        self.opts.contains(ExtOptFlags::DELAY_UPDATE_TIME) && self.delay_update_time != 0
    }

    /// 回写限流是否生效（两道开关同时打开）
    pub fn wb_nice_active(&self) -> bool {
        self.opts.contains(ExtOptFlags::WB_NICE) && self.wb_enable != 0
    }
}

/// 互斥锁保护的配置单元
///
/// 锁随单元在首次（非重挂载）配置时创建，与卷的挂载会话同生命周期；
/// 重挂载复用同一单元，不重新初始化锁。
#[derive(Debug, Default)]
pub struct ExtConfigCell {
    inner: Mutex<ExtConfig>,
}

impl ExtConfigCell {
    /// 创建全零（未初始化）的配置单元
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ExtConfig::default()),
        }
    }

    /// 持锁读取配置的一部分
    pub fn with<R>(&self, f: impl FnOnce(&ExtConfig) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    /// 持锁修改配置
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut ExtConfig) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// 取一次完整快照（策略判定入口处调用一次）
    pub fn snapshot(&self) -> ExtConfig {
        *self.inner.lock()
    }

    /// 卷是否已用扩展选项初始化
    pub fn is_valid(&self) -> bool {
        self.with(|cfg| cfg.opts.contains(ExtOptFlags::VALID))
    }

    /// 启用时间戳合并并设置延迟
    ///
    /// 选项解析器的写入路径；`delay_ms` 为 `None` 时使用内置默认值。
    pub(crate) fn enable_delay_update_time(&self, delay_ms: Option<u32>) {
        self.with_mut(|cfg| {
            cfg.opts.insert(ExtOptFlags::DELAY_UPDATE_TIME);
            cfg.delay_update_time = delay_ms.unwrap_or(EXT_DEFAULT_DELAY_UPDATE_TIME);
        });
    }

    /// 启用回写限流（置位标志并打开第二道开关）
    pub(crate) fn enable_wb_nice(&self) {
        self.with_mut(|cfg| {
            cfg.opts.insert(ExtOptFlags::WB_NICE);
            cfg.wb_enable = 1;
        });
    }

    /// 标记卷已初始化
    pub(crate) fn mark_valid(&self) {
        self.with_mut(|cfg| cfg.opts.insert(ExtOptFlags::VALID));
    }
}

//! 回写限流
//!
//! 按每个文件的 QoS 提示（`user.wbnice` 扩展属性）缩减该文件单次回写
//! 的页预算。nice 越大预算越小（经由向上取二次幂的除数），但始终保底
//! 一个最小块，保证被限流的文件每轮仍有前进。
//!
//! 提示缺失、超长或格式错误一律静默回退为"不限流"——配置错误的提示
//! 绝不能阻塞或破坏正常 I/O。唯一的观测点是 trace 事件里的前后预算。

use log::trace;

use crate::config::ExtConfigCell;
use crate::consts::{
    EXT_MAX_WB_NICE, EXT_MIN_WB_PAGES, EXT_WB_NICE_BUF_SIZE, NR_TO_WRITE_UNBOUNDED,
    WB_NICE_XATTR_NAME,
};
use crate::error::Result;
use crate::types::WritebackControl;

/// 扩展属性命名空间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XattrNamespace {
    /// user. 命名空间（QoS 提示存放于此）
    User,
    /// system. 命名空间
    System,
    /// security. 命名空间
    Security,
    /// trusted. 命名空间
    Trusted,
}

impl XattrNamespace {
    /// 命名空间前缀（含点号）
    pub fn prefix(&self) -> &'static str {
        match self {
            XattrNamespace::User => "user.",
            XattrNamespace::System => "system.",
            XattrNamespace::Security => "security.",
            XattrNamespace::Trusted => "trusted.",
        }
    }
}

/// 存储引擎协作接口：按名读取一个文件的扩展属性
///
/// 这是限流策略执行的唯一 I/O。实现方把值写入 `buf` 并返回字节数；
/// 属性不存在或值放不进 `buf` 时返回错误。策略把所有错误一视同仁地
/// 当作"没有可用提示"。
pub trait XattrLookup {
    /// 读取属性值到 `buf`，返回写入的字节数
    fn get(&self, namespace: XattrNamespace, name: &str, buf: &mut [u8]) -> Result<usize>;
}

/// 按 QoS 提示改写一个文件的回写页预算
///
/// # 参数
///
/// * `hints` - 扩展属性读取接口（存储引擎）
/// * `wbc` - 回写控制记录，`nr_to_write` 被原地改写
/// * `cell` - 卷的配置单元
///
/// # 返回
///
/// 改写后的 `nr_to_write`（未限流时等于原值）。
///
/// # 算法
///
/// 1. 两道开关（WB_NICE 标志 + `wb_enable`）不同时打开 → 原样返回
/// 2. 预算为"不设上限"哨兵（显式同步）→ 原样返回，同步正确性优先
/// 3. 读取 `user.wbnice`；缺失 / 超长 / 解析失败 / 为 0 → 原样返回
/// 4. nice 钳制到 255，向上取整到二次幂得到除数 p
/// 5. `nr_to_write = round_down(nr_to_write / p + 最小块, 最小块)`
///
/// 本函数永不失败，且每次调用只取一次配置快照。
pub fn limit_writeback(
    hints: &impl XattrLookup,
    wbc: &mut WritebackControl,
    cell: &ExtConfigCell,
) -> i64 {
    let cfg = cell.snapshot();
    let nr_to_write = wbc.nr_to_write;

    if !cfg.wb_nice_active() {
        return wbc.nr_to_write;
    }

    // 显式同步不限流
    if wbc.nr_to_write == NR_TO_WRITE_UNBOUNDED {
        return wbc.nr_to_write;
    }

    let Some(nice) = fetch_wb_nice(hints) else {
        return wbc.nr_to_write;
    };

    let nice = nice.min(EXT_MAX_WB_NICE);
    let divisor = nice.next_power_of_two() as i64;

    let pages = wbc.nr_to_write / divisor;
    wbc.nr_to_write = (pages + EXT_MIN_WB_PAGES) / EXT_MIN_WB_PAGES * EXT_MIN_WB_PAGES;

    trace!(
        "[EXT] wbnice={} divisor={} nr_to_write {} -> {}",
        nice,
        divisor,
        nr_to_write,
        wbc.nr_to_write
    );

    wbc.nr_to_write
}

/// 读取并解析 QoS 提示
///
/// 返回 `None` 的所有情况（缺失、超长、非 ASCII 整数、为 0）对调用方
/// 都等价于"不限流"。
fn fetch_wb_nice(hints: &impl XattrLookup) -> Option<u64> {
    let mut buf = [0u8; EXT_WB_NICE_BUF_SIZE];
    let size = match hints.get(XattrNamespace::User, WB_NICE_XATTR_NAME, &mut buf) {
        Ok(size) => size,
        Err(_) => return None,
    };
    if size == 0 || size >= EXT_WB_NICE_BUF_SIZE {
        return None;
    }

    let text = core::str::from_utf8(&buf[..size]).ok()?;
    let nice = crate::attr::parse_uint(text.trim())?;
    if nice == 0 {
        return None;
    }
    Some(nice)
}

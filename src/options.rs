//! 挂载选项解析
//!
//! 解析 `;` 分隔的扩展选项串并写入配置单元，在挂载和重挂载时各调用一次。
//!
//! 支持的 token：
//! - `delayupdatetime` - 启用时间戳合并，使用内置默认延迟
//! - `delayupdatetime=<uint>` - 启用时间戳合并，延迟为指定毫秒数（十进制）
//! - `wbnice` - 启用回写限流（同时打开两道开关）
//!
//! # 解析语义
//!
//! - 空 token 跳过。
//! - 未知 token 立即中止整个解析并返回 [`ErrorKind::Unsupported`]，
//!   其后的 token 不再应用；之前已应用的 token 保持生效。
//! - `delayupdatetime` 的值无法解析时返回 [`ErrorKind::InvalidInput`]，
//!   但标志位和默认延迟在遇到值之前已经写入——部分应用是有意的，
//!   与重挂载的累积 OR 语义一致。
//! - 标志位只增不减：重挂载把新选项 OR 进已有配置，从不清除旧位。

use log::warn;

use crate::config::ExtConfigCell;
use crate::consts::{EXT_OPT_DELAY_UPDATE_TIME, EXT_OPT_SEPARATOR, EXT_OPT_WB_NICE};
use crate::error::{Error, ErrorKind, Result};

/// 解析扩展挂载选项串并应用到配置单元
///
/// # 参数
///
/// * `cell` - 目标配置单元（挂载时创建，重挂载时复用）
/// * `raw` - 原始选项串，例如 `"delayupdatetime=500;wbnice"`
/// * `is_remount` - 是否为重挂载。配置单元及其锁在首次（非重挂载）
///   配置时创建，与挂载会话同生命周期；重挂载只向既有单元累积写入，
///   不重新初始化锁。
///
/// # 错误
///
/// * [`ErrorKind::Unsupported`] - 未知 token（中止解析，挂载失败）
/// * [`ErrorKind::InvalidInput`] - `delayupdatetime` 的值不是非负十进制整数
pub fn parse_ext_options(cell: &ExtConfigCell, raw: &str, is_remount: bool) -> Result<()> {
    cell.mark_valid();

    if is_remount {
        log::debug!("[EXT] remount: re-applying extended options {:?}", raw);
    }

    let mut ret = Ok(());

    for token in raw.split(EXT_OPT_SEPARATOR) {
        if token.is_empty() {
            continue;
        }

        if token == EXT_OPT_DELAY_UPDATE_TIME {
            cell.enable_delay_update_time(None);
        } else if let Some(value) = token.strip_prefix(EXT_OPT_DELAY_UPDATE_TIME) {
            let Some(value) = value.strip_prefix('=') else {
                warn!("[EXT] extended option {:?} not supported", token);
                return Err(Error::new(ErrorKind::Unsupported, "unknown extended option"));
            };

            // 标志位和默认值先行写入；值解析失败时它们保持生效
            cell.enable_delay_update_time(None);

            match value.parse::<u64>() {
                Ok(ms) => cell.enable_delay_update_time(Some(ms as u32)),
                Err(_) => {
                    ret = Err(Error::new(
                        ErrorKind::InvalidInput,
                        "invalid delayupdatetime value",
                    ));
                }
            }
        } else if token == EXT_OPT_WB_NICE {
            cell.enable_wb_nice();
        } else {
            warn!("[EXT] extended option {:?} not supported", token);
            return Err(Error::new(ErrorKind::Unsupported, "unknown extended option"));
        }
    }

    ret
}

//! ext4_extend: ext4 扩展策略层的纯 Rust 实现
//!
//! 这是一个附加在 ext4 元数据管线上的小型策略库，提供两个相互独立的行为：
//! - **时间戳合并**（delayupdatetime）：抑制过于频繁的 ctime/mtime 更新，
//!   降低元数据写放大
//! - **回写限流**（wbnice）：按每个文件的 QoS 提示（`user.wbnice` 扩展属性）
//!   缩减该文件单次回写的页预算
//!
//! 两个行为都由一份可在运行期检视/修改的配置记录控制，配置通过通用的
//! 命名属性表（[`attr`]）对外暴露，无需为每个字段编写专用访问代码。
//!
//! # 示例
//!
//! ```rust,ignore
//! use ext4_extend::{VolumeExtension, UpdateFlags};
//!
//! // 挂载时解析扩展选项
//! let ext = VolumeExtension::mount("delayupdatetime=500;wbnice")?;
//!
//! // 宿主的元数据更新钩子
//! let apply = ext.update_time(&times, now, UpdateFlags::MTIME);
//! if apply {
//!     // 宿主执行实际的时间戳持久化
//! }
//!
//! // 运行期检视/修改配置
//! ext.attr_store("delay_update_time", "1000")?;
//! assert_eq!(ext.attr_show("delay_update_time")?, "1000");
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`consts`] - 常量定义
//! - [`types`] - 数据结构定义
//! - [`config`] - 扩展配置记录（互斥锁保护）
//! - [`options`] - 挂载选项解析
//! - [`attr`] - 配置属性表（运行期检视/修改）
//! - [`policy`] - 时间戳合并与回写限流策略
//! - [`extend`] - 卷级门面（挂载生命周期 + 宿主钩子）

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 常量定义
pub mod consts;

/// 数据结构定义
pub mod types;

/// 扩展配置记录
pub mod config;

/// 挂载选项解析
pub mod options;

/// 配置属性表
pub mod attr;

/// 策略函数（时间戳合并 / 回写限流）
pub mod policy;

/// 卷级门面
pub mod extend;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 配置
pub use config::{ExtConfig, ExtConfigCell, ExtOptFlags};

// 选项解析
pub use options::parse_ext_options;

// 属性表
pub use attr::{AttrMode, AttrRegistry, ExtAttr};

// 共享类型
pub use types::{InodeTimes, Timespec, UpdateFlags, WritebackControl};

// 策略
pub use policy::timestamp::should_update_time;
pub use policy::writeback::{limit_writeback, XattrLookup, XattrNamespace};

// 门面
pub use extend::VolumeExtension;

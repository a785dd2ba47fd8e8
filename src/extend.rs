//! 卷级门面
//!
//! 把扩展策略层的各部分按挂载生命周期组装起来：一个
//! [`VolumeExtension`] 对应一个挂载了扩展选项的卷，拥有该卷的配置
//! 单元和已注册的属性集合，并向宿主提供两个策略钩子。
//!
//! # 生命周期
//!
//! - [`VolumeExtension::mount`] - 创建配置单元、解析选项、注册属性；
//!   任何一步失败都不会泄漏半成品状态
//! - [`VolumeExtension::remount`] - 向既有配置累积应用新选项并刷新
//!   属性激活集合；锁不重新初始化
//! - [`VolumeExtension::unmount`] - 注销属性并销毁配置

use alloc::string::String;
use alloc::vec::Vec;

use crate::attr::AttrRegistry;
use crate::config::ExtConfigCell;
use crate::error::Result;
use crate::options::parse_ext_options;
use crate::policy::{timestamp, writeback};
use crate::types::{InodeTimes, Timespec, UpdateFlags, WritebackControl};

/// 一个卷的扩展策略状态
#[derive(Debug)]
pub struct VolumeExtension {
    config: ExtConfigCell,
    registry: AttrRegistry,
}

impl VolumeExtension {
    /// 挂载：解析扩展选项并注册属性集合
    ///
    /// 配置单元（连同它的锁）在这里创建，与挂载会话同生命周期。
    ///
    /// # 错误
    ///
    /// 选项解析错误（[`crate::ErrorKind::Unsupported`] /
    /// [`crate::ErrorKind::InvalidInput`]）或注册冲突
    /// （[`crate::ErrorKind::AlreadyExists`]）都会中止挂载；
    /// 出错时不保留任何已注册的条目。
    pub fn mount(options: &str) -> Result<Self> {
        let config = ExtConfigCell::new();
        parse_ext_options(&config, options, false)?;
        let registry = AttrRegistry::register(&config)?;
        Ok(Self { config, registry })
    }

    /// 重挂载：向既有配置累积应用新选项
    ///
    /// 标志位只增不减；属性集合重新注册，使新启用的描述符变为激活。
    pub fn remount(&mut self, options: &str) -> Result<()> {
        parse_ext_options(&self.config, options, true)?;
        let registry = AttrRegistry::register(&self.config)?;
        self.registry.unregister();
        self.registry = registry;
        Ok(())
    }

    /// 卸载：注销属性集合并销毁配置
    pub fn unmount(mut self) {
        self.registry.unregister();
    }

    /// 卷的配置单元
    pub fn config(&self) -> &ExtConfigCell {
        &self.config
    }

    // ===== 宿主钩子 =====

    /// 元数据更新钩子
    ///
    /// 宿主在每次 inode 时间戳更新前调用；返回 `true` 时由宿主执行
    /// 实际持久化，返回 `false` 时本次更新被抑制。
    pub fn update_time(&self, times: &InodeTimes, new: Timespec, flags: UpdateFlags) -> bool {
        timestamp::should_update_time(times, new, flags, &self.config)
    }

    /// 回写预算钩子
    ///
    /// 宿主在调度一个文件的回写前调用；`wbc.nr_to_write` 被原地改写，
    /// 返回改写后的预算。
    pub fn limit_writeback(
        &self,
        hints: &impl writeback::XattrLookup,
        wbc: &mut WritebackControl,
    ) -> i64 {
        writeback::limit_writeback(hints, wbc, &self.config)
    }

    // ===== 属性透传 =====

    /// 激活的属性名
    pub fn attr_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    /// 读取属性（十进制文本）
    pub fn attr_show(&self, name: &str) -> Result<String> {
        self.registry.show(&self.config, name)
    }

    /// 写入属性
    pub fn attr_store(&self, name: &str, text: &str) -> Result<()> {
        self.registry.store(&self.config, name, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NR_TO_WRITE_UNBOUNDED;
    use crate::error::{Error, ErrorKind};
    use crate::policy::writeback::{XattrLookup, XattrNamespace};

    struct NoHints;

    impl XattrLookup for NoHints {
        fn get(&self, _: XattrNamespace, _: &str, _: &mut [u8]) -> Result<usize> {
            Err(Error::new(ErrorKind::NotFound, "xattr not found"))
        }
    }

    #[test]
    fn test_mount_registers_active_attrs() {
        let ext = VolumeExtension::mount("delayupdatetime=500;wbnice").unwrap();
        assert_eq!(ext.attr_names(), ["delay_update_time", "wb_enable"]);
        assert_eq!(ext.attr_show("delay_update_time").unwrap(), "500");
    }

    #[test]
    fn test_mount_unknown_option_fails() {
        let err = VolumeExtension::mount("delayupdatetime=500;foo").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_remount_activates_new_attrs() {
        let mut ext = VolumeExtension::mount("delayupdatetime=500").unwrap();
        assert_eq!(ext.attr_names(), ["delay_update_time"]);

        ext.remount("wbnice").unwrap();
        assert_eq!(ext.attr_names(), ["delay_update_time", "wb_enable"]);

        // 旧配置保持生效
        assert_eq!(ext.attr_show("delay_update_time").unwrap(), "500");
    }

    #[test]
    fn test_hooks_flow() {
        let ext = VolumeExtension::mount("delayupdatetime=500;wbnice").unwrap();

        let times = InodeTimes::default();
        assert!(!ext.update_time(&times, Timespec::new(0, 1_000_000), UpdateFlags::MTIME));
        assert!(ext.update_time(&times, Timespec::new(1, 0), UpdateFlags::MTIME));

        let mut wbc = WritebackControl::new(NR_TO_WRITE_UNBOUNDED);
        assert_eq!(ext.limit_writeback(&NoHints, &mut wbc), NR_TO_WRITE_UNBOUNDED);
    }

    #[test]
    fn test_runtime_store_changes_policy() {
        let ext = VolumeExtension::mount("delayupdatetime=500").unwrap();
        let times = InodeTimes::default();
        let new = Timespec::new(0, 1_000_000);

        assert!(!ext.update_time(&times, new, UpdateFlags::MTIME));

        // 运行期把延迟清零后不再合并
        ext.attr_store("delay_update_time", "0").unwrap();
        assert!(ext.update_time(&times, new, UpdateFlags::MTIME));
    }
}

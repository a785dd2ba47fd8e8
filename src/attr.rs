//! 配置属性表
//!
//! 把扩展配置记录的字段作为命名属性对外暴露（sysfs 风格的
//! "名字 → 可读/可写整数字段"目录），运营侧可以在运行期检视和修改
//! 配置，而无需为每个字段编写专用访问代码。
//!
//! # 设计说明
//!
//! 字段反射不走"偏移 + 长度的内存拷贝"，而是用带标签的访问器
//! （[`ConfigField`]）：每个描述符指向一个枚举成员，load/store 在
//! 类型化的字段上完成，同样保持"任意字段通用暴露"的性质，但没有
//! 裸内存别名。写入值超出字段宽度时只保留低位字节，与按长度 memcpy
//! 的截断行为一致。
//!
//! 描述符注册后不可变；激活集合只在初始化（挂载/重挂载）时变化。

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::config::{ExtConfig, ExtConfigCell, ExtOptFlags};
use crate::error::{Error, ErrorKind, Result};

/// 属性访问模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMode {
    /// 只读
    ReadOnly,
    /// 读写
    ReadWrite,
}

/// 带标签的配置字段访问器
///
/// 每个成员对应 [`ExtConfig`] 的一个可暴露字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    /// `ExtConfig::delay_update_time`（u32）
    DelayUpdateTime,
    /// `ExtConfig::wb_enable`（u32）
    WbEnable,
}

impl ConfigField {
    /// 读取字段值（零扩展到 u64）
    pub fn load(&self, cfg: &ExtConfig) -> u64 {
        match self {
            ConfigField::DelayUpdateTime => cfg.delay_update_time as u64,
            ConfigField::WbEnable => cfg.wb_enable as u64,
        }
    }

    /// 写入字段值（只保留字段宽度内的低位字节）
    pub fn store(&self, cfg: &mut ExtConfig, val: u64) {
        match self {
            ConfigField::DelayUpdateTime => cfg.delay_update_time = val as u32,
            ConfigField::WbEnable => cfg.wb_enable = val as u32,
        }
    }
}

/// 属性描述符（静态、只读，每个暴露字段一个）
#[derive(Debug)]
pub struct ExtAttr {
    /// 属性名
    pub name: &'static str,
    /// 访问模式
    pub mode: AttrMode,
    /// 激活条件：`opts` 为空，或配置标志包含全部 `opts` 位时激活
    pub opts: ExtOptFlags,
    /// 字段访问器
    pub field: ConfigField,
}

impl ExtAttr {
    /// 描述符在给定配置下是否激活
    pub fn is_active(&self, cfg: &ExtConfig) -> bool {
        self.opts.is_empty() || cfg.opts.contains(self.opts)
    }
}

/// 全部属性描述符
///
/// - `delay_update_time` - 读写，时间戳合并标志置位时激活
/// - `wb_enable` - 读写，回写限流标志置位时激活
pub static EXT_ATTRS: &[ExtAttr] = &[
    ExtAttr {
        name: "delay_update_time",
        mode: AttrMode::ReadWrite,
        opts: ExtOptFlags::DELAY_UPDATE_TIME,
        field: ConfigField::DelayUpdateTime,
    },
    ExtAttr {
        name: "wb_enable",
        mode: AttrMode::ReadWrite,
        opts: ExtOptFlags::WB_NICE,
        field: ConfigField::WbEnable,
    },
];

/// 已注册的属性集合（每卷一份）
///
/// 注册/注销随卷的挂载/卸载各发生一次。未用扩展选项初始化的卷注册出
/// 空集合（不创建任何条目）。
#[derive(Debug, Default)]
pub struct AttrRegistry {
    entries: Vec<&'static ExtAttr>,
}

impl AttrRegistry {
    /// 注册属性集合
    ///
    /// 在一次锁持有内取配置快照，然后在锁外筛选激活的描述符。
    /// 描述符表中出现重名属于命名空间冲突：丢弃已建立的部分条目
    /// （回滚），返回 [`ErrorKind::AlreadyExists`]，不把半成品集合
    /// 暴露给调用者。
    pub fn register(cell: &ExtConfigCell) -> Result<Self> {
        Self::register_table(cell, EXT_ATTRS)
    }

    fn register_table(cell: &ExtConfigCell, table: &'static [ExtAttr]) -> Result<Self> {
        let cfg = cell.snapshot();
        if !cfg.opts.contains(ExtOptFlags::VALID) {
            return Ok(Self::default());
        }

        let mut entries: Vec<&'static ExtAttr> = Vec::new();
        for attr in table {
            if !attr.is_active(&cfg) {
                continue;
            }
            if entries.iter().any(|e| e.name == attr.name) {
                // 回滚：entries 随错误返回一起丢弃
                return Err(Error::new(
                    ErrorKind::AlreadyExists,
                    "duplicate attribute name",
                ));
            }
            entries.push(attr);
        }

        Ok(Self { entries })
    }

    /// 注销属性集合（幂等；空集合为 no-op）
    pub fn unregister(&mut self) {
        self.entries.clear();
    }

    /// 激活的属性名，按描述符表顺序
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// 读取属性值，返回十进制文本
    ///
    /// 持锁窗口只覆盖一次字段读取。
    ///
    /// # 错误
    ///
    /// * [`ErrorKind::NotFound`] - 属性不存在或未激活
    pub fn show(&self, cell: &ExtConfigCell, name: &str) -> Result<String> {
        let attr = self.find(name)?;
        let val = cell.with(|cfg| attr.field.load(cfg));
        Ok(format!("{}", val))
    }

    /// 把文本解析为无符号整数并写入属性
    ///
    /// 接受标准进制前缀（`0x`/`0o`/`0b`，以及前导 0 的八进制），
    /// 首尾的 ASCII 空白（含换行）被忽略。持锁窗口只覆盖一次字段写入。
    ///
    /// # 错误
    ///
    /// * [`ErrorKind::NotFound`] - 属性不存在或未激活
    /// * [`ErrorKind::PermissionDenied`] - 属性为只读
    /// * [`ErrorKind::InvalidInput`] - 文本无法解析为无符号整数
    pub fn store(&self, cell: &ExtConfigCell, name: &str, text: &str) -> Result<()> {
        let attr = self.find(name)?;
        if attr.mode == AttrMode::ReadOnly {
            return Err(Error::new(ErrorKind::PermissionDenied, "attribute is read-only"));
        }

        let val = parse_uint(text.trim())
            .ok_or(Error::new(ErrorKind::InvalidInput, "invalid attribute value"))?;

        cell.with_mut(|cfg| attr.field.store(cfg, val));
        Ok(())
    }

    fn find(&self, name: &str) -> Result<&'static ExtAttr> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .copied()
            .ok_or(Error::new(ErrorKind::NotFound, "attribute not found"))
    }
}

/// 解析带进制前缀的无符号整数
///
/// 语义与内核 `kstrtoul(s, 0, ...)` 一致：`0x`/`0X` 十六进制、
/// 前导 `0` 八进制、其余十进制；另外接受 Rust 风格的 `0o`/`0b` 前缀。
pub(crate) fn parse_uint(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }

    let (digits, radix) = if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")) {
        (rest, 8)
    } else if let Some(rest) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (rest, 2)
    } else if s != "0" && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    u64::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::parse_ext_options;

    fn full_cell() -> ExtConfigCell {
        let cell = ExtConfigCell::new();
        parse_ext_options(&cell, "delayupdatetime=500;wbnice", false).unwrap();
        cell
    }

    #[test]
    fn test_register_invalid_volume_is_empty() {
        let cell = ExtConfigCell::new();
        let reg = AttrRegistry::register(&cell).unwrap();
        assert!(reg.names().is_empty());
    }

    #[test]
    fn test_register_filters_by_flags() {
        let cell = ExtConfigCell::new();
        parse_ext_options(&cell, "wbnice", false).unwrap();

        let reg = AttrRegistry::register(&cell).unwrap();
        assert_eq!(reg.names(), ["wb_enable"]);
    }

    #[test]
    fn test_register_full_set() {
        let reg = AttrRegistry::register(&full_cell()).unwrap();
        assert_eq!(reg.names(), ["delay_update_time", "wb_enable"]);
    }

    #[test]
    fn test_register_duplicate_name_rolls_back() {
        static DUP: &[ExtAttr] = &[
            ExtAttr {
                name: "delay_update_time",
                mode: AttrMode::ReadWrite,
                opts: ExtOptFlags::empty(),
                field: ConfigField::DelayUpdateTime,
            },
            ExtAttr {
                name: "delay_update_time",
                mode: AttrMode::ReadOnly,
                opts: ExtOptFlags::empty(),
                field: ConfigField::DelayUpdateTime,
            },
        ];

        let err = AttrRegistry::register_table(&full_cell(), DUP).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_show_decimal_text() {
        let cell = full_cell();
        let reg = AttrRegistry::register(&cell).unwrap();
        assert_eq!(reg.show(&cell, "delay_update_time").unwrap(), "500");
        assert_eq!(reg.show(&cell, "wb_enable").unwrap(), "1");
    }

    #[test]
    fn test_show_unknown_not_found() {
        let cell = full_cell();
        let reg = AttrRegistry::register(&cell).unwrap();
        let err = reg.show(&cell, "no_such_attr").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_show_inactive_not_found() {
        let cell = ExtConfigCell::new();
        parse_ext_options(&cell, "wbnice", false).unwrap();
        let reg = AttrRegistry::register(&cell).unwrap();

        let err = reg.show(&cell, "delay_update_time").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_store_round_trip() {
        let cell = full_cell();
        let reg = AttrRegistry::register(&cell).unwrap();

        for val in [0u64, 1, 500, 0xFFFF_FFFF] {
            let text = format!("{}", val);
            reg.store(&cell, "delay_update_time", &text).unwrap();
            assert_eq!(reg.show(&cell, "delay_update_time").unwrap(), text);
        }
    }

    #[test]
    fn test_store_base_prefixes() {
        let cell = full_cell();
        let reg = AttrRegistry::register(&cell).unwrap();

        reg.store(&cell, "delay_update_time", "0x20").unwrap();
        assert_eq!(cell.snapshot().delay_update_time, 32);

        reg.store(&cell, "delay_update_time", "010").unwrap();
        assert_eq!(cell.snapshot().delay_update_time, 8);

        reg.store(&cell, "delay_update_time", "0b101\n").unwrap();
        assert_eq!(cell.snapshot().delay_update_time, 5);
    }

    #[test]
    fn test_store_truncates_to_field_width() {
        let cell = full_cell();
        let reg = AttrRegistry::register(&cell).unwrap();

        // u32 字段只保留低 4 字节
        reg.store(&cell, "delay_update_time", "0x100000001").unwrap();
        assert_eq!(cell.snapshot().delay_update_time, 1);
    }

    #[test]
    fn test_store_invalid_text() {
        let cell = full_cell();
        let reg = AttrRegistry::register(&cell).unwrap();

        for bad in ["", "abc", "-5", "12abc"] {
            let err = reg.store(&cell, "wb_enable", bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "input {:?}", bad);
        }
    }

    #[test]
    fn test_store_disables_writeback() {
        let cell = full_cell();
        let reg = AttrRegistry::register(&cell).unwrap();

        reg.store(&cell, "wb_enable", "0").unwrap();
        assert!(!cell.snapshot().wb_nice_active());
    }

    #[test]
    fn test_unregister_clears_entries() {
        let cell = full_cell();
        let mut reg = AttrRegistry::register(&cell).unwrap();
        reg.unregister();
        assert!(reg.names().is_empty());

        let err = reg.show(&cell, "wb_enable").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_parse_uint_forms() {
        assert_eq!(parse_uint("0"), Some(0));
        assert_eq!(parse_uint("255"), Some(255));
        assert_eq!(parse_uint("0xff"), Some(255));
        assert_eq!(parse_uint("0o17"), Some(15));
        assert_eq!(parse_uint("017"), Some(15));
        assert_eq!(parse_uint("0b10"), Some(2));
        assert_eq!(parse_uint(""), None);
        assert_eq!(parse_uint("0x"), None);
        assert_eq!(parse_uint("1e3"), None);
    }
}

//! 容器初始容量配置。
//!
//! 默认值与 `split` 固有行为一致（结果数组初始 16 槽）；调用方可以通过 TOML 覆盖，
//! 例如在批量切分大文本时调大 `split_initial_capacity` 以减少翻倍次数。

use serde::Deserialize;

use crate::error::{Result, StrBufError};

/// `ByteBuffer::from_config` 使用的默认初始容量。
pub const DEFAULT_BUFFER_CAPACITY: usize = 64;
/// `BufferArray::from_config` 使用的默认槽位数。
pub const DEFAULT_ARRAY_CAPACITY: usize = 16;
/// 切分结果数组的默认槽位数。
pub const DEFAULT_SPLIT_CAPACITY: usize = 16;

/// 缓冲与数组的初始容量配置。
///
/// # 契约说明（What）
/// - 缺省字段回落到对应的 `DEFAULT_*` 常量；
/// - `array_initial_capacity`、`split_initial_capacity` 必须不小于 1，否则翻倍扩容无从起步，
///   由 [`StrBufConfig::validate`] 拒绝。
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrBufConfig {
    pub buffer_initial_capacity: usize,
    pub array_initial_capacity: usize,
    pub split_initial_capacity: usize,
}

impl Default for StrBufConfig {
    fn default() -> Self {
        Self {
            buffer_initial_capacity: DEFAULT_BUFFER_CAPACITY,
            array_initial_capacity: DEFAULT_ARRAY_CAPACITY,
            split_initial_capacity: DEFAULT_SPLIT_CAPACITY,
        }
    }
}

impl StrBufConfig {
    /// 从 TOML 文本解析配置并完成校验。
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: StrBufConfig =
            toml::from_str(raw).map_err(|err| StrBufError::InvalidConfig {
                detail: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 校验数组类容量是否足以支撑翻倍扩容。
    pub fn validate(&self) -> Result<()> {
        if self.array_initial_capacity == 0 {
            return Err(StrBufError::InvalidConfig {
                detail: "array_initial_capacity must be at least 1".to_owned(),
            });
        }
        if self.split_initial_capacity == 0 {
            return Err(StrBufError::InvalidConfig {
                detail: "split_initial_capacity must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

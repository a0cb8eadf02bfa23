//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为缓冲、数组与切分操作提供集中错误定义，严格路径（`try_*`）通过它向调用方传播失败；
//! - 宽松路径（`append`、`split` 等）在内部同样生成这些错误，但仅记录诊断日志后丢弃。
//!
//! ## 设计要求（What）
//! - 所有变体派生 `thiserror::Error`，兼容 `std::error::Error` 与 `?` 传播；
//! - 每个变体对应一个稳定错误码（`strbuf.*`），便于在日志、指标中聚合。

use thiserror::Error;

/// 本 crate 的统一返回类型。
pub type Result<T, E = StrBufError> = core::result::Result<T, E>;

/// 稳定错误码常量。
pub mod codes {
    /// 分配或重新分配内存失败。
    pub const ALLOC_FAILED: &str = "strbuf.alloc_failed";
    /// 切分时源字节序列为空。
    pub const SPLIT_EMPTY_SOURCE: &str = "strbuf.split.empty_source";
    /// 切分时分隔符为空。
    pub const SPLIT_EMPTY_SEPARATOR: &str = "strbuf.split.empty_separator";
    /// 配置取值不合法。
    pub const CONFIG_INVALID: &str = "strbuf.config.invalid";
}

/// 缓冲与切分错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：只有分配失败属于“真正的失败”；空输入、空分隔符在宽松路径上表现为无操作，
///   在严格路径上才以独立变体报告，便于调用方区分。
/// - **契约 (What)**：错误发生时，触发错误的容器保持调用前的状态，不会出现半更新。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StrBufError {
    /// 无法为 `what` 分配 `requested` 个单元的存储。
    #[error("cannot allocate {requested} slots for {what}")]
    AllocationFailed { what: &'static str, requested: usize },

    /// 切分源为空，不产生任何结果。
    #[error("split source is empty")]
    EmptySource,

    /// 分隔符为空，切分语义未定义。
    #[error("split separator is empty")]
    EmptySeparator,

    /// 配置加载或校验失败。
    #[error("invalid strbuf configuration: {detail}")]
    InvalidConfig { detail: String },
}

impl StrBufError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            StrBufError::AllocationFailed { .. } => codes::ALLOC_FAILED,
            StrBufError::EmptySource => codes::SPLIT_EMPTY_SOURCE,
            StrBufError::EmptySeparator => codes::SPLIT_EMPTY_SEPARATOR,
            StrBufError::InvalidConfig { .. } => codes::CONFIG_INVALID,
        }
    }

    pub(crate) fn alloc(what: &'static str, requested: usize) -> Self {
        StrBufError::AllocationFailed { what, requested }
    }
}

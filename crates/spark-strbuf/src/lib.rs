//! `spark-strbuf` 提供精确扩容的字节缓冲、独占持有缓冲的数组，以及按分隔符切分的工具。
//!
//! # 模块定位（Why）
//! - 协议解析、配置读取等场景经常需要“拼一段字节、按分隔符拆开、逐段交给下游”，
//!   本 crate 把这三步的所有权与扩容纪律集中在一处；
//! - 内容被视作不透明字节序列，不做任何编码校验。
//!
//! # 设计概要（How）
//! - `byte_buffer`：[`ByteBuffer`]，按需精确扩容，逻辑内容后维护终止字节，可整体交出存储；
//! - `buffer_array`：[`BufferArray`]，独占持有一组 `ByteBuffer`，按翻倍策略扩容槽位；
//! - `split`：[`split`] / [`try_split`] 把源序列切成 `BufferArray`，[`fragments`] 提供零拷贝迭代；
//! - `config`：[`StrBufConfig`] 描述各容器的初始容量，可从 TOML 加载。
//!
//! # 错误策略（What）
//! - 每个可失败操作都有返回 [`Result`] 的严格版本（`try_*`）；
//! - 同名的宽松版本在无效请求或分配失败时静默无操作，与调用方“失败即忽略”的既有约定保持兼容；
//! - 分配失败始终记录一条 `tracing` 的 `warn` 级诊断，不会自动重试。

mod buffer_array;
mod byte_buffer;
mod config;
mod error;
mod split;

pub use buffer_array::BufferArray;
pub use byte_buffer::{ByteBuffer, TERMINATOR};
pub use config::{
    DEFAULT_ARRAY_CAPACITY, DEFAULT_BUFFER_CAPACITY, DEFAULT_SPLIT_CAPACITY, StrBufConfig,
};
pub use error::{Result, StrBufError, codes};
pub use split::{Fragments, fragments, split, try_split, try_split_with};

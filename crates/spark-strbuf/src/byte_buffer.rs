use core::fmt::{self, Write as _};

use bytes::Bytes;
use tracing::{trace, warn};

use crate::{
    buffer_array::BufferArray,
    config::StrBufConfig,
    error::{Result, StrBufError},
};

/// 逻辑内容之后始终维护的终止字节。
pub const TERMINATOR: u8 = 0;

/// `ByteBuffer` 是精确扩容的可增长字节缓冲。
///
/// # 设计动机（Why）
/// - 追加通常是少量、整块的（整段分片），因此采用“恰好够用”的扩容策略：
///   需要时直接扩到 `size + len + 1`，以多几次重新分配换取最小的内存超占；
/// - 逻辑内容之后保留一个 [`TERMINATOR`]，便于与以零结尾字符串的消费方互通。
///
/// # 结构设计（How）
/// - `storage` 的长度即逻辑容量（`capacity`），新扩出的区域以零填充；
/// - `size` 为逻辑字节数，不含终止字节。
///
/// # 契约说明（What）
/// - 任何成功的修改之后，若 `capacity > 0`，则 `size < capacity` 且 `storage[size] == TERMINATOR`；
/// - `capacity == 0` 是“未持有存储”的形态（[`ByteBuffer::new`] 或 [`ByteBuffer::detach`] 之后），
///   此时追加会从零开始扩容；
/// - 通过 [`ByteBuffer::as_bytes`] 取得的视图借用自缓冲本身，任何可能扩容的调用之前必须释放，
///   由借用检查器保证。
///
/// # 风险与取舍（Trade-offs）
/// - 逐字节追加时每次都会触发一次重新分配；若需要高频逐字节写入，应先用
///   [`ByteBuffer::reallocate`] 预留容量。
#[derive(Debug, Default)]
pub struct ByteBuffer {
    storage: Vec<u8>,
    size: usize,
}

impl ByteBuffer {
    /// 构造未持有存储的空缓冲，不发生分配。
    pub const fn new() -> Self {
        Self {
            storage: Vec::new(),
            size: 0,
        }
    }

    /// 按给定容量创建缓冲。
    ///
    /// 终止字节始终需要一个位置，因此实际容量为 `max(capacity, 1)`。
    /// 分配失败时记录诊断并返回 [`StrBufError::AllocationFailed`]。
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        let mut storage: Vec<u8> = Vec::new();
        if storage.try_reserve_exact(capacity).is_err() {
            warn!(requested = capacity, "ByteBuffer allocation failed");
            return Err(StrBufError::alloc("ByteBuffer", capacity));
        }
        storage.resize(capacity, TERMINATOR);
        Ok(Self { storage, size: 0 })
    }

    /// 使用配置中的 `buffer_initial_capacity` 创建缓冲。
    pub fn from_config(config: &StrBufConfig) -> Result<Self> {
        Self::with_capacity(config.buffer_initial_capacity)
    }

    /// 复制一段原始字节，生成独立持有的新缓冲，容量恰为 `bytes.len() + 1`。
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let capacity = bytes
            .len()
            .checked_add(1)
            .ok_or_else(|| StrBufError::alloc("ByteBuffer", usize::MAX))?;
        let mut buffer = Self::with_capacity(capacity)?;
        buffer.try_append(bytes)?;
        Ok(buffer)
    }

    /// 复制当前逻辑内容，返回存储独立的新缓冲。
    pub fn duplicate(&self) -> Result<Self> {
        Self::from_slice(self.as_bytes())
    }

    /// 逻辑字节数，不含终止字节。
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// 当前已分配的存储长度（含终止字节的位置）。
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// 将逻辑长度归零，保留已分配的存储。
    pub fn clear(&mut self) {
        self.size = 0;
        if let Some(first) = self.storage.first_mut() {
            *first = TERMINATOR;
        }
    }

    /// 将存储调整为恰好 `new_capacity`。
    ///
    /// # 契约说明（What）
    /// - 成功后 `capacity() == new_capacity`；
    /// - 缩容到内容以下时，内容截断为 `new_capacity - 1` 字节并重写终止字节；
    ///   缩到 `0` 则回到未持有存储的形态；
    /// - 失败时缓冲保持原状，并记录一条 `warn` 级诊断。
    pub fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        let old_capacity = self.storage.len();
        if new_capacity > old_capacity {
            if self
                .storage
                .try_reserve_exact(new_capacity - old_capacity)
                .is_err()
            {
                warn!(
                    current = old_capacity,
                    requested = new_capacity,
                    "ByteBuffer reallocation failed"
                );
                return Err(StrBufError::alloc("ByteBuffer", new_capacity));
            }
            self.storage.resize(new_capacity, TERMINATOR);
        } else if new_capacity < old_capacity {
            self.storage.truncate(new_capacity);
            self.storage.shrink_to_fit();
            if new_capacity == 0 {
                self.size = 0;
            } else if self.size >= new_capacity {
                self.size = new_capacity - 1;
                self.storage[self.size] = TERMINATOR;
            }
        }
        trace!(
            from = old_capacity,
            to = new_capacity,
            "ByteBuffer reallocated"
        );
        Ok(())
    }

    /// 追加字节，失败时返回错误且内容不变。
    ///
    /// 当 `size + len >= capacity` 时先精确扩容到 `size + len + 1`。
    pub fn try_append(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.make_room(bytes.len())?;
        self.storage[self.size..end].copy_from_slice(bytes);
        self.commit(end);
        Ok(())
    }

    /// 宽松版本的 [`ByteBuffer::try_append`]：失败的请求被记录后静默丢弃。
    pub fn append(&mut self, bytes: &[u8]) {
        let _ = self.try_append(bytes);
    }

    /// 追加单个字节；需要扩容时增长到 `size + 2`（该字节加终止字节）。
    pub fn try_append_byte(&mut self, byte: u8) -> Result<()> {
        let end = self.make_room(1)?;
        self.storage[self.size] = byte;
        self.commit(end);
        Ok(())
    }

    /// 宽松版本的 [`ByteBuffer::try_append_byte`]。
    pub fn append_byte(&mut self, byte: u8) {
        let _ = self.try_append_byte(byte);
    }

    /// 逻辑内容的只读视图。
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.size]
    }

    /// 包含终止字节的视图；未持有存储时为空切片。
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.storage.is_empty() {
            &[]
        } else {
            &self.storage[..=self.size]
        }
    }

    /// 将存储所有权转交调用方。
    ///
    /// 返回的 `Vec` 长度为逻辑长度、沿用原有分配；缓冲随后回到
    /// `size == 0`、`capacity == 0` 的形态，后续追加会重新分配。
    pub fn detach(&mut self) -> Vec<u8> {
        let mut storage = core::mem::take(&mut self.storage);
        storage.truncate(self.size);
        self.size = 0;
        storage
    }

    /// 与 [`ByteBuffer::detach`] 相同，但以 [`Bytes`] 形式交出，不复制数据。
    pub fn detach_bytes(&mut self) -> Bytes {
        Bytes::from(self.detach())
    }

    /// 以 `separator` 切分当前内容，语义同 [`crate::split()`]。
    pub fn split(&self, separator: &[u8]) -> Option<BufferArray> {
        crate::split::split(self.as_bytes(), separator)
    }

    /// 确保还能写入 `additional` 字节加终止字节，返回写入后的逻辑末尾。
    fn make_room(&mut self, additional: usize) -> Result<usize> {
        let Some(end) = self.size.checked_add(additional) else {
            warn!(size = self.size, additional, "ByteBuffer length overflow");
            return Err(StrBufError::alloc("ByteBuffer", usize::MAX));
        };
        if end >= self.capacity() {
            let target = end
                .checked_add(1)
                .ok_or_else(|| StrBufError::alloc("ByteBuffer", usize::MAX))?;
            self.reallocate(target)?;
        }
        Ok(end)
    }

    fn commit(&mut self, end: usize) {
        self.size = end;
        self.storage[end] = TERMINATOR;
    }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteBuffer {}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<ByteBuffer> for Vec<u8> {
    fn from(mut buffer: ByteBuffer) -> Self {
        buffer.detach()
    }
}

impl From<ByteBuffer> for Bytes {
    fn from(mut buffer: ByteBuffer) -> Self {
        buffer.detach_bytes()
    }
}

/// 调试输出：`size=<n> capacity=<n> str=<内容>`，不可打印字节转义为 `\xHH`。
impl fmt::Display for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "size={} capacity={} str=", self.size, self.capacity())?;
        for &byte in self.as_bytes() {
            if byte.is_ascii_graphic() || byte == b' ' {
                f.write_char(char::from(byte))?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

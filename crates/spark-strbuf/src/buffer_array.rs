use core::{fmt, slice};

use tracing::{trace, warn};

use crate::{
    byte_buffer::ByteBuffer,
    config::StrBufConfig,
    error::{Result, StrBufError},
};

/// `BufferArray` 独占持有一组 [`ByteBuffer`]，按翻倍策略扩容。
///
/// # 设计动机（Why）
/// - 元素通常在循环中逐个追加（例如切分结果），摊还翻倍扩容可以避免每次追加都重新分配槽位；
/// - 与之相对，元素本身按精确容量构造，不为单个分片预留多余空间。
///
/// # 契约说明（What）
/// - `[0, len)` 的每个槽位都持有一个存活且仅属于本数组的缓冲；
/// - `capacity` 记录逻辑槽位数，追加时若 `len >= capacity` 先扩到 `max(capacity * 2, 1)`；
/// - 元素构造失败时长度不变，不会留下半初始化的槽位；
/// - [`BufferArray::clear`] 与 `Drop` 会释放全部元素。
#[derive(Debug, Default)]
pub struct BufferArray {
    items: Vec<ByteBuffer>,
    capacity: usize,
}

impl BufferArray {
    /// 构造零槽位的空数组，不发生分配。
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    /// 预分配 `capacity` 个槽位。
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items: Vec<ByteBuffer> = Vec::new();
        if items.try_reserve_exact(capacity).is_err() {
            warn!(requested = capacity, "BufferArray allocation failed");
            return Err(StrBufError::alloc("BufferArray", capacity));
        }
        Ok(Self { items, capacity })
    }

    /// 使用配置中的 `array_initial_capacity` 创建数组。
    pub fn from_config(config: &StrBufConfig) -> Result<Self> {
        Self::with_capacity(config.array_initial_capacity)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 释放全部元素，保留槽位容量。
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 将槽位数调整为 `new_capacity`。
    ///
    /// 缩容到当前长度以下时，尾部元素被释放；失败时数组保持原状并记录诊断。
    pub fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        let old_capacity = self.capacity;
        let len = self.items.len();
        if new_capacity > len {
            if self.items.try_reserve_exact(new_capacity - len).is_err() {
                warn!(
                    current = old_capacity,
                    requested = new_capacity,
                    "BufferArray reallocation failed"
                );
                return Err(StrBufError::alloc("BufferArray", new_capacity));
            }
        } else {
            self.items.truncate(new_capacity);
        }
        if new_capacity < old_capacity {
            self.items.shrink_to(new_capacity);
        }
        self.capacity = new_capacity;
        trace!(
            from = old_capacity,
            to = new_capacity,
            "BufferArray reallocated"
        );
        Ok(())
    }

    /// 复制 `bytes` 为新元素追加到末尾。
    pub fn try_append(&mut self, bytes: &[u8]) -> Result<()> {
        if self.items.len() >= self.capacity {
            let grown = self.capacity.checked_mul(2).unwrap_or(usize::MAX).max(1);
            self.reallocate(grown)?;
        }
        let element = ByteBuffer::from_slice(bytes)?;
        self.items.push(element);
        Ok(())
    }

    /// 宽松版本的 [`BufferArray::try_append`]：失败时不追加，也不报告。
    pub fn append(&mut self, bytes: &[u8]) {
        let _ = self.try_append(bytes);
    }

    pub fn get(&self, index: usize) -> Option<&ByteBuffer> {
        self.items.get(index)
    }

    /// 第 `index` 个元素的逻辑长度；越界时为 0。
    pub fn element_len(&self, index: usize) -> usize {
        self.get(index).map_or(0, ByteBuffer::len)
    }

    /// 第 `index` 个元素的只读视图；越界时为 `None`。
    pub fn element_bytes(&self, index: usize) -> Option<&[u8]> {
        self.get(index).map(ByteBuffer::as_bytes)
    }

    pub fn iter(&self) -> slice::Iter<'_, ByteBuffer> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ByteBuffer] {
        &self.items
    }

    /// 以 `separator` 连接全部元素，生成容量恰好够用的新缓冲。
    ///
    /// 对切分结果调用本方法即可还原源序列。
    pub fn join(&self, separator: &[u8]) -> Result<ByteBuffer> {
        let content: usize = self.items.iter().map(ByteBuffer::len).sum();
        let gaps = self.items.len().saturating_sub(1);
        let total = separator
            .len()
            .checked_mul(gaps)
            .and_then(|seps| seps.checked_add(content))
            .and_then(|total| total.checked_add(1))
            .ok_or_else(|| StrBufError::alloc("ByteBuffer", usize::MAX))?;

        let mut joined = ByteBuffer::with_capacity(total)?;
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                joined.try_append(separator)?;
            }
            joined.try_append(item.as_bytes())?;
        }
        Ok(joined)
    }
}

impl<'a> IntoIterator for &'a BufferArray {
    type Item = &'a ByteBuffer;
    type IntoIter = slice::Iter<'a, ByteBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for BufferArray {
    type Item = ByteBuffer;
    type IntoIter = std::vec::IntoIter<ByteBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// 调试输出：首行 `size=<n> capacity=<n>`，随后每个元素一行、以制表符缩进。
impl fmt::Display for BufferArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "size={} capacity={}", self.items.len(), self.capacity)?;
        for item in &self.items {
            write!(f, "\n\t{item}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;

    #[test]
    fn append_doubles_slot_capacity() {
        let mut array = BufferArray::with_capacity(1).expect("创建数组");
        let mut observed = Vec::new();
        for word in [&b"a"[..], b"bb", b"ccc", b"dddd", b"e"] {
            array.append(word);
            observed.push(array.capacity());
        }
        assert_eq!(observed, vec![1, 2, 4, 4, 8]);
        assert_eq!(array.len(), 5);
        assert_eq!(array.element_bytes(3), Some(&b"dddd"[..]));
    }

    #[test]
    fn zero_capacity_array_still_grows() {
        let mut array = BufferArray::new();
        array.append(b"first");
        assert_eq!(array.capacity(), 1);
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn elements_are_built_with_exact_capacity() {
        let mut array = BufferArray::with_capacity(2).expect("创建数组");
        array.append(b"abc");
        array.append(b"");
        let first = array.get(0).expect("第一个元素");
        assert_eq!(first.capacity(), 4);
        assert_eq!(first.as_bytes_with_nul(), b"abc\0");
        assert_eq!(array.element_len(1), 0);
        assert_eq!(array.element_bytes(1), Some(&b""[..]));
    }

    #[test]
    fn out_of_bounds_access_returns_sentinels() {
        let mut array = BufferArray::with_capacity(4).expect("创建数组");
        array.append(b"only");
        assert_eq!(array.element_len(1), 0);
        assert_eq!(array.element_bytes(1), None);
        assert!(array.get(usize::MAX).is_none());
    }

    #[test]
    fn clear_releases_elements_but_keeps_slots() {
        let mut array = BufferArray::with_capacity(2).expect("创建数组");
        array.append(b"x");
        array.append(b"y");
        array.append(b"z");
        assert_eq!(array.capacity(), 4);
        array.clear();
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 4);
        array.append(b"again");
        assert_eq!(array.capacity(), 4);
        assert_eq!(array.element_bytes(0), Some(&b"again"[..]));
    }

    #[test]
    fn shrinking_drops_trailing_elements() {
        let mut array = BufferArray::with_capacity(4).expect("创建数组");
        for word in [&b"a"[..], b"b", b"c"] {
            array.append(word);
        }
        array.reallocate(2).expect("缩容");
        assert_eq!(array.capacity(), 2);
        assert_eq!(array.len(), 2);
        assert_eq!(array.element_bytes(1), Some(&b"b"[..]));
        assert_eq!(array.element_bytes(2), None);
    }

    #[test]
    fn failed_reallocation_keeps_state() {
        let mut array = BufferArray::with_capacity(2).expect("创建数组");
        array.append(b"kept");
        let err = array.reallocate(usize::MAX).expect_err("请求超出地址空间");
        assert_eq!(err.code(), codes::ALLOC_FAILED);
        assert_eq!(array.capacity(), 2);
        assert_eq!(array.element_bytes(0), Some(&b"kept"[..]));
    }

    #[test]
    fn join_restores_separated_sequence() {
        let mut array = BufferArray::with_capacity(4).expect("创建数组");
        for word in [&b"www"[..], b"", b"com"] {
            array.append(word);
        }
        let joined = array.join(b"::").expect("连接");
        assert_eq!(joined.as_bytes(), b"www::::com");
        assert_eq!(joined.capacity(), joined.len() + 1);
        assert!(BufferArray::new().join(b",").expect("空数组").is_empty());
    }

    #[test]
    fn display_lists_each_element_indented() {
        let mut array = BufferArray::with_capacity(2).expect("创建数组");
        array.append(b"ab");
        array.append(b"\t");
        assert_eq!(
            array.to_string(),
            "size=2 capacity=2\n\tsize=2 capacity=3 str=ab\n\tsize=1 capacity=2 str=\\x09"
        );
    }
}

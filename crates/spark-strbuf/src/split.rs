//! 按分隔符切分字节序列。
//!
//! # 行为概览（How）
//! - 游标从源起点出发，逐次查找下一个分隔符（按字节精确匹配、区分大小写）；
//! - 找不到时把源末尾视作“下一个位置”，输出最后一个分片后结束；
//! - 找到时输出 `[游标, 命中位置)`，游标跳过分隔符；若此时恰好到达源末尾，
//!   再补一个空分片后结束。
//!
//! # 契约说明（What）
//! - 连续分隔符之间产生空分片；以分隔符结尾的源产生一个尾随空分片；
//! - 源中不含分隔符时结果只有一个等于源的分片；
//! - 剩余长度短于分隔符时视为未命中；
//! - 空源、空分隔符不产生结果。

use crate::{
    buffer_array::BufferArray,
    config::{DEFAULT_SPLIT_CAPACITY, StrBufConfig},
    error::{Result, StrBufError},
};

/// 宽松切分：空源、空分隔符或分配失败时返回 `None`。
///
/// ```
/// let parts = spark_strbuf::split(b"www.example.com", b".").expect("非空输入");
/// assert_eq!(parts.len(), 3);
/// assert_eq!(parts.element_bytes(1), Some(&b"example"[..]));
/// ```
pub fn split(source: &[u8], separator: &[u8]) -> Option<BufferArray> {
    try_split(source, separator).ok()
}

/// 严格切分，结果数组初始 16 槽。
pub fn try_split(source: &[u8], separator: &[u8]) -> Result<BufferArray> {
    split_into(source, separator, DEFAULT_SPLIT_CAPACITY)
}

/// 严格切分，结果数组的初始槽位取自 `config.split_initial_capacity`。
pub fn try_split_with(
    source: &[u8],
    separator: &[u8],
    config: &StrBufConfig,
) -> Result<BufferArray> {
    split_into(source, separator, config.split_initial_capacity)
}

fn split_into(source: &[u8], separator: &[u8], initial_capacity: usize) -> Result<BufferArray> {
    if source.is_empty() {
        return Err(StrBufError::EmptySource);
    }
    if separator.is_empty() {
        return Err(StrBufError::EmptySeparator);
    }
    let mut result = BufferArray::with_capacity(initial_capacity)?;
    for fragment in fragments(source, separator) {
        result.try_append(fragment)?;
    }
    Ok(result)
}

/// 以借用方式逐个产出分片，不复制数据。
///
/// 空源或空分隔符时迭代器直接结束。
pub fn fragments<'a>(source: &'a [u8], separator: &'a [u8]) -> Fragments<'a> {
    Fragments {
        source,
        separator,
        cursor: 0,
        state: if separator.is_empty() {
            State::Done
        } else {
            State::Scanning
        },
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Scanning,
    /// 分隔符恰好位于源末尾，还欠一个空分片。
    TrailingEmpty,
    Done,
}

/// [`fragments`] 返回的迭代器。
#[derive(Clone, Debug)]
pub struct Fragments<'a> {
    source: &'a [u8],
    separator: &'a [u8],
    cursor: usize,
    state: State,
}

impl<'a> Iterator for Fragments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source;
        match self.state {
            State::Done => None,
            State::TrailingEmpty => {
                self.state = State::Done;
                Some(&source[source.len()..])
            }
            State::Scanning => {
                if self.cursor >= source.len() {
                    self.state = State::Done;
                    return None;
                }
                let rest = &source[self.cursor..];
                match find(rest, self.separator) {
                    None => {
                        self.state = State::Done;
                        self.cursor = source.len();
                        Some(rest)
                    }
                    Some(offset) => {
                        self.cursor += offset + self.separator.len();
                        if self.cursor == source.len() {
                            self.state = State::TrailingEmpty;
                        }
                        Some(&rest[..offset])
                    }
                }
            }
        }
    }
}

impl core::iter::FusedIterator for Fragments<'_> {}

/// 子串查找；`needle` 长于 `haystack` 时视为未命中。
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;

    fn collect(array: &BufferArray) -> Vec<&[u8]> {
        array.iter().map(|item| item.as_bytes()).collect()
    }

    #[test]
    fn splits_on_every_separator() {
        let parts = split(b"a.b.c", b".").expect("应有结果");
        assert_eq!(collect(&parts), vec![&b"a"[..], b"b", b"c"]);
    }

    #[test]
    fn consecutive_separators_yield_empty_fragment() {
        let parts = split(b"a..b", b".").expect("应有结果");
        assert_eq!(collect(&parts), vec![&b"a"[..], b"", b"b"]);
    }

    #[test]
    fn trailing_separator_yields_one_empty_fragment() {
        let parts = split(b"a.", b".").expect("应有结果");
        assert_eq!(collect(&parts), vec![&b"a"[..], b""]);
    }

    #[test]
    fn leading_separator_yields_empty_head() {
        let parts = split(b".a", b".").expect("应有结果");
        assert_eq!(collect(&parts), vec![&b""[..], b"a"]);
        let only = split(b".", b".").expect("应有结果");
        assert_eq!(collect(&only), vec![&b""[..], b""]);
    }

    #[test]
    fn missing_separator_returns_whole_source() {
        let parts = split(b"abc", b".").expect("应有结果");
        assert_eq!(collect(&parts), vec![&b"abc"[..]]);
        let longer = split(b"ab", b"abc").expect("应有结果");
        assert_eq!(collect(&longer), vec![&b"ab"[..]]);
    }

    #[test]
    fn multi_byte_separator_is_matched_exactly() {
        let parts = split(b"key=>value=>", b"=>").expect("应有结果");
        assert_eq!(collect(&parts), vec![&b"key"[..], b"value", b""]);
        let case = split(b"aXbxc", b"x").expect("应有结果");
        assert_eq!(collect(&case), vec![&b"aXb"[..], b"c"]);
    }

    #[test]
    fn empty_inputs_produce_no_result() {
        assert!(split(b"", b".").is_none());
        assert!(split(b"abc", b"").is_none());
        assert_eq!(
            try_split(b"", b".").expect_err("空源").code(),
            codes::SPLIT_EMPTY_SOURCE
        );
        assert_eq!(
            try_split(b"abc", b"").expect_err("空分隔符").code(),
            codes::SPLIT_EMPTY_SEPARATOR
        );
        assert_eq!(fragments(b"abc", b"").count(), 0);
        assert_eq!(fragments(b"", b".").count(), 0);
    }

    #[test]
    fn result_starts_with_sixteen_slots_and_doubles() {
        let parts = split(b"a,b", b",").expect("应有结果");
        assert_eq!(parts.capacity(), 16);
        let many = "x,".repeat(16) + "x";
        let parts = split(many.as_bytes(), b",").expect("应有结果");
        assert_eq!(parts.len(), 17);
        assert_eq!(parts.capacity(), 32);
    }

    #[test]
    fn configured_capacity_is_used() {
        let config = StrBufConfig {
            split_initial_capacity: 2,
            ..StrBufConfig::default()
        };
        let parts = try_split_with(b"a b c", b" ", &config).expect("应有结果");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.capacity(), 4);
    }

    #[test]
    fn fragments_borrow_from_source() {
        let source = b"left|right";
        let parts: Vec<&[u8]> = fragments(source, b"|").collect();
        assert_eq!(parts, vec![&b"left"[..], b"right"]);
        assert!(core::ptr::eq(parts[0].as_ptr(), source.as_ptr()));
    }
}

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spark_strbuf::{BufferArray, ByteBuffer, TERMINATOR};

/// Fuzz 指令：描述一次缓冲/数组操作序列。
///
/// - **Why**：扩容、缩容、交出存储交错发生时最容易破坏“终止字节 + `size < capacity`”不变式；
/// - **What**：每一步之后与影子 `Vec<u8>` 比对内容，并检查不变式。
#[derive(Debug, Arbitrary)]
struct BufferCase {
    initial: u8,
    ops: Vec<BufferOp>,
}

#[derive(Debug, Arbitrary)]
enum BufferOp {
    Append(Vec<u8>),
    AppendByte(u8),
    Clear,
    Reallocate(u8),
    Detach,
    Duplicate,
    PushToArray,
}

fuzz_target!(|case: BufferCase| {
    let Ok(mut buffer) = ByteBuffer::with_capacity(usize::from(case.initial)) else {
        return;
    };
    let mut shadow: Vec<u8> = Vec::new();
    let mut array = BufferArray::new();

    for op in case.ops {
        match op {
            BufferOp::Append(bytes) => {
                buffer.append(&bytes);
                shadow.extend_from_slice(&bytes);
            }
            BufferOp::AppendByte(byte) => {
                buffer.append_byte(byte);
                shadow.push(byte);
            }
            BufferOp::Clear => {
                buffer.clear();
                shadow.clear();
            }
            BufferOp::Reallocate(capacity) => {
                let capacity = usize::from(capacity);
                buffer.reallocate(capacity).expect("小容量重分配不应失败");
                shadow.truncate(capacity.saturating_sub(1));
            }
            BufferOp::Detach => {
                assert_eq!(buffer.detach(), shadow);
                shadow.clear();
            }
            BufferOp::Duplicate => {
                let copy = buffer.duplicate().expect("复制不应失败");
                assert_eq!(copy.as_bytes(), buffer.as_bytes());
            }
            BufferOp::PushToArray => {
                array.append(buffer.as_bytes());
                let last = array.len() - 1;
                assert_eq!(array.element_bytes(last), Some(&shadow[..]));
            }
        }

        assert_eq!(buffer.as_bytes(), &shadow[..]);
        if buffer.capacity() > 0 {
            assert!(buffer.len() < buffer.capacity());
            assert_eq!(buffer.as_bytes_with_nul()[buffer.len()], TERMINATOR);
        }
    }
});

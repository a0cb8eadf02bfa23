#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spark_strbuf::{fragments, split};

/// 任意源与分隔符：切分后再以分隔符连接必须还原源序列。
#[derive(Debug, Arbitrary)]
struct SplitCase {
    source: Vec<u8>,
    separator: Vec<u8>,
}

fuzz_target!(|case: SplitCase| {
    let Some(parts) = split(&case.source, &case.separator) else {
        assert!(case.source.is_empty() || case.separator.is_empty());
        return;
    };
    assert!(!parts.is_empty());
    assert_eq!(parts.len(), fragments(&case.source, &case.separator).count());

    let joined = parts.join(&case.separator).expect("连接不应失败");
    assert_eq!(joined.as_bytes(), &case.source[..]);
});

/// 0-based index into the BAM header's reference sequence table.
pub type RefId = usize;

/// Combined mapping quality of a mate pair (sum of both mates' MAPQ).
pub type PairScore = u32;

// Fast hash maps using AHash instead of the default SipHash.
// Import these throughout the codebase with `use crate::types::HashMap`.
// Also import `HashMapExt` when you need `::new()` or `::with_capacity()`.
pub(crate) type HashMap<K, V> = ahash::HashMap<K, V>;
pub(crate) use ahash::HashMapExt;

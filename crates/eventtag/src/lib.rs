//! Shared event tagging helpers used across crates.
//!
//! We tag injected events with a process-unique marker value in the
//! `EventSourceUserData` field so our taps can ignore them.

/// 'bndk' in ASCII bytes: 0x62 0x6e 0x64 0x6b -> 1651401835
pub const BNDK_TAG: i64 = 1_651_401_835;

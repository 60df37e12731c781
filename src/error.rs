use thiserror::Error;

/// One of the five structural rules a CPU-cache descriptor must satisfy.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    #[error("set count is not a power of two")]
    SetCountNotPowerOfTwo,
    #[error("line size is not a power of two")]
    LineSizeNotPowerOfTwo,
    #[error("line size is too small")]
    LineSizeTooSmall,
    #[error("size is not greater than line size")]
    SizeNotGreaterThanLine,
    #[error("associativity exceeds size / line_size")]
    AssocExceedsLines,
}

/// Crate-wide error type. Mirrors the three error kinds of the original
/// simulator's error-handling design: malformed CLI values, invalid cache/TLB
/// descriptors, and runtime assertion violations.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("option {option}: {detail}")]
    MalformedOption { option: &'static str, detail: String },

    #[error("invalid {slot} cache configuration: {kind}")]
    InvalidCacheDescriptor {
        slot: &'static str,
        kind: CacheError,
        /// Whether the user supplied an override for this slot. When true,
        /// the caller is expected to tolerate this error and fall back to
        /// the override rather than treat it as fatal.
        overridden: bool,
    },

    #[error("invalid {slot} TLB configuration: {detail}")]
    InvalidTlbDescriptor { slot: &'static str, detail: String },

    #[error("assertion violation: {0}")]
    AssertionViolation(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

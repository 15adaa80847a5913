/*!
 * Memory Spec Parser
 * Converts operator-written limits ("4gb", "50%", "1024") into byte counts
 *
 * Grammar (unit suffixes are case-insensitive):
 * - ""               -> 0 bytes (no limit)
 * - "<int>" | "<int>b" -> bytes
 * - "<float>m"       -> value * 2^20, truncated
 * - "<float>g"       -> value * 2^30, truncated
 * - "<int>%"         -> percentage of physical memory, resolved by the caller
 */

use super::host::HostMemory;
use crate::core::limits::{GIB, MAX_MEM_PERCENT, MIB};
use miette::Diagnostic;
use std::str::FromStr;
use thiserror::Error;

/// Memory spec parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemSpecError {
    #[error("'{spec}' does not end in a recognized unit (b, m, g, %)")]
    #[diagnostic(code(memspec::unknown_suffix))]
    UnknownSuffix { spec: String },

    #[error("'{spec}' is not a valid {expected}")]
    #[diagnostic(code(memspec::invalid_number))]
    InvalidNumber {
        spec: String,
        expected: &'static str,
    },

    #[error("'{spec}' does not fit in a 64-bit byte count")]
    #[diagnostic(code(memspec::overflow))]
    Overflow { spec: String },

    #[error("'{spec}' exceeds 100% of physical memory")]
    #[diagnostic(code(memspec::percent_out_of_range))]
    PercentOutOfRange { spec: String },

    #[error("'{spec}' resolves to 0 bytes of {total_bytes} bytes physical memory")]
    #[diagnostic(
        code(memspec::percent_resolves_to_zero),
        help("set an absolute limit such as \"4g\" when physical memory cannot be detected")
    )]
    PercentResolvesToZero { spec: String, total_bytes: u64 },
}

/// Parsed memory spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemSpec {
    /// Absolute size in bytes (0 means not set)
    Bytes(i64),
    /// Raw percentage of physical memory, 0-100
    Percent(i64),
}

impl MemSpec {
    /// Raw parsed value: a byte count, or the percentage when `is_percent()`
    #[inline]
    pub const fn bytes(&self) -> i64 {
        match self {
            Self::Bytes(v) | Self::Percent(v) => *v,
        }
    }

    #[inline]
    pub const fn is_percent(&self) -> bool {
        matches!(self, Self::Percent(_))
    }

    /// Resolve to an absolute byte count against the host's physical memory
    ///
    /// Percentages outside 0-100 are clamped into that range.
    pub fn resolve(&self, host: HostMemory) -> i64 {
        match *self {
            Self::Bytes(bytes) => bytes,
            Self::Percent(pct) => {
                let pct = pct.clamp(0, MAX_MEM_PERCENT) as u128;
                let bytes = u128::from(host.total_bytes()) * pct / 100;
                i64::try_from(bytes).unwrap_or(i64::MAX)
            }
        }
    }
}

impl FromStr for MemSpec {
    type Err = MemSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_mem_spec(s)
    }
}

/// Parse a memory spec string
pub fn parse_mem_spec(spec: &str) -> Result<MemSpec, MemSpecError> {
    let Some(last) = spec.chars().last() else {
        return Ok(MemSpec::Bytes(0));
    };

    let body = &spec[..spec.len() - last.len_utf8()];
    match last.to_ascii_lowercase() {
        'g' => scaled_bytes(spec, body, GIB).map(MemSpec::Bytes),
        'm' => scaled_bytes(spec, body, MIB).map(MemSpec::Bytes),
        'b' => parse_integer(spec, body).map(MemSpec::Bytes),
        '%' => {
            let pct = parse_integer(spec, body)?;
            if pct > MAX_MEM_PERCENT {
                return Err(MemSpecError::PercentOutOfRange { spec: spec.into() });
            }
            Ok(MemSpec::Percent(pct))
        }
        c if c.is_ascii_digit() => parse_integer(spec, spec).map(MemSpec::Bytes),
        _ => Err(MemSpecError::UnknownSuffix { spec: spec.into() }),
    }
}

fn parse_integer(spec: &str, digits: &str) -> Result<i64, MemSpecError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MemSpecError::InvalidNumber {
            spec: spec.into(),
            expected: "non-negative integer",
        });
    }
    // Only digits remain, so the sole failure mode is overflow
    digits
        .parse::<i64>()
        .map_err(|_| MemSpecError::Overflow { spec: spec.into() })
}

fn scaled_bytes(spec: &str, number: &str, multiplier: f64) -> Result<i64, MemSpecError> {
    let value = parse_decimal(spec, number)?;
    let bytes = value * multiplier;
    // i64::MAX as f64 rounds up to 2^63, so >= rejects everything out of range
    if bytes >= i64::MAX as f64 {
        return Err(MemSpecError::Overflow { spec: spec.into() });
    }
    Ok(bytes as i64)
}

/// Plain decimal only: no sign, exponent, inf or nan
fn parse_decimal(spec: &str, number: &str) -> Result<f64, MemSpecError> {
    let invalid = || MemSpecError::InvalidNumber {
        spec: spec.into(),
        expected: "non-negative decimal",
    };

    let mut seen_dot = false;
    let mut seen_digit = false;
    for b in number.bytes() {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return Err(invalid()),
        }
    }
    if !seen_digit {
        return Err(invalid());
    }
    number.parse::<f64>().map_err(|_| invalid())
}

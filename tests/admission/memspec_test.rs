/*!
 * Memory Spec Tests
 * Grammar coverage and parser properties
 */

use pool_admission::{parse_mem_spec, HostMemory, MemSpec, MemSpecError};
use proptest::prelude::*;

const MB: i64 = 1 << 20;
const GB: i64 = 1 << 30;

#[test]
fn test_documented_examples() {
    assert_eq!(parse_mem_spec("").unwrap(), MemSpec::Bytes(0));
    for spec in ["100", "100b", "100B"] {
        assert_eq!(parse_mem_spec(spec).unwrap().bytes(), 100);
    }
    assert_eq!(parse_mem_spec("2m").unwrap().bytes(), 2 * MB);
    assert_eq!(parse_mem_spec("1g").unwrap().bytes(), GB);

    let pct = parse_mem_spec("50%").unwrap();
    assert!(pct.is_percent());
    assert_eq!(pct.bytes(), 50);

    for spec in ["-5", "abc", "5x"] {
        assert!(parse_mem_spec(spec).is_err(), "'{}' should not parse", spec);
    }
}

#[test]
fn test_error_reports_input() {
    let err = parse_mem_spec("12tb").unwrap_err();
    assert!(err.to_string().contains("12tb"));
}

#[test]
fn test_percent_of_host() {
    let host = HostMemory::new(10 * GB as u64);
    let spec = parse_mem_spec("80%").unwrap();
    assert_eq!(spec.resolve(host), 8 * GB);
}

proptest! {
    #[test]
    fn prop_integer_bytes(n in 0u32..u32::MAX, suffix in prop::sample::select(vec!["", "b", "B"])) {
        let spec = format!("{}{}", n, suffix);
        prop_assert_eq!(parse_mem_spec(&spec).unwrap(), MemSpec::Bytes(n as i64));
    }

    #[test]
    fn prop_whole_megabytes(n in 0i64..1_000_000, upper in any::<bool>()) {
        let spec = format!("{}{}", n, if upper { "M" } else { "m" });
        prop_assert_eq!(parse_mem_spec(&spec).unwrap(), MemSpec::Bytes(n * MB));
    }

    #[test]
    fn prop_whole_gigabytes(n in 0i64..1_000_000) {
        prop_assert_eq!(parse_mem_spec(&format!("{}g", n)).unwrap(), MemSpec::Bytes(n * GB));
    }

    #[test]
    fn prop_percent_in_range(n in 0i64..=100) {
        prop_assert_eq!(parse_mem_spec(&format!("{}%", n)).unwrap(), MemSpec::Percent(n));
    }

    #[test]
    fn prop_percent_out_of_range(n in 101i64..1_000_000) {
        let result = parse_mem_spec(&format!("{}%", n));
        let is_out_of_range = matches!(result, Err(MemSpecError::PercentOutOfRange { .. }));
        prop_assert!(is_out_of_range);
    }

    #[test]
    fn prop_negative_rejected(n in 1i64..1_000_000, suffix in prop::sample::select(vec!["", "b", "m", "g", "%"])) {
        let rejected = parse_mem_spec(&format!("-{}{}", n, suffix)).is_err();
        prop_assert!(rejected);
    }

    #[test]
    fn prop_fractional_truncates(whole in 0u32..4096, frac in 0u32..1000) {
        let spec = format!("{}.{:03}m", whole, frac);
        let expected = ((whole as f64 + frac as f64 / 1000.0) * MB as f64) as i64;
        prop_assert_eq!(parse_mem_spec(&spec).unwrap().bytes(), expected);
    }
}

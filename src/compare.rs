//! Constant-time comparison of secrets.

/// Compare two strings without revealing where they first differ.
///
/// When the lengths match, every byte pair is XOR-folded into one accumulator
/// and only the final accumulator is inspected. When they do not, `a` is
/// compared against itself over its full length and the result is forced to
/// `false`, so the loop still runs for `len(a)` iterations.
///
/// The length check itself branches. Length is not hidden.
pub fn timing_safe_equal(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let mut b = b.as_bytes();
    let mut result: u8 = 0;

    if a.len() != b.len() {
        b = a;
        result = 1;
    }

    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    std::hint::black_box(result) == 0
}

use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks.
/// Used for the admin API key.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Check a presented admin key against the configured one.
///
/// A missing header or an empty configured key never authorizes.
pub fn is_authorized_admin(presented: Option<&str>, expected: &str) -> bool {
    match presented {
        Some(key) if !expected.is_empty() => constant_time_compare(key.trim(), expected),
        _ => false,
    }
}

use subtle::ConstantTimeEq;

/// Compares two byte strings without branching on their contents.
///
/// Slices of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

//! Encoding integers as boolean input vectors.

/// The lowest `width` bits of `value`, least significant first.
///
/// ```
/// use u_genprog::problems::bits::lsb_first;
///
/// assert_eq!(lsb_first(0b110, 4), vec![false, true, true, false]);
/// ```
pub fn lsb_first(value: u64, width: usize) -> Vec<bool> {
    (0..width).map(|i| bit(value, i)).collect()
}

/// The lowest `width` bits of `value`, most significant first.
///
/// ```
/// use u_genprog::problems::bits::msb_first;
///
/// assert_eq!(msb_first(0b110, 4), vec![false, true, true, false]);
/// assert_eq!(msb_first(0b0001, 4), vec![false, false, false, true]);
/// ```
pub fn msb_first(value: u64, width: usize) -> Vec<bool> {
    (0..width).rev().map(|i| bit(value, i)).collect()
}

/// The eight bits of a byte, least significant first.
pub fn byte_to_bits(byte: u8) -> Vec<bool> {
    lsb_first(u64::from(byte), 8)
}

/// Whether bit `index` of `value` is set. Bits past 63 read as unset.
pub fn bit(value: u64, index: usize) -> bool {
    u32::try_from(index)
        .ok()
        .and_then(|shift| value.checked_shr(shift))
        .is_some_and(|shifted| shifted & 1 == 1)
}

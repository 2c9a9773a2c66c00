pub const DENIED: u8 = u8::MAX;

/// Number of bits needed to store either tile number or its position (index of the board cell).
pub const BITS_PER_CELL: u8 = 4;

/// 0..01..1 mask with BITS_PER_CELL bits set.
pub const BITS_PER_CELL_MASK32: u32 = (1u32<<BITS_PER_CELL)-1;
pub const BITS_PER_CELL_MASK64: u64 = BITS_PER_CELL_MASK32 as u64;

pub const MAX_BOARD_SIZE: usize = 1<<BITS_PER_CELL;

/// Range of supported board sides (the board has side x side cells).
pub const MIN_SIDE: u8 = 2;
pub const MAX_SIDE: u8 = 4;

/// Returns `n! / (n-r)!`, the number of ways of placing `r` labeled entities in `n` cells.
pub fn permutations(n: usize, r: usize) -> usize {
    if r > n { return 0; }
    ((n-r+1)..=n).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutations() {
        assert_eq!(permutations(16, 6), 5765760);
        assert_eq!(permutations(9, 4), 3024);
        assert_eq!(permutations(4, 0), 1);
        assert_eq!(permutations(3, 4), 0);
    }
}

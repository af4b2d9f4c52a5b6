use crate::FRAME_SIZE;

pub const OFFSET_BITS: u32 = 8;
pub const OFFSET_MASK: u32 = (1 << OFFSET_BITS) - 1;
/// Logical addresses are 16 bits wide; anything above is dropped.
pub const ADDRESS_MASK: u32 = 0xffff;

/// Splits a logical address into `(page, offset)`.
pub fn decompose(address: u32) -> (usize, usize) {
    let address = address & ADDRESS_MASK;
    let page = address >> OFFSET_BITS;
    let offset = address & OFFSET_MASK;
    (page as usize, offset as usize)
}

pub fn compose(frame: usize, offset: usize) -> u32 {
    (frame * FRAME_SIZE + offset) as u32
}

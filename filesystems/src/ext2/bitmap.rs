// Bitmap management for block and inode allocation

use crate::ext2::constants::{EXT2_RESERVED_INODES, EXT2_ROOT_INO};

/// Bit vector over a block-sized buffer tracking block or inode allocation.
/// Bit order is `byte = index / 8`, `bit = index % 8`.
pub struct Bitmap {
    data: Vec<u8>,
    size_bits: u32,
}

impl Bitmap {
    /// Create a bitmap with the specified number of bits, all clear
    pub fn new(size_bits: u32) -> Self {
        let size_bytes = (size_bits + 7) / 8;
        Self {
            data: vec![0u8; size_bytes as usize],
            size_bits,
        }
    }

    /// Create a bitmap spanning exactly one block
    pub fn for_block(block_size: u32) -> Self {
        Self::new(block_size * 8)
    }

    /// Set a bit (mark as used)
    pub fn set(&mut self, index: u32) {
        if index >= self.size_bits {
            return;
        }
        let byte_index = (index / 8) as usize;
        let bit_index = (index % 8) as u8;
        self.data[byte_index] |= 1 << bit_index;
    }

    /// Check if a bit is set
    pub fn is_set(&self, index: u32) -> bool {
        if index >= self.size_bits {
            return false;
        }
        let byte_index = (index / 8) as usize;
        let bit_index = (index % 8) as u8;
        (self.data[byte_index] & (1 << bit_index)) != 0
    }

    /// Set a range of bits
    pub fn set_range(&mut self, start: u32, count: u32) {
        for i in start..start.saturating_add(count).min(self.size_bits) {
            self.set(i);
        }
    }

    /// Count clear bits
    pub fn count_free(&self) -> u32 {
        let mut free = 0;
        for i in 0..self.size_bits {
            if !self.is_set(i) {
                free += 1;
            }
        }
        free
    }

    /// Get bitmap data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Mark the metadata run at the head of a group's block bitmap: the two
/// bitmap blocks themselves plus the inode table. The root directory block
/// sits one past this run and its bit stays clear.
pub fn init_block_bitmap(bitmap: &mut Bitmap, inode_table_blocks: u32) {
    bitmap.set_range(0, 2 + inode_table_blocks);
}

/// Mark the reserved inodes in group 0's inode bitmap. The first ten bits
/// cover inodes 1-10; the root is marked at bit index 2, matching its slot
/// in the inode table.
pub fn init_inode_bitmap_group0(bitmap: &mut Bitmap) {
    bitmap.set_range(0, EXT2_RESERVED_INODES);
    bitmap.set(EXT2_ROOT_INO);
}

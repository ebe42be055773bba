// Common types used throughout the ext2 implementation

use thiserror::Error;

use crate::ext2::constants::*;

/// Result type for ext2 operations
pub type Ext2Result<T> = Result<T, Ext2Error>;

/// Errors that can occur while building an ext2 image
#[derive(Debug, Error)]
pub enum Ext2Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to query device size: {0}")]
    SizeQuery(std::io::Error),

    #[error("Failed to allocate {bytes}-byte scratch buffer")]
    Allocation { bytes: usize },

    #[error("Short write at block {block}")]
    WriteFailure { block: u64 },

    #[error("Device too small: layout needs {required_blocks} blocks, device has {total_blocks}")]
    DeviceTooSmall {
        required_blocks: u64,
        total_blocks: u64,
    },

    #[error("Device too large: {total_blocks} blocks / {inode_count} inodes exceed the 32-bit superblock counters")]
    DeviceTooLarge {
        total_blocks: u64,
        inode_count: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Formatting parameters supplied by the caller
#[derive(Debug, Clone)]
pub struct FormatParams {
    pub block_size: u32,
    pub blocks_per_group: u32,
    pub label: Option<String>,
}

impl Default for FormatParams {
    fn default() -> Self {
        Self {
            block_size: EXT2_DEFAULT_BLOCK_SIZE,
            blocks_per_group: EXT2_DEFAULT_BLOCKS_PER_GROUP,
            label: None,
        }
    }
}

impl FormatParams {
    /// Check parameter ranges without touching any device
    pub fn validate(&self) -> Ext2Result<()> {
        if !matches!(self.block_size, 1024 | 2048 | 4096) {
            return Err(Ext2Error::InvalidParameter(format!(
                "block size must be 1024, 2048, or 4096 bytes, got {}",
                self.block_size
            )));
        }
        if self.blocks_per_group == 0 {
            return Err(Ext2Error::InvalidParameter(
                "blocks per group must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filesystem geometry derived from the device size and parameters.
/// Every field is a pure function of the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub block_size: u32,
    pub log_block_size: u32,
    pub first_data_block: u32,
    pub total_blocks: u64,
    pub blocks_per_group: u32,
    pub inodes_per_group: u32,
    pub inode_table_blocks: u32,
    pub group_count: u32,
}

impl Geometry {
    /// Derive the full geometry from the device byte size and parameters
    pub fn compute(device_size: u64, params: &FormatParams) -> Ext2Result<Self> {
        params.validate()?;

        let block_size = params.block_size;
        // Block size is stored as log2(size) - 10
        let log_block_size = block_size.trailing_zeros() - 10;
        // The classic boot-sector reservation only applies to 1 KiB blocks
        let first_data_block = if block_size == 1024 { 1 } else { 0 };
        // Fixed one-inode-per-byte density
        let inodes_per_group = block_size * 8;
        let inode_table_blocks =
            (inodes_per_group * EXT2_INODE_SIZE as u32 + block_size - 1) / block_size;
        let total_blocks = device_size / block_size as u64;
        let blocks_per_group = params.blocks_per_group;
        let groups = (total_blocks + blocks_per_group as u64 - 1) / blocks_per_group as u64;

        // The superblock stores both counts in 32 bits
        let inode_count = groups.saturating_mul(inodes_per_group as u64);
        if total_blocks > u32::MAX as u64 || inode_count > u32::MAX as u64 {
            return Err(Ext2Error::DeviceTooLarge {
                total_blocks,
                inode_count,
            });
        }
        let group_count = groups as u32;

        Ok(Self {
            block_size,
            log_block_size,
            first_data_block,
            total_blocks,
            blocks_per_group,
            inodes_per_group,
            inode_table_blocks,
            group_count,
        })
    }

    /// Block holding group `g`'s descriptor, directly after the superblock
    pub fn descriptor_block(&self, group: u32) -> u64 {
        self.first_data_block as u64 + 1 + group as u64
    }

    /// First metadata block of group `g`: block bitmap, then inode bitmap,
    /// then the inode table
    pub fn group_base(&self, group: u32) -> u64 {
        self.first_data_block as u64 + 2 + group as u64 * self.blocks_per_group as u64
    }

    /// Root directory data block, immediately after group 0's inode table
    pub fn root_dir_block(&self) -> u64 {
        self.group_base(0) + 2 + self.inode_table_blocks as u64
    }

    /// Total inode count across all groups
    pub fn inodes_count(&self) -> u32 {
        self.group_count * self.inodes_per_group
    }

    /// Free blocks once every group's metadata and the root directory
    /// block are deducted
    pub fn free_blocks_count(&self) -> u64 {
        self.total_blocks - self.group_count as u64 * (2 + self.inode_table_blocks as u64) - 1
    }

    /// Free inodes once the ten reserved inodes are deducted
    pub fn free_inodes_count(&self) -> u32 {
        self.inodes_count() - EXT2_RESERVED_INODES
    }

    /// Highest block index any metadata write touches, plus one. A device
    /// with fewer total blocks cannot hold the layout.
    pub fn required_blocks(&self) -> u64 {
        let last_group = self.group_count.max(1) - 1;
        let last_table_end = self.group_base(last_group) + 2 + self.inode_table_blocks as u64;
        let past_root_dir = self.root_dir_block() + 1;
        last_table_end.max(past_root_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(block_size: u32, blocks_per_group: u32) -> FormatParams {
        FormatParams {
            block_size,
            blocks_per_group,
            label: None,
        }
    }

    #[test]
    fn test_block_size_encoding() {
        for (bs, log, first) in [(1024, 0, 1), (2048, 1, 0), (4096, 2, 0)] {
            let geo = Geometry::compute(64 * 1024 * 1024, &params(bs, 8192)).unwrap();
            assert_eq!(geo.log_block_size, log);
            assert_eq!(geo.first_data_block, first);
            assert_eq!(geo.inodes_per_group, bs * 8);
            assert_eq!(geo.inode_table_blocks, 1024);
        }
    }

    #[test]
    fn test_block_and_group_counts() {
        // Exact division yields no extra group
        let geo = Geometry::compute(16 * 1024 * 1024, &params(1024, 8192)).unwrap();
        assert_eq!(geo.total_blocks, 16384);
        assert_eq!(geo.group_count, 2);

        // A remainder yields exactly one extra group
        let geo = Geometry::compute(17 * 1024 * 1024, &params(1024, 8192)).unwrap();
        assert_eq!(geo.total_blocks, 17408);
        assert_eq!(geo.group_count, 3);

        // Partial trailing bytes are dropped
        let geo = Geometry::compute(16 * 1024 * 1024 + 500, &params(4096, 8192)).unwrap();
        assert_eq!(geo.total_blocks, 4096);
        assert_eq!(geo.group_count, 1);
    }

    #[test]
    fn test_geometry_is_pure() {
        let p = params(2048, 4096);
        let a = Geometry::compute(32 * 1024 * 1024, &p).unwrap();
        let b = Geometry::compute(32 * 1024 * 1024, &p).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_block_size_rejected() {
        for bs in [0, 512, 1536, 8192] {
            let err = Geometry::compute(16 * 1024 * 1024, &params(bs, 8192)).unwrap_err();
            assert!(matches!(err, Ext2Error::InvalidParameter(_)), "bs={}", bs);
        }
    }

    #[test]
    fn test_zero_blocks_per_group_rejected() {
        let err = Geometry::compute(16 * 1024 * 1024, &params(1024, 0)).unwrap_err();
        assert!(matches!(err, Ext2Error::InvalidParameter(_)));
    }

    #[test]
    fn test_metadata_block_offsets() {
        // 1 KiB blocks: superblock at block 1, descriptor at 2, bitmaps at
        // 3 and 4, inode table at 5, root directory right after the table
        let geo = Geometry::compute(2 * 1024 * 1024, &params(1024, 8192)).unwrap();
        assert_eq!(geo.descriptor_block(0), 2);
        assert_eq!(geo.group_base(0), 3);
        assert_eq!(geo.root_dir_block(), 3 + 2 + 1024);

        // 4 KiB blocks: superblock at block 0, descriptor at 1, bitmaps at
        // 2 and 3, inode table at 4
        let geo = Geometry::compute(16 * 1024 * 1024, &params(4096, 8192)).unwrap();
        assert_eq!(geo.descriptor_block(0), 1);
        assert_eq!(geo.group_base(0), 2);
        assert_eq!(geo.root_dir_block(), 1028);
    }

    #[test]
    fn test_required_blocks_single_group() {
        // 1 MiB at 1 KiB blocks cannot hold a 1024-block inode table
        let geo = Geometry::compute(1024 * 1024, &params(1024, 8192)).unwrap();
        assert_eq!(geo.total_blocks, 1024);
        assert_eq!(geo.required_blocks(), 1030);
        assert!(geo.total_blocks < geo.required_blocks());

        // 16 MiB at 4 KiB blocks fits comfortably
        let geo = Geometry::compute(16 * 1024 * 1024, &params(4096, 8192)).unwrap();
        assert_eq!(geo.required_blocks(), 1029);
        assert!(geo.total_blocks >= geo.required_blocks());
    }

    #[test]
    fn test_required_blocks_multi_group() {
        // Two groups: the second group's inode table dominates
        let geo = Geometry::compute(12 * 1024 * 1024, &params(1024, 8192)).unwrap();
        assert_eq!(geo.group_count, 2);
        assert_eq!(geo.required_blocks(), 1 + 2 + 8192 + 2 + 1024);
        assert!(geo.total_blocks >= geo.required_blocks());
    }

    #[test]
    fn test_free_counts() {
        let geo = Geometry::compute(2 * 1024 * 1024, &params(1024, 8192)).unwrap();
        assert_eq!(geo.total_blocks, 2048);
        assert_eq!(geo.free_blocks_count(), 2048 - 1026 - 1);
        assert_eq!(geo.inodes_count(), 8192);
        assert_eq!(geo.free_inodes_count(), 8182);
    }

    #[test]
    fn test_oversized_device_rejected() {
        // 4 TiB of 4 KiB blocks: the block count fits in 32 bits but
        // 131072 groups x 32768 inodes does not
        let four_tib = 4u64 * 1024 * 1024 * 1024 * 1024;
        let err = Geometry::compute(four_tib, &params(4096, 8192)).unwrap_err();
        match err {
            Ext2Error::DeviceTooLarge {
                total_blocks,
                inode_count,
            } => {
                assert_eq!(total_blocks, 1 << 30);
                assert_eq!(inode_count, 1 << 32);
            }
            other => panic!("expected DeviceTooLarge, got {:?}", other),
        }

        // The same bytes in 1 KiB blocks overflow the block counter itself
        let err = Geometry::compute(four_tib, &params(1024, 8192)).unwrap_err();
        assert!(matches!(
            err,
            Ext2Error::DeviceTooLarge {
                total_blocks: 0x1_0000_0000,
                ..
            }
        ));
    }

    #[test]
    fn test_largest_addressable_device() {
        // 524287 full 1 KiB-block groups: the largest inode total that
        // still fits the 32-bit counter
        let total_blocks: u64 = 524_287 * 8192;
        let geo = Geometry::compute(total_blocks * 1024, &params(1024, 8192)).unwrap();
        assert_eq!(geo.total_blocks, total_blocks);
        assert_eq!(geo.group_count, 524_287);
        assert_eq!(geo.inodes_count(), 4_294_959_104);
    }
}

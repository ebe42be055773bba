// ext2 on-disk structures
// Byte layout, ordering, and sizes must match the classic format EXACTLY

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use static_assertions::assert_eq_size;
use std::io::{self, Read, Write};

use crate::ext2::constants::*;
use crate::ext2::types::Geometry;

/// ext2 superblock (1024 bytes), written to block `first_data_block`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Ext2Superblock {
    /* 0x000 */ pub s_inodes_count: u32,      // Total inodes count
    /* 0x004 */ pub s_blocks_count: u32,      // Total blocks count
    /* 0x008 */ pub s_r_blocks_count: u32,    // Reserved blocks count
    /* 0x00C */ pub s_free_blocks_count: u32, // Free blocks count
    /* 0x010 */ pub s_free_inodes_count: u32, // Free inodes count
    /* 0x014 */ pub s_first_data_block: u32,  // First data block
    /* 0x018 */ pub s_log_block_size: u32,    // Block size = 1024 << s_log_block_size
    /* 0x01C */ pub s_log_frag_size: u32,     // Fragment size (mirrors block size)
    /* 0x020 */ pub s_blocks_per_group: u32,  // Blocks per group
    /* 0x024 */ pub s_frags_per_group: u32,   // Fragments per group
    /* 0x028 */ pub s_inodes_per_group: u32,  // Inodes per group
    /* 0x02C */ pub s_mtime: u32,             // Mount time
    /* 0x030 */ pub s_wtime: u32,             // Write time
    /* 0x034 */ pub s_mnt_count: u16,         // Mount count
    /* 0x036 */ pub s_max_mnt_count: u16,     // Max mount count
    /* 0x038 */ pub s_magic: u16,             // Magic (0xEF53)
    /* 0x03A */ pub s_state: u16,             // Filesystem state
    /* 0x03C */ pub s_errors: u16,            // Error handling behavior
    /* 0x03E */ pub s_minor_rev_level: u16,   // Minor revision
    /* 0x040 */ pub s_lastcheck: u32,         // Last check time
    /* 0x044 */ pub s_checkinterval: u32,     // Check interval
    /* 0x048 */ pub s_creator_os: u32,        // Creator OS
    /* 0x04C */ pub s_rev_level: u32,         // Revision level
    /* 0x050 */ pub s_def_resuid: u16,        // Default UID for reserved blocks
    /* 0x052 */ pub s_def_resgid: u16,        // Default GID for reserved blocks
    /* 0x054 */ pub s_first_ino: u32,         // First non-reserved inode
    /* 0x058 */ pub s_inode_size: u16,        // Inode record size
    /* 0x05A */ pub s_block_group_nr: u16,    // Block group of this superblock
    /* 0x05C */ pub s_feature_compat: u32,    // Compatible features
    /* 0x060 */ pub s_feature_incompat: u32,  // Incompatible features
    /* 0x064 */ pub s_feature_ro_compat: u32, // Read-only compatible features
    /* 0x068 */ pub s_uuid: [u8; 16],         // Filesystem UUID
    /* 0x078 */ pub s_volume_name: [u8; 16],  // Volume label
    /* 0x088 */ pub s_last_mounted: [u8; 64], // Last mount path
    /* 0x0C8 */ pub s_algo_bitmap: u32,       // Compression algorithms used
    /* 0x0CC */ pub s_prealloc_blocks: u8,    // Blocks to preallocate
    /* 0x0CD */ pub s_prealloc_dir_blocks: u8, // Blocks to preallocate for dirs
    /* 0x0CE */ pub s_padding1: u16,          // Alignment padding
    /* 0x0D0 */ pub s_reserved: [u32; 204],   // Reserved: zero on write, ignore on read
}

// Verify size at compile time
assert_eq_size!(Ext2Superblock, [u8; EXT2_SUPERBLOCK_SIZE]);

impl Ext2Superblock {
    /// Create a new zeroed superblock
    pub fn new() -> Self {
        unsafe { std::mem::zeroed() }
    }

    /// Populate every field for a freshly formatted volume
    pub fn init_minimal(&mut self, geometry: &Geometry, now: u32, label: Option<&str>) {
        self.s_magic = EXT2_SUPER_MAGIC;

        self.s_inodes_count = geometry.inodes_count();
        self.s_blocks_count = geometry.total_blocks as u32;
        self.s_r_blocks_count = 0;
        self.s_free_blocks_count = geometry.free_blocks_count() as u32;
        self.s_free_inodes_count = geometry.free_inodes_count();

        self.s_first_data_block = geometry.first_data_block;
        self.s_log_block_size = geometry.log_block_size;
        self.s_log_frag_size = geometry.log_block_size;
        self.s_blocks_per_group = geometry.blocks_per_group;
        self.s_frags_per_group = geometry.blocks_per_group;
        self.s_inodes_per_group = geometry.inodes_per_group;

        self.s_mtime = 0;
        self.s_wtime = now;
        self.s_lastcheck = now;
        self.s_checkinterval = 0;

        self.s_mnt_count = 0;
        self.s_max_mnt_count = 0xFFFF;

        self.s_state = EXT2_VALID_FS;
        self.s_errors = EXT2_ERRORS_CONTINUE;
        self.s_minor_rev_level = 0;
        self.s_creator_os = EXT2_OS_LINUX;
        self.s_rev_level = EXT2_GOOD_OLD_REV;
        self.s_def_resuid = 0;
        self.s_def_resgid = 0;

        self.s_first_ino = EXT2_FIRST_INO;
        self.s_inode_size = EXT2_INODE_SIZE;
        self.s_block_group_nr = 0;

        // Truncated to 16 bytes, zero-padded, no NUL terminator at full length
        if let Some(label) = label {
            let bytes = label.as_bytes();
            let len = bytes.len().min(16);
            self.s_volume_name[..len].copy_from_slice(&bytes[..len]);
        }
    }

    /// Serialize little-endian into the start of `buf`
    pub fn write_to(&self, buf: &mut [u8]) -> io::Result<()> {
        if buf.len() < EXT2_SUPERBLOCK_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer too small for superblock",
            ));
        }
        let mut w: &mut [u8] = buf;
        w.write_u32::<LittleEndian>(self.s_inodes_count)?;
        w.write_u32::<LittleEndian>(self.s_blocks_count)?;
        w.write_u32::<LittleEndian>(self.s_r_blocks_count)?;
        w.write_u32::<LittleEndian>(self.s_free_blocks_count)?;
        w.write_u32::<LittleEndian>(self.s_free_inodes_count)?;
        w.write_u32::<LittleEndian>(self.s_first_data_block)?;
        w.write_u32::<LittleEndian>(self.s_log_block_size)?;
        w.write_u32::<LittleEndian>(self.s_log_frag_size)?;
        w.write_u32::<LittleEndian>(self.s_blocks_per_group)?;
        w.write_u32::<LittleEndian>(self.s_frags_per_group)?;
        w.write_u32::<LittleEndian>(self.s_inodes_per_group)?;
        w.write_u32::<LittleEndian>(self.s_mtime)?;
        w.write_u32::<LittleEndian>(self.s_wtime)?;
        w.write_u16::<LittleEndian>(self.s_mnt_count)?;
        w.write_u16::<LittleEndian>(self.s_max_mnt_count)?;
        w.write_u16::<LittleEndian>(self.s_magic)?;
        w.write_u16::<LittleEndian>(self.s_state)?;
        w.write_u16::<LittleEndian>(self.s_errors)?;
        w.write_u16::<LittleEndian>(self.s_minor_rev_level)?;
        w.write_u32::<LittleEndian>(self.s_lastcheck)?;
        w.write_u32::<LittleEndian>(self.s_checkinterval)?;
        w.write_u32::<LittleEndian>(self.s_creator_os)?;
        w.write_u32::<LittleEndian>(self.s_rev_level)?;
        w.write_u16::<LittleEndian>(self.s_def_resuid)?;
        w.write_u16::<LittleEndian>(self.s_def_resgid)?;
        w.write_u32::<LittleEndian>(self.s_first_ino)?;
        w.write_u16::<LittleEndian>(self.s_inode_size)?;
        w.write_u16::<LittleEndian>(self.s_block_group_nr)?;
        w.write_u32::<LittleEndian>(self.s_feature_compat)?;
        w.write_u32::<LittleEndian>(self.s_feature_incompat)?;
        w.write_u32::<LittleEndian>(self.s_feature_ro_compat)?;
        w.write_all(&self.s_uuid)?;
        w.write_all(&self.s_volume_name)?;
        w.write_all(&self.s_last_mounted)?;
        w.write_u32::<LittleEndian>(self.s_algo_bitmap)?;
        w.write_u8(self.s_prealloc_blocks)?;
        w.write_u8(self.s_prealloc_dir_blocks)?;
        w.write_u16::<LittleEndian>(self.s_padding1)?;
        for word in &self.s_reserved {
            w.write_u32::<LittleEndian>(*word)?;
        }
        Ok(())
    }

    /// Parse back from bytes laid out by `write_to`
    pub fn read_from(buf: &[u8]) -> io::Result<Self> {
        if buf.len() < EXT2_SUPERBLOCK_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer too small for superblock",
            ));
        }
        let mut r: &[u8] = buf;
        let mut sb = Self::new();
        sb.s_inodes_count = r.read_u32::<LittleEndian>()?;
        sb.s_blocks_count = r.read_u32::<LittleEndian>()?;
        sb.s_r_blocks_count = r.read_u32::<LittleEndian>()?;
        sb.s_free_blocks_count = r.read_u32::<LittleEndian>()?;
        sb.s_free_inodes_count = r.read_u32::<LittleEndian>()?;
        sb.s_first_data_block = r.read_u32::<LittleEndian>()?;
        sb.s_log_block_size = r.read_u32::<LittleEndian>()?;
        sb.s_log_frag_size = r.read_u32::<LittleEndian>()?;
        sb.s_blocks_per_group = r.read_u32::<LittleEndian>()?;
        sb.s_frags_per_group = r.read_u32::<LittleEndian>()?;
        sb.s_inodes_per_group = r.read_u32::<LittleEndian>()?;
        sb.s_mtime = r.read_u32::<LittleEndian>()?;
        sb.s_wtime = r.read_u32::<LittleEndian>()?;
        sb.s_mnt_count = r.read_u16::<LittleEndian>()?;
        sb.s_max_mnt_count = r.read_u16::<LittleEndian>()?;
        sb.s_magic = r.read_u16::<LittleEndian>()?;
        sb.s_state = r.read_u16::<LittleEndian>()?;
        sb.s_errors = r.read_u16::<LittleEndian>()?;
        sb.s_minor_rev_level = r.read_u16::<LittleEndian>()?;
        sb.s_lastcheck = r.read_u32::<LittleEndian>()?;
        sb.s_checkinterval = r.read_u32::<LittleEndian>()?;
        sb.s_creator_os = r.read_u32::<LittleEndian>()?;
        sb.s_rev_level = r.read_u32::<LittleEndian>()?;
        sb.s_def_resuid = r.read_u16::<LittleEndian>()?;
        sb.s_def_resgid = r.read_u16::<LittleEndian>()?;
        sb.s_first_ino = r.read_u32::<LittleEndian>()?;
        sb.s_inode_size = r.read_u16::<LittleEndian>()?;
        sb.s_block_group_nr = r.read_u16::<LittleEndian>()?;
        sb.s_feature_compat = r.read_u32::<LittleEndian>()?;
        sb.s_feature_incompat = r.read_u32::<LittleEndian>()?;
        sb.s_feature_ro_compat = r.read_u32::<LittleEndian>()?;
        r.read_exact(&mut sb.s_uuid)?;
        r.read_exact(&mut sb.s_volume_name)?;
        r.read_exact(&mut sb.s_last_mounted)?;
        sb.s_algo_bitmap = r.read_u32::<LittleEndian>()?;
        sb.s_prealloc_blocks = r.read_u8()?;
        sb.s_prealloc_dir_blocks = r.read_u8()?;
        sb.s_padding1 = r.read_u16::<LittleEndian>()?;
        for word in sb.s_reserved.iter_mut() {
            *word = r.read_u32::<LittleEndian>()?;
        }
        Ok(sb)
    }
}

impl Default for Ext2Superblock {
    fn default() -> Self {
        Self::new()
    }
}

/// Block group descriptor (32 bytes), one per group in its own block
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Ext2GroupDesc {
    /* 0x00 */ pub bg_block_bitmap: u32,      // Block bitmap block
    /* 0x04 */ pub bg_inode_bitmap: u32,      // Inode bitmap block
    /* 0x08 */ pub bg_inode_table: u32,       // Inode table start block
    /* 0x0C */ pub bg_free_blocks_count: u16, // Free blocks in group
    /* 0x0E */ pub bg_free_inodes_count: u16, // Free inodes in group
    /* 0x10 */ pub bg_used_dirs_count: u16,   // Directories in group
    /* 0x12 */ pub bg_pad: u16,               // Alignment padding
    /* 0x14 */ pub bg_reserved: [u8; 12],     // Reserved: zero on write
}

assert_eq_size!(Ext2GroupDesc, [u8; EXT2_GROUP_DESC_SIZE]);

impl Ext2GroupDesc {
    /// Create a new zeroed group descriptor
    pub fn new() -> Self {
        unsafe { std::mem::zeroed() }
    }

    /// Initialize for block group `group`. The three block numbers are
    /// contiguous: bitmap, bitmap + 1, bitmap + 2.
    pub fn init(&mut self, group: u32, geometry: &Geometry) {
        let base = geometry.group_base(group);
        self.bg_block_bitmap = base as u32;
        self.bg_inode_bitmap = (base + 1) as u32;
        self.bg_inode_table = (base + 2) as u32;

        // Free counts assume a full-size group even for a short final group
        self.bg_free_blocks_count =
            (geometry.blocks_per_group - (2 + geometry.inode_table_blocks)) as u16;
        if group == 0 {
            self.bg_free_inodes_count = (geometry.inodes_per_group - EXT2_RESERVED_INODES) as u16;
            self.bg_used_dirs_count = 1; // Root directory
        } else {
            self.bg_free_inodes_count = geometry.inodes_per_group as u16;
            self.bg_used_dirs_count = 0;
        }
    }

    /// Serialize little-endian into the start of `buf`
    pub fn write_to(&self, buf: &mut [u8]) -> io::Result<()> {
        if buf.len() < EXT2_GROUP_DESC_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer too small for group descriptor",
            ));
        }
        let mut w: &mut [u8] = buf;
        w.write_u32::<LittleEndian>(self.bg_block_bitmap)?;
        w.write_u32::<LittleEndian>(self.bg_inode_bitmap)?;
        w.write_u32::<LittleEndian>(self.bg_inode_table)?;
        w.write_u16::<LittleEndian>(self.bg_free_blocks_count)?;
        w.write_u16::<LittleEndian>(self.bg_free_inodes_count)?;
        w.write_u16::<LittleEndian>(self.bg_used_dirs_count)?;
        w.write_u16::<LittleEndian>(self.bg_pad)?;
        w.write_all(&self.bg_reserved)?;
        Ok(())
    }

    /// Parse back from bytes laid out by `write_to`
    pub fn read_from(buf: &[u8]) -> io::Result<Self> {
        if buf.len() < EXT2_GROUP_DESC_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer too small for group descriptor",
            ));
        }
        let mut r: &[u8] = buf;
        let mut desc = Self::new();
        desc.bg_block_bitmap = r.read_u32::<LittleEndian>()?;
        desc.bg_inode_bitmap = r.read_u32::<LittleEndian>()?;
        desc.bg_inode_table = r.read_u32::<LittleEndian>()?;
        desc.bg_free_blocks_count = r.read_u16::<LittleEndian>()?;
        desc.bg_free_inodes_count = r.read_u16::<LittleEndian>()?;
        desc.bg_used_dirs_count = r.read_u16::<LittleEndian>()?;
        desc.bg_pad = r.read_u16::<LittleEndian>()?;
        r.read_exact(&mut desc.bg_reserved)?;
        Ok(desc)
    }
}

impl Default for Ext2GroupDesc {
    fn default() -> Self {
        Self::new()
    }
}

/// Inode record (fixed 128 bytes, classic layout)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Ext2Inode {
    /* 0x00 */ pub i_mode: u16,        // File mode and type
    /* 0x02 */ pub i_uid: u16,         // Low 16 bits of owner UID
    /* 0x04 */ pub i_size: u32,        // Size in bytes
    /* 0x08 */ pub i_atime: u32,       // Access time
    /* 0x0C */ pub i_ctime: u32,       // Inode change time
    /* 0x10 */ pub i_mtime: u32,       // Modification time
    /* 0x14 */ pub i_dtime: u32,       // Deletion time
    /* 0x18 */ pub i_gid: u16,         // Low 16 bits of group ID
    /* 0x1A */ pub i_links_count: u16, // Hard links count
    /* 0x1C */ pub i_blocks: u32,      // Blocks count in 512-byte sectors
    /* 0x20 */ pub i_flags: u32,       // File flags
    /* 0x24 */ pub i_osd1: u32,        // OS dependent 1
    /* 0x28 */ pub i_block: [u32; 15], // Direct/indirect block pointers
    /* 0x64 */ pub i_generation: u32,  // File version
    /* 0x68 */ pub i_file_acl: u32,    // File ACL block
    /* 0x6C */ pub i_dir_acl: u32,     // Directory ACL block
    /* 0x70 */ pub i_faddr: u32,       // Fragment address
    /* 0x74 */ pub l_i_frag: u8,       // Fragment number
    /* 0x75 */ pub l_i_fsize: u8,      // Fragment size
    /* 0x76 */ pub i_pad1: u16,        // Alignment padding
    /* 0x78 */ pub l_i_uid_high: u16,  // High 16 bits of owner UID
    /* 0x7A */ pub l_i_gid_high: u16,  // High 16 bits of group ID
    /* 0x7C */ pub l_i_reserved2: u32, // Reserved
}

assert_eq_size!(Ext2Inode, [u8; EXT2_INODE_SIZE as usize]);

impl Ext2Inode {
    /// Create a new zeroed inode
    pub fn new() -> Self {
        unsafe { std::mem::zeroed() }
    }

    /// Initialize as the root directory inode: drwxr-xr-x, one data block
    /// immediately after the group's inode table
    pub fn init_root_dir(&mut self, geometry: &Geometry, now: u32) {
        self.i_mode =
            S_IFDIR | S_IRUSR | S_IWUSR | S_IXUSR | S_IRGRP | S_IXGRP | S_IROTH | S_IXOTH;
        self.i_uid = 0;
        self.i_gid = 0;
        self.i_size = geometry.block_size;
        self.i_atime = now;
        self.i_ctime = now;
        self.i_mtime = now;
        self.i_dtime = 0;
        // "." and the parent reference
        self.i_links_count = 2;
        // In 512-byte sectors
        self.i_blocks = geometry.block_size / 512;
        self.i_flags = 0;
        self.i_block[0] = geometry.root_dir_block() as u32;
    }

    /// Serialize little-endian into the start of `buf`
    pub fn write_to(&self, buf: &mut [u8]) -> io::Result<()> {
        if buf.len() < EXT2_INODE_SIZE as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer too small for inode",
            ));
        }
        let mut w: &mut [u8] = buf;
        w.write_u16::<LittleEndian>(self.i_mode)?;
        w.write_u16::<LittleEndian>(self.i_uid)?;
        w.write_u32::<LittleEndian>(self.i_size)?;
        w.write_u32::<LittleEndian>(self.i_atime)?;
        w.write_u32::<LittleEndian>(self.i_ctime)?;
        w.write_u32::<LittleEndian>(self.i_mtime)?;
        w.write_u32::<LittleEndian>(self.i_dtime)?;
        w.write_u16::<LittleEndian>(self.i_gid)?;
        w.write_u16::<LittleEndian>(self.i_links_count)?;
        w.write_u32::<LittleEndian>(self.i_blocks)?;
        w.write_u32::<LittleEndian>(self.i_flags)?;
        w.write_u32::<LittleEndian>(self.i_osd1)?;
        for ptr in &self.i_block {
            w.write_u32::<LittleEndian>(*ptr)?;
        }
        w.write_u32::<LittleEndian>(self.i_generation)?;
        w.write_u32::<LittleEndian>(self.i_file_acl)?;
        w.write_u32::<LittleEndian>(self.i_dir_acl)?;
        w.write_u32::<LittleEndian>(self.i_faddr)?;
        w.write_u8(self.l_i_frag)?;
        w.write_u8(self.l_i_fsize)?;
        w.write_u16::<LittleEndian>(self.i_pad1)?;
        w.write_u16::<LittleEndian>(self.l_i_uid_high)?;
        w.write_u16::<LittleEndian>(self.l_i_gid_high)?;
        w.write_u32::<LittleEndian>(self.l_i_reserved2)?;
        Ok(())
    }
}

impl Default for Ext2Inode {
    fn default() -> Self {
        Self::new()
    }
}

/// Directory entry header (8 bytes); name bytes follow inline
#[repr(C, packed)]
#[derive(Debug, Clone, Copy)]
pub struct Ext2DirEntry {
    pub inode: u32,    // Inode number
    pub rec_len: u16,  // Record length
    pub name_len: u8,  // Name length
    pub file_type: u8, // File type tag
}

impl Ext2DirEntry {
    /// Minimum record length for a name: header plus name, rounded up to a
    /// 4-byte boundary
    pub fn size_needed(name_len: usize) -> usize {
        (8 + name_len + 3) & !3
    }

    /// Serialize the header and inline name into the start of `buf`
    pub fn write_to(&self, buf: &mut [u8], name: &str) -> io::Result<()> {
        let mut w: &mut [u8] = buf;
        w.write_u32::<LittleEndian>(self.inode)?;
        w.write_u16::<LittleEndian>(self.rec_len)?;
        w.write_u8(self.name_len)?;
        w.write_u8(self.file_type)?;
        w.write_all(name.as_bytes())?;
        Ok(())
    }
}

/// Fill a block-sized buffer with the root directory's two entries.
/// "." takes a fixed 12-byte record; ".." extends to the block boundary.
pub fn build_root_directory_block(buf: &mut [u8]) -> io::Result<()> {
    let block_size = buf.len();
    let dot_len = Ext2DirEntry::size_needed(1);

    let dot = Ext2DirEntry {
        inode: EXT2_ROOT_INO,
        rec_len: dot_len as u16,
        name_len: 1,
        file_type: EXT2_FT_DIR,
    };
    dot.write_to(&mut buf[..dot_len], ".")?;

    let dotdot = Ext2DirEntry {
        inode: EXT2_ROOT_INO,
        rec_len: (block_size - dot_len) as u16,
        name_len: 2,
        file_type: EXT2_FT_DIR,
    };
    dotdot.write_to(&mut buf[dot_len..], "..")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext2::types::FormatParams;

    fn geometry(device_size: u64, block_size: u32) -> Geometry {
        let params = FormatParams {
            block_size,
            blocks_per_group: 8192,
            label: None,
        };
        Geometry::compute(device_size, &params).unwrap()
    }

    #[test]
    fn test_superblock_round_trip() {
        let geo = geometry(16 * 1024 * 1024, 4096);
        let mut sb = Ext2Superblock::new();
        sb.init_minimal(&geo, 1_700_000_000, Some("testvol"));

        let mut buf = [0u8; EXT2_SUPERBLOCK_SIZE];
        sb.write_to(&mut buf).unwrap();
        let parsed = Ext2Superblock::read_from(&buf).unwrap();

        assert_eq!(parsed.s_magic, EXT2_SUPER_MAGIC);
        assert_eq!(parsed.s_state, EXT2_VALID_FS);
        assert_eq!(parsed.s_errors, EXT2_ERRORS_CONTINUE);
        assert_eq!(parsed.s_rev_level, EXT2_GOOD_OLD_REV);
        assert_eq!(parsed.s_log_block_size, 2);
        assert_eq!(parsed.s_first_data_block, 0);
        assert_eq!(parsed.s_blocks_per_group, 8192);
        assert_eq!(parsed.s_inodes_per_group, 32768);
        assert_eq!(parsed.s_blocks_count, 4096);
        assert_eq!(parsed.s_inode_size, 128);
        assert_eq!(parsed.s_first_ino, 11);
        assert_eq!(parsed.s_wtime, 1_700_000_000);
        assert_eq!(parsed.s_mtime, 0);
        assert_eq!(parsed.s_max_mnt_count, 0xFFFF);
        assert_eq!(&parsed.s_volume_name[..7], b"testvol");
        assert!(parsed.s_volume_name[7..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_superblock_magic_bytes() {
        let geo = geometry(16 * 1024 * 1024, 1024);
        let mut sb = Ext2Superblock::new();
        sb.init_minimal(&geo, 0, None);

        let mut buf = [0u8; EXT2_SUPERBLOCK_SIZE];
        sb.write_to(&mut buf).unwrap();

        // Magic lands at offset 0x38, little-endian
        assert_eq!(buf[0x38], 0x53);
        assert_eq!(buf[0x39], 0xEF);
    }

    #[test]
    fn test_volume_label_truncation() {
        let geo = geometry(16 * 1024 * 1024, 1024);

        let mut sb = Ext2Superblock::new();
        sb.init_minimal(&geo, 0, Some("exactly-16-bytes"));
        assert_eq!(&sb.s_volume_name, b"exactly-16-bytes");

        let mut sb = Ext2Superblock::new();
        sb.init_minimal(&geo, 0, Some("this label is much too long"));
        assert_eq!(&sb.s_volume_name, b"this label is mu");
    }

    #[test]
    fn test_group_desc_contiguous_blocks() {
        let geo = geometry(16 * 1024 * 1024, 1024);
        let mut desc = Ext2GroupDesc::new();
        desc.init(0, &geo);

        assert_eq!(desc.bg_block_bitmap, 3);
        assert_eq!(desc.bg_inode_bitmap, 4);
        assert_eq!(desc.bg_inode_table, 5);
        assert_eq!(desc.bg_free_blocks_count, 8192 - 1026);
        assert_eq!(desc.bg_free_inodes_count, 8192 - 10);
        assert_eq!(desc.bg_used_dirs_count, 1);

        let mut desc1 = Ext2GroupDesc::new();
        desc1.init(1, &geo);
        assert_eq!(desc1.bg_block_bitmap, 3 + 8192);
        assert_eq!(desc1.bg_inode_bitmap, desc1.bg_block_bitmap + 1);
        assert_eq!(desc1.bg_inode_table, desc1.bg_block_bitmap + 2);
        assert_eq!(desc1.bg_free_inodes_count, 8192);
        assert_eq!(desc1.bg_used_dirs_count, 0);
    }

    #[test]
    fn test_group_desc_round_trip() {
        let geo = geometry(16 * 1024 * 1024, 1024);
        let mut desc = Ext2GroupDesc::new();
        desc.init(0, &geo);

        let mut buf = [0u8; EXT2_GROUP_DESC_SIZE];
        desc.write_to(&mut buf).unwrap();
        let parsed = Ext2GroupDesc::read_from(&buf).unwrap();

        assert_eq!(parsed.bg_block_bitmap, desc.bg_block_bitmap);
        assert_eq!(parsed.bg_inode_bitmap, desc.bg_inode_bitmap);
        assert_eq!(parsed.bg_inode_table, desc.bg_inode_table);
        assert_eq!(parsed.bg_free_blocks_count, desc.bg_free_blocks_count);
        assert_eq!(parsed.bg_free_inodes_count, desc.bg_free_inodes_count);
        assert_eq!(parsed.bg_used_dirs_count, desc.bg_used_dirs_count);
    }

    #[test]
    fn test_root_inode_fields() {
        let geo = geometry(16 * 1024 * 1024, 4096);
        let mut inode = Ext2Inode::new();
        inode.init_root_dir(&geo, 1_700_000_000);

        assert_eq!(inode.i_mode, S_IFDIR | 0o755);
        assert_eq!(inode.i_size, 4096);
        assert_eq!(inode.i_links_count, 2);
        assert_eq!(inode.i_blocks, 8);
        assert_eq!(inode.i_block[0], 1028);
        assert!(inode.i_block[1..].iter().all(|&b| b == 0));

        let mut buf = [0u8; EXT2_INODE_SIZE as usize];
        inode.write_to(&mut buf).unwrap();

        // i_mode at 0x00, i_size at 0x04, i_block[0] at 0x28
        assert_eq!(u16::from_le_bytes([buf[0], buf[1]]), S_IFDIR | 0o755);
        assert_eq!(u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]), 4096);
        assert_eq!(
            u32::from_le_bytes([buf[0x28], buf[0x29], buf[0x2A], buf[0x2B]]),
            1028
        );
    }

    #[test]
    fn test_dir_entry_size_needed() {
        assert_eq!(Ext2DirEntry::size_needed(1), 12);
        assert_eq!(Ext2DirEntry::size_needed(2), 12);
        assert_eq!(Ext2DirEntry::size_needed(4), 12);
        assert_eq!(Ext2DirEntry::size_needed(5), 16);
        assert_eq!(Ext2DirEntry::size_needed(10), 20);
    }

    #[test]
    fn test_root_directory_block() {
        let mut buf = vec![0u8; 1024];
        build_root_directory_block(&mut buf).unwrap();

        // "." entry: inode 2, rec_len 12, name_len 1, directory
        assert_eq!(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]), 2);
        assert_eq!(u16::from_le_bytes([buf[4], buf[5]]), 12);
        assert_eq!(buf[6], 1);
        assert_eq!(buf[7], EXT2_FT_DIR);
        assert_eq!(buf[8], b'.');

        // ".." entry: inode 2, rec_len fills the rest of the block
        assert_eq!(u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]), 2);
        assert_eq!(u16::from_le_bytes([buf[16], buf[17]]), 1024 - 12);
        assert_eq!(buf[18], 2);
        assert_eq!(buf[19], EXT2_FT_DIR);
        assert_eq!(&buf[20..22], b"..");

        // The two records partition the block
        assert!(buf[22..].iter().all(|&b| b == 0));
    }
}

// ext2 filesystem constants
// Classic revision-0 format: fixed 128-byte inodes, no extended features

// Magic number
pub const EXT2_SUPER_MAGIC: u16 = 0xEF53;

// Block sizes
pub const EXT2_MIN_BLOCK_SIZE: u32 = 1024;
pub const EXT2_MAX_BLOCK_SIZE: u32 = 4096;
pub const EXT2_DEFAULT_BLOCK_SIZE: u32 = 1024;
pub const EXT2_DEFAULT_BLOCKS_PER_GROUP: u32 = 8192;

// Record sizes
pub const EXT2_SUPERBLOCK_SIZE: usize = 1024;
pub const EXT2_GROUP_DESC_SIZE: usize = 32;
pub const EXT2_INODE_SIZE: u16 = 128;

// Special inode numbers
pub const EXT2_BAD_INO: u32 = 1;         // Bad blocks inode
pub const EXT2_ROOT_INO: u32 = 2;        // Root directory inode
pub const EXT2_FIRST_INO: u32 = 11;      // First non-reserved inode
pub const EXT2_RESERVED_INODES: u32 = 10; // Inodes 1-10 are reserved

// Filesystem states
pub const EXT2_VALID_FS: u16 = 1;        // Cleanly unmounted
pub const EXT2_ERROR_FS: u16 = 2;        // Errors detected

// Error handling behaviors
pub const EXT2_ERRORS_CONTINUE: u16 = 1; // Continue on errors
pub const EXT2_ERRORS_RO: u16 = 2;       // Remount read-only on errors
pub const EXT2_ERRORS_PANIC: u16 = 3;    // Panic on errors

// Creator OS codes
pub const EXT2_OS_LINUX: u32 = 0;

// Revision levels
pub const EXT2_GOOD_OLD_REV: u32 = 0;    // Original format, 128-byte inodes

// File types for directory entries
pub const EXT2_FT_UNKNOWN: u8 = 0;
pub const EXT2_FT_REG_FILE: u8 = 1;
pub const EXT2_FT_DIR: u8 = 2;
pub const EXT2_FT_SYMLINK: u8 = 7;

// Inode mode bits
pub const S_IFMT: u16 = 0xF000;  // Format mask
pub const S_IFLNK: u16 = 0xA000; // Symbolic link
pub const S_IFREG: u16 = 0x8000; // Regular file
pub const S_IFDIR: u16 = 0x4000; // Directory

// Permission bits
pub const S_IRUSR: u16 = 0x0100; // User read
pub const S_IWUSR: u16 = 0x0080; // User write
pub const S_IXUSR: u16 = 0x0040; // User execute
pub const S_IRGRP: u16 = 0x0020; // Group read
pub const S_IXGRP: u16 = 0x0008; // Group execute
pub const S_IROTH: u16 = 0x0004; // Other read
pub const S_IXOTH: u16 = 0x0001; // Other execute

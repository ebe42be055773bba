// ext2 format pipeline: geometry, superblock, per-group layout, root directory

use log::{debug, info};
use std::io::{Seek, Write};

use crate::ext2::bitmap::{init_block_bitmap, init_inode_bitmap_group0, Bitmap};
use crate::ext2::constants::{EXT2_INODE_SIZE, EXT2_ROOT_INO};
use crate::ext2::io::BlockIo;
use crate::ext2::structures::{
    build_root_directory_block, Ext2GroupDesc, Ext2Inode, Ext2Superblock,
};
use crate::ext2::types::{Ext2Error, Ext2Result, FormatParams, Geometry};

/// Write a complete ext2 layout to `target`, stamped with the current time
pub fn format_volume<T: Write + Seek>(target: T, params: &FormatParams) -> Ext2Result<()> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0);
    format_volume_at(target, params, now)
}

/// Write a complete ext2 layout to `target` with an explicit creation
/// timestamp (seconds since the epoch)
pub fn format_volume_at<T: Write + Seek>(
    target: T,
    params: &FormatParams,
    now: u32,
) -> Ext2Result<()> {
    params.validate()?;

    let mut io = BlockIo::new(target, params.block_size);
    let device_size = io.device_size()?;
    let geometry = Geometry::compute(device_size, params)?;

    let required = geometry.required_blocks();
    if geometry.total_blocks < required {
        return Err(Ext2Error::DeviceTooSmall {
            required_blocks: required,
            total_blocks: geometry.total_blocks,
        });
    }

    info!("ext2 layout:");
    info!("  Block size: {}", geometry.block_size);
    info!("  Total blocks: {}", geometry.total_blocks);
    info!("  Blocks per group: {}", geometry.blocks_per_group);
    info!("  Block groups: {}", geometry.group_count);
    info!("  Inodes per group: {}", geometry.inodes_per_group);
    info!("  Inode table blocks: {}", geometry.inode_table_blocks);

    // One scratch buffer for every write, re-zeroed before each use
    let mut scratch = alloc_scratch(geometry.block_size as usize)?;

    let mut sb = Ext2Superblock::new();
    sb.init_minimal(&geometry, now, params.label.as_deref());
    scratch.fill(0);
    sb.write_to(&mut scratch)?;
    io.write_block(geometry.first_data_block as u64, &scratch)?;

    for group in 0..geometry.group_count {
        write_group(&mut io, &geometry, group, now, &mut scratch)?;
    }

    io.flush()?;
    info!("ext2 format complete");
    Ok(())
}

/// Fallibly allocate the zeroed block-sized scratch buffer
fn alloc_scratch(bytes: usize) -> Ext2Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| Ext2Error::Allocation { bytes })?;
    buf.resize(bytes, 0);
    Ok(buf)
}

/// Emit one block group: descriptor, block bitmap, inode bitmap, inode
/// table. Group 0 additionally carries the root inode and its data block.
fn write_group<T: Write + Seek>(
    io: &mut BlockIo<T>,
    geometry: &Geometry,
    group: u32,
    now: u32,
    scratch: &mut [u8],
) -> Ext2Result<()> {
    let base = geometry.group_base(group);
    debug!(
        "group {}: bitmaps at {} and {}, inode table at {}",
        group,
        base,
        base + 1,
        base + 2
    );

    // Descriptor, one per block
    let mut desc = Ext2GroupDesc::new();
    desc.init(group, geometry);
    scratch.fill(0);
    desc.write_to(scratch)?;
    io.write_block(geometry.descriptor_block(group), scratch)?;

    // Block bitmap: the group's leading metadata run is always in use
    let mut block_bitmap = Bitmap::for_block(geometry.block_size);
    init_block_bitmap(&mut block_bitmap, geometry.inode_table_blocks);
    scratch.copy_from_slice(block_bitmap.as_bytes());
    io.write_block(base, scratch)?;

    // Inode bitmap: only group 0 carries the reserved inodes
    let mut inode_bitmap = Bitmap::for_block(geometry.block_size);
    if group == 0 {
        init_inode_bitmap_group0(&mut inode_bitmap);
    }
    scratch.copy_from_slice(inode_bitmap.as_bytes());
    io.write_block(base + 1, scratch)?;

    // Inode table: zeroed slots, except group 0's first block which holds
    // the root inode at slot index 2
    let table = base + 2;
    for i in 0..geometry.inode_table_blocks {
        scratch.fill(0);
        if group == 0 && i == 0 {
            let mut root = Ext2Inode::new();
            root.init_root_dir(geometry, now);
            let offset = EXT2_ROOT_INO as usize * EXT2_INODE_SIZE as usize;
            root.write_to(&mut scratch[offset..offset + EXT2_INODE_SIZE as usize])?;
        }
        io.write_block(table + i as u64, scratch)?;
    }

    // Root directory data block, immediately after group 0's inode table.
    // Not covered by the block bitmap's reserved run.
    if group == 0 {
        scratch.fill(0);
        build_root_directory_block(scratch)?;
        io.write_block(geometry.root_dir_block(), scratch)?;
    }

    Ok(())
}

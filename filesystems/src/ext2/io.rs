// Block-addressed writes over a seekable byte target

use std::io::{Seek, SeekFrom, Write};

use crate::ext2::types::{Ext2Error, Ext2Result};

/// Translates (block number, block size) into byte offsets and performs the
/// seek + write. The only component that touches the storage handle.
pub struct BlockIo<T> {
    target: T,
    block_size: u32,
}

impl<T: Write + Seek> BlockIo<T> {
    pub fn new(target: T, block_size: u32) -> Self {
        Self { target, block_size }
    }

    /// Query the handle's total byte size. Called once, before any write.
    pub fn device_size(&mut self) -> Ext2Result<u64> {
        self.target
            .seek(SeekFrom::End(0))
            .map_err(Ext2Error::SizeQuery)
    }

    /// Seek to `block * block_size` and write one block from `buf`.
    /// A seek landing elsewhere or a short write aborts the operation.
    pub fn write_block(&mut self, block: u64, buf: &[u8]) -> Ext2Result<()> {
        let offset = block * self.block_size as u64;
        let pos = self.target.seek(SeekFrom::Start(offset))?;
        if pos != offset {
            return Err(Ext2Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("seek to block {} landed at byte {}, wanted {}", block, pos, offset),
            )));
        }
        let written = self.target.write(buf)?;
        if written != buf.len() {
            return Err(Ext2Error::WriteFailure { block });
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Ext2Result<()> {
        self.target.flush()?;
        Ok(())
    }
}

// Simplified ext2 image formatter
// Classic revision-0 layout: fixed 128-byte inodes, one group descriptor
// per block, no journal, no extended features

pub mod bitmap;
pub mod constants;
pub mod formatter;
pub mod io;
pub mod structures;
pub mod types;

pub use formatter::{format_volume, format_volume_at};
pub use types::{Ext2Error, Ext2Result, FormatParams, Geometry};

use async_trait::async_trait;
use exodus_core::{ExodusError, FilesystemFormatter, FormatOptions};
use std::fs::File;

/// ext2 formatter exposed through the shared trait surface
pub struct Ext2Formatter;

#[async_trait]
impl FilesystemFormatter for Ext2Formatter {
    fn name(&self) -> &'static str {
        "ext2"
    }

    async fn validate_options(&self, options: &FormatOptions) -> Result<(), ExodusError> {
        FormatParams::from(options).validate()?;
        Ok(())
    }

    async fn format(&self, target: &mut File, options: &FormatOptions) -> Result<(), ExodusError> {
        let params = FormatParams::from(options);
        format_volume(target, &params)?;
        Ok(())
    }
}

impl From<&FormatOptions> for FormatParams {
    fn from(options: &FormatOptions) -> Self {
        Self {
            block_size: options.block_size,
            blocks_per_group: options.blocks_per_group,
            label: options.label.clone(),
        }
    }
}

impl From<Ext2Error> for ExodusError {
    fn from(err: Ext2Error) -> Self {
        match err {
            Ext2Error::InvalidParameter(msg) => ExodusError::InvalidInput(msg),
            Ext2Error::Io(e) => ExodusError::IoError(e),
            other => ExodusError::Format(other.to_string()),
        }
    }
}

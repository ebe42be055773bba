use crate::ExodusError;
use serde::{Deserialize, Serialize};
use std::fs::File;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatOptions {
    pub block_size: u32,
    pub blocks_per_group: u32,
    pub label: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            block_size: 1024,
            blocks_per_group: 8192,
            label: None,
        }
    }
}

#[async_trait::async_trait]
pub trait FilesystemFormatter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn validate_options(&self, options: &FormatOptions) -> Result<(), ExodusError>;

    async fn format(
        &self,
        target: &mut File,
        options: &FormatOptions,
    ) -> Result<(), ExodusError>;
}

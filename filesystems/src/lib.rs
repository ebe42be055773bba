pub mod ext2;

pub use ext2::{Ext2Error, Ext2Formatter, FormatParams, Geometry};

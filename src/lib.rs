#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod dataset;
pub mod ffmpeg;
pub mod files;
pub mod probe;
pub mod settings;
pub mod sidecar;
pub mod util;

pub mod cli;
mod error;
pub mod process;
pub use error::{Error, Result};

use clap::Error as ClapError;
use config::ConfigError;
use log::SetLoggerError;
use serde_json::Error as JsonError;
use serde_yaml::Error as YamlError;
use snafu::Snafu;
use std::{io::Error as IoError, path::PathBuf};

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(transparent)]
    Io { source: IoError },
    #[snafu(transparent)]
    SetLogger { source: SetLoggerError },
    #[snafu(transparent)]
    Json { source: JsonError },
    #[snafu(transparent)]
    Yaml { source: YamlError },
    #[snafu(display("could not find dataset file {}", path.display()))]
    DatasetNotFound { path: PathBuf },
    #[snafu(display("could not parse dataset {}: {}", path.display(), source))]
    Parse { path: PathBuf, source: JsonError },
    #[snafu(display("{url} has no video stream"))]
    NoVideoStream { url: String },
    #[snafu(display("requested a sample of {requested} videos but only {available} are available"))]
    SampleTooLarge { requested: usize, available: usize },
    #[snafu(display("probing {url} failed: {stderr}"))]
    Probe { url: String, stderr: String },
    #[snafu(display("frame extraction from {url} failed: {stderr}"))]
    Extraction { url: String, stderr: String },
    #[snafu(display("could not save metadata to {}: {}", path.display(), source))]
    MetadataWrite { path: PathBuf, source: JsonError },
    #[snafu(transparent)]
    Clap { source: ClapError },
    #[snafu(transparent)]
    Config { source: ConfigError },
    #[snafu(whatever, display("{message}"))]
    Other {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

pub type Result<V> = std::result::Result<V, Error>;

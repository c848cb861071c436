//! Layered run configuration: defaults, config files, then CLI overrides.

use clap::{Arg, ArgAction, ArgMatches, Command};
use config::{builder::DefaultState, Config, ConfigBuilder, File as ConfigFile};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use snafu::whatever;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{dataset::SamplePlan, process::ExtractOptions, Result};

fn create_app() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("test")
                .short('t')
                .long("test")
                .action(ArgAction::SetTrue)
                .help(concat!(
                    "Use the reduced sample size and write to the test output directory; ",
                    "also dumps the parsed per-team data. Suggested to use a test file."
                )),
        )
        .arg(
            Arg::new("vif")
                .long("vif")
                .action(ArgAction::SetTrue)
                .help("Run the extractor on the VIF allow-list, with sampling enabled."),
        )
        .arg(
            Arg::new("synchronous")
                .short('y')
                .long("synchronous")
                .action(ArgAction::SetTrue)
                .help("Process only one video at a time."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help(concat!(
                    "The configuration file to use. If provided, no other config files will ",
                    "be loaded."
                )),
        )
        .arg(Arg::new("out-dir").short('o').long("out-dir").value_name("DIR"))
        .arg(
            Arg::new("dataset")
                .value_name("FILE")
                .required(true)
                .help("Path to the .json dataset to extract from."),
        )
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Settings {
    test: bool,
    vif: bool,
    synchronous: bool,
    verbose: bool,
    out_dir: PathBuf,
    test_out_dir: PathBuf,
    teams: Vec<String>,
    vif_teams: Vec<String>,
    sample_team: String,
    sample_size: usize,
    test_sample_size: usize,
    fps: u32,
    jpeg_quality: u32,
    #[serde(skip_serializing, default)]
    dataset: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let mut conf = Self::default_builder()?;
        let args = create_app().try_get_matches()?;
        if let Some(config_file) = args.get_one::<String>("config") {
            conf = Self::add_config_file(conf, config_file)?;
        } else {
            conf = Self::add_base_file(conf)?;
            conf = Self::add_config_file(conf, ".mk-frames.yaml")?;
        }
        conf = Self::merge_cli_args(&args, conf)?;
        Ok(conf.build()?.try_deserialize()?)
    }

    fn merge_cli_args(
        args: &ArgMatches,
        mut conf: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>> {
        if args.get_flag("test") {
            conf = conf.set_override("test", true)?;
        }
        if args.get_flag("vif") {
            conf = conf.set_override("vif", true)?;
        }
        if args.get_flag("synchronous") {
            conf = conf.set_override("synchronous", true)?;
        }
        if args.get_flag("verbose") {
            conf = conf.set_override("verbose", true)?;
        }
        if let Some(out_dir) = args.get_one::<String>("out-dir") {
            conf = conf.set_override("out_dir", out_dir.as_str())?;
        }
        if let Some(dataset) = args.get_one::<String>("dataset") {
            conf = conf.set_override("dataset", dataset.as_str())?;
        }
        Ok(conf)
    }

    fn add_base_file(conf: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>> {
        let dirs = match BaseDirs::new() {
            Some(dirs) => dirs,
            None => return Ok(conf),
        };
        let config_dir = dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }
        let mut config_path = PathBuf::from(config_dir);
        config_path.push("mk-frames.yaml");
        if !config_path.exists() {
            let to_save: Self = Self::default_builder()?.build()?.try_deserialize()?;
            fs::write(&config_path, serde_yaml::to_vec(&to_save)?)?;
            Ok(conf)
        } else {
            Self::add_config_file(conf, config_path)
        }
    }

    fn add_config_file<P: AsRef<Path>>(
        conf: ConfigBuilder<DefaultState>,
        path_ref: P,
    ) -> Result<ConfigBuilder<DefaultState>> {
        let path = path_ref.as_ref();
        if !path.exists() {
            return Ok(conf);
        }
        if !path.is_file() {
            whatever!("{} is not a file!", path.display());
        }
        Ok(conf.add_source(ConfigFile::from(path)))
    }

    fn default_builder() -> Result<ConfigBuilder<DefaultState>> {
        let conf = Config::builder()
            .set_default("test", false)?
            .set_default("vif", false)?
            .set_default("synchronous", false)?
            .set_default("verbose", false)?
            .set_default("out_dir", "extracted_frames")?
            .set_default("test_out_dir", "testframes")?
            .set_default("teams", vec!["BRA", "B/G", "RBK", "VIK", "LSK"])?
            .set_default("vif_teams", vec!["VIF"])?
            .set_default("sample_team", "VIF")?
            .set_default("sample_size", 64)?
            .set_default("test_sample_size", 2)?
            .set_default("fps", 1)?
            .set_default("jpeg_quality", 2)?;
        Ok(conf)
    }

    pub fn test(&self) -> bool {
        self.test
    }

    pub fn vif(&self) -> bool {
        self.vif
    }

    pub fn synchronous(&self) -> bool {
        self.synchronous
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn out_dir(&self) -> &Path {
        self.out_dir.as_ref()
    }

    pub fn test_out_dir(&self) -> &Path {
        self.test_out_dir.as_ref()
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn vif_teams(&self) -> &[String] {
        &self.vif_teams
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn jpeg_quality(&self) -> u32 {
        self.jpeg_quality
    }

    pub fn dataset(&self) -> &Path {
        self.dataset.as_ref()
    }

    /// The output root for this run: the test root under `--test`, the production root
    /// otherwise.
    pub fn effective_out_dir(&self) -> &Path {
        if self.test {
            &self.test_out_dir
        } else {
            &self.out_dir
        }
    }

    /// The team allow-list for this run.
    pub fn effective_teams(&self) -> &[String] {
        if self.vif {
            &self.vif_teams
        } else {
            &self.teams
        }
    }

    /// Sampling only happens in `--vif` runs; `--test` switches to the reduced size.
    pub fn sample_plan(&self) -> Option<SamplePlan> {
        self.vif.then(|| SamplePlan {
            team: self.sample_team.clone(),
            size: if self.test {
                self.test_sample_size
            } else {
                self.sample_size
            },
        })
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            fps: self.fps,
            jpeg_quality: self.jpeg_quality,
            synchronous: self.synchronous,
        }
    }
}

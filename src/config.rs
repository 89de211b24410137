use crate::model::SourceTag;
use config::{Config, ConfigError, File as ConfigFile};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

lazy_static! {
    /// Extensions the interactive queries filtered on.
    pub static ref DEFAULT_VIDEO_EXTENSIONS: Vec<String> = [
        "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "mpeg", "mpg", "m4v", "ts",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite database the three catalog tables live in.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Which catalogs this run compares (2-way or 3-way).
    #[serde(default = "default_compare")]
    pub compare: Vec<SourceTag>,

    /// Per-source ordered mount-root prefixes, stripped before joining.
    /// First match wins.
    #[serde(default)]
    pub aliases: HashMap<SourceTag, Vec<String>>,

    /// Allow-list for the video-extension report (lower-case, no dot).
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

fn default_db_path() -> String {
    "tvfiles.sqlite3".to_string()
}

fn default_compare() -> Vec<SourceTag> {
    SourceTag::ALL.to_vec()
}

fn default_video_extensions() -> Vec<String> {
    DEFAULT_VIDEO_EXTENSIONS.clone()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: default_db_path(),
            compare: default_compare(),
            aliases: HashMap::new(),
            video_extensions: default_video_extensions(),
        }
    }
}

impl AppConfig {
    /// Aliases configured for one source; missing entries mean "strip
    /// nothing".
    pub fn aliases_for(&self, source: SourceTag) -> &[String] {
        self.aliases.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Deduplicated active comparison set, in tag order.
    pub fn active_sources(&self) -> BTreeSet<SourceTag> {
        self.compare.iter().copied().collect()
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::analysis::LanguageRegistry;
use crate::features::IdfWeighting;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocBaseConfig {
    /// Language used when the detected one has no enabled module.
    pub default_lang: String,
    /// Enabled language modules, by code.
    pub languages: Vec<String>,
    pub idf: IdfWeighting,
}

impl Default for DocBaseConfig {
    fn default() -> Self {
        Self { default_lang: "en".into(), languages: vec!["en".into(), "fr".into()], idf: IdfWeighting::default() }
    }
}

impl DocBaseConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io { path: path.to_path_buf(), source },
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| Error::Configuration(format!("{}: {e}", path.display())))
    }

    pub fn registry(&self) -> Result<LanguageRegistry> { LanguageRegistry::from_codes(self.languages.as_slice()) }
}

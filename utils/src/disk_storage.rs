//! Utilities for storing a struct in a file under `~/.address-vision`.
//! The struct should implement Serialize and Deserialize from serde.
//! Supported file formats are TOML and YAML.

use std::{fmt::Debug, fs, path::PathBuf};

use directories::BaseDirs;
use serde::{de::DeserializeOwned, Serialize};

const DATA_DIR_NAME: &str = ".address-vision";

pub enum FileFormat {
    TOML,
    YAML,
}

impl FileFormat {
    fn extension(&self) -> &'static str {
        match self {
            FileFormat::TOML => "toml",
            FileFormat::YAML => "yaml",
        }
    }
}

/// Directory holding config, networks, search history and the log file.
pub fn data_dir() -> crate::Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or(crate::Error::BaseDirsFailed)?;
    Ok(dirs.home_dir().join(DATA_DIR_NAME))
}

pub trait DiskStorageInterface
where
    Self: Sized + Debug + Default + Serialize + DeserializeOwned,
{
    const FILE_NAME: &'static str;
    const FORMAT: FileFormat;

    /// Get the path to the file
    fn path() -> crate::Result<PathBuf> {
        Ok(data_dir()?
            .join(Self::FILE_NAME)
            .with_extension(Self::FORMAT.extension()))
    }

    /// Load the content from the file if it exists otherwise return the default value
    fn load() -> crate::Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&path).map_err(|e| crate::Error::FileReadFailed(path.clone(), e))?;
        Self::parse(&content).map_err(|e| match e {
            ParseError::Toml(e) => crate::Error::TomlParsingFailed(path, e),
            ParseError::Yaml(e) => crate::Error::YamlParsingFailed(path, e),
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, ParseError> {
        match Self::FORMAT {
            FileFormat::TOML => toml::from_str(content).map_err(ParseError::Toml),
            FileFormat::YAML => serde_yaml::from_str(content).map_err(ParseError::Yaml),
        }
    }

    fn to_file_content(&self) -> crate::Result<String> {
        match Self::FORMAT {
            FileFormat::TOML => toml::to_string_pretty(self)
                .map_err(|e| crate::Error::TomlFormattingFailed(format!("{self:?}"), e)),
            FileFormat::YAML => serde_yaml::to_string(self)
                .map_err(|e| crate::Error::YamlFormattingFailed(format!("{self:?}"), e)),
        }
    }

    /// Save content to a file, creating the directories and file as necessary
    fn save(&self) -> crate::Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| crate::Error::CreateDirAllFailed(path.clone(), e))?;
        }

        let content = self.to_file_content()?;
        fs::write(&path, content).map_err(|e| crate::Error::FileWriteFailed(path, e))?;

        Ok(())
    }
}

#[derive(Debug)]
pub enum ParseError {
    Toml(toml::de::Error),
    Yaml(serde_yaml::Error),
}

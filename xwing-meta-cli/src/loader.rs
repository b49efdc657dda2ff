//! Filesystem-backed source loader
//!
//! Reads the ship and pilot catalogs from JSON files and the tournament
//! reports from a directory of previously downloaded `*.json` files.

use std::fs;
use std::path::{Path, PathBuf};

use xwing_meta::{MetaError, RawPilot, RawShip, SourceLoader};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: MetaError,
    },
}

pub struct FsLoader {
    ships: PathBuf,
    pilots: PathBuf,
    tournaments: PathBuf,
}

impl FsLoader {
    pub const fn new(ships: PathBuf, pilots: PathBuf, tournaments: PathBuf) -> Self {
        Self {
            ships,
            pilots,
            tournaments,
        }
    }

    fn read(path: &Path) -> Result<String, LoadError> {
        fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn catalog_error(path: &Path) -> impl FnOnce(MetaError) -> LoadError + '_ {
        move |source| LoadError::Catalog {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl SourceLoader for FsLoader {
    type Error = LoadError;

    fn load_ships(&self) -> Result<Vec<RawShip>, Self::Error> {
        let json = Self::read(&self.ships)?;
        RawShip::list_from_json(&json).map_err(Self::catalog_error(&self.ships))
    }

    fn load_pilots(&self) -> Result<Vec<RawPilot>, Self::Error> {
        let json = Self::read(&self.pilots)?;
        RawPilot::list_from_json(&json).map_err(Self::catalog_error(&self.pilots))
    }

    fn report_names(&self) -> Result<Vec<String>, Self::Error> {
        let entries = fs::read_dir(&self.tournaments).map_err(|source| LoadError::Read {
            path: self.tournaments.clone(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Read {
                path: self.tournaments.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        log::debug!(
            "found {} reports in {}",
            names.len(),
            self.tournaments.display()
        );
        Ok(names)
    }

    fn load_report(&self, name: &str) -> Result<String, Self::Error> {
        Self::read(&self.tournaments.join(name))
    }
}

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};

use super::descriptor::{PluginDescriptor, PluginRealm};

/// Entry every packaged plugin carries its descriptor under.
pub const DESCRIPTOR_ENTRY: &str = "META-INF/maven/plugin.xml";

/// A resolved plugin implementation class and the URL it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    pub class: String,
    pub location: String,
}

impl ClassRef {
    pub fn new(class: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            location: location.into(),
        }
    }

    /// Reference a class inside a known archive on disk.
    pub fn from_archive(class: impl Into<String>, archive: &Path) -> Self {
        let class = class.into();
        let entry = class.replace('.', "/");
        let location = format!("jar:file:{}!/{}.class", archive.display(), entry);
        Self { class, location }
    }
}

/// Locates the archive a plugin class was loaded from and extracts the
/// plugin descriptor embedded in it.
///
/// Loading from anything but a packaged archive is a structural precondition
/// failure, not something to fall back from: loose class files carry no
/// descriptor.
#[derive(Debug, Clone)]
pub struct PluginArchiveLoader {
    descriptor_entry: String,
}

impl Default for PluginArchiveLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginArchiveLoader {
    pub fn new() -> Self {
        Self {
            descriptor_entry: DESCRIPTOR_ENTRY.to_string(),
        }
    }

    pub fn with_descriptor_entry(mut self, entry: impl Into<String>) -> Self {
        self.descriptor_entry = entry.into();
        self
    }

    /// Extract the descriptor from the archive that provided `class`, with a
    /// realm scoped to that archive bound into it.
    pub fn load(&self, class: &ClassRef) -> Result<PluginDescriptor> {
        let archive = self.archive_path(class)?;
        debug!(class = %class.class, archive = %archive.display(), "extracting plugin descriptor");
        self.load_from_archive(&archive)
    }

    /// Extract the descriptor from an archive already located on disk.
    pub fn load_from_archive(&self, archive: &Path) -> Result<PluginDescriptor> {
        let xml = self.read_descriptor(archive)?;
        let mut descriptor = PluginDescriptor::parse(archive, &xml)?;
        descriptor.bind_realm(PluginRealm::new(archive));
        Ok(descriptor)
    }

    /// Recover the archive's filesystem path from the class location URL.
    fn archive_path(&self, class: &ClassRef) -> Result<PathBuf> {
        let Some(inner) = class.location.strip_prefix("jar:") else {
            return Err(Error::NotPackagedArchive {
                class: class.class.clone(),
                location: class.location.clone(),
            });
        };
        let path = match inner.find("!/") {
            Some(index) => &inner[..index],
            None => inner,
        };
        Ok(PathBuf::from(strip_file_scheme(path)))
    }

    fn read_descriptor(&self, archive: &Path) -> Result<String> {
        // The handle drops at the end of this scope on every path, so the
        // descriptor never outlives an open archive.
        let file = fs::File::open(archive).map_err(|e| Error::ArchiveError {
            archive: archive.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut zip = ZipArchive::new(file).map_err(|e| Error::ArchiveError {
            archive: archive.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut entry = match zip.by_name(&self.descriptor_entry) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(Error::MissingDescriptor {
                    archive: archive.to_path_buf(),
                    entry: self.descriptor_entry.clone(),
                });
            }
            Err(e) => {
                return Err(Error::ArchiveError {
                    archive: archive.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };
        let mut xml = String::new();
        entry.read_to_string(&mut xml).map_err(|e| Error::ArchiveError {
            archive: archive.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(xml)
    }
}

fn strip_file_scheme(url: &str) -> &str {
    let Some(rest) = url.strip_prefix("file:") else {
        return url;
    };
    match rest.strip_prefix("//") {
        // file://host/path: drop the authority, keep the path.
        Some(authority_and_path) => match authority_and_path.find('/') {
            Some(index) => &authority_and_path[index..],
            None => authority_and_path,
        },
        None => rest,
    }
}

//! Published artifact discovery from Gradle module metadata.
//!
//! After `publish` runs, Gradle's `maven-publish` plugin leaves a module
//! descriptor (`module.json`) describing every variant of the component and
//! the files attached to it. Only the `apiElements` variant names the
//! artifacts consumers compile against, so that is the variant reported
//! downstream.

use crate::files::FileAccess;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Variant whose files are reported as published artifacts.
pub const API_ELEMENTS_VARIANT: &str = "apiElements";

/// Errors arising while reading published artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The metadata file does not exist.
    #[error("failed to get '{path}': file does not exist")]
    FileNotFound {
        /// Path that was checked.
        path: Utf8PathBuf,
    },

    /// The metadata file could not be checked or read.
    #[error("failed to {operation} '{path}': {source}")]
    Io {
        /// The operation that failed (`check existence of`, `read`).
        operation: &'static str,
        /// Path of the metadata file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The metadata file is not valid module JSON.
    #[error("failed to parse '{path}': {source}")]
    Parse {
        /// Path of the metadata file.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Gradle module metadata, reduced to the parts artifact discovery reads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PublishedMetadata {
    /// Component variants in file order.
    #[serde(deserialize_with = "null_as_default")]
    pub variants: Vec<Variant>,
}

/// A named grouping of published files.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Variant {
    /// Variant name, e.g. `apiElements` or `sourcesElements`.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Files attached to the variant.
    #[serde(deserialize_with = "null_as_default")]
    pub files: Vec<VariantFile>,
}

/// A file descriptor within a variant.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VariantFile {
    /// File name as published, e.g. `lib-1.0.jar`.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Reads an explicit JSON `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PublishedMetadata {
    /// Parses module metadata from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the bytes are not a module descriptor.
    pub fn from_slice(content: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(content)
    }

    /// Returns the artifacts of every `apiElements` variant, in file order.
    #[must_use]
    pub fn api_artifacts(&self) -> ArtifactList {
        self.variants
            .iter()
            .filter(|variant| variant.name == API_ELEMENTS_VARIANT)
            .flat_map(|variant| &variant.files)
            .map(|file| Artifact::new(file.name.clone()))
            .collect()
    }
}

/// A published artifact entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact file name.
    pub name: String,
}

impl Artifact {
    /// Create an artifact entry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Ordered list of published artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactList(Vec<Artifact>);

impl ArtifactList {
    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no artifact was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the artifacts in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.0.iter()
    }

    /// Artifact names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|artifact| artifact.name.as_str()).collect()
    }
}

impl FromIterator<Artifact> for ArtifactList {
    fn from_iter<I: IntoIterator<Item = Artifact>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Artifact>> for ArtifactList {
    fn from(artifacts: Vec<Artifact>) -> Self {
        Self(artifacts)
    }
}

impl<'a> IntoIterator for &'a ArtifactList {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Reads the module metadata at `path` and returns the published artifacts.
///
/// The file's existence is checked first so that a missing file (usually a
/// wrong working directory or a project without `maven-publish`) is told
/// apart from an unreadable or malformed one.
///
/// # Errors
///
/// Returns [`ArtifactError::FileNotFound`], [`ArtifactError::Io`] or
/// [`ArtifactError::Parse`] accordingly. A file without an `apiElements`
/// variant is not an error and yields an empty list.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use gradle_execute_build::artifacts::extract_published_artifacts;
/// use gradle_execute_build::files::SystemFileAccess;
///
/// let result = extract_published_artifacts(
///     Utf8Path::new("does/not/exist/module.json"),
///     &SystemFileAccess,
/// );
/// assert!(result.is_err());
/// ```
pub fn extract_published_artifacts(
    path: &Utf8Path,
    files: &dyn FileAccess,
) -> Result<ArtifactList, ArtifactError> {
    let exists = files.exists(path).map_err(|source| ArtifactError::Io {
        operation: "check existence of",
        path: path.to_owned(),
        source,
    })?;
    if !exists {
        return Err(ArtifactError::FileNotFound {
            path: path.to_owned(),
        });
    }

    let content = files.read(path).map_err(|source| ArtifactError::Io {
        operation: "read",
        path: path.to_owned(),
        source,
    })?;

    let metadata =
        PublishedMetadata::from_slice(&content).map_err(|source| ArtifactError::Parse {
            path: path.to_owned(),
            source,
        })?;

    let artifacts = metadata.api_artifacts();
    log::debug!("found {} published artifact(s) in {path}", artifacts.len());
    Ok(artifacts)
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;

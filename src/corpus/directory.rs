use crate::corpus::{ContentResolver, CorpusError, CorpusResult, FetchResult};
use crate::url::strip_scheme;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// On-disk corpus of previously downloaded pages
///
/// The corpus directory holds one file per page plus a JSON index mapping
/// scheme-less URLs to file paths relative to the directory:
///
/// ```json
/// {
///   "www.ics.uci.edu/about": "0/12",
///   "vision.ics.uci.edu/papers": "3/140"
/// }
/// ```
///
/// `http://www.ics.uci.edu/about` and `https://www.ics.uci.edu/about` therefore
/// resolve to the same file.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
    index: HashMap<String, String>,
}

impl DirectoryCorpus {
    /// Opens a corpus directory and loads its index
    ///
    /// # Arguments
    ///
    /// * `root` - The corpus directory
    /// * `index_file` - Name of the JSON index, relative to `root`
    ///
    /// # Returns
    ///
    /// * `Ok(DirectoryCorpus)` - Index loaded
    /// * `Err(CorpusError)` - The index could not be read or parsed
    pub fn open(root: impl AsRef<Path>, index_file: &str) -> CorpusResult<Self> {
        let root = root.as_ref().to_path_buf();
        let index_path = root.join(index_file);
        let display = index_path.display().to_string();

        let raw = std::fs::read_to_string(&index_path).map_err(|source| CorpusError::Io {
            path: display.clone(),
            source,
        })?;
        let index: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| CorpusError::Index {
                path: display,
                source,
            })?;

        tracing::info!(
            "Loaded corpus index with {} entries from {}",
            index.len(),
            root.display()
        );

        Ok(Self { root, index })
    }

    /// Number of URLs the index knows about
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Path of the file backing a URL, if the index has one
    pub fn file_for(&self, url: &str) -> Option<PathBuf> {
        let key = strip_scheme(url.trim());
        self.index.get(key).map(|relative| self.root.join(relative))
    }
}

impl ContentResolver for DirectoryCorpus {
    fn resolve(&self, url: &str) -> FetchResult {
        let Some(path) = self.file_for(url) else {
            return FetchResult::absent(url);
        };

        match std::fs::read(&path) {
            Ok(content) => FetchResult::found(url, content),
            Err(e) => {
                tracing::debug!("Corpus file {} for {} unreadable: {}", path.display(), url, e);
                FetchResult::absent(url)
            }
        }
    }
}

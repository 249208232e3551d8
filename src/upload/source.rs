use ignore::Walk;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file handed to the client by drop or browse.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes { name: String, data: Arc<[u8]> },
}

impl FileSource {
    pub fn name(&self) -> String {
        match self {
            FileSource::Path(path) => path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            FileSource::Bytes { name, .. } => name.clone(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            FileSource::Path(path) => std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            FileSource::Bytes { data, .. } => data.len() as u64,
        }
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Bytes { data, .. } => Ok(data.to_vec()),
        }
    }
}

/// Expands dropped paths into files. Folders are walked honoring `.gitignore`.
pub fn expand_paths(paths: &[PathBuf]) -> Vec<FileSource> {
    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_folder(path, &mut sources);
        } else if path.is_file() {
            sources.push(FileSource::Path(path.clone()));
        } else {
            tracing::warn!("Skipping {}: not a readable file", path.display());
        }
    }
    sources
}

fn collect_folder(folder: &Path, sources: &mut Vec<FileSource>) {
    for entry in Walk::new(folder) {
        match entry {
            Ok(entry) => {
                if entry.path().is_file() && !is_ignored_file(entry.path()) {
                    sources.push(FileSource::Path(entry.path().to_path_buf()));
                }
            }
            Err(e) => tracing::warn!("Error walking {}: {}", folder.display(), e),
        }
    }
}

fn is_ignored_file(path: &Path) -> bool {
    const IGNORED_FILES: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| IGNORED_FILES.contains(&n))
        .unwrap_or(false)
}

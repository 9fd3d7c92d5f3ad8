use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("model {0} is not cached and downloads are disabled")]
    NotCached(String),
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where a missing model may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    AllowDownload,
    CacheOnly,
}

/// Resolve a model file by name.
///
/// Resolution order:
/// 1. Explicit directory (e.g. `--model-dir`)
/// 2. User cache directory (platform-specific)
/// 3. Download from URL to cache, when `policy` allows it
pub fn resolve(
    name: &str,
    url: &str,
    model_dir: Option<&Path>,
    policy: FetchPolicy,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(dir) = model_dir {
        let explicit = dir.join(name);
        if explicit.exists() {
            return Ok(explicit);
        }
    }

    let cache_dir = model_cache_dir()?;
    resolve_in(&cache_dir, name, url, policy, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    url: &str,
    policy: FetchPolicy,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    if policy == FetchPolicy::CacheOnly {
        return Err(ModelResolveError::NotCached(name.to_string()));
    }

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading {name} from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/SignReel/models/`
/// - Linux: `$XDG_CACHE_HOME/SignReel/models/` or `~/.cache/SignReel/models/`
/// - Windows: `%LOCALAPPDATA%/SignReel/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("SignReel").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("SignReel").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

/// Stream `url` into `<dest>.part`, then rename it into place.
fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| ModelResolveError::Download {
            url: url.to_string(),
            source,
        })?;
    let total = response.content_length().unwrap_or(0);

    let partial = dest.with_extension("part");
    let result = copy_with_progress(&mut response, &partial, total, progress.as_deref())
        .and_then(|()| fs::rename(&partial, dest));
    if let Err(source) = result {
        let _ = fs::remove_file(&partial);
        return Err(ModelResolveError::Write {
            path: dest.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn copy_with_progress(
    reader: &mut impl Read,
    path: &Path,
    total: u64,
    progress: Option<&(dyn Fn(u64, u64) + Send)>,
) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    let mut buf = vec![0u8; 256 * 1024];
    let mut written = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])?;
        written += n as u64;
        if let Some(report) = progress {
            report(written, total);
        }
    }
    file.flush()
}

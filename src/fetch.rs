use std::collections::BTreeMap;
use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header;
use serde::{Deserialize, Serialize};

const META_VERSION: u32 = 1;
const CACHE_DIR: &str = "pennant_trends";
const META_FILE: &str = "fetch_meta.json";
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("pennant_trends/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")
    })
}

/// Validator metadata per URL. Bodies live beside the meta file, one file
/// each, so a large CSV is never round-tripped through JSON.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FetchMeta {
    version: u32,
    entries: BTreeMap<String, MetaEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetaEntry {
    body_file: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: String,
}

fn app_cache_dir() -> Result<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Ok(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").context("neither XDG_CACHE_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn load_meta(dir: &Path) -> FetchMeta {
    let path = dir.join(META_FILE);
    let Ok(text) = fs::read_to_string(&path) else {
        return FetchMeta::default();
    };
    match serde_json::from_str::<FetchMeta>(&text) {
        Ok(meta) if meta.version == META_VERSION => meta,
        // Unknown or stale layout: start over, cached bodies get refetched.
        _ => FetchMeta::default(),
    }
}

fn store_meta(dir: &Path, meta: &FetchMeta) -> Result<()> {
    let text = serde_json::to_string_pretty(meta).context("encoding cache metadata")?;
    write_atomic(&dir.join(META_FILE), text.as_bytes())
}

fn body_file_name(url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    format!("body_{:016x}.txt", hasher.finish())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

fn read_body_file(dir: &Path, entry: &MetaEntry) -> Result<String> {
    let path = dir.join(&entry.body_file);
    fs::read_to_string(&path).with_context(|| format!("reading cached body {}", path.display()))
}

/// GET with conditional-request revalidation.
///
/// A cached validator (ETag or Last-Modified) is replayed on the next fetch;
/// a 304 serves the cached body without re-downloading. Cache failures are
/// non-fatal as long as the network response itself is good.
pub fn fetch_text_cached(url: &str) -> Result<String> {
    let dir = app_cache_dir()?;
    fs::create_dir_all(&dir).with_context(|| format!("creating cache dir {}", dir.display()))?;
    let mut meta = load_meta(&dir);

    let mut request = http_client()?.get(url);
    if let Some(entry) = meta.entries.get(url) {
        if let Some(etag) = &entry.etag {
            request = request.header(header::IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = &entry.last_modified {
            request = request.header(header::IF_MODIFIED_SINCE, last_modified);
        }
    }

    let response = request
        .send()
        .with_context(|| format!("requesting {}", url))?;

    if response.status() == StatusCode::NOT_MODIFIED {
        let entry = meta
            .entries
            .get(url)
            .context("server sent 304 but no cached copy exists")?;
        return read_body_file(&dir, entry);
    }
    if !response.status().is_success() {
        bail!("{} returned HTTP {}", url, response.status());
    }

    let header_value = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let etag = header_value(header::ETAG);
    let last_modified = header_value(header::LAST_MODIFIED);

    let body = response
        .text()
        .with_context(|| format!("reading body from {}", url))?;

    let body_file = body_file_name(url);
    write_atomic(&dir.join(&body_file), body.as_bytes())?;
    meta.version = META_VERSION;
    meta.entries.insert(
        url.to_string(),
        MetaEntry {
            body_file,
            etag,
            last_modified,
            fetched_at: chrono::Local::now().to_rfc3339(),
        },
    );
    store_meta(&dir, &meta)?;

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_file_names_are_stable_and_distinct() {
        let a = body_file_name("https://example.com/Teams.csv");
        let b = body_file_name("https://example.com/Teams.csv");
        let c = body_file_name("https://example.com/other.csv");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("body_") && a.ends_with(".txt"));
    }

    #[test]
    fn stale_meta_version_resets() {
        let dir = std::env::temp_dir().join("pennant_trends_meta_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(META_FILE),
            r#"{"version": 99, "entries": {"u": {"body_file": "b", "etag": null, "last_modified": null, "fetched_at": ""}}}"#,
        )
        .unwrap();
        let meta = load_meta(&dir);
        assert!(meta.entries.is_empty());
    }
}

//! Utility functions for asset locations and file naming

use std::path::{Component, Path, PathBuf};

/// Fallback file name for URLs whose path has no usable last segment
const FALLBACK_FILENAME: &str = "download";

/// Whether a location descriptor is a remote URL rather than a path relative to the item folder
///
/// # Examples
///
/// ```
/// use keira_catalog::utils::is_remote;
///
/// assert!(is_remote("https://example.com/icon.png"));
/// assert!(is_remote("HTTP://example.com/icon.png"));
/// assert!(!is_remote("assets/icon.png"));
/// ```
#[must_use]
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// File name an asset is stored under in the build tree
///
/// For URLs this is the last path segment, percent-decoded, with query and fragment ignored.
/// For relative paths it is the final path component. Falls back to `"download"` when neither
/// yields a name.
///
/// # Examples
///
/// ```
/// use keira_catalog::utils::location_basename;
///
/// assert_eq!(location_basename("https://example.com/rel/snake%20game.bin?raw=1"), "snake game.bin");
/// assert_eq!(location_basename("screens/one.png"), "one.png");
/// assert_eq!(location_basename("https://example.com/"), "download");
/// ```
#[must_use]
pub fn location_basename(location: &str) -> String {
    if is_remote(location) {
        if let Ok(parsed_url) = url::Url::parse(location.trim())
            && let Some(mut segments) = parsed_url.path_segments()
            && let Some(last_segment) = segments.next_back()
            && !last_segment.is_empty()
        {
            return match urlencoding::decode(last_segment) {
                Ok(decoded) => sanitize_filename(&decoded),
                Err(_) => sanitize_filename(last_segment),
            };
        }
        return FALLBACK_FILENAME.to_string();
    }

    Path::new(location)
        .file_name()
        .and_then(|n| n.to_str())
        .map(sanitize_filename)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Resolve a relative location inside the item folder
///
/// Returns `None` for absolute paths and for paths with a `..` component, so a manifest can
/// only reference files under its own folder.
///
/// # Examples
///
/// ```
/// use keira_catalog::utils::item_local_path;
/// use std::path::Path;
///
/// let dir = Path::new("/src/apps/snake");
/// assert_eq!(item_local_path(dir, "shots/one.png"), Some(dir.join("shots/one.png")));
/// assert_eq!(item_local_path(dir, "../other/icon.png"), None);
/// assert_eq!(item_local_path(dir, "/etc/passwd"), None);
/// ```
#[must_use]
pub fn item_local_path(item_dir: &Path, location: &str) -> Option<PathBuf> {
    let relative = Path::new(location);
    let confined = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    confined.then(|| item_dir.join(relative))
}

/// Strip path separators a decoded URL segment could smuggle in
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// Host of a URL, lowercased, without a leading `www.`
#[must_use]
pub fn url_host(location: &str) -> Option<String> {
    let parsed = url::Url::parse(location.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

/// Name of the RGB565 blob derived from an icon file: `<stem>_min.bin`
///
/// # Examples
///
/// ```
/// use keira_catalog::utils::icon_min_name;
///
/// assert_eq!(icon_min_name("icon.png"), "icon_min.bin");
/// assert_eq!(icon_min_name("logo.large.jpg"), "logo.large_min.bin");
/// ```
#[must_use]
pub fn icon_min_name(icon_file: &str) -> String {
    let stem = Path::new(icon_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("icon");
    format!("{stem}_min.bin")
}

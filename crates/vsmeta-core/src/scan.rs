//! Video discovery.
//!
//! Walks the configured roots and produces one [`WorkItem`] per video file:
//! the sidecar target plus the companion paths (NFO document, poster and
//! fanart images) derived from the video's file name. Synology `@eaDir`
//! thumbnail directories are skipped.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ProcessOptions;

/// One video file's worth of work for the conversion stage.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub video_path: PathBuf,
    /// `<stem>.nfo` next to the video.
    pub nfo_path: PathBuf,
    /// `<stem><poster_suffix>` next to the video.
    pub poster_path: PathBuf,
    /// `<stem><fanart_suffix>` next to the video.
    pub fanart_path: PathBuf,
    /// `<video file name>.vsmeta`; the original extension stays in the name.
    pub target_path: PathBuf,
}

/// Result of walking all roots.
pub struct ScanResult {
    pub items: Vec<WorkItem>,
    /// Unreadable roots or entries; the scan itself never fails.
    pub warnings: Vec<String>,
}

/// Discover videos under every root in `options.roots`.
pub fn scan_videos(options: &ProcessOptions) -> ScanResult {
    let extensions: Vec<String> = options
        .video_extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    let mut items = Vec::new();
    let mut warnings = Vec::new();

    for root in &options.roots {
        if !root.exists() {
            warnings.push(format!("scan root not found: {}", root.display()));
            continue;
        }
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != "@eaDir");
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warnings.push(format!("scan error under {}: {}", root.display(), err));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !has_video_extension(entry.path(), &extensions) {
                continue;
            }
            items.push(work_item(entry.path(), options));
        }
    }

    ScanResult { items, warnings }
}

fn has_video_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| extensions.iter().any(|want| *want == e))
}

fn work_item(video_path: &Path, options: &ProcessOptions) -> WorkItem {
    let dir = video_path.parent().unwrap_or(Path::new("."));
    let stem = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let file_name = video_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    WorkItem {
        video_path: video_path.to_path_buf(),
        nfo_path: dir.join(format!("{stem}.nfo")),
        poster_path: dir.join(format!("{stem}{}", options.poster_suffix)),
        fanart_path: dir.join(format!("{stem}{}", options.fanart_suffix)),
        target_path: dir.join(format!("{file_name}.vsmeta")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn options_for(root: &Path) -> ProcessOptions {
        ProcessOptions {
            roots: vec![root.to_path_buf()],
            ..ProcessOptions::default()
        }
    }

    #[test]
    fn test_scan_finds_videos_and_companion_paths() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("film.mkv")).unwrap();
        File::create(dir.path().join("film.nfo")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let scan = scan_videos(&options_for(dir.path()));
        assert_eq!(scan.items.len(), 1);
        let item = &scan.items[0];
        assert_eq!(item.nfo_path, dir.path().join("film.nfo"));
        assert_eq!(item.poster_path, dir.path().join("film-poster.jpg"));
        assert_eq!(item.fanart_path, dir.path().join("film-fanart.jpg"));
        // Target keeps the original extension in the base name
        assert_eq!(item.target_path, dir.path().join("film.mkv.vsmeta"));
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.MKV")).unwrap();
        File::create(dir.path().join("b.Mp4")).unwrap();
        File::create(dir.path().join("c.jpg")).unwrap();

        let scan = scan_videos(&options_for(dir.path()));
        assert_eq!(scan.items.len(), 2);
    }

    #[test]
    fn test_eadir_is_skipped() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("@eaDir")).unwrap();
        File::create(dir.path().join("@eaDir").join("thumb.mkv")).unwrap();
        File::create(dir.path().join("real.mkv")).unwrap();

        let scan = scan_videos(&options_for(dir.path()));
        assert_eq!(scan.items.len(), 1);
        assert_eq!(scan.items[0].video_path, dir.path().join("real.mkv"));
    }

    #[test]
    fn test_missing_root_is_a_warning_not_an_error() {
        let dir = tempdir().unwrap();
        let scan = scan_videos(&options_for(&dir.path().join("gone")));
        assert!(scan.items.is_empty());
        assert_eq!(scan.warnings.len(), 1);
    }

    #[test]
    fn test_recursive_scan() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        File::create(dir.path().join("a/b/deep.mp4")).unwrap();

        let scan = scan_videos(&options_for(dir.path()));
        assert_eq!(scan.items.len(), 1);
    }
}

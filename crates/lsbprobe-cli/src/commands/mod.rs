pub mod analyze;
pub mod report;
pub mod server;

use std::path::{Path, PathBuf};

/// File extensions picked up when a directory is given as input.
const IMAGE_EXTENSIONS: &[&str] = &["png", "bmp", "jpg", "jpeg"];

/// Worker count: explicit value, else available parallelism.
pub fn resolve_jobs(jobs: Option<usize>) -> usize {
    jobs.filter(|&j| j > 0).unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    })
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand inputs into a flat list of files.
///
/// Files are kept as given, whatever their extension; the decoder decides.
/// Directories contribute their image files (non-recursive, sorted).
pub fn collect_inputs(inputs: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for input in inputs {
        let path = PathBuf::from(input);
        if path.is_dir() {
            match std::fs::read_dir(&path) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .filter_map(|e| e.ok())
                        .map(|e| e.path())
                        .filter(|p| p.is_file() && has_image_extension(p))
                        .collect();
                    found.sort();
                    if found.is_empty() {
                        log::warn!("{}: no images found", path.display());
                    }
                    paths.extend(found);
                }
                Err(e) => eprintln!("Cannot read directory {}: {e}", path.display()),
            }
        } else {
            paths.push(path);
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_jobs_explicit() {
        assert_eq!(resolve_jobs(Some(3)), 3);
    }

    #[test]
    fn test_resolve_jobs_default_positive() {
        assert!(resolve_jobs(None) >= 1);
        assert!(resolve_jobs(Some(0)) >= 1);
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("a.png")));
        assert!(has_image_extension(Path::new("b.JPEG")));
        assert!(has_image_extension(Path::new("dir/c.bmp")));
        assert!(!has_image_extension(Path::new("d.txt")));
        assert!(!has_image_extension(Path::new("noext")));
    }

    #[test]
    fn test_collect_inputs_expands_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let inputs = vec![dir.path().display().to_string()];
        let paths = collect_inputs(&inputs);
        assert_eq!(
            paths,
            vec![dir.path().join("a.jpg"), dir.path().join("b.png")]
        );
    }

    #[test]
    fn test_collect_inputs_keeps_files_verbatim() {
        let inputs = vec!["missing.txt".to_string(), "x.png".to_string()];
        let paths = collect_inputs(&inputs);
        assert_eq!(
            paths,
            vec![PathBuf::from("missing.txt"), PathBuf::from("x.png")]
        );
    }
}

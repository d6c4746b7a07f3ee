//! Facilities for discovering input files and loading text corpora.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::IngestConfig;
use crate::error::{GramsegError, Result};

/// Discovers files rooted at the provided input paths according to the ingest configuration.
///
/// Directories are traversed recursively by default; set [`IngestConfig::recursive`] to `false`
/// to limit discovery to the first level.  Symlink traversal is controlled through
/// [`IngestConfig::follow_symlinks`].
pub fn collect_paths<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(GramsegError::InvalidConfig(format!(
                "input path {path:?} does not exist"
            )));
        }
        let metadata = path
            .symlink_metadata()
            .map_err(|err| GramsegError::io(err, Some(path.to_path_buf())))?;
        if metadata.is_dir() {
            if cfg.recursive {
                let walker = WalkDir::new(path).follow_links(cfg.follow_symlinks);
                for entry in walker {
                    let entry = entry.map_err(|err| GramsegError::Internal(err.to_string()))?;
                    if entry.file_type().is_file() {
                        files.push(entry.path().to_path_buf());
                    }
                }
            } else {
                for entry in fs::read_dir(path)
                    .map_err(|err| GramsegError::io(err, Some(path.to_path_buf())))?
                {
                    let entry =
                        entry.map_err(|err| GramsegError::io(err, Some(path.to_path_buf())))?;
                    let entry_path = entry.path();
                    if entry_path.is_file() {
                        files.push(entry_path);
                    }
                }
            }
        } else if metadata.is_file() {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(GramsegError::InvalidConfig(
            "no files discovered in provided inputs".into(),
        ));
    }
    Ok(files)
}

/// Loads a text corpus into memory based on the ingest configuration.
///
/// Files are loaded in-order.  With [`IngestConfig::line_delimited`] set, every
/// non-blank line becomes one text; otherwise each file contributes a single
/// text.  Blank texts are discarded to avoid degenerate training input.
pub fn load_text_corpus<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<String>> {
    let file_paths = collect_paths(inputs, cfg)?;
    let mut texts = Vec::new();
    for file_path in file_paths {
        let contents = fs::read_to_string(&file_path)
            .map_err(|err| GramsegError::io(err, Some(file_path.clone())))?;
        if cfg.line_delimited {
            for line in contents.lines() {
                if !line.trim().is_empty() {
                    texts.push(line.to_owned());
                }
            }
        } else if !contents.trim().is_empty() {
            texts.push(contents);
        }
    }
    if texts.is_empty() {
        return Err(GramsegError::InvalidConfig(
            "no texts could be loaded from inputs".into(),
        ));
    }
    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn collect_paths_discovers_files_recursively() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("create nested directory");
        let file_a = dir.path().join("a.txt");
        let file_b = nested.join("b.txt");
        fs::write(&file_a, "alpha").expect("write a");
        fs::write(&file_b, "beta").expect("write b");

        let cfg = IngestConfig::default();
        let mut paths = collect_paths(&[dir.path()], &cfg).expect("collect paths");
        paths.sort();
        assert_eq!(paths, vec![file_a, file_b]);
    }

    #[test]
    fn line_delimited_corpus_skips_blank_lines() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("corpus.txt");
        fs::write(&file, "ding\n\n  \ndong\n").expect("write corpus");

        let cfg = IngestConfig::default();
        let texts = load_text_corpus(&[file], &cfg).expect("load corpus");
        assert_eq!(texts, vec!["ding", "dong"]);
    }

    #[test]
    fn whole_file_corpus_loads_one_text_per_file() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("corpus.txt");
        fs::write(&file, "ding\ndong\n").expect("write corpus");

        let cfg = IngestConfig {
            line_delimited: false,
            ..IngestConfig::default()
        };
        let texts = load_text_corpus(&[file], &cfg).expect("load corpus");
        assert_eq!(texts, vec!["ding\ndong\n"]);
    }

    #[test]
    fn missing_input_is_rejected() {
        let cfg = IngestConfig::default();
        let err = load_text_corpus(&[Path::new("/nonexistent/corpus.txt")], &cfg)
            .expect_err("missing path should fail");
        assert!(matches!(err, GramsegError::InvalidConfig(_)));
    }
}

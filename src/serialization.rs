//! Binary (de)serialisation of trained models.

use std::fs;
use std::path::Path;

use crate::error::{GramsegError, Result};
use crate::model::GramModel;

/// Persists a model to disk in the crate's binary wire format.
///
/// The format round-trips every integer count and key set exactly, together
/// with the trained `max_n` and granularity.
pub fn save_model<P: AsRef<Path>>(model: &GramModel, path: P) -> Result<()> {
    let bytes = postcard::to_allocvec(model)?;
    fs::write(path.as_ref(), bytes)
        .map_err(|err| GramsegError::io(err, Some(path.as_ref().to_path_buf())))
}

/// Loads a model previously written by [`save_model`].
///
/// A missing or malformed file yields a [`GramsegError::Load`]; a failed load
/// never produces a partially populated model.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<GramModel> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| GramsegError::Load {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    postcard::from_bytes(&bytes).map_err(|err| GramsegError::Load {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Granularity, TrainerConfig};
    use crate::trainer::Trainer;
    use tempfile::tempdir;

    #[test]
    fn round_trip_preserves_every_count() {
        let cfg = TrainerConfig::builder()
            .max_n(3)
            .granularity(Granularity::Chars)
            .show_progress(false)
            .build()
            .expect("config");
        let model = Trainer::new(cfg)
            .train_from_texts(&["ding", "dong", "dung"])
            .expect("training")
            .model;

        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("model.gram");
        model.save(&path).expect("save");
        let restored = GramModel::load(&path).expect("load");
        assert_eq!(restored, model);
        assert_eq!(restored.size(), model.size());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempdir().expect("tempdir");
        let err = GramModel::load(dir.path().join("absent.gram")).expect_err("load should fail");
        assert!(matches!(err, GramsegError::Load { .. }));
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("garbage.gram");
        fs::write(&path, b"not a model").expect("write garbage");
        let err = GramModel::load(&path).expect_err("load should fail");
        assert!(matches!(err, GramsegError::Load { .. }));
    }
}

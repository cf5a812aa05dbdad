//! Output directory layout and naming

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use crate::error::{ResampleError, Result};

pub const SEGMENT_PREFIX: &str = "audio_";
pub const AUGMENT_PREFIX: &str = "aug_";

/// ffmpeg segment muxer placeholder for the segment index.
pub const SEGMENT_INDEX_PLACEHOLDER: &str = "%05d";

pub fn output_dir_name(sample_rate: u32) -> String {
    format!("out_{}", sample_rate)
}

/// Creates `output_root/out_{sample_rate}`.
///
/// Missing parents of `output_root` are created; the leaf directory itself
/// must not exist yet, so output from an earlier run is never mixed in.
pub fn create_output_dir(output_root: &Path, sample_rate: u32) -> Result<PathBuf> {
    let dir = output_root.join(output_dir_name(sample_rate));

    if !output_root.as_os_str().is_empty() {
        fs::create_dir_all(output_root)?;
    }

    match fs::create_dir(&dir) {
        Ok(()) => Ok(dir),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(ResampleError::output_exists(dir)),
        Err(e) => Err(e.into()),
    }
}

/// Same precondition as [`create_output_dir`], without touching the filesystem.
pub fn check_output_dir_available(output_root: &Path, sample_rate: u32) -> Result<PathBuf> {
    let dir = output_root.join(output_dir_name(sample_rate));
    if fs::symlink_metadata(&dir).is_ok() {
        return Err(ResampleError::output_exists(dir));
    }
    Ok(dir)
}

/// `audio_{input_index:05}_%05d.wav` inside `output_dir`.
pub fn segment_pattern(output_dir: &Path, input_index: usize) -> PathBuf {
    output_dir.join(format!(
        "{}{:05}_{}.wav",
        SEGMENT_PREFIX, input_index, SEGMENT_INDEX_PLACEHOLDER
    ))
}

/// Concrete name of one segment, as ffmpeg expands [`segment_pattern`].
#[cfg(test)]
pub(crate) fn segment_file_name(input_index: usize, segment_index: usize) -> String {
    format!("{}{:05}_{:05}.wav", SEGMENT_PREFIX, input_index, segment_index)
}

/// `aug_{file_name}` next to `source`.
pub fn augmented_path(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{}{}", AUGMENT_PREFIX, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir_created_under_root() {
        let root = TempDir::new().unwrap();
        let dir = create_output_dir(root.path(), 22050).unwrap();
        assert_eq!(dir, root.path().join("out_22050"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_missing_root_parents_created() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("a/b");
        let dir = create_output_dir(&nested, 16000).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_existing_output_dir_rejected() {
        let root = TempDir::new().unwrap();
        create_output_dir(root.path(), 44100).unwrap();
        std::fs::write(root.path().join("out_44100/audio_00000_00000.wav"), b"old").unwrap();

        let err = create_output_dir(root.path(), 44100).unwrap_err();
        assert!(matches!(err, ResampleError::OutputExists { .. }));
        // A different rate is a different directory.
        assert!(create_output_dir(root.path(), 48000).is_ok());
    }

    #[test]
    fn test_availability_check_creates_nothing() {
        let root = TempDir::new().unwrap();
        let dir = check_output_dir_available(root.path(), 16000).unwrap();
        assert_eq!(dir, root.path().join("out_16000"));
        assert!(!dir.exists());

        std::fs::create_dir(&dir).unwrap();
        let err = check_output_dir_available(root.path(), 16000).unwrap_err();
        assert!(matches!(err, ResampleError::OutputExists { .. }));
    }

    #[test]
    fn test_segment_names() {
        let pattern = segment_pattern(Path::new("out_8000"), 7);
        assert_eq!(pattern, Path::new("out_8000/audio_00007_%05d.wav"));
        assert_eq!(segment_file_name(7, 12), "audio_00007_00012.wav");
        assert_eq!(segment_file_name(123456, 0), "audio_123456_00000.wav");
    }

    #[test]
    fn test_augmented_path() {
        let path = augmented_path(Path::new("out_8000/audio_00001_00002.wav"));
        assert_eq!(path, Path::new("out_8000/aug_audio_00001_00002.wav"));
        assert_eq!(
            augmented_path(&path),
            Path::new("out_8000/aug_aug_audio_00001_00002.wav")
        );
    }
}

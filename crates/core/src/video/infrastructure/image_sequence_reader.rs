use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::sequence_metadata::SequenceMetadata;
use crate::video::domain::frame_reader::FrameReader;

/// Reads a directory of still images as a frame sequence.
///
/// Files with a known image extension are taken in lexical order, so
/// zero-padded names (`frame_0001.png`, ...) play back in sequence. A path to
/// a single image yields a one-frame sequence. Frames are decoded lazily and
/// always come out RGB.
pub struct ImageSequenceReader {
    paths: Vec<PathBuf>,
    resize: Option<(u32, u32)>,
    opened: bool,
}

impl ImageSequenceReader {
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            resize: None,
            opened: false,
        }
    }

    /// Scales every frame to `width` x `height` as it is read.
    pub fn with_resize(mut self, width: u32, height: u32) -> Self {
        self.resize = Some((width, height));
        self
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_frame(
    path: &Path,
    index: usize,
    resize: Option<(u32, u32)>,
) -> Result<Frame, Box<dyn std::error::Error>> {
    let image = image::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let frame = Frame::from_rgb(image.to_rgb8(), index);
    Ok(match resize {
        Some((w, h)) if frame.size() != (w, h) => frame.resize(w, h),
        _ => frame,
    })
}

impl FrameReader for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<SequenceMetadata, Box<dyn std::error::Error>> {
        let paths = if path.is_dir() {
            list_images(path)?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(format!("No such file or directory: {}", path.display()).into());
        };
        let first = paths
            .first()
            .ok_or_else(|| format!("No images found in {}", path.display()))?;

        let (width, height) = match self.resize {
            Some(size) => size,
            None => image::image_dimensions(first)?,
        };
        log::info!(
            "Opened {} frames from {} ({}x{})",
            paths.len(),
            path.display(),
            width,
            height
        );

        let metadata = SequenceMetadata {
            width,
            height,
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };
        self.paths = paths;
        self.opened = true;
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if !self.opened {
            return Box::new(std::iter::once(Err(
                "ImageSequenceReader: not opened".into()
            )));
        }
        let resize = self.resize;
        Box::new(
            self.paths
                .iter()
                .enumerate()
                .map(move |(index, path)| load_frame(path, index, resize)),
        )
    }

    fn close(&mut self) {
        self.paths.clear();
        self.opened = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_image(dir: &Path, name: &str, value: u8) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(32, 24, Rgb([value, value, value]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_directory_read_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "frame_002.png", 20);
        write_image(dir.path(), "frame_000.png", 0);
        write_image(dir.path(), "frame_001.png", 10);
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let mut reader = ImageSequenceReader::new();
        let meta = reader.open(dir.path()).unwrap();
        assert_eq!(meta.total_frames, 3);
        assert_eq!((meta.width, meta.height), (32, 24));
        assert_eq!(meta.source_path.as_deref(), Some(dir.path()));

        let frames: Vec<Frame> = reader.frames().map(|f| f.unwrap()).collect();
        let firsts: Vec<u8> = frames.iter().map(|f| f.data()[0]).collect();
        assert_eq!(firsts, vec![0, 10, 20]);
        let indices: Vec<usize> = frames.iter().map(Frame::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(frames.iter().all(|f| f.channels() == 3));
    }

    #[test]
    fn test_single_file_is_one_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "still.png", 5);
        let mut reader = ImageSequenceReader::new();
        assert_eq!(reader.open(&path).unwrap().total_frames, 1);
        assert_eq!(reader.frames().count(), 1);
    }

    #[test]
    fn test_resize_on_read() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "a.png", 5);
        let mut reader = ImageSequenceReader::new().with_resize(16, 12);
        let meta = reader.open(dir.path()).unwrap();
        assert_eq!((meta.width, meta.height), (16, 12));
        let frame = reader.frames().next().unwrap().unwrap();
        assert_eq!(frame.size(), (16, 12));
    }

    #[test]
    fn test_extension_match_ignores_case() {
        assert!(has_image_extension(Path::new("x/FRAME.PNG")));
        assert!(has_image_extension(Path::new("a.jpeg")));
        assert!(!has_image_extension(Path::new("a.mp4")));
        assert!(!has_image_extension(Path::new("noext")));
    }

    #[test]
    fn test_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageSequenceReader::new().open(dir.path()).is_err());
    }

    #[test]
    fn test_missing_path_is_error() {
        assert!(ImageSequenceReader::new()
            .open(Path::new("/nonexistent/frames"))
            .is_err());
    }

    #[test]
    fn test_frames_without_open_returns_error() {
        let mut reader = ImageSequenceReader::new();
        assert!(reader.frames().next().unwrap().is_err());
    }

    #[test]
    fn test_close_resets() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "a.png", 5);
        let mut reader = ImageSequenceReader::new();
        reader.open(dir.path()).unwrap();
        reader.close();
        reader.close();
        assert!(reader.frames().next().unwrap().is_err());
    }

    #[test]
    fn test_corrupt_image_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"garbage").unwrap();
        let mut reader = ImageSequenceReader::new();
        // dimensions are probed from the first file
        assert!(reader.open(dir.path()).is_err());
    }
}

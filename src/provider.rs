//! Landmark sources feeding the overlay.

use crate::{landmarks::LandmarkFrame, Error, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Yields one landmark frame per call
pub trait LandmarkProvider {
    /// Next frame, or `None` once the source is exhausted
    ///
    /// # Errors
    ///
    /// Returns an error if the source itself cannot be read
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>>;
}

/// Frame fields needed to keep the timeline going when landmarks are unreadable
#[derive(Deserialize)]
struct FrameHeader {
    timestamp_ms: f64,
    width: u32,
    height: u32,
}

/// Recorded frames stored as JSON Lines, one [`LandmarkFrame`] per line
///
/// A line whose landmarks cannot be decoded becomes a frame without a face.
/// A line without a usable timestamp and frame size is skipped. Both are
/// logged and counted; neither ends the stream.
pub struct JsonLinesProvider<R> {
    reader: R,
    line_number: usize,
    malformed_lines: usize,
    buffer: String,
}

impl JsonLinesProvider<BufReader<File>> {
    /// Open a recording on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::ProviderError(format!("Failed to open {}: {e}", path.display())))?;
        debug!("Reading landmark frames from {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesProvider<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            malformed_lines: 0,
            buffer: String::new(),
        }
    }

    /// Number of lines consumed so far
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line_number
    }

    /// Lines that could not be decoded as a full frame
    #[must_use]
    pub const fn malformed_lines(&self) -> usize {
        self.malformed_lines
    }
}

impl<R: BufRead> LandmarkProvider for JsonLinesProvider<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            let error = match serde_json::from_str::<LandmarkFrame>(line) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => e,
            };
            self.malformed_lines += 1;

            match serde_json::from_str::<FrameHeader>(line) {
                Ok(header) => {
                    warn!("Line {}: unreadable landmarks ({error}), treating as no face", self.line_number);
                    return Ok(Some(LandmarkFrame {
                        timestamp_ms: header.timestamp_ms,
                        width: header.width,
                        height: header.height,
                        landmarks: None,
                    }));
                }
                Err(_) => warn!("Line {}: skipping malformed frame ({error})", self.line_number),
            }
        }
    }
}

/// In-memory frames, mostly for tests and scripted runs
#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: VecDeque<LandmarkFrame>,
}

impl FrameQueue {
    #[must_use]
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self { frames: frames.into() }
    }

    pub fn push(&mut self, frame: LandmarkFrame) {
        self.frames.push_back(frame);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkProvider for FrameQueue {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_frames_and_skips_blank_lines() {
        let input = "\n{\"timestamp_ms\": 0, \"width\": 640, \"height\": 480, \"landmarks\": null}\n\n\
                     {\"timestamp_ms\": 33.3, \"width\": 640, \"height\": 480, \"landmarks\": [{\"x\": 0.5, \"y\": 0.5}]}\n";
        let mut provider = JsonLinesProvider::new(Cursor::new(input));

        let first = provider.next_frame().unwrap().unwrap();
        assert!(first.face().is_none());
        assert_eq!(first.width, 640);

        let second = provider.next_frame().unwrap().unwrap();
        assert_eq!(second.timestamp_ms, 33.3);
        assert_eq!(second.face().unwrap().len(), 1);
        assert_eq!(second.face().unwrap()[0].z, 0.0);

        assert!(provider.next_frame().unwrap().is_none());
        assert_eq!(provider.line_number(), 4);
    }

    #[test]
    fn test_missing_landmarks_field_is_no_face() {
        let input = "{\"timestamp_ms\": 5, \"width\": 10, \"height\": 10}";
        let mut provider = JsonLinesProvider::new(Cursor::new(input));
        let frame = provider.next_frame().unwrap().unwrap();
        assert!(frame.landmarks.is_none());
    }

    #[test]
    fn test_bad_landmarks_become_no_face() {
        let input = "{\"timestamp_ms\": 10, \"width\": 64, \"height\": 48, \"landmarks\": [{\"x\": 0.5}]}\n";
        let mut provider = JsonLinesProvider::new(Cursor::new(input));

        let frame = provider.next_frame().unwrap().unwrap();
        assert_eq!(frame.timestamp_ms, 10.0);
        assert_eq!((frame.width, frame.height), (64, 48));
        assert!(frame.landmarks.is_none());
        assert_eq!(provider.malformed_lines(), 1);
    }

    #[test]
    fn test_headerless_lines_skipped() {
        let input = "not json\n{\"landmarks\": []}\n{\"timestamp_ms\": 7, \"width\": 1, \"height\": 1}\n";
        let mut provider = JsonLinesProvider::new(Cursor::new(input));

        let frame = provider.next_frame().unwrap().unwrap();
        assert_eq!(frame.timestamp_ms, 7.0);
        assert_eq!(provider.malformed_lines(), 2);
        assert_eq!(provider.line_number(), 3);
        assert!(provider.next_frame().unwrap().is_none());
    }

    struct BrokenReader;

    impl std::io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk gone"))
        }
    }

    #[test]
    fn test_read_failure_is_an_error() {
        let mut provider = JsonLinesProvider::new(BufReader::new(BrokenReader));
        assert!(provider.next_frame().is_err());
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            JsonLinesProvider::open("/nonexistent/frames.jsonl"),
            Err(Error::ProviderError(_))
        ));
    }

    #[test]
    fn test_frame_queue_order() {
        let frame = |t: f64| LandmarkFrame {
            timestamp_ms: t,
            width: 1,
            height: 1,
            landmarks: None,
        };
        let mut queue = FrameQueue::new(vec![frame(1.0), frame(2.0)]);
        queue.push(frame(3.0));
        assert_eq!(queue.len(), 3);

        let mut seen = Vec::new();
        while let Some(next) = queue.next_frame().unwrap() {
            seen.push(next.timestamp_ms);
        }
        assert_eq!(seen, vec![1.0, 2.0, 3.0]);
        assert!(queue.is_empty());
    }
}

//! Audio sources the engine can tap.
//!
//! The host owns the stream. The engine takes it out of a [`SourceHandle`]
//! at `init`; a handle can be tapped exactly once, so two engines can never
//! pull from the same stream.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::EngineError;

/// A stereo sample stream pulled by the renderer.
pub trait SampleStream {
    /// Fill `left` and `right` (same length) with the next frames.
    ///
    /// Returns the number of frames written. Fewer than requested means
    /// the stream has ended.
    fn read(&mut self, left: &mut [f32], right: &mut [f32]) -> usize;
}

type BoxedStream = Box<dyn SampleStream + Send>;

/// Shareable handle to a not-yet-tapped stream.
#[derive(Clone)]
pub struct SourceHandle {
    stream: Arc<Mutex<Option<BoxedStream>>>,
}

impl SourceHandle {
    /// Wrap a stream.
    pub fn new(stream: impl SampleStream + Send + 'static) -> Self {
        Self {
            stream: Arc::new(Mutex::new(Some(Box::new(stream)))),
        }
    }

    /// Take the stream for processing.
    pub(crate) fn tap(&self) -> Result<BoxedStream, EngineError> {
        self.stream
            .lock()
            .take()
            .ok_or(EngineError::SourceAlreadyTapped)
    }

    /// Whether an engine has already taken the stream.
    pub fn is_tapped(&self) -> bool {
        self.stream.lock().is_none()
    }
}

impl std::fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceHandle")
            .field("tapped", &self.is_tapped())
            .finish()
    }
}

/// In-memory stereo stream.
#[derive(Debug, Clone, Default)]
pub struct BufferSource {
    left: Vec<f32>,
    right: Vec<f32>,
    position: usize,
}

impl BufferSource {
    /// Create a stream from two channels. The shorter channel is padded
    /// with silence.
    pub fn new(mut left: Vec<f32>, mut right: Vec<f32>) -> Self {
        let len = left.len().max(right.len());
        left.resize(len, 0.0);
        right.resize(len, 0.0);
        Self {
            left,
            right,
            position: 0,
        }
    }

    /// Create a stream that plays the same signal on both channels.
    pub fn mono(samples: Vec<f32>) -> Self {
        Self::new(samples.clone(), samples)
    }

    /// Create a stream from interleaved stereo frames.
    pub fn from_interleaved(samples: &[f32]) -> Self {
        let (left, right) = samples
            .chunks(2)
            .map(|frame| (frame[0], frame.get(1).copied().unwrap_or(frame[0])))
            .unzip();
        Self::new(left, right)
    }

    /// Total frames in the stream.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether the stream holds no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.left.len() - self.position
    }
}

impl SampleStream for BufferSource {
    fn read(&mut self, left: &mut [f32], right: &mut [f32]) -> usize {
        let frames = left.len().min(right.len()).min(self.remaining());
        let end = self.position + frames;
        left[..frames].copy_from_slice(&self.left[self.position..end]);
        right[..frames].copy_from_slice(&self.right[self.position..end]);
        self.position = end;
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_source_reads_then_ends() {
        let mut source = BufferSource::new(vec![1.0, 2.0, 3.0], vec![4.0, 5.0]);
        let mut left = [0.0; 2];
        let mut right = [0.0; 2];

        assert_eq!(source.read(&mut left, &mut right), 2);
        assert_eq!((left, right), ([1.0, 2.0], [4.0, 5.0]));

        assert_eq!(source.read(&mut left, &mut right), 1);
        assert_eq!((left[0], right[0]), (3.0, 0.0));

        assert_eq!(source.read(&mut left, &mut right), 0);
    }

    #[test]
    fn test_from_interleaved() {
        let source = BufferSource::from_interleaved(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(source.len(), 3);
        assert_eq!(source.left, vec![0.1, 0.3, 0.5]);
        assert_eq!(source.right, vec![0.2, 0.4, 0.5]);
    }

    #[test]
    fn test_handle_taps_once() {
        let handle = SourceHandle::new(BufferSource::mono(vec![0.0; 4]));
        let other = handle.clone();
        assert!(!other.is_tapped());
        assert!(handle.tap().is_ok());
        assert!(other.is_tapped());
        assert_eq!(other.tap().err(), Some(EngineError::SourceAlreadyTapped));
    }
}

//! Sources that can be analyzed: local paths, URLs and seekable byte streams.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A seekable stream fed to the library through the buffer protocol.
///
/// Streams are binary unless they say otherwise; the buffer protocol
/// rejects text streams before touching the library.
pub trait MediaStream: Read + Seek {
    fn is_binary(&self) -> bool {
        true
    }
}

impl MediaStream for File {}

impl<T: AsRef<[u8]>> MediaStream for Cursor<T> {}

impl<R: Read + Seek> MediaStream for BufReader<R> {}

impl<S: MediaStream + ?Sized> MediaStream for &mut S {
    fn is_binary(&self) -> bool {
        (**self).is_binary()
    }
}

impl<S: MediaStream + ?Sized> MediaStream for Box<S> {
    fn is_binary(&self) -> bool {
        (**self).is_binary()
    }
}

/// A stream that was opened for text, e.g. a report file read as UTF-8.
///
/// Reads and seeks pass through, but the buffer protocol refuses it.
#[derive(Debug)]
pub struct TextStream<R> {
    inner: R,
}

impl<R: Read + Seek> TextStream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for TextStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek> Seek for TextStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl<R: Read + Seek> MediaStream for TextStream<R> {
    fn is_binary(&self) -> bool {
        false
    }
}

/// What to analyze.
pub enum Source<'a> {
    /// A local file, opened by the library itself.
    Path(PathBuf),
    /// A URL, opened by the library itself (requires a libcurl-enabled build).
    Url(String),
    /// An already open stream, fed chunk by chunk.
    Stream(&'a mut dyn MediaStream),
}

impl<'a> Source<'a> {
    /// Classifies a location string: URL when it contains `://`, path otherwise.
    pub fn location(location: &str) -> Self {
        if looks_like_url(location) {
            Source::Url(location.to_string())
        } else {
            Source::Path(PathBuf::from(location))
        }
    }

    pub fn stream(stream: &'a mut dyn MediaStream) -> Self {
        Source::Stream(stream)
    }

    /// Text passed to `MediaInfo_Open`, if this source is opened by location.
    pub fn location_text(&self) -> Option<String> {
        match self {
            Source::Path(path) => Some(path.to_string_lossy().into_owned()),
            Source::Url(url) => Some(url.clone()),
            Source::Stream(_) => None,
        }
    }

    /// Short description for log messages.
    pub fn describe(&self) -> String {
        self.location_text().unwrap_or_else(|| "<stream>".to_string())
    }
}

impl std::fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Source::Stream(stream) => f
                .debug_struct("Stream")
                .field("binary", &stream.is_binary())
                .finish(),
        }
    }
}

impl From<PathBuf> for Source<'_> {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source<'_> {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<&str> for Source<'_> {
    fn from(location: &str) -> Self {
        Source::location(location)
    }
}

impl<'a> From<&'a mut dyn MediaStream> for Source<'a> {
    fn from(stream: &'a mut dyn MediaStream) -> Self {
        Source::Stream(stream)
    }
}

/// True when `location` has a scheme separator.
pub fn looks_like_url(location: &str) -> bool {
    location.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_classification() {
        assert!(matches!(Source::location("http://127.0.0.1/sample.mkv"), Source::Url(_)));
        assert!(matches!(Source::location("unsupportedscheme://"), Source::Url(_)));
        assert!(matches!(Source::location("/data/sample.mkv"), Source::Path(_)));
        assert!(matches!(Source::location("C:\\media\\a.mp4"), Source::Path(_)));
    }

    #[test]
    fn test_stream_binary_markers() {
        let mut binary = Cursor::new(vec![0u8; 4]);
        assert!(MediaStream::is_binary(&binary));
        let by_ref: &mut dyn MediaStream = &mut binary;
        assert!(by_ref.is_binary());

        let text = TextStream::new(Cursor::new(b"<File/>".to_vec()));
        assert!(!text.is_binary());
    }

    #[test]
    fn test_describe() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert_eq!(Source::stream(&mut cursor).describe(), "<stream>");
        assert_eq!(Source::from("/a/b.mkv").describe(), "/a/b.mkv");
    }
}

//! The buffer protocol: feeding a seekable stream to a handle chunk by chunk.

use std::io::{Read, SeekFrom};

use crate::error::CoreResult;
use crate::external::{NO_SEEK, STATUS_FINISHED, Session};

use super::source::MediaStream;

/// Why the feed loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEnd {
    /// The library set the finished bit.
    Finished,
    /// The stream had no more bytes.
    Exhausted,
}

/// Counters for one run of [`feed_stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSummary {
    pub total_size: u64,
    pub bytes_fed: u64,
    pub chunks: usize,
    pub seeks: usize,
    pub end: FeedEnd,
}

/// Feeds `stream` to the session until the library is done or the stream
/// is exhausted, honoring seek requests in between.
///
/// The stream's size is measured by seeking to its end, then the stream is
/// rewound and fed from offset 0 whatever its position on entry. Finalize
/// is always called once the loop ends.
pub fn feed_stream(
    session: &Session,
    stream: &mut dyn MediaStream,
    chunk_size: usize,
) -> CoreResult<FeedSummary> {
    let total_size = stream.seek(SeekFrom::End(0))?;
    stream.seek(SeekFrom::Start(0))?;

    log::debug!("Feeding stream of {} bytes", total_size);
    session.open_buffer_init(total_size, 0);

    let mut buffer = vec![0u8; chunk_size];
    let mut summary = FeedSummary {
        total_size,
        bytes_fed: 0,
        chunks: 0,
        seeks: 0,
        end: FeedEnd::Exhausted,
    };

    loop {
        let read = read_chunk(stream, &mut buffer)?;
        if read == 0 {
            summary.end = FeedEnd::Exhausted;
            break;
        }

        let status = session.open_buffer_continue(&buffer[..read]);
        summary.chunks += 1;
        summary.bytes_fed += read as u64;
        if status & STATUS_FINISHED != 0 {
            summary.end = FeedEnd::Finished;
            break;
        }

        let target = session.open_buffer_continue_goto_get();
        if target != NO_SEEK {
            log::trace!("Library requested seek to {}", target);
            stream.seek(SeekFrom::Start(target))?;
            session.open_buffer_init(total_size, target);
            summary.seeks += 1;
        }
    }

    session.open_buffer_finalize();
    log::debug!(
        "Stream feed ended ({:?}) after {} chunks, {} bytes, {} seeks",
        summary.end,
        summary.chunks,
        summary.bytes_fed,
        summary.seeks
    );
    Ok(summary)
}

/// Reads until `buffer` is full or the stream ends.
fn read_chunk(stream: &mut dyn MediaStream, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match stream.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

//! Streaming Export.
//!
//! # Responsibility
//! - Negotiate stream types for a resource.
//! - Stream one note as `title\n\nbody\n` UTF-8 text through a pipe.
//!
//! # Invariants
//! - The caller gets the readable end before any byte is written.
//! - The writer thread owns the writable end; dropping it is the only way the
//!   pipe closes, so every exit path closes it.
//! - Writer IO failures are logged and end that stream only.

use super::NoteStore;
use crate::contract::{columns, MIME_TEXT_PLAIN};
use crate::error::{StoreError, StoreResult};
use crate::uri::UriMatch;
use crate::values::Selection;
use crossbeam::channel::{bounded, Receiver, Sender};
use log::{info, warn};
use std::io::{self, BufWriter, Read, Write};
use std::thread::{self, JoinHandle};

const NOTE_STREAM_TYPES: [&str; 1] = [MIME_TEXT_PLAIN];
const READ_NOTE_PROJECTION: [&str; 3] = [columns::ID, columns::NOTE, columns::TITLE];
const EXPORT_CHUNK_BYTES: usize = 8 * 1024;

/// Writable end of an export pipe.
pub struct PipeWriter {
    sender: Sender<Vec<u8>>,
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.sender
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "export reader closed"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Readable end of an export pipe. Reads return 0 once the writer is gone
/// and every chunk has been consumed.
pub struct PipeReader {
    receiver: Receiver<Vec<u8>>,
    chunk: Vec<u8>,
    offset: usize,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.offset >= self.chunk.len() {
            match self.receiver.recv() {
                Ok(chunk) => {
                    self.chunk = chunk;
                    self.offset = 0;
                }
                Err(_) => return Ok(0),
            }
        }
        let available = &self.chunk[self.offset..];
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.offset += count;
        Ok(count)
    }
}

/// Bounded byte pipe holding at most `capacity` in-flight chunks.
pub fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let (sender, receiver) = bounded(capacity.max(1));
    (
        PipeWriter { sender },
        PipeReader {
            receiver,
            chunk: Vec::new(),
            offset: 0,
        },
    )
}

/// A note being streamed by a background writer.
pub struct NoteStream {
    mime_type: String,
    reader: PipeReader,
    writer: Option<JoinHandle<io::Result<()>>>,
}

impl std::fmt::Debug for NoteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStream")
            .field("mime_type", &self.mime_type)
            .field("writer_running", &self.writer.is_some())
            .finish_non_exhaustive()
    }
}

impl NoteStream {
    /// The negotiated stream type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Reads the remaining stream into a string.
    pub fn read_to_string_lossy(&mut self) -> io::Result<String> {
        let mut bytes = Vec::new();
        self.read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Waits for the writer and returns its outcome.
    ///
    /// Drop the stream instead of joining if you stopped reading early; the
    /// writer then fails on its next write and exits on its own.
    pub fn join_writer(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("export writer panicked"))),
            None => Ok(()),
        }
    }
}

impl Read for NoteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl NoteStore {
    /// Stream types `uri` can be opened as, filtered by `mime_filter`.
    ///
    /// Collections and the live folder view have none; a single note offers
    /// `text/plain`. Returns `None` when nothing matches.
    pub fn get_stream_types(
        &self,
        uri: &str,
        mime_filter: &str,
    ) -> StoreResult<Option<Vec<String>>> {
        let (_, matched) = self.router.route(uri)?;
        Ok(match matched {
            UriMatch::Notes | UriMatch::LiveFolderNotes => None,
            UriMatch::NoteId(_) => {
                let types: Vec<String> = NOTE_STREAM_TYPES
                    .iter()
                    .filter(|mime| mime_matches(mime, mime_filter))
                    .map(|mime| (*mime).to_string())
                    .collect();
                Some(types).filter(|types| !types.is_empty())
            }
        })
    }

    /// Opens a single note as a text stream.
    ///
    /// Returns as soon as the note is read; a background thread writes
    /// `title`, a blank line and the body, each newline-terminated.
    ///
    /// # Errors
    /// - `UnsupportedStreamType` when `mime_filter` matches no stream type.
    /// - `NotFound` when the note does not exist.
    /// - `ExportUnavailable` when the writer thread cannot be started.
    pub fn open_typed_stream(&self, uri: &str, mime_filter: &str) -> StoreResult<NoteStream> {
        let mime_type = self
            .get_stream_types(uri, mime_filter)?
            .and_then(|types| types.into_iter().next())
            .ok_or_else(|| StoreError::UnsupportedStreamType {
                mime_filter: mime_filter.to_string(),
                resource: uri.to_string(),
            })?;

        let rows = self.query(
            uri,
            Some(&READ_NOTE_PROJECTION[..]),
            &Selection::all(),
            None,
        )?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(uri.to_string()));
        }
        let title = rows.get_str(0, columns::TITLE).unwrap_or_default().to_string();
        let body = rows.get_str(0, columns::NOTE).unwrap_or_default().to_string();

        let (writer, reader) = pipe(self.config.export_chunk_capacity);
        let resource = uri.to_string();
        let handle = thread::Builder::new()
            .name("note-export".to_string())
            .spawn(move || write_note(writer, &resource, &title, &body))
            .map_err(|source| StoreError::ExportUnavailable {
                resource: uri.to_string(),
                source,
            })?;

        Ok(NoteStream {
            mime_type,
            reader,
            writer: Some(handle),
        })
    }
}

fn write_note(writer: PipeWriter, resource: &str, title: &str, body: &str) -> io::Result<()> {
    let mut out = BufWriter::with_capacity(EXPORT_CHUNK_BYTES, writer);
    let result = write_payload(&mut out, title, body);

    match &result {
        Ok(()) => info!("event=note_export module=store status=ok uri={resource}"),
        Err(err) => warn!(
            "event=note_export module=store status=error uri={resource} error_code=pipe_write_failed error={err}"
        ),
    }
    result
}

fn write_payload(out: &mut impl Write, title: &str, body: &str) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out)?;
    writeln!(out, "{body}")?;
    out.flush()
}

/// Matches a concrete MIME type against a filter such as `*/*` or `text/*`.
pub(crate) fn mime_matches(concrete: &str, filter: &str) -> bool {
    let filter = filter.trim();
    if filter == "*" {
        return true;
    }
    let (Some((kind, sub)), Some((filter_kind, filter_sub))) =
        (concrete.split_once('/'), filter.split_once('/'))
    else {
        return false;
    };
    let part = |filter: &str, value: &str| filter == "*" || filter.eq_ignore_ascii_case(value);
    part(filter_kind, kind) && part(filter_sub, sub)
}

#[cfg(test)]
mod tests {
    use super::{mime_matches, pipe};
    use std::io::{Read, Write};

    #[test]
    fn mime_filter_wildcards() {
        assert!(mime_matches("text/plain", "text/plain"));
        assert!(mime_matches("text/plain", "TEXT/*"));
        assert!(mime_matches("text/plain", "*/*"));
        assert!(mime_matches("text/plain", "*"));
        assert!(!mime_matches("text/plain", "image/*"));
        assert!(!mime_matches("text/plain", "text/html"));
        assert!(!mime_matches("text/plain", "text"));
    }

    #[test]
    fn pipe_reader_sees_eof_after_writer_drop() {
        let (mut writer, mut reader) = pipe(4);
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"def").unwrap();
        drop(writer);

        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "abcdef");
    }

    #[test]
    fn writer_fails_with_broken_pipe_once_reader_is_gone() {
        let (mut writer, reader) = pipe(1);
        drop(reader);
        let err = writer.write_all(b"x").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }
}

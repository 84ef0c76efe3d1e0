use crate::shell::channel::{NonBlockingChannel, ReadOutcome};

/// Destination for decoded shell output.
pub trait OutputSink {
    /// Append `text` at the end of the sink.
    fn append(&mut self, text: &str);
}

/// What one readiness notification produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    /// Bytes were read and their decoded text appended.
    Appended(usize),
    /// Nothing to read right now.
    Idle,
    /// The shell closed its output on this call.
    EndOfStream,
    /// End-of-stream was already seen; nothing more will be produced.
    Finished,
}

/// Drains shell output into an [`OutputSink`], one chunk per notification.
pub struct OutputPump {
    chunk: Vec<u8>,
    decoder: Utf8Decoder,
    finished: bool,
    total_bytes: u64,
}

impl OutputPump {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk: vec![0u8; chunk_size.max(1)],
            decoder: Utf8Decoder::default(),
            finished: false,
            total_bytes: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes read from the shell so far.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Handle one readiness notification: read at most one chunk and append it.
    ///
    /// A read error ends the pump the same way end-of-stream does.
    pub fn on_ready<S: OutputSink + ?Sized>(
        &mut self,
        channel: &mut NonBlockingChannel,
        sink: &mut S,
    ) -> PumpStatus {
        if self.finished {
            return PumpStatus::Finished;
        }

        match channel.read(&mut self.chunk) {
            Ok(ReadOutcome::Data(n)) => {
                self.total_bytes += n as u64;
                let text = self.decoder.decode(&self.chunk[..n]);
                if !text.is_empty() {
                    sink.append(&text);
                }
                PumpStatus::Appended(n)
            }
            Ok(ReadOutcome::Empty) => PumpStatus::Idle,
            Ok(ReadOutcome::Eof) => {
                self.finish(sink);
                tracing::debug!(total_bytes = self.total_bytes, "Shell output reached end-of-stream");
                PumpStatus::EndOfStream
            }
            Err(err) => {
                self.finish(sink);
                tracing::warn!(error = %err, "Stopping output pump");
                PumpStatus::EndOfStream
            }
        }
    }

    fn finish<S: OutputSink + ?Sized>(&mut self, sink: &mut S) {
        self.finished = true;
        let tail = self.decoder.flush();
        if !tail.is_empty() {
            sink.append(&tail);
        }
    }
}

/// Streaming UTF-8 decoder.
///
/// A multi-byte sequence split across two chunks is held back until the
/// rest arrives; bytes that can never form valid UTF-8 become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            tracing::debug!(bytes = ?&after[..len], "Replacing malformed shell output");
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Emit whatever is still held back, as U+FFFD if anything.
    pub fn flush(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }
}

impl OutputSink for String {
    fn append(&mut self, text: &str) {
        self.push_str(text);
    }
}

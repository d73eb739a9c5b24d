//! Minimal server-sent-events framing for chat completion streams.
//!
//! Network chunks do not respect line boundaries (or UTF-8 boundaries), so
//! bytes are buffered until a full `\n`-terminated line is available.

/// One interpreted SSE line
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SseLine<'a> {
    /// `data: {...}` payload
    Data(&'a str),
    /// `data: [DONE]` terminator
    Done,
    /// Blank lines, comments, `event:`/`id:` fields
    Ignored,
}

#[derive(Debug, Default)]
pub(crate) struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    /// Append a network chunk and drain every complete line
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            lines.push(line.trim_end_matches('\r').to_string());
        }
        lines
    }

    /// Whatever is left once the stream ends without a trailing newline
    pub(crate) fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = String::from_utf8_lossy(&self.pending).trim_end().to_string();
        self.pending.clear();
        Some(rest)
    }
}

pub(crate) fn parse_line(line: &str) -> SseLine<'_> {
    let Some(payload) = line.strip_prefix("data:") else {
        return SseLine::Ignored;
    };
    let payload = payload.trim();
    if payload == "[DONE]" {
        SseLine::Done
    } else if payload.is_empty() {
        SseLine::Ignored
    } else {
        SseLine::Data(payload)
    }
}

/// Sentinel the OpenAI-compatible API sends as the final `data:` payload.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Accumulates raw response bytes and yields complete SSE event blocks.
///
/// Bytes are only decoded once a whole block has arrived, so a multi-byte
/// character split across network chunks survives intact.
#[derive(Debug, Default)]
pub struct SseBuffer {
    buffer: Vec<u8>,
}

impl SseBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    pub fn next_event_block(&mut self) -> Option<String> {
        let (boundary, separator_len) = find_boundary(&self.buffer)?;
        let remaining = self.buffer.split_off(boundary + separator_len);
        let block = std::mem::replace(&mut self.buffer, remaining);
        let text = String::from_utf8_lossy(&block);
        Some(if text.contains('\r') {
            text.replace("\r\n", "\n")
        } else {
            text.into_owned()
        })
    }
}

/// Earliest blank-line separator (`\n\n` or `\r\n\r\n`) and its length.
fn find_boundary(bytes: &[u8]) -> Option<(usize, usize)> {
    let lf = bytes.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// One `data:` payload from an event block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseData<'a> {
    Payload(&'a str),
    Done,
}

pub fn parse_data_lines(event_block: &str) -> Vec<SseData<'_>> {
    event_block
        .lines()
        .filter_map(|line| {
            line.strip_prefix("data: ")
                .or_else(|| line.strip_prefix("data:"))
        })
        .map(str::trim)
        .filter(|data| !data.is_empty())
        .map(|data| {
            if data == DONE_SENTINEL {
                SseData::Done
            } else {
                SseData::Payload(data)
            }
        })
        .collect()
}

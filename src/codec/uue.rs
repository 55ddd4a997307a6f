//! Uuencoded block isolation and decoding.
//!
//! A block starts with `begin <mode> <name>`, carries data lines whose first
//! character encodes the number of bytes on the line, and ends with a line
//! reading `end`. A `begin` without a matching `end` is left as text.

use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

static BEGIN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^begin [0-7]{3,4} (\S.*?)\s*$").unwrap());

/// A decoded file together with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UueFile {
    /// Name from the `begin` line
    pub name: String,
    /// Decoded bytes
    pub data: Vec<u8>,
    /// The block from `begin` through `end`, without surrounding newlines
    pub source: String,
}

/// A piece of text split around UUE blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UueChunk {
    Text(String),
    File(UueFile),
}

/// Split text into plain chunks and decoded UUE blocks, in order.
///
/// Text chunks keep the newlines that separated them from a block.
pub fn split(text: &str) -> Vec<UueChunk> {
    let spans = line_spans(text);
    let lines: Vec<&str> = spans.iter().map(|&(s, e)| &text[s..e]).collect();

    let mut chunks = Vec::new();
    let mut text_start = 0;
    for block in block_ranges(lines.as_slice()) {
        let (begin, end) = (*block.start(), *block.end());
        let (start, block_end) = (spans[begin].0, spans[end].1);
        let Some(caps) = BEGIN_LINE.captures(lines[begin]) else {
            continue;
        };
        let data = decode_lines(lines[begin + 1..end].iter().copied());
        if start > text_start {
            chunks.push(UueChunk::Text(text[text_start..start].to_string()));
        }
        log::trace!("UUE block {:?}: {} bytes", &caps[1], data.len());
        chunks.push(UueChunk::File(UueFile {
            name: caps[1].to_string(),
            data,
            source: text[start..block_end].to_string(),
        }));
        text_start = block_end;
    }

    if text_start < text.len() {
        chunks.push(UueChunk::Text(text[text_start..].to_string()));
    }
    chunks
}

/// Line ranges of complete blocks, `begin` through `end` inclusive.
pub fn block_ranges<S: AsRef<str>>(lines: &[S]) -> Vec<RangeInclusive<usize>> {
    // Index of the nearest `end` line at or after each line.
    let mut next_end = vec![None; lines.len()];
    let mut upcoming = None;
    for (idx, line) in lines.iter().enumerate().rev() {
        if is_end_line(line.as_ref()) {
            upcoming = Some(idx);
        }
        next_end[idx] = upcoming;
    }

    let mut ranges = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let Some(caps) = BEGIN_LINE.captures(lines[idx].as_ref()) else {
            idx += 1;
            continue;
        };
        match next_end.get(idx + 1).copied().flatten() {
            Some(end_idx) => {
                ranges.push(idx..=end_idx);
                idx = end_idx + 1;
            }
            None => {
                log::debug!("UUE block {:?} has no end line", &caps[1]);
                idx += 1;
            }
        }
    }
    ranges
}

/// Decode data lines of a block.
pub fn decode_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<u8> {
    let mut data = Vec::new();
    for line in lines {
        match decode_line(line) {
            Some(bytes) if bytes.is_empty() => break,
            Some(bytes) => data.extend(bytes),
            None => log::warn!("Skipping undecodable UUE line {:?}", line),
        }
    }
    data
}

/// Decode a single data line; `None` if it holds characters outside the
/// uuencode alphabet.
fn decode_line(line: &str) -> Option<Vec<u8>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut values = Vec::with_capacity(line.len());
    for c in line.chars() {
        values.push(sixbit(c)?);
    }
    let Some((&count, body)) = values.split_first() else {
        return Some(Vec::new());
    };

    let count = count as usize;
    let mut bytes = Vec::with_capacity(count + 2);
    for group in body.chunks(4) {
        let get = |i: usize| group.get(i).copied().unwrap_or(0);
        bytes.push((get(0) << 2) | (get(1) >> 4));
        bytes.push((get(1) << 4) | (get(2) >> 2));
        bytes.push((get(2) << 6) | get(3));
    }
    bytes.truncate(count);
    Some(bytes)
}

fn sixbit(c: char) -> Option<u8> {
    match c {
        // A leading space may have been protected as NBSP.
        '\u{00A0}' => Some(0),
        ' '..='`' => Some((c as u8 - b' ') & 0x3F),
        _ => None,
    }
}

fn is_end_line(line: &str) -> bool {
    line.trim_end() == "end"
}

/// Byte spans of lines, newline excluded.
fn line_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for line in text.split('\n') {
        spans.push((start, start + line.len()));
        start += line.len() + 1;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_cat() {
        let chunks = split("begin 644 cat.txt\n#0V%T\n`\nend");
        assert_eq!(
            chunks,
            vec![UueChunk::File(UueFile {
                name: "cat.txt".to_string(),
                data: b"Cat".to_vec(),
                source: "begin 644 cat.txt\n#0V%T\n`\nend".to_string(),
            })]
        );
    }

    #[test]
    fn test_split_keeps_surrounding_text() {
        let chunks = split("Hello\nbegin 644 cat.txt\n#0V%T\n`\nend\nBye");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], UueChunk::Text("Hello\n".to_string()));
        assert!(matches!(&chunks[1], UueChunk::File(f) if f.data == b"Cat"));
        assert_eq!(chunks[2], UueChunk::Text("\nBye".to_string()));
    }

    #[test]
    fn test_unterminated_block_stays_text() {
        let text = "begin 644 cat.txt\n#0V%T\n`\n";
        assert_eq!(split(text), vec![UueChunk::Text(text.to_string())]);
    }

    #[test]
    fn test_nbsp_reads_as_space() {
        // A line of one byte whose encoding starts with the space character.
        assert_eq!(decode_line("! 0``"), decode_line("!\u{00A0}0``"));
    }

    #[test]
    fn test_name_with_spaces() {
        let chunks = split("begin 0644 my cat.txt  \n#0V%T\nend");
        assert!(matches!(&chunks[0], UueChunk::File(f) if f.name == "my cat.txt"));
    }

    #[test]
    fn test_block_ranges() {
        let lines = ["hi", "begin 644 a", "#0V%T", "end", "begin 644 b", "x"];
        assert_eq!(block_ranges(&lines[..]), vec![1..=3]);
    }

    #[test]
    fn test_no_blocks() {
        assert_eq!(split("plain"), vec![UueChunk::Text("plain".to_string())]);
        assert!(split("").is_empty());
    }
}

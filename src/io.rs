use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use memmap2::Mmap;

/// Threshold in bytes above which dumps are memory-mapped instead of read
/// through a buffered reader.
pub const DEFAULT_MMAP_THRESHOLD_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

pub type LineIter = Box<dyn Iterator<Item = io::Result<String>> + Send + 'static>;

/// Decide whether to use mmap based on file size and threshold.
pub fn should_use_mmap(file_size_bytes: u64, threshold_bytes: u64) -> bool {
    file_size_bytes >= threshold_bytes
}

/// Iterate lines from a file path using a buffered reader. Lines are split on
/// raw bytes so a single bad byte never costs the whole line. `\n`, `\r\n`
/// and a lone `\r` all end a line.
pub fn iter_lines_bufread<P: AsRef<Path>>(path: P) -> Result<LineIter> {
    let file = File::open(&path).with_context(|| format!("open {}", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let lines = reader
        .split(b'\n')
        .flat_map(|chunk| -> Vec<io::Result<String>> {
            match chunk {
                Ok(bytes) => split_carriage_returns(&bytes)
                    .map(|line| Ok(line_from_bytes(line)))
                    .collect(),
                Err(e) => vec![Err(e)],
            }
        });
    Ok(Box::new(lines))
}

/// Split a `\n`-free chunk on lone carriage returns. A trailing `\r` belongs to
/// a `\r\n` pair and ends nothing.
fn split_carriage_returns(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .strip_suffix(b"\r")
        .unwrap_or(bytes)
        .split(|&b| b == b'\r')
}

/// Split in-memory text with the same line endings as the file readers.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|line| line.split('\r'))
}

/// Iterate lines from a file path using mmap, scanning for '\n' and '\r'
/// boundaries.
pub fn iter_lines_mmap<P: AsRef<Path>>(path: P) -> Result<LineIter> {
    let file = File::open(&path).with_context(|| format!("open {}", path.as_ref().display()))?;
    let mmap =
        unsafe { Mmap::map(&file) }.with_context(|| format!("mmap {}", path.as_ref().display()))?;
    let iter = MmapLines { mmap, pos: 0 };
    Ok(Box::new(iter))
}

struct MmapLines {
    mmap: Mmap,
    pos: usize,
}

impl Iterator for MmapLines {
    type Item = io::Result<String>;
    fn next(&mut self) -> Option<Self::Item> {
        let data: &[u8] = &self.mmap;
        if self.pos >= data.len() {
            return None;
        }
        let start = self.pos;
        if let Some(off) = memchr::memchr2(b'\n', b'\r', &data[start..]) {
            let end = start + off;
            self.pos = end + 1;
            if data[end] == b'\r' && data.get(end + 1) == Some(&b'\n') {
                self.pos += 1;
            }
            Some(Ok(line_from_bytes(&data[start..end])))
        } else {
            // Last line without trailing newline
            self.pos = data.len();
            Some(Ok(line_from_bytes(&data[start..])))
        }
    }
}

/// Decode a raw line, dropping invalid UTF-8 sequences and a trailing '\r'.
pub fn line_from_bytes(bytes: &[u8]) -> String {
    let slice = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    match std::str::from_utf8(slice) {
        Ok(s) => s.to_string(),
        Err(_) => slice.utf8_chunks().map(|chunk| chunk.valid()).collect(),
    }
}

/// Choose mmap or bufread and return an iterator over lines.
pub fn iter_lines_auto<P: AsRef<Path>>(path: P, threshold_bytes: u64) -> Result<LineIter> {
    let meta =
        std::fs::metadata(&path).with_context(|| format!("stat {}", path.as_ref().display()))?;
    if meta.is_file() && should_use_mmap(meta.len(), threshold_bytes) {
        iter_lines_mmap(path)
    } else {
        iter_lines_bufread(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn drops_invalid_bytes_and_crlf() {
        assert_eq!(line_from_bytes(b"pass\xffword\r"), "password");
        assert_eq!(line_from_bytes(b"plain"), "plain");
    }

    #[test]
    fn mmap_and_bufread_agree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        {
            let mut f = File::create(&path).unwrap();
            f.write_all(b"a:b:one\r\nc:d:tw\xfeo\nx:y:mac\ry:z:os\r\r\nlast\r").unwrap();
        }
        let buffered: Vec<String> = iter_lines_auto(&path, u64::MAX)
            .unwrap()
            .map(|l| l.unwrap())
            .collect();
        let mapped: Vec<String> = iter_lines_auto(&path, 1)
            .unwrap()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(
            buffered,
            vec!["a:b:one", "c:d:two", "x:y:mac", "y:z:os", "", "last"]
        );
        assert_eq!(buffered, mapped);
    }

    #[test]
    fn in_memory_split_honors_lone_carriage_returns() {
        let lines: Vec<&str> = split_lines("one\r\ntwo\rthree\nfour").collect();
        assert_eq!(lines, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(iter_lines_auto(dir.path().join("nope.txt"), 0).is_err());
    }
}

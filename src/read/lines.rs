use std::io::BufRead;

use crate::error::Result;

/// Line source with one line of push-back.
///
/// Bytes that are not valid UTF-8 decode to U+FFFD instead of failing the
/// read. `line_no` is the 1-based number of the last line handed out.
pub struct LineCursor<R> {
    reader: R,
    buf: Vec<u8>,
    pending: Option<String>,
    line_no: usize,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![],
            pending: None,
            line_no: 0,
        }
    }

    pub fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            self.line_no += 1;
            return Ok(Some(line));
        }
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let mut end = self.buf.len();
        if self.buf[..end].ends_with(b"\n") {
            end -= 1;
            if self.buf[..end].ends_with(b"\r") {
                end -= 1;
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf[..end]).into_owned()))
    }

    /// Returns `line` to the cursor so the next call to `next_line` yields it again.
    pub fn unread(&mut self, line: String) {
        debug_assert!(self.pending.is_none(), "only one line of push-back");
        self.pending = Some(line);
        self.line_no -= 1;
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unread_replays_line() {
        let mut cursor = LineCursor::new("a\nb\nc".as_bytes());
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("a"));
        let b = cursor.next_line().unwrap().unwrap();
        assert_eq!(cursor.line_no(), 2);
        cursor.unread(b);
        assert_eq!(cursor.line_no(), 1);
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(cursor.line_no(), 2);
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("c"));
        assert_eq!(cursor.next_line().unwrap(), None);
        assert_eq!(cursor.line_no(), 3);
    }

    #[test]
    fn crlf() {
        let mut cursor = LineCursor::new("HIERARCHY\r\nROOT Hips\r\n".as_bytes());
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("HIERARCHY"));
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("ROOT Hips"));
        assert_eq!(cursor.next_line().unwrap(), None);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut cursor = LineCursor::new(&b"# caf\xe9\n1.0 \xff 3.0"[..]);
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("# caf\u{fffd}"));
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("1.0 \u{fffd} 3.0"));
        assert_eq!(cursor.line_no(), 2);
        assert_eq!(cursor.next_line().unwrap(), None);
    }
}

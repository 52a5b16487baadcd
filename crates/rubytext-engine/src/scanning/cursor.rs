/// A byte cursor for delimiter scanning with absolute position tracking.
///
/// Operates over one line while tracking the absolute byte position in the
/// containing document (via `base` offset). Delimiters (backticks, tag
/// brackets) are all ASCII, so byte-wise scanning is safe; multi-byte
/// characters are simply stepped over.
#[derive(Clone)]
pub struct Cursor<'a> {
    s: &'a str,
    base: usize,
    i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes()[self.i..].starts_with(pat)
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.s.as_bytes().get(self.i).copied()?;
        self.i += 1;
        Some(b)
    }

    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Consumes a run of the given byte, returning its length.
    pub fn take_run(&mut self, b: u8) -> usize {
        let start = self.i;
        while self.peek() == Some(b) {
            self.i += 1;
        }
        self.i - start
    }
}

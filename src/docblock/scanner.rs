//! Character scanner shared by the doc-comment sub-parsers.
//!
//! A plain cursor over the purified comment body with single-character
//! lookahead, save/restore via [`Scanner::pos`]/[`Scanner::set_pos`], and
//! the two line-oriented queries the tag grammar needs: the indentation of
//! the current line (for the code-block rule) and the number of lines
//! consumed so far (for diagnostic positions).

/// Cursor over the characters of one comment body.
#[derive(Debug)]
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Scanner {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    /// The character immediately before the cursor.
    pub fn prev(&self) -> Option<char> {
        if self.pos == 0 {
            None
        } else {
            self.chars.get(self.pos - 1).copied()
        }
    }

    /// Consume and return the next character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Consume the next character if it matches.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the given string if the input starts with it here.
    pub fn eat_str(&mut self, s: &str) -> bool {
        for (i, c) in s.chars().enumerate() {
            if self.peek_at(i) != Some(c) {
                return false;
            }
        }
        self.pos += s.chars().count();
        true
    }

    /// Consume characters while the predicate holds.
    pub fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if pred(c) {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }

    /// Skip spaces and tabs, stopping at newlines.
    pub fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.pos += 1;
        }
    }

    /// Consume and return the rest of the current line, leaving the
    /// cursor on the newline.
    pub fn rest_of_line(&mut self) -> String {
        self.take_while(|c| c != '\n')
    }

    /// Leading whitespace width of the line containing the cursor. Tabs
    /// count as one column.
    pub fn line_indent(&self) -> u32 {
        let mut start = self.pos;
        while start > 0 && self.chars[start - 1] != '\n' {
            start -= 1;
        }
        let mut indent = 0u32;
        let mut i = start;
        while i < self.chars.len() && matches!(self.chars[i], ' ' | '\t') {
            indent += 1;
            i += 1;
        }
        indent
    }

    /// Number of newlines already consumed, for diagnostic positions.
    pub fn lines_consumed(&self) -> u32 {
        self.chars[..self.pos].iter().filter(|c| **c == '\n').count() as u32
    }
}

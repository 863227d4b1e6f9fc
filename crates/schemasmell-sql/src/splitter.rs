//! Script splitting
//!
//! Breaks a script into statements the way the `mysql` client does: on the
//! current delimiter, outside quotes and comments, honoring `DELIMITER`
//! lines. Comments are dropped from the statement text.

/// Statement text and the 1-based line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    pub text: String,
    pub line: usize,
}

/// Split a script into statements
pub fn split_statements(script: &str) -> Vec<RawStatement> {
    Splitter::new(script).run()
}

struct Splitter {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    delimiter: Vec<char>,
    current: String,
    start_line: usize,
    statements: Vec<RawStatement>,
}

impl Splitter {
    fn new(script: &str) -> Self {
        Self {
            chars: script.chars().collect(),
            pos: 0,
            line: 1,
            delimiter: vec![';'],
            current: String::new(),
            start_line: 1,
            statements: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<RawStatement> {
        let mut at_line_start = true;

        while self.pos < self.chars.len() {
            if at_line_start && self.current.trim().is_empty() && self.delimiter_command() {
                continue;
            }
            at_line_start = false;

            let c = self.chars[self.pos];
            let next = self.chars.get(self.pos + 1).copied();

            match c {
                '\n' => {
                    self.push(c);
                    self.pos += 1;
                    self.line += 1;
                    at_line_start = true;
                }
                '\'' | '"' | '`' => self.quoted(c),
                '-' if next == Some('-')
                    && self
                        .chars
                        .get(self.pos + 2)
                        .map_or(true, |c| c.is_whitespace()) =>
                {
                    self.line_comment()
                }
                '#' => self.line_comment(),
                '/' if next == Some('*') => self.block_comment(),
                _ if self.at_delimiter() => {
                    self.pos += self.delimiter.len();
                    self.finish();
                }
                _ => {
                    self.push(c);
                    self.pos += 1;
                }
            }
        }

        self.finish();
        self.statements
    }

    /// `DELIMITER xx` on its own line; consumes the line (not its newline)
    fn delimiter_command(&mut self) -> bool {
        let end = self.chars[self.pos..]
            .iter()
            .position(|c| *c == '\n')
            .map_or(self.chars.len(), |offset| self.pos + offset);
        let line: String = self.chars[self.pos..end].iter().collect();

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some(command), Some(delimiter)) if command.eq_ignore_ascii_case("DELIMITER") => {
                self.delimiter = delimiter.chars().collect();
                self.current.clear();
                self.pos = end;
                true
            }
            _ => false,
        }
    }

    fn at_delimiter(&self) -> bool {
        self.chars[self.pos..].starts_with(&self.delimiter)
    }

    fn push(&mut self, c: char) {
        if self.current.trim().is_empty() && !c.is_whitespace() {
            self.current.clear();
            self.start_line = self.line;
        }
        self.current.push(c);
    }

    fn quoted(&mut self, quote: char) {
        self.push(quote);
        self.pos += 1;

        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            self.current.push(c);
            self.pos += 1;

            match c {
                '\n' => self.line += 1,
                '\\' if quote != '`' => {
                    if let Some(&escaped) = self.chars.get(self.pos) {
                        if escaped == '\n' {
                            self.line += 1;
                        }
                        self.current.push(escaped);
                        self.pos += 1;
                    }
                }
                _ if c == quote => {
                    // Doubled quote is an escaped quote
                    if self.chars.get(self.pos) == Some(&quote) {
                        self.current.push(quote);
                        self.pos += 1;
                    } else {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn line_comment(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos] != '\n' {
            self.pos += 1;
        }
    }

    fn block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.chars.len() {
            if self.chars[self.pos] == '*' && self.chars.get(self.pos + 1) == Some(&'/') {
                self.pos += 2;
                break;
            }
            if self.chars[self.pos] == '\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        if !self.current.is_empty() {
            self.current.push(' ');
        }
    }

    fn finish(&mut self) {
        let text = self.current.trim();
        if !text.is_empty() {
            self.statements.push(RawStatement {
                text: text.to_string(),
                line: self.start_line,
            });
        }
        self.current.clear();
    }
}

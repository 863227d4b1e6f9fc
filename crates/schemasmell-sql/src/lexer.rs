//! MySQL lexer for DDL and account statements
//!
//! Keywords are not tokenized separately: a `Word` is matched against
//! keywords case-insensitively by the parser, while a backtick-quoted
//! identifier never is.

use crate::parser::ParseError;

/// SQL token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unquoted identifier or keyword
    Word(String),

    /// `backtick` quoted identifier
    Quoted(String),

    /// 'single' or "double" quoted literal, unescaped
    Str(String),

    Num(String),

    /// `b'0101'`, `x'ff'` or `0xff`, kept verbatim
    Bits(String),

    LParen,
    RParen,
    Comma,
    Dot,
    Eq,
    At,
    Minus,
    Plus,
    Semicolon,
    Symbol(char),
}

impl Token {
    /// Unquoted word equal to `keyword`, ignoring case
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(word) if word.eq_ignore_ascii_case(keyword))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Quoted(ident) => write!(f, "`{}`", ident.replace('`', "``")),
            Token::Str(value) => write!(f, "'{}'", value.replace('\'', "''")),
            Token::Num(value) | Token::Bits(value) => f.write_str(value),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Dot => f.write_str("."),
            Token::Eq => f.write_str("="),
            Token::At => f.write_str("@"),
            Token::Minus => f.write_str("-"),
            Token::Plus => f.write_str("+"),
            Token::Semicolon => f.write_str(";"),
            Token::Symbol(c) => write!(f, "{}", c),
        }
    }
}

/// Tokenize one statement; `line` is used for error positions
pub fn tokenize(input: &str, line: usize) -> Result<Vec<Token>, ParseError> {
    Lexer::new(input, line).tokenize()
}

/// SQL lexer
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    pub fn new(input: &str, line: usize) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if self.current() == Some('\n') {
            self.line += 1;
        }
        self.pos += 1;
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Lex {
            line: self.line,
            message: message.into(),
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
                continue;
            }

            let token = match c {
                '-' if self.peek() == Some('-') => {
                    self.skip_line_comment();
                    continue;
                }
                '#' => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.peek() == Some('*') => {
                    self.skip_block_comment()?;
                    continue;
                }
                '\'' | '"' => Token::Str(self.read_quoted(c)?),
                '`' => Token::Quoted(self.read_quoted('`')?),
                'b' | 'B' | 'x' | 'X' if self.peek() == Some('\'') => self.read_bits()?,
                '0' if matches!(self.peek(), Some('x') | Some('X')) => self.read_hex(),
                c if c.is_ascii_digit() => Token::Num(self.read_number()),
                c if c.is_alphabetic() || c == '_' || c == '$' => Token::Word(self.read_word()),
                _ => {
                    self.advance();
                    match c {
                        '(' => Token::LParen,
                        ')' => Token::RParen,
                        ',' => Token::Comma,
                        '.' => Token::Dot,
                        '=' => Token::Eq,
                        '@' => Token::At,
                        '-' => Token::Minus,
                        '+' => Token::Plus,
                        ';' => Token::Semicolon,
                        other => Token::Symbol(other),
                    }
                }
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        self.advance();
        self.advance();
        while let Some(c) = self.current() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }
        Err(self.error("unterminated comment"))
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, ParseError> {
        let start_line = self.line;
        self.advance();
        let mut value = String::new();

        while let Some(c) = self.current() {
            self.advance();
            if c == quote {
                if self.current() == Some(quote) {
                    value.push(quote);
                    self.advance();
                    continue;
                }
                return Ok(value);
            }
            if c == '\\' && quote != '`' {
                match self.current() {
                    Some(escaped) => {
                        value.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            '0' => '\0',
                            other => other,
                        });
                        self.advance();
                    }
                    None => break,
                }
                continue;
            }
            value.push(c);
        }

        Err(ParseError::Lex {
            line: start_line,
            message: format!("unterminated {} quoted string", quote),
        })
    }

    fn read_bits(&mut self) -> Result<Token, ParseError> {
        let prefix = self.current().unwrap_or('b');
        let body = self.read_quoted_after_prefix()?;
        Ok(Token::Bits(format!("{}'{}'", prefix.to_ascii_lowercase(), body)))
    }

    fn read_quoted_after_prefix(&mut self) -> Result<String, ParseError> {
        self.advance();
        self.read_quoted('\'')
    }

    fn read_hex(&mut self) -> Token {
        let mut value = String::from("0x");
        self.advance();
        self.advance();
        while let Some(c) = self.current() {
            if !c.is_ascii_hexdigit() {
                break;
            }
            value.push(c);
            self.advance();
        }
        Token::Bits(value)
    }

    fn read_number(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.current() {
            let exponent_sign = matches!(c, '+' | '-')
                && value.ends_with(|e: char| e == 'e' || e == 'E');
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }
        value
    }

    fn read_word(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }
        value
    }
}

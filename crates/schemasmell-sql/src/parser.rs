//! MySQL DDL parser
//!
//! Recursive descent over the tokens of one statement. Only the statement
//! kinds the catalog builder consumes are parsed in detail; data statements
//! and routines are recognized by their leading keyword and skipped.

use crate::lexer::{tokenize, Token};
use crate::splitter::split_statements;
use crate::statement::{
    AlterAction, ColumnDef, CreateTable, CreateUser, DataTypeDef, DefaultValue, GeneratedDef,
    Grant, IgnoredKind, IndexDef, IndexKind, KeyPart, ObjectName, ParsedStatement, Statement,
    UserSpec,
};
use tracing::{debug, trace};

/// Parse error with the line the problem was found on
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Lex { line: usize, message: String },

    #[error("line {line}: expected {expected}, found `{found}`")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: unexpected end of statement, expected {expected}")]
    UnexpectedEof { line: usize, expected: String },

    #[error("line {line}: {message}")]
    Query { line: usize, message: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UnexpectedEof { line, .. }
            | ParseError::Query { line, .. } => *line,
        }
    }
}

/// Split and parse a whole script
///
/// Comment-only chunks produce no statement.
pub fn parse_script(script: &str) -> Result<Vec<ParsedStatement>, ParseError> {
    let mut parsed = Vec::new();

    for raw in split_statements(script) {
        if let Some(statement) = parse_statement_at(&raw.text, raw.line)? {
            parsed.push(ParsedStatement {
                statement,
                line: raw.line,
                text: raw.text,
            });
        } else {
            trace!(line = raw.line, "comment-only chunk skipped");
        }
    }

    debug!(statements = parsed.len(), "script parsed");
    Ok(parsed)
}

/// Parse a single statement (without its delimiter)
pub fn parse_statement(sql: &str) -> Result<Option<Statement>, ParseError> {
    parse_statement_at(sql, 1)
}

fn parse_statement_at(sql: &str, line: usize) -> Result<Option<Statement>, ParseError> {
    let tokens = tokenize(sql, line)?;
    if tokens.is_empty() {
        return Ok(None);
    }

    DdlParser::new(tokens, sql, line).parse().map(Some)
}

struct DdlParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
    text: &'a str,
}

impl<'a> DdlParser<'a> {
    fn new(tokens: Vec<Token>, text: &'a str, line: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            line,
            text,
        }
    }

    fn parse(&mut self) -> Result<Statement, ParseError> {
        let Some(Token::Word(first)) = self.peek().cloned() else {
            return Ok(self.unsupported());
        };

        let ignored = |kind: IgnoredKind| -> Result<Statement, ParseError> {
            Ok(Statement::Ignored { kind })
        };

        match first.to_ascii_uppercase().as_str() {
            "CREATE" => self.parse_create(),
            "DROP" => self.parse_drop(),
            "ALTER" => self.parse_alter(),
            "GRANT" => self.parse_grant(),
            "USE" => {
                self.pos += 1;
                let name = self.identifier()?;
                Ok(Statement::Use { name })
            }
            "SET" => ignored(IgnoredKind::Set),
            "DESCRIBE" | "DESC" => ignored(IgnoredKind::Describe),
            "INSERT" | "REPLACE" => ignored(IgnoredKind::Insert),
            "SELECT" => ignored(IgnoredKind::Select),
            "UPDATE" => ignored(IgnoredKind::Update),
            "DELETE" => ignored(IgnoredKind::Delete),
            "LOCK" => ignored(IgnoredKind::LockTables),
            "UNLOCK" => ignored(IgnoredKind::UnlockTables),
            "START" | "BEGIN" | "COMMIT" | "ROLLBACK" => ignored(IgnoredKind::Transaction),
            _ => Ok(self.unsupported()),
        }
    }

    fn unsupported(&self) -> Statement {
        Statement::Unsupported {
            text: self.text.trim().to_string(),
        }
    }

    // ---- CREATE ----

    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("CREATE")?;
        self.consume_keywords(&["OR", "REPLACE"]);

        loop {
            if self.consume_keyword("DEFINER") {
                self.consume(&Token::Eq);
                self.account_name()?;
                if self.consume(&Token::LParen) {
                    self.expect(&Token::RParen, ")")?;
                }
            } else if self.consume_keyword("ALGORITHM") {
                self.consume(&Token::Eq);
                self.next();
            } else if self.consume_keywords(&["SQL", "SECURITY"]) {
                self.next();
            } else {
                break;
            }
        }

        let temporary = self.consume_keyword("TEMPORARY");

        let Some(Token::Word(kind)) = self.peek().cloned() else {
            return Ok(self.unsupported());
        };

        match kind.to_ascii_uppercase().as_str() {
            "DATABASE" | "SCHEMA" => {
                self.pos += 1;
                let if_not_exists = self.if_not_exists();
                let name = self.identifier()?;
                Ok(Statement::CreateDatabase {
                    name,
                    if_not_exists,
                })
            }
            "TABLE" => self.parse_create_table(temporary),
            "VIEW" => {
                self.pos += 1;
                let name = self.object_name()?;
                Ok(Statement::CreateView { name })
            }
            "UNIQUE" | "FULLTEXT" | "SPATIAL" | "INDEX" => self.parse_create_index(),
            "USER" => self.parse_create_user(),
            "PROCEDURE" => Ok(Statement::Ignored {
                kind: IgnoredKind::CreateProcedure,
            }),
            "FUNCTION" => Ok(Statement::Ignored {
                kind: IgnoredKind::CreateFunction,
            }),
            "TRIGGER" => Ok(Statement::Ignored {
                kind: IgnoredKind::CreateTrigger,
            }),
            _ => Ok(self.unsupported()),
        }
    }

    fn parse_create_table(&mut self, temporary: bool) -> Result<Statement, ParseError> {
        self.expect_keyword("TABLE")?;
        let if_not_exists = self.if_not_exists();
        let name = self.object_name()?;

        // `LIKE other` and `AS SELECT` carry no column list
        if !self.consume(&Token::LParen) {
            return Ok(self.unsupported());
        }

        let mut table = CreateTable::new(name);
        table.if_not_exists = if_not_exists;
        table.temporary = temporary;

        loop {
            self.parse_table_element(&mut table)?;
            if self.consume(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "`,` or `)`")?;
            break;
        }

        self.parse_table_options(&mut table)?;

        Ok(Statement::CreateTable(table))
    }

    fn parse_table_element(&mut self, table: &mut CreateTable) -> Result<(), ParseError> {
        let start = self.pos;

        if self.consume_keyword("CONSTRAINT") {
            self.constraint_symbol()?;
        }

        if self.peek_keyword("FOREIGN") || self.peek_keyword("CHECK") {
            self.skip_clause();
            return Ok(());
        }

        if let Some(kind) = self.index_kind_ahead() {
            let index = self.parse_index_clause(kind, start)?;
            table.indexes.push(index);
            return Ok(());
        }

        if start != self.pos {
            return Err(self.unexpected("PRIMARY KEY, UNIQUE, FOREIGN KEY or CHECK"));
        }

        let column = self.parse_column_def()?;
        table.columns.push(column);
        Ok(())
    }

    /// Optional symbol after `CONSTRAINT`
    fn constraint_symbol(&mut self) -> Result<(), ParseError> {
        let keyword_follows = ["PRIMARY", "UNIQUE", "FOREIGN", "CHECK"]
            .iter()
            .any(|kw| self.peek_keyword(kw));
        if !keyword_follows {
            self.identifier()?;
        }
        Ok(())
    }

    fn index_kind_ahead(&self) -> Option<IndexKind> {
        let kind = match self.peek()? {
            Token::Word(word) => match word.to_ascii_uppercase().as_str() {
                "PRIMARY" => IndexKind::Primary,
                "UNIQUE" => IndexKind::Unique,
                "INDEX" | "KEY" => IndexKind::Index,
                "FULLTEXT" => IndexKind::Fulltext,
                "SPATIAL" => IndexKind::Spatial,
                _ => return None,
            },
            _ => return None,
        };
        Some(kind)
    }

    /// Index clause starting at its kind keyword; `start` marks the clause text
    fn parse_index_clause(&mut self, kind: IndexKind, start: usize) -> Result<IndexDef, ParseError> {
        match kind {
            IndexKind::Primary => {
                self.expect_keyword("PRIMARY")?;
                self.expect_keyword("KEY")?;
            }
            IndexKind::Index => {
                self.pos += 1;
            }
            IndexKind::Unique | IndexKind::Fulltext | IndexKind::Spatial => {
                self.pos += 1;
                if !self.consume_keyword("INDEX") {
                    self.consume_keyword("KEY");
                }
            }
        }

        let name = match self.peek() {
            Some(Token::Word(_)) if !self.peek_keyword("USING") => Some(self.identifier()?),
            Some(Token::Quoted(_)) => Some(self.identifier()?),
            _ => None,
        };

        let mut using = None;
        if self.consume_keyword("USING") {
            using = Some(self.identifier()?.to_ascii_uppercase());
        }

        let columns = self.key_parts()?;
        self.index_options(&mut using)?;

        Ok(IndexDef {
            kind,
            name,
            columns,
            using,
            text: self.text_between(start, self.pos),
        })
    }

    fn key_parts(&mut self) -> Result<Vec<KeyPart>, ParseError> {
        self.expect(&Token::LParen, "(")?;
        let mut parts = Vec::new();

        loop {
            if self.peek() == Some(&Token::LParen) {
                return Err(self.unexpected("column name (expression key parts are not supported)"));
            }

            let column = self.identifier()?;
            let prefix_length = if self.consume(&Token::LParen) {
                let length = self.number()?;
                self.expect(&Token::RParen, ")")?;
                Some(length)
            } else {
                None
            };

            if !self.consume_keyword("ASC") {
                self.consume_keyword("DESC");
            }

            parts.push(KeyPart {
                column,
                prefix_length,
            });

            if self.consume(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "`,` or `)`")?;
            return Ok(parts);
        }
    }

    fn index_options(&mut self, using: &mut Option<String>) -> Result<(), ParseError> {
        loop {
            if self.consume_keyword("USING") {
                *using = Some(self.identifier()?.to_ascii_uppercase());
            } else if self.consume_keyword("COMMENT") {
                self.string()?;
            } else if self.consume_keyword("KEY_BLOCK_SIZE")
                || self.consume_keyword("ENGINE_ATTRIBUTE")
                || self.consume_keyword("SECONDARY_ENGINE_ATTRIBUTE")
                || self.consume_keyword("ALGORITHM")
                || self.consume_keyword("LOCK")
            {
                self.consume(&Token::Eq);
                self.next();
            } else if self.consume_keywords(&["WITH", "PARSER"]) {
                self.identifier()?;
            } else if !(self.consume_keyword("VISIBLE") || self.consume_keyword("INVISIBLE")) {
                return Ok(());
            }
        }
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.identifier()?;
        let data_type = self.parse_data_type()?;

        let mut column = ColumnDef {
            name,
            data_type,
            ..ColumnDef::default()
        };

        while !matches!(self.peek(), None | Some(Token::Comma) | Some(Token::RParen)) {
            self.parse_column_attribute(&mut column)?;
        }

        Ok(column)
    }

    fn parse_data_type(&mut self) -> Result<DataTypeDef, ParseError> {
        let mut name = match self.peek() {
            Some(Token::Word(word)) => word.to_ascii_lowercase(),
            _ => return Err(self.unexpected("data type")),
        };
        self.pos += 1;

        // Multi-word type names
        loop {
            let follows: &[&str] = match name.as_str() {
                "double" => &["precision"],
                "character" | "char" | "national char" | "national character" => &["varying"],
                "national" => &["char", "character", "varchar"],
                "long" => &["varchar", "varbinary"],
                _ => &[],
            };
            match follows.iter().find(|kw| self.peek_keyword(kw)) {
                Some(word) => {
                    name = format!("{} {}", name, word);
                    self.pos += 1;
                }
                None => break,
            }
        }

        let mut data_type = DataTypeDef {
            name,
            ..DataTypeDef::default()
        };

        if self.consume(&Token::LParen) {
            if matches!(data_type.name.as_str(), "enum" | "set") {
                loop {
                    data_type.members.push(self.string()?);
                    if !self.consume(&Token::Comma) {
                        break;
                    }
                }
            } else {
                data_type.length = Some(self.number()?);
                if self.consume(&Token::Comma) {
                    data_type.scale = Some(self.number()?);
                }
            }
            self.expect(&Token::RParen, ")")?;
        }

        loop {
            if self.consume_keyword("UNSIGNED") {
                data_type.unsigned = true;
            } else if self.consume_keyword("ZEROFILL") {
                data_type.zerofill = true;
                data_type.unsigned = true;
            } else if !self.consume_keyword("SIGNED") {
                break;
            }
        }

        Ok(data_type)
    }

    fn parse_column_attribute(&mut self, column: &mut ColumnDef) -> Result<(), ParseError> {
        let word = match self.peek() {
            Some(Token::Word(word)) => word.to_ascii_uppercase(),
            _ => return Err(self.unexpected("column attribute")),
        };
        self.pos += 1;

        match word.as_str() {
            "NOT" => {
                self.expect_keyword("NULL")?;
                column.nullable = Some(false);
            }
            "NULL" => column.nullable = Some(true),
            "DEFAULT" => column.default = Some(self.parse_default()?),
            "AUTO_INCREMENT" => column.auto_increment = true,
            "UNIQUE" => {
                self.consume_keyword("KEY");
                column.unique = true;
            }
            "PRIMARY" => {
                self.expect_keyword("KEY")?;
                column.primary_key = true;
            }
            "KEY" => column.primary_key = true,
            "COMMENT" => column.comment = Some(self.string()?),
            "COLLATE" => {
                self.consume(&Token::Eq);
                column.collation = Some(self.name_or_string()?);
            }
            "CHARACTER" => {
                self.expect_keyword("SET")?;
                column.charset = Some(self.name_or_string()?);
            }
            "CHARSET" => column.charset = Some(self.name_or_string()?),
            "ON" => {
                self.expect_keyword("UPDATE")?;
                self.timestamp_function()?;
                column.on_update_current_timestamp = true;
            }
            "GENERATED" => {
                self.expect_keyword("ALWAYS")?;
                self.expect_keyword("AS")?;
                column.generated = Some(GeneratedDef {
                    expression: self.group()?,
                    stored: false,
                });
            }
            "AS" => {
                column.generated = Some(GeneratedDef {
                    expression: self.group()?,
                    stored: false,
                });
            }
            "VIRTUAL" => {
                if let Some(generated) = column.generated.as_mut() {
                    generated.stored = false;
                }
            }
            "STORED" | "PERSISTENT" => {
                if let Some(generated) = column.generated.as_mut() {
                    generated.stored = true;
                }
            }
            "REFERENCES" => self.skip_clause(),
            "CHECK" => {
                self.group()?;
            }
            "CONSTRAINT" => {
                if !self.peek_keyword("CHECK") {
                    self.identifier()?;
                }
                self.expect_keyword("CHECK")?;
                self.group()?;
            }
            "COLUMN_FORMAT" | "STORAGE" | "SRID" => {
                self.next();
            }
            "ENGINE_ATTRIBUTE" | "SECONDARY_ENGINE_ATTRIBUTE" => {
                self.consume(&Token::Eq);
                self.next();
            }
            "AFTER" => {
                self.identifier()?;
            }
            "VISIBLE" | "INVISIBLE" | "FIRST" | "BINARY" | "ASCII" | "UNICODE" => {}
            _ => {
                self.pos -= 1;
                return Err(self.unexpected("column attribute"));
            }
        }

        Ok(())
    }

    fn parse_default(&mut self) -> Result<DefaultValue, ParseError> {
        let token = self
            .next()
            .ok_or_else(|| self.unexpected("default value"))?;

        let value = match token {
            Token::Word(word) => match word.to_ascii_uppercase().as_str() {
                "NULL" => DefaultValue::Null,
                "TRUE" => DefaultValue::Literal("1".to_string()),
                "FALSE" => DefaultValue::Literal("0".to_string()),
                "CURRENT_TIMESTAMP" | "NOW" | "LOCALTIME" | "LOCALTIMESTAMP" => {
                    if self.peek() == Some(&Token::LParen) {
                        self.group()?;
                    }
                    DefaultValue::CurrentTimestamp
                }
                // Character set introducer: _utf8mb4'text'
                _ if word.starts_with('_') && matches!(self.peek(), Some(Token::Str(_))) => {
                    DefaultValue::Literal(self.string()?)
                }
                _ if self.peek() == Some(&Token::LParen) => {
                    DefaultValue::Expression(format!("{}({})", word, self.group()?))
                }
                _ => DefaultValue::Expression(word),
            },
            Token::Str(value) | Token::Num(value) | Token::Bits(value) => {
                DefaultValue::Literal(value)
            }
            Token::Minus => DefaultValue::Literal(format!("-{}", self.number_text()?)),
            Token::Plus => DefaultValue::Literal(self.number_text()?),
            Token::LParen => {
                self.pos -= 1;
                DefaultValue::Expression(self.group()?)
            }
            _ => {
                self.pos -= 1;
                return Err(self.unexpected("default value"));
            }
        };

        Ok(value)
    }

    fn timestamp_function(&mut self) -> Result<(), ParseError> {
        let is_timestamp = ["CURRENT_TIMESTAMP", "NOW", "LOCALTIME", "LOCALTIMESTAMP"]
            .iter()
            .any(|kw| self.peek_keyword(kw));
        if !is_timestamp {
            return Err(self.unexpected("CURRENT_TIMESTAMP"));
        }
        self.pos += 1;
        if self.peek() == Some(&Token::LParen) {
            self.group()?;
        }
        Ok(())
    }

    fn parse_table_options(&mut self, table: &mut CreateTable) -> Result<(), ParseError> {
        while !self.at_end() {
            if self.consume(&Token::Comma) || self.consume_keyword("DEFAULT") {
                continue;
            }

            // Partitioning and `... AS SELECT` are not modelled
            let stop = ["PARTITION", "AS", "SELECT", "IGNORE", "REPLACE"]
                .iter()
                .any(|kw| self.peek_keyword(kw));
            if stop {
                self.pos = self.tokens.len();
                break;
            }

            let key = if self.consume_keywords(&["CHARACTER", "SET"]) {
                "CHARSET".to_string()
            } else if self.consume_keywords(&["DATA", "DIRECTORY"]) {
                "DATA DIRECTORY".to_string()
            } else if self.consume_keywords(&["INDEX", "DIRECTORY"]) {
                "INDEX DIRECTORY".to_string()
            } else {
                match self.peek() {
                    Some(Token::Word(word)) => {
                        let key = word.to_ascii_uppercase();
                        self.pos += 1;
                        key
                    }
                    _ => return Err(self.unexpected("table option")),
                }
            };

            self.consume(&Token::Eq);
            let value = self.option_value()?;
            table.options.push((key, value));
        }

        Ok(())
    }

    fn option_value(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::LParen) => self.group(),
            Some(Token::Word(value))
            | Some(Token::Quoted(value))
            | Some(Token::Str(value))
            | Some(Token::Num(value))
            | Some(Token::Bits(value)) => {
                let value = value.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.unexpected("option value")),
        }
    }

    fn parse_create_index(&mut self) -> Result<Statement, ParseError> {
        let start = self.pos;

        let kind = if self.consume_keyword("UNIQUE") {
            IndexKind::Unique
        } else if self.consume_keyword("FULLTEXT") {
            IndexKind::Fulltext
        } else if self.consume_keyword("SPATIAL") {
            IndexKind::Spatial
        } else {
            IndexKind::Index
        };
        self.expect_keyword("INDEX")?;

        let name = self.identifier()?;
        let mut using = None;
        if self.consume_keyword("USING") {
            using = Some(self.identifier()?.to_ascii_uppercase());
        }

        self.expect_keyword("ON")?;
        let table = self.object_name()?;
        let columns = self.key_parts()?;
        self.index_options(&mut using)?;

        let index = IndexDef {
            kind,
            name: Some(name),
            columns,
            using,
            text: self.text_between(start, self.pos),
        };

        Ok(Statement::CreateIndex { table, index })
    }

    fn parse_create_user(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("USER")?;
        let if_not_exists = self.if_not_exists();

        let mut users = Vec::new();
        loop {
            let (user, host) = self.account_name()?;
            let mut spec = UserSpec {
                user,
                host,
                password: None,
                plugin: None,
            };

            if self.consume_keyword("IDENTIFIED") {
                if self.consume_keyword("WITH") {
                    spec.plugin = Some(self.name_or_string()?);
                }
                if self.consume_keyword("BY") {
                    spec.password = Some(self.password()?);
                } else if self.consume_keyword("AS") {
                    spec.password = Some(self.string()?);
                }
            }

            users.push(spec);
            if !self.consume(&Token::Comma) {
                break;
            }
        }

        let mut account_lock = None;
        let mut password_expire = false;

        while !self.at_end() {
            if self.consume_keywords(&["ACCOUNT", "LOCK"]) {
                account_lock = Some(true);
            } else if self.consume_keywords(&["ACCOUNT", "UNLOCK"]) {
                account_lock = Some(false);
            } else if self.consume_keywords(&["PASSWORD", "EXPIRE"]) {
                if self.consume_keyword("INTERVAL") {
                    self.next();
                    self.consume_keyword("DAY");
                } else if !(self.consume_keyword("NEVER") || self.consume_keyword("DEFAULT")) {
                    password_expire = true;
                }
            } else {
                // REQUIRE, WITH MAX_..., COMMENT and friends
                self.pos += 1;
            }
        }

        Ok(Statement::CreateUser(CreateUser {
            if_not_exists,
            users,
            account_lock,
            password_expire,
        }))
    }

    fn password(&mut self) -> Result<String, ParseError> {
        if self.consume_keywords(&["RANDOM", "PASSWORD"]) {
            return Ok("<random>".to_string());
        }
        // Pre-5.7 `IDENTIFIED BY PASSWORD 'hash'`
        self.consume_keyword("PASSWORD");
        self.string()
    }

    // ---- DROP / ALTER ----

    fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("DROP")?;
        self.consume_keyword("TEMPORARY");

        let Some(Token::Word(kind)) = self.peek().cloned() else {
            return Ok(self.unsupported());
        };

        match kind.to_ascii_uppercase().as_str() {
            "DATABASE" | "SCHEMA" => {
                self.pos += 1;
                let if_exists = self.consume_keywords(&["IF", "EXISTS"]);
                let name = self.identifier()?;
                Ok(Statement::DropDatabase { name, if_exists })
            }
            "TABLE" | "TABLES" | "VIEW" => {
                self.pos += 1;
                let if_exists = self.consume_keywords(&["IF", "EXISTS"]);
                let mut names = vec![self.object_name()?];
                while self.consume(&Token::Comma) {
                    names.push(self.object_name()?);
                }
                Ok(Statement::DropTable { names, if_exists })
            }
            "PROCEDURE" => Ok(Statement::Ignored {
                kind: IgnoredKind::DropProcedure,
            }),
            "FUNCTION" => Ok(Statement::Ignored {
                kind: IgnoredKind::DropFunction,
            }),
            "TRIGGER" => Ok(Statement::Ignored {
                kind: IgnoredKind::DropTrigger,
            }),
            _ => Ok(self.unsupported()),
        }
    }

    fn parse_alter(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("ALTER")?;
        self.consume_keyword("ONLINE");
        self.consume_keyword("IGNORE");

        if !self.consume_keyword("TABLE") {
            return Ok(self.unsupported());
        }

        let table = self.object_name()?;
        let mut actions = Vec::new();

        while !self.at_end() {
            self.parse_alter_action(&mut actions)?;
            if !self.consume(&Token::Comma) && !self.at_end() {
                return Err(self.unexpected("`,` between ALTER TABLE actions"));
            }
        }

        Ok(Statement::AlterTable { table, actions })
    }

    fn parse_alter_action(&mut self, actions: &mut Vec<AlterAction>) -> Result<(), ParseError> {
        let start = self.pos;

        if self.consume_keyword("ADD") {
            let index_clause = [
                "PRIMARY", "UNIQUE", "INDEX", "KEY", "FULLTEXT", "SPATIAL", "CONSTRAINT",
                "FOREIGN", "CHECK",
            ]
            .iter()
            .any(|kw| self.peek_keyword(kw));

            if self.consume_keyword("COLUMN") || !index_clause {
                if self.consume(&Token::LParen) {
                    loop {
                        actions.push(AlterAction::AddColumn(self.parse_column_def()?));
                        if !self.consume(&Token::Comma) {
                            break;
                        }
                    }
                    self.expect(&Token::RParen, ")")?;
                } else {
                    actions.push(AlterAction::AddColumn(self.parse_column_def()?));
                }
                return Ok(());
            }

            let clause_start = self.pos;
            if self.consume_keyword("CONSTRAINT") {
                self.constraint_symbol()?;
            }
            if let Some(kind) = self.index_kind_ahead() {
                let index = self.parse_index_clause(kind, clause_start)?;
                actions.push(AlterAction::AddIndex(index));
                return Ok(());
            }
        }

        self.skip_clause();
        actions.push(AlterAction::Unsupported {
            text: self.text_between(start, self.pos),
        });
        Ok(())
    }

    // ---- GRANT ----

    fn parse_grant(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("GRANT")?;

        let mut privileges = Vec::new();
        let mut words: Vec<String> = Vec::new();

        loop {
            match self.peek() {
                None => return Err(self.unexpected("ON or TO")),
                Some(token) if token.is_keyword("ON") || token.is_keyword("TO") => break,
                Some(Token::Comma) => {
                    self.pos += 1;
                    privileges.push(words.join(" "));
                    words.clear();
                }
                // Column list of a column-level privilege
                Some(Token::LParen) => {
                    self.group()?;
                }
                Some(Token::Word(word)) | Some(Token::Quoted(word)) => {
                    words.push(word.to_ascii_uppercase());
                    self.pos += 1;
                }
                Some(_) => return Err(self.unexpected("privilege")),
            }
        }
        if !words.is_empty() {
            privileges.push(words.join(" "));
        }

        let target = if self.consume_keyword("ON") {
            for object_type in ["TABLE", "FUNCTION", "PROCEDURE"] {
                if self.consume_keyword(object_type) {
                    break;
                }
            }
            Some(self.grant_target()?)
        } else {
            None
        };

        self.expect_keyword("TO")?;

        let mut grantees = vec![self.account_name()?];
        while self.consume(&Token::Comma) {
            grantees.push(self.account_name()?);
        }

        let with_grant_option = self.consume_keywords(&["WITH", "GRANT", "OPTION"]);

        Ok(Statement::Grant(Grant {
            privileges,
            target,
            grantees,
            with_grant_option,
        }))
    }

    /// `*.*`, `shop.*`, `` `shop`.`orders` ``
    fn grant_target(&mut self) -> Result<String, ParseError> {
        let mut target = String::new();

        while !self.at_end() && !self.peek_keyword("TO") {
            match self.next() {
                Some(Token::Word(part)) | Some(Token::Quoted(part)) => target.push_str(&part),
                Some(Token::Symbol('*')) => target.push('*'),
                Some(Token::Dot) => target.push('.'),
                _ => {
                    self.pos -= 1;
                    return Err(self.unexpected("grant target"));
                }
            }
        }

        if target.is_empty() {
            return Err(self.unexpected("grant target"));
        }
        Ok(target)
    }

    /// `'user'@'host'`; host defaults to `%`
    fn account_name(&mut self) -> Result<(String, String), ParseError> {
        let user = self.name_or_string()?;

        let host = if self.consume(&Token::At) {
            match self.next() {
                Some(Token::Word(host))
                | Some(Token::Quoted(host))
                | Some(Token::Str(host))
                | Some(Token::Num(host)) => host,
                Some(Token::Symbol('%')) => "%".to_string(),
                Some(_) => {
                    self.pos -= 1;
                    return Err(self.unexpected("host name"));
                }
                None => return Err(self.unexpected("host name")),
            }
        } else {
            "%".to_string()
        };

        Ok((user, host))
    }

    // ---- token helpers ----

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a keyword sequence only if all of it is present
    fn consume_keywords(&mut self, keywords: &[&str]) -> bool {
        let present = keywords
            .iter()
            .enumerate()
            .all(|(n, kw)| self.peek_nth(n).is_some_and(|t| t.is_keyword(kw)));
        if present {
            self.pos += keywords.len();
        }
        present
    }

    fn if_not_exists(&mut self) -> bool {
        self.consume_keywords(&["IF", "NOT", "EXISTS"])
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<(), ParseError> {
        if self.consume(token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                line: self.line,
                expected: expected.to_string(),
                found: token.to_string(),
            },
            None => ParseError::UnexpectedEof {
                line: self.line,
                expected: expected.to_string(),
            },
        }
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Word(name)) | Some(Token::Quoted(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn name_or_string(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Str(value)) => {
                let value = value.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => self.identifier(),
        }
    }

    fn object_name(&mut self) -> Result<ObjectName, ParseError> {
        let first = self.identifier()?;
        if self.consume(&Token::Dot) {
            let name = self.identifier()?;
            Ok(ObjectName::qualified(first, name))
        } else {
            Ok(ObjectName::new(first))
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Str(value)) => {
                let value = value.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    fn number_text(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Num(value)) => {
                let value = value.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.unexpected("number")),
        }
    }

    fn number(&mut self) -> Result<u64, ParseError> {
        let expected = "integer";
        match self.peek() {
            Some(Token::Num(value)) => {
                let parsed = value.parse().map_err(|_| self.unexpected(expected))?;
                self.pos += 1;
                Ok(parsed)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Balanced parenthesized group; returns the inner text
    fn group(&mut self) -> Result<String, ParseError> {
        self.expect(&Token::LParen, "(")?;
        let start = self.pos;
        let mut depth = 1;

        while let Some(token) = self.next() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.text_between(start, self.pos - 1));
                    }
                }
                _ => {}
            }
        }

        Err(self.unexpected(")"))
    }

    /// Skip to the next top-level `,` or `)` without consuming it
    fn skip_clause(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen if depth == 0 => return,
                Token::RParen => depth -= 1,
                Token::Comma if depth == 0 => return,
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn text_between(&self, start: usize, end: usize) -> String {
        self.tokens[start..end.min(self.tokens.len())]
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_one(sql: &str) -> Statement {
        parse_statement(sql).unwrap().unwrap()
    }

    fn create_table(sql: &str) -> CreateTable {
        match parse_one(sql) {
            Statement::CreateTable(table) => table,
            other => panic!("expected CREATE TABLE, got {:?}", other),
        }
    }

    #[test]
    fn parse_database_statements() {
        assert_eq!(
            parse_one("CREATE DATABASE IF NOT EXISTS `shop` DEFAULT CHARACTER SET utf8mb4"),
            Statement::CreateDatabase {
                name: "shop".into(),
                if_not_exists: true
            }
        );
        assert_eq!(
            parse_one("CREATE SCHEMA crm"),
            Statement::CreateDatabase {
                name: "crm".into(),
                if_not_exists: false
            }
        );
        assert_eq!(parse_one("use shop"), Statement::Use { name: "shop".into() });
        assert_eq!(
            parse_one("DROP DATABASE IF EXISTS shop"),
            Statement::DropDatabase {
                name: "shop".into(),
                if_exists: true
            }
        );
    }

    #[test]
    fn parse_create_table_columns() {
        let table = create_table(
            "CREATE TABLE shop.orders (
                id INT UNSIGNED NOT NULL AUTO_INCREMENT,
                total DECIMAL(10,2) DEFAULT '0.00',
                status ENUM('new','paid') NOT NULL DEFAULT 'new',
                note VARCHAR(255) CHARACTER SET latin1 COLLATE latin1_bin COMMENT 'free text',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
                price DOUBLE PRECISION,
                PRIMARY KEY (id)
            ) ENGINE=InnoDB AUTO_INCREMENT=42 DEFAULT CHARSET=utf8mb4",
        );

        assert_eq!(table.name, ObjectName::qualified("shop", "orders"));
        assert_eq!(table.columns.len(), 6);

        let id = &table.columns[0];
        assert_eq!(id.data_type.name, "int");
        assert!(id.data_type.unsigned);
        assert!(id.auto_increment);
        assert_eq!(id.nullable, Some(false));

        let total = &table.columns[1];
        assert_eq!((total.data_type.length, total.data_type.scale), (Some(10), Some(2)));
        assert_eq!(total.default, Some(DefaultValue::Literal("0.00".into())));

        assert_eq!(table.columns[2].data_type.members, vec!["new", "paid"]);

        let note = &table.columns[3];
        assert_eq!(note.charset.as_deref(), Some("latin1"));
        assert_eq!(note.collation.as_deref(), Some("latin1_bin"));
        assert_eq!(note.comment.as_deref(), Some("free text"));

        let created = &table.columns[4];
        assert_eq!(created.default, Some(DefaultValue::CurrentTimestamp));
        assert!(created.on_update_current_timestamp);

        assert_eq!(table.columns[5].data_type.name, "double precision");

        assert_eq!(table.indexes.len(), 1);
        assert_eq!(table.indexes[0].kind, IndexKind::Primary);
        assert_eq!(table.indexes[0].columns, vec![KeyPart::new("id")]);

        assert_eq!(table.option("ENGINE"), Some("InnoDB"));
        assert_eq!(table.option("auto_increment"), Some("42"));
        assert_eq!(table.option("CHARSET"), Some("utf8mb4"));
    }

    #[test]
    fn parse_table_level_indexes() {
        let table = create_table(
            "CREATE TABLE t (
                a INT, b VARCHAR(100), c TEXT,
                CONSTRAINT pk PRIMARY KEY (a),
                UNIQUE KEY uq_b (b),
                KEY idx_c (c(20), a DESC) USING BTREE COMMENT 'prefix',
                INDEX (b),
                FULLTEXT KEY ft_c (c),
                CONSTRAINT fk FOREIGN KEY (a) REFERENCES other (id) ON DELETE CASCADE,
                CHECK (a > 0)
            )",
        );

        let kinds: Vec<IndexKind> = table.indexes.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IndexKind::Primary,
                IndexKind::Unique,
                IndexKind::Index,
                IndexKind::Index,
                IndexKind::Fulltext
            ]
        );
        assert_eq!(table.indexes[1].name.as_deref(), Some("uq_b"));
        assert_eq!(
            table.indexes[2].columns[0],
            KeyPart {
                column: "c".into(),
                prefix_length: Some(20)
            }
        );
        assert_eq!(table.indexes[2].using.as_deref(), Some("BTREE"));
        assert_eq!(table.indexes[3].name, None);
        assert!(table.indexes[0].text.starts_with("CONSTRAINT pk PRIMARY KEY"));
    }

    #[test]
    fn parse_inline_keys_and_generated_columns() {
        let table = create_table(
            "CREATE TABLE t (
                id BIGINT PRIMARY KEY,
                email VARCHAR(100) UNIQUE,
                doubled INT GENERATED ALWAYS AS (id * 2) STORED,
                lower_email VARCHAR(100) AS (lower(email)) VIRTUAL,
                flags BIT(8) DEFAULT b'0',
                name VARCHAR(20) DEFAULT _utf8mb4'anon'
            )",
        );

        assert!(table.columns[0].primary_key);
        assert!(table.columns[1].unique);

        let doubled = table.columns[2].generated.as_ref().unwrap();
        assert!(doubled.stored);
        assert_eq!(doubled.expression, "id * 2");

        let lower = table.columns[3].generated.as_ref().unwrap();
        assert!(!lower.stored);

        assert_eq!(table.columns[4].default, Some(DefaultValue::Literal("b'0'".into())));
        assert_eq!(table.columns[5].default, Some(DefaultValue::Literal("anon".into())));
    }

    #[test]
    fn create_table_like_is_unsupported() {
        assert!(matches!(
            parse_one("CREATE TABLE t2 LIKE t1"),
            Statement::Unsupported { .. }
        ));
    }

    #[test]
    fn parse_alter_table_actions() {
        let statement = parse_one(
            "ALTER TABLE shop.orders ADD COLUMN note TEXT, ADD INDEX idx_note (note(10)), \
             ADD UNIQUE (note), DROP COLUMN legacy",
        );

        let Statement::AlterTable { table, actions } = statement else {
            panic!("expected ALTER TABLE");
        };
        assert_eq!(table.to_string(), "shop.orders");
        assert_eq!(actions.len(), 4);
        assert!(matches!(&actions[0], AlterAction::AddColumn(c) if c.name == "note"));
        assert!(matches!(&actions[1], AlterAction::AddIndex(i) if i.name.as_deref() == Some("idx_note")));
        assert!(matches!(&actions[2], AlterAction::AddIndex(i) if i.kind == IndexKind::Unique));
        assert_eq!(
            actions[3],
            AlterAction::Unsupported {
                text: "DROP COLUMN legacy".into()
            }
        );
    }

    #[test]
    fn parse_create_index() {
        let Statement::CreateIndex { table, index } =
            parse_one("CREATE UNIQUE INDEX uq_email ON users (email) USING BTREE")
        else {
            panic!("expected CREATE INDEX");
        };
        assert_eq!(table, ObjectName::new("users"));
        assert_eq!(index.kind, IndexKind::Unique);
        assert_eq!(index.name.as_deref(), Some("uq_email"));
        assert_eq!(index.using.as_deref(), Some("BTREE"));
    }

    #[test]
    fn parse_create_user_variants() {
        let Statement::CreateUser(create) = parse_one(
            "CREATE USER IF NOT EXISTS 'app'@'%' IDENTIFIED BY 's3cret', \
             'ro'@'localhost' IDENTIFIED WITH auth_socket, backup \
             PASSWORD EXPIRE ACCOUNT LOCK",
        ) else {
            panic!("expected CREATE USER");
        };

        assert!(create.if_not_exists);
        assert_eq!(create.users.len(), 3);
        assert_eq!(create.users[0].password.as_deref(), Some("s3cret"));
        assert_eq!(create.users[1].plugin.as_deref(), Some("auth_socket"));
        assert_eq!(create.users[1].password, None);
        assert_eq!(create.users[2].host, "%");
        assert_eq!(create.account_lock, Some(true));
        assert!(create.password_expire);
    }

    #[test]
    fn parse_grants() {
        let Statement::Grant(grant) = parse_one(
            "GRANT SELECT, INSERT, SUPER, REPLICATION SLAVE ON *.* TO 'app'@'%' WITH GRANT OPTION",
        ) else {
            panic!("expected GRANT");
        };
        assert_eq!(grant.privileges, vec!["SELECT", "INSERT", "SUPER", "REPLICATION SLAVE"]);
        assert!(grant.is_global());
        assert_eq!(grant.grantees, vec![("app".to_string(), "%".to_string())]);
        assert!(grant.with_grant_option);

        let Statement::Grant(scoped) = parse_one("GRANT SELECT (id, name) ON `shop`.* TO ro@localhost")
        else {
            panic!("expected GRANT");
        };
        assert_eq!(scoped.target.as_deref(), Some("shop.*"));
        assert!(!scoped.is_global());
    }

    #[test]
    fn recognized_statements_are_ignored() {
        for sql in [
            "SET NAMES utf8mb4",
            "INSERT INTO t VALUES (1)",
            "LOCK TABLES t WRITE",
            "UNLOCK TABLES",
            "START TRANSACTION",
            "COMMIT",
            "DELETE FROM t",
            "CREATE DEFINER=`root`@`localhost` PROCEDURE p() BEGIN END",
            "DROP TRIGGER IF EXISTS trg",
        ] {
            assert!(
                matches!(parse_one(sql), Statement::Ignored { .. }),
                "{} should be ignored",
                sql
            );
        }
    }

    #[test]
    fn unknown_statements_are_unsupported() {
        assert_eq!(
            parse_one("TRUNCATE TABLE t"),
            Statement::Unsupported {
                text: "TRUNCATE TABLE t".into()
            }
        );
    }

    #[test]
    fn errors_carry_statement_line() {
        let err = parse_script("USE shop;\n\nCREATE TABLE t (id INT NOT);").unwrap_err();
        assert_eq!(err.line(), 3);
        assert!(matches!(err, ParseError::UnexpectedToken { .. } | ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn script_skips_comment_only_chunks() {
        let parsed = parse_script("/*!40101 SET NAMES utf8 */;\nUSE shop;").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].line, 2);
        assert_eq!(parsed[0].statement, Statement::Use { name: "shop".into() });
    }
}

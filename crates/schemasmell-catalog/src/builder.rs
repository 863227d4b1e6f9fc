//! Catalog builder
//!
//! Folds a parsed statement stream into a [`Database`]. Statements are
//! applied strictly in order: `USE` changes where unqualified tables land,
//! and later statements see the columns and indexes earlier ones created.

use regex::Regex;
use schemasmell_core::metadata::{
    canonical_type_name, charset_for_collation, classify, default_collation,
};
use schemasmell_core::{
    Account, Column, ColumnInfo, ColumnKey, Database, Index, MetadataError, Table, TableInfo,
    TypeClass, PRIMARY_INDEX,
};
use schemasmell_sql::{
    parse_script, AlterAction, ColumnDef, CreateTable, CreateUser, DefaultValue, Grant, IndexDef,
    IndexKind, KeyPart, ObjectName, ParseError, ParsedStatement, Statement,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Schema that receives tables created before any `USE`
pub const SENTINEL_SCHEMA: &str = "__unnamed__";

/// Name given to indexes declared without one
pub const UNNAMED_INDEX: &str = "unknown_index";

/// Table character set when none is declared
const DEFAULT_CHARSET: &str = "latin1";

/// Largest `character_octet_length` MySQL reports for a declared length
const MAX_OCTET_LENGTH: u64 = 65_535;

/// Errors raised while building a catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("line {line}: cannot handle statement: {text}")]
    QueryParse { line: usize, text: String },

    #[error("Table '{table}' doesn't exist")]
    InvalidTable { table: String },

    #[error("Database '{schema}' exists")]
    ExistingSchema { schema: String },

    #[error("Table '{table}' already exists")]
    ExistingTable { table: String },

    #[error("Unknown column '{column}' in table '{table}'")]
    InvalidColumn { table: String, column: String },

    #[error("Duplicate column name '{column}' in table '{table}'")]
    ExistingColumn { table: String, column: String },

    #[error("Duplicate key name '{index}' in table '{table}'")]
    ExistingIndex { table: String, index: String },

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl From<ParseError> for BuildError {
    fn from(err: ParseError) -> Self {
        BuildError::QueryParse {
            line: err.line(),
            text: err.to_string(),
        }
    }
}

/// Table-level character set and collation inherited by string columns
#[derive(Debug, Clone, PartialEq, Eq)]
struct EncodingDefaults {
    charset: String,
    collation: String,
}

impl EncodingDefaults {
    fn resolve(charset: Option<&str>, collation: Option<&str>) -> Result<Self, MetadataError> {
        let (charset, collation) = match (charset, collation) {
            (Some(charset), Some(collation)) => {
                let charset = charset.to_ascii_lowercase();
                default_collation(&charset)?;
                (charset, collation.to_ascii_lowercase())
            }
            (Some(charset), None) => {
                let collation = default_collation(charset)?.to_string();
                (charset.to_ascii_lowercase(), collation)
            }
            (None, Some(collation)) => (
                charset_for_collation(collation)?.to_string(),
                collation.to_ascii_lowercase(),
            ),
            (None, None) => (
                DEFAULT_CHARSET.to_string(),
                default_collation(DEFAULT_CHARSET)?.to_string(),
            ),
        };

        Ok(Self { charset, collation })
    }

    /// Defaults of an existing table, from its collation
    fn of_table(table: &Table) -> Result<Self, MetadataError> {
        Self::resolve(None, table.info.table_collation.as_deref())
    }
}

/// Whether index clause source text opens with a primary key declaration
///
/// Only the head of the clause counts, so a COMMENT mentioning a primary key
/// does not match.
fn declares_primary_key(text: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^\s*(?:CONSTRAINT\s+(?:\S+\s+)?)?PRIMARY\s+KEY\b").ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
}

/// Builds a catalog from parsed statements
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    database: Database,
    current_schema: String,
    line: usize,
}

impl CatalogBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_database(Database::new(name))
    }

    /// Start from an existing database (seeded variables, accounts)
    pub fn with_database(database: Database) -> Self {
        Self {
            database,
            current_schema: SENTINEL_SCHEMA.to_string(),
            line: 0,
        }
    }

    pub fn current_schema(&self) -> &str {
        &self.current_schema
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Parse and apply a whole script
    pub fn apply_script(&mut self, script: &str) -> Result<(), BuildError> {
        for parsed in parse_script(script)? {
            self.apply(&parsed)?;
        }
        Ok(())
    }

    /// Apply one statement, remembering its line for error messages
    pub fn apply(&mut self, parsed: &ParsedStatement) -> Result<(), BuildError> {
        self.line = parsed.line;
        debug!(line = parsed.line, kind = statement_kind(&parsed.statement), "applying statement");
        self.apply_statement(&parsed.statement)
    }

    pub fn apply_statement(&mut self, statement: &Statement) -> Result<(), BuildError> {
        match statement {
            Statement::CreateDatabase { name, .. } => {
                self.database.get_or_create_schema(name);
            }
            Statement::Use { name } => {
                self.current_schema = name.clone();
            }
            Statement::DropDatabase { name, .. } => {
                self.database.remove_schema(name);
                if *name == self.current_schema {
                    self.current_schema = SENTINEL_SCHEMA.to_string();
                }
            }
            Statement::CreateTable(create) => self.create_table(create)?,
            Statement::CreateView { name } => self.create_view(name),
            Statement::DropTable { names, .. } => {
                for name in names {
                    let schema_name = self.schema_name(name).to_string();
                    if let Some(schema) = self.database.schema_mut(&schema_name) {
                        schema.remove_table(&name.name);
                    }
                }
            }
            Statement::AlterTable { table, actions } => self.alter_table(table, actions)?,
            Statement::CreateIndex { table, index } => {
                let table = self.table_mut(table)?;
                add_index(table, index)?;
            }
            Statement::CreateUser(create) => self.create_user(create),
            Statement::Grant(grant) => self.grant(grant),
            Statement::Ignored { kind } => {
                info!(line = self.line, ?kind, "ignoring statement");
            }
            Statement::Unsupported { text } => {
                return Err(BuildError::QueryParse {
                    line: self.line,
                    text: text.clone(),
                });
            }
        }

        Ok(())
    }

    /// Finish building; an empty sentinel schema is dropped
    pub fn finish(mut self) -> Database {
        self.database
            .retain_schemas(|schema| schema.name != SENTINEL_SCHEMA || !schema.is_empty());
        self.database
    }

    fn schema_name<'a>(&'a self, name: &'a ObjectName) -> &'a str {
        name.schema.as_deref().unwrap_or(&self.current_schema)
    }

    fn table_mut(&mut self, name: &ObjectName) -> Result<&mut Table, BuildError> {
        let schema_name = self.schema_name(name).to_string();
        self.database
            .schema_mut(&schema_name)
            .and_then(|schema| schema.table_mut(&name.name))
            .ok_or_else(|| BuildError::InvalidTable {
                table: format!("{}.{}", schema_name, name.name),
            })
    }

    fn create_table(&mut self, create: &CreateTable) -> Result<(), BuildError> {
        let schema_name = self.schema_name(&create.name).to_string();

        let exists = self
            .database
            .schema(&schema_name)
            .is_some_and(|schema| schema.contains_table(&create.name.name));
        if exists {
            debug!(table = %create.name, "table already exists, CREATE TABLE skipped");
            return Ok(());
        }

        let table = build_table(&schema_name, create)?;
        self.database.get_or_create_schema(&schema_name).add_table(table);
        Ok(())
    }

    fn create_view(&mut self, name: &ObjectName) {
        let schema_name = self.schema_name(name).to_string();
        let mut view = Table::new(&schema_name, &name.name);
        view.info = TableInfo {
            table_type: "VIEW".to_string(),
            engine: None,
            row_format: None,
            ..TableInfo::default()
        };
        self.database.get_or_create_schema(&schema_name).add_table(view);
    }

    fn alter_table(&mut self, name: &ObjectName, actions: &[AlterAction]) -> Result<(), BuildError> {
        let line = self.line;
        let table = self.table_mut(name)?;

        // Earlier actions stay applied when a later one fails
        for action in actions {
            match action {
                AlterAction::AddColumn(def) => {
                    let defaults = EncodingDefaults::of_table(table)?;
                    add_column(table, def, &defaults)?;
                }
                AlterAction::AddIndex(index) => add_index(table, index)?,
                AlterAction::Unsupported { text } => {
                    return Err(BuildError::QueryParse {
                        line,
                        text: format!("ALTER TABLE {} {}", name, text),
                    });
                }
            }
        }

        Ok(())
    }

    fn create_user(&mut self, create: &CreateUser) {
        for spec in &create.users {
            if create.if_not_exists && self.database.account(&spec.user, &spec.host).is_some() {
                continue;
            }

            let mut account = Account::new(&spec.user, &spec.host);
            account.has_password = spec.password.as_deref().is_some_and(|p| !p.is_empty());
            account.plugin = spec.plugin.clone();
            account.locked = create.account_lock == Some(true);
            account.password_expired = create.password_expire;
            self.database.add_account(account);
        }
    }

    fn grant(&mut self, grant: &Grant) {
        if !grant.is_global() {
            info!(line = self.line, target = ?grant.target, "ignoring non-global grant");
            return;
        }

        for (user, host) in &grant.grantees {
            match self.database.account_mut(user, host) {
                Some(account) => {
                    for privilege in &grant.privileges {
                        account.grant(privilege);
                    }
                    if grant.with_grant_option {
                        account.grant("GRANT OPTION");
                    }
                }
                None => warn!(line = self.line, user, host, "GRANT to unknown account ignored"),
            }
        }
    }
}

/// Build a catalog from a script
pub fn build_catalog(name: &str, script: &str) -> Result<Database, BuildError> {
    let mut builder = CatalogBuilder::new(name);
    builder.apply_script(script)?;
    Ok(builder.finish())
}

fn statement_kind(statement: &Statement) -> &'static str {
    match statement {
        Statement::CreateDatabase { .. } => "CREATE DATABASE",
        Statement::Use { .. } => "USE",
        Statement::DropDatabase { .. } => "DROP DATABASE",
        Statement::CreateTable(_) => "CREATE TABLE",
        Statement::CreateView { .. } => "CREATE VIEW",
        Statement::DropTable { .. } => "DROP TABLE",
        Statement::AlterTable { .. } => "ALTER TABLE",
        Statement::CreateIndex { .. } => "CREATE INDEX",
        Statement::CreateUser(_) => "CREATE USER",
        Statement::Grant(_) => "GRANT",
        Statement::Ignored { .. } => "ignored",
        Statement::Unsupported { .. } => "unsupported",
    }
}

/// Build a table from its CREATE TABLE definition
pub fn build_table(schema_name: &str, create: &CreateTable) -> Result<Table, BuildError> {
    let defaults = EncodingDefaults::resolve(create.option("CHARSET"), create.option("COLLATE"))?;

    let mut table = Table::new(schema_name, &create.name.name);
    table.info = table_info(create, &defaults);

    for def in &create.columns {
        add_column(&mut table, def, &defaults)?;

        if def.primary_key {
            add_primary_key(&mut table, &[KeyPart::new(&def.name)])?;
        }
        if def.unique {
            let name = free_index_name(&table, &def.name);
            let index = IndexDef::new(IndexKind::Unique, Some(&name), &[def.name.as_str()]);
            add_index(&mut table, &index)?;
        }
    }

    for index in &create.indexes {
        add_index(&mut table, index)?;
    }

    if table.info.auto_increment.is_none() && table.auto_increment_column().is_some() {
        table.info.auto_increment = Some(1);
    }

    Ok(table)
}

fn table_info(create: &CreateTable, defaults: &EncodingDefaults) -> TableInfo {
    let mut info = TableInfo::default();

    if let Some(engine) = create.option("ENGINE") {
        info.engine = Some(engine.to_string());
    }
    if let Some(row_format) = create.option("ROW_FORMAT") {
        info.row_format = Some(capitalize(row_format));
    }
    info.auto_increment = create.option("AUTO_INCREMENT").and_then(|v| v.parse().ok());
    info.table_collation = Some(defaults.collation.clone());
    info.table_comment = create.option("COMMENT").unwrap_or_default().to_string();

    let modelled = ["ENGINE", "AUTO_INCREMENT", "CHARSET", "COLLATE", "COMMENT"];
    info.create_options = create
        .options
        .iter()
        .filter(|(key, _)| !modelled.contains(&key.as_str()))
        .map(|(key, value)| format!("{}={}", key.to_ascii_lowercase(), value))
        .collect::<Vec<_>>()
        .join(" ");

    info
}

fn capitalize(value: &str) -> String {
    let lower = value.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Append a column; ordinal continues after the existing columns
fn add_column(
    table: &mut Table,
    def: &ColumnDef,
    defaults: &EncodingDefaults,
) -> Result<(), BuildError> {
    if table.column(&def.name).is_some() {
        return Err(BuildError::ExistingColumn {
            table: table.qualified_name(),
            column: def.name.clone(),
        });
    }

    let column = build_column(def, table.next_ordinal(), defaults)?;
    table.push_column(column);
    Ok(())
}

/// Build a column with the information-schema projection MySQL would report
fn build_column(
    def: &ColumnDef,
    ordinal: u32,
    defaults: &EncodingDefaults,
) -> Result<Column, BuildError> {
    let data_type = canonical_type_name(&def.data_type.name);
    let class = classify(&data_type);

    let mut info = ColumnInfo {
        ordinal_position: ordinal,
        data_type: data_type.clone(),
        column_type: column_type(def, &data_type),
        is_nullable: def.nullable.unwrap_or(!def.primary_key),
        column_comment: def.comment.clone().unwrap_or_default(),
        ..ColumnInfo::default()
    };

    if let Some(length) = def.data_type.length {
        match class {
            Some(TypeClass::Integer) => info.numeric_precision = Some(length),
            Some(TypeClass::OtherNumeric) => {
                info.numeric_precision = Some(length);
                info.numeric_scale = def.data_type.scale;
            }
            Some(TypeClass::String) => {
                info.character_maximum_length = Some(length);
                info.character_octet_length = Some(length.saturating_mul(4).min(MAX_OCTET_LENGTH));
            }
            Some(TypeClass::Binary) => {
                info.character_maximum_length = Some(length);
                info.character_octet_length = Some(length);
            }
            Some(TypeClass::Time) => info.datetime_precision = Some(length),
            None => return Err(MetadataError::UnknownColumnType(data_type).into()),
        }
    }

    if class == Some(TypeClass::String) {
        let encoding = match (&def.charset, &def.collation) {
            (None, None) => defaults.clone(),
            (charset, collation) => {
                EncodingDefaults::resolve(charset.as_deref(), collation.as_deref())?
            }
        };
        info.character_set_name = Some(encoding.charset);
        info.collation_name = Some(encoding.collation);
    }

    let mut extra = Vec::new();
    if def.auto_increment {
        extra.push("auto_increment".to_string());
    }
    match &def.default {
        None | Some(DefaultValue::Null) => {}
        Some(DefaultValue::Literal(value)) => info.column_default = Some(value.clone()),
        Some(DefaultValue::CurrentTimestamp) => {
            info.column_default = Some("CURRENT_TIMESTAMP".to_string());
            extra.push("DEFAULT_GENERATED".to_string());
        }
        Some(DefaultValue::Expression(expression)) => {
            info.column_default = Some(expression.clone());
            extra.push("DEFAULT_GENERATED".to_string());
        }
    }
    if def.on_update_current_timestamp {
        extra.push("on update CURRENT_TIMESTAMP".to_string());
    }
    if let Some(generated) = &def.generated {
        info.generation_expression = generated.expression.clone();
        extra.push(if generated.stored {
            "STORED GENERATED".to_string()
        } else {
            "VIRTUAL GENERATED".to_string()
        });
    }
    info.extra = extra.join(" ");

    let mut column = Column::new(&def.name);
    column.info = info;
    column.members = def.data_type.members.clone();
    Ok(column)
}

fn column_type(def: &ColumnDef, data_type: &str) -> String {
    let spec = &def.data_type;

    let mut column_type = if !spec.members.is_empty() {
        let members: Vec<String> = spec
            .members
            .iter()
            .map(|m| format!("'{}'", m.replace('\'', "''")))
            .collect();
        format!("{}({})", data_type, members.join(","))
    } else {
        match (spec.length, spec.scale) {
            (Some(length), Some(scale)) => format!("{}({},{})", data_type, length, scale),
            (Some(length), None) => format!("{}({})", data_type, length),
            _ => data_type.to_string(),
        }
    };

    if spec.unsigned {
        column_type.push_str(" unsigned");
    }
    if spec.zerofill {
        column_type.push_str(" zerofill");
    }
    column_type
}

/// Add an index clause to a table, tagging column keys
pub fn add_index(table: &mut Table, def: &IndexDef) -> Result<(), BuildError> {
    // Some clauses reach us tagged as a plain index although they declare the primary key
    let named_secondary = def
        .name
        .as_deref()
        .is_some_and(|name| !name.eq_ignore_ascii_case(PRIMARY_INDEX));
    let kind = if def.kind == IndexKind::Index && !named_secondary && declares_primary_key(&def.text)
    {
        IndexKind::Primary
    } else {
        def.kind
    };

    if kind == IndexKind::Primary {
        return add_primary_key(table, &def.columns);
    }

    let name = match &def.name {
        Some(name) => name.clone(),
        None => unnamed_index_name(table),
    };
    if table.index(&name).is_some() {
        return Err(BuildError::ExistingIndex {
            table: table.qualified_name(),
            index: name,
        });
    }

    let columns = resolve_key_parts(table, &def.columns)?;
    let unique = kind == IndexKind::Unique;

    let mut index = Index::new(name, unique);
    index.index_type = match kind {
        IndexKind::Fulltext => "FULLTEXT".to_string(),
        IndexKind::Spatial => "SPATIAL".to_string(),
        _ => def.using.clone().unwrap_or_else(|| "BTREE".to_string()),
    };
    for (column, prefix_length) in &columns {
        index.push_column(column.clone(), *prefix_length);
    }

    if let Some((first, _)) = columns.first() {
        if let Some(column) = table.column_mut(first) {
            match column.info.column_key {
                ColumnKey::Primary => {}
                _ if unique => column.info.column_key = ColumnKey::Unique,
                ColumnKey::None => column.info.column_key = ColumnKey::Multiple,
                _ => {}
            }
        }
    }

    table.push_index(index);
    Ok(())
}

fn add_primary_key(table: &mut Table, parts: &[KeyPart]) -> Result<(), BuildError> {
    if table.index(PRIMARY_INDEX).is_some() {
        return Err(BuildError::ExistingIndex {
            table: table.qualified_name(),
            index: PRIMARY_INDEX.to_string(),
        });
    }

    let columns = resolve_key_parts(table, parts)?;

    let mut index = Index::new(PRIMARY_INDEX, true);
    for (name, prefix_length) in &columns {
        if let Some(column) = table.column_mut(name) {
            column.info.column_key = ColumnKey::Primary;
            column.info.is_nullable = false;
        }
        index.push_column(name.clone(), *prefix_length);
    }

    table.push_index(index);
    Ok(())
}

/// Resolve key parts to the table's own column names; nothing is mutated
fn resolve_key_parts(
    table: &Table,
    parts: &[KeyPart],
) -> Result<Vec<(String, Option<u64>)>, BuildError> {
    parts
        .iter()
        .map(|part| {
            table
                .column(&part.column)
                .map(|column| (column.name.clone(), part.prefix_length))
                .ok_or_else(|| BuildError::InvalidColumn {
                    table: table.qualified_name(),
                    column: part.column.clone(),
                })
        })
        .collect()
}

/// `unknown_index`, then `unknown_index_2`, `unknown_index_3`, ...
fn unnamed_index_name(table: &Table) -> String {
    free_index_name(table, UNNAMED_INDEX)
}

fn free_index_name(table: &Table, base: &str) -> String {
    if table.index(base).is_none() {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| table.index(candidate).is_none())
        .unwrap_or_else(|| base.to_string())
}

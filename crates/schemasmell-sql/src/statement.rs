//! Parsed statement records handed to the catalog builder
//!
//! A closed union: the builder matches it exhaustively, so a new statement
//! kind is a compile error until the builder handles it.

/// Optionally schema-qualified name (`shop.orders` or `orders`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    pub schema: Option<String>,
    pub name: String,
}

impl ObjectName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ObjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Declared type of a column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTypeDef {
    /// Type name as written (`INT`, `double precision`)
    pub name: String,
    pub length: Option<u64>,
    pub scale: Option<u64>,
    pub unsigned: bool,
    pub zerofill: bool,

    /// ENUM / SET members
    pub members: Vec<String>,
}

/// Column `DEFAULT` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Null,
    Literal(String),
    CurrentTimestamp,
    Expression(String),
}

/// `GENERATED ALWAYS AS (expr) [VIRTUAL | STORED]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDef {
    pub expression: String,
    pub stored: bool,
}

/// A column definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataTypeDef,
    pub nullable: Option<bool>,
    pub default: Option<DefaultValue>,
    pub auto_increment: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub on_update_current_timestamp: bool,
    pub charset: Option<String>,
    pub collation: Option<String>,
    pub comment: Option<String>,
    pub generated: Option<GeneratedDef>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: DataTypeDef {
                name: type_name.into(),
                ..DataTypeDef::default()
            },
            ..Self::default()
        }
    }
}

/// Kind tag of an index clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
    Fulltext,
    Spatial,
}

/// One column of an index clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPart {
    pub column: String,
    pub prefix_length: Option<u64>,
}

impl KeyPart {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            prefix_length: None,
        }
    }
}

/// An index clause (table level, `ALTER ... ADD`, or `CREATE INDEX`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub kind: IndexKind,
    pub name: Option<String>,
    pub columns: Vec<KeyPart>,

    /// `USING BTREE | HASH`
    pub using: Option<String>,

    /// Source text of the clause
    pub text: String,
}

impl IndexDef {
    pub fn new(kind: IndexKind, name: Option<&str>, columns: &[&str]) -> Self {
        Self {
            kind,
            name: name.map(str::to_string),
            columns: columns.iter().map(|c| KeyPart::new(*c)).collect(),
            using: None,
            text: String::new(),
        }
    }
}

/// `CREATE TABLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    pub name: ObjectName,
    pub if_not_exists: bool,
    pub temporary: bool,
    pub columns: Vec<ColumnDef>,
    pub indexes: Vec<IndexDef>,

    /// Table options in source order, upper-case keys (`ENGINE`, `CHARSET`, ...)
    pub options: Vec<(String, String)>,
}

impl CreateTable {
    pub fn new(name: ObjectName) -> Self {
        Self {
            name,
            if_not_exists: false,
            temporary: false,
            columns: Vec::new(),
            indexes: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Last value given for an option
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// One action of `ALTER TABLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterAction {
    AddColumn(ColumnDef),
    AddIndex(IndexDef),
    Unsupported { text: String },
}

/// One account of `CREATE USER`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSpec {
    pub user: String,
    pub host: String,

    /// `Some` when an `IDENTIFIED` clause is present; may be empty
    pub password: Option<String>,
    pub plugin: Option<String>,
}

/// `CREATE USER`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub if_not_exists: bool,
    pub users: Vec<UserSpec>,

    /// `ACCOUNT LOCK` (true) or `ACCOUNT UNLOCK` (false)
    pub account_lock: Option<bool>,
    pub password_expire: bool,
}

/// `GRANT privileges ON target TO grantees`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub privileges: Vec<String>,

    /// `*.*`, `shop.*`, `shop.orders`; `None` for role grants
    pub target: Option<String>,
    pub grantees: Vec<(String, String)>,
    pub with_grant_option: bool,
}

impl Grant {
    pub fn is_global(&self) -> bool {
        self.target.as_deref() == Some("*.*")
    }
}

/// Statement kinds that are recognized and skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredKind {
    Set,
    CreateProcedure,
    DropProcedure,
    CreateFunction,
    DropFunction,
    CreateTrigger,
    DropTrigger,
    Describe,
    Insert,
    Select,
    Update,
    Delete,
    LockTables,
    UnlockTables,
    Transaction,
}

/// A parsed statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateDatabase { name: String, if_not_exists: bool },
    Use { name: String },
    DropDatabase { name: String, if_exists: bool },
    CreateTable(CreateTable),
    CreateView { name: ObjectName },
    DropTable { names: Vec<ObjectName>, if_exists: bool },
    AlterTable { table: ObjectName, actions: Vec<AlterAction> },
    CreateIndex { table: ObjectName, index: IndexDef },
    CreateUser(CreateUser),
    Grant(Grant),
    Ignored { kind: IgnoredKind },
    Unsupported { text: String },
}

/// A statement with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    pub statement: Statement,

    /// 1-based line the statement starts on
    pub line: usize,
    pub text: String,
}

//! Integration tests for the SQL front end

use pretty_assertions::assert_eq;
use schemasmell_sql::{
    parse_script, AlterAction, IgnoredKind, IndexKind, ObjectName, ParseError, Statement,
};

const DUMP: &str = r#"
-- MySQL dump 10.13
/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;
SET NAMES utf8mb4;

CREATE DATABASE /*!32312 IF NOT EXISTS*/ `shop` /*!40100 DEFAULT CHARACTER SET utf8mb4 */;
USE `shop`;

DROP TABLE IF EXISTS `orders`;
CREATE TABLE `orders` (
  `id` int unsigned NOT NULL AUTO_INCREMENT,
  `customer_id` int NOT NULL,
  `status` varchar(16) COLLATE utf8mb4_unicode_ci NOT NULL DEFAULT 'new',
  `note` text,
  PRIMARY KEY (`id`),
  KEY `idx_customer` (`customer_id`),
  KEY `idx_customer_status` (`customer_id`,`status`)
) ENGINE=InnoDB AUTO_INCREMENT=1001 DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_0900_ai_ci;

LOCK TABLES `orders` WRITE;
INSERT INTO `orders` VALUES (1,1,'new',NULL),(2,1,'paid;done',NULL);
UNLOCK TABLES;

DELIMITER ;;
CREATE DEFINER=`root`@`localhost` TRIGGER trg BEFORE INSERT ON orders FOR EACH ROW BEGIN
  SET NEW.status = 'new';
END ;;
DELIMITER ;

ALTER TABLE `orders` ADD COLUMN `total` decimal(10,2) NOT NULL DEFAULT '0.00' AFTER `status`;
CREATE INDEX idx_total ON orders (total);

CREATE USER 'app'@'%' IDENTIFIED BY 'secret';
GRANT SELECT, INSERT, UPDATE ON `shop`.* TO 'app'@'%';
"#;

#[test]
fn parse_mysqldump_style_script() {
    let statements = parse_script(DUMP).unwrap();

    let summary: Vec<String> = statements
        .iter()
        .map(|parsed| match &parsed.statement {
            Statement::CreateDatabase { name, .. } => format!("create database {}", name),
            Statement::Use { name } => format!("use {}", name),
            Statement::DropTable { names, .. } => format!("drop {}", names[0]),
            Statement::CreateTable(table) => format!("create table {}", table.name),
            Statement::AlterTable { table, .. } => format!("alter {}", table),
            Statement::CreateIndex { index, .. } => {
                format!("create index {}", index.name.as_deref().unwrap_or("?"))
            }
            Statement::CreateUser(create) => format!("create user {}", create.users[0].user),
            Statement::Grant(grant) => format!("grant {}", grant.privileges.join(",")),
            Statement::Ignored { kind } => format!("ignored {:?}", kind),
            other => format!("other {:?}", other),
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            "ignored Set",
            "create database shop",
            "use shop",
            "drop orders",
            "create table orders",
            "ignored LockTables",
            "ignored Insert",
            "ignored UnlockTables",
            "ignored CreateTrigger",
            "alter orders",
            "create index idx_total",
            "create user app",
            "grant SELECT,INSERT,UPDATE",
        ]
    );
}

#[test]
fn dump_table_details_survive_parsing() {
    let statements = parse_script(DUMP).unwrap();

    let table = statements
        .iter()
        .find_map(|parsed| match &parsed.statement {
            Statement::CreateTable(table) => Some(table),
            _ => None,
        })
        .unwrap();

    assert_eq!(table.name, ObjectName::new("orders"));
    assert_eq!(table.columns.len(), 4);
    assert_eq!(
        table.columns[2].collation.as_deref(),
        Some("utf8mb4_unicode_ci")
    );
    assert_eq!(table.indexes.len(), 3);
    assert_eq!(table.indexes[0].kind, IndexKind::Primary);
    assert_eq!(table.indexes[2].columns.len(), 2);
    assert_eq!(table.option("AUTO_INCREMENT"), Some("1001"));
    assert_eq!(table.option("COLLATE"), Some("utf8mb4_0900_ai_ci"));

    let alter = statements
        .iter()
        .find_map(|parsed| match &parsed.statement {
            Statement::AlterTable { actions, .. } => Some(actions),
            _ => None,
        })
        .unwrap();
    assert!(matches!(&alter[0], AlterAction::AddColumn(column) if column.name == "total"));
}

#[test]
fn statement_lines_point_at_source() {
    let statements = parse_script(DUMP).unwrap();
    let create = statements
        .iter()
        .find(|parsed| matches!(parsed.statement, Statement::CreateTable(_)))
        .unwrap();

    let expected_line = DUMP
        .lines()
        .position(|line| line.starts_with("CREATE TABLE"))
        .unwrap()
        + 1;
    assert_eq!(create.line, expected_line);
}

#[test]
fn routine_bodies_do_not_split_early() {
    let script = "DELIMITER //\nCREATE PROCEDURE p() BEGIN SELECT 1; SELECT 2; END //\nDELIMITER ;\nUSE shop;";
    let statements = parse_script(script).unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0].statement,
        Statement::Ignored {
            kind: IgnoredKind::CreateProcedure
        }
    );
}

#[test]
fn first_syntax_error_stops_the_script() {
    let script = "USE shop;\nCREATE TABLE t (\n  id INT,\n  PRIMARY KEY id\n);\nUSE other;";
    let err = parse_script(script).unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

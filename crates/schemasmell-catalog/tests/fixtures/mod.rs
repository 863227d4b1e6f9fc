//! DDL fixtures for catalog integration tests
//!
//! Scripts shaped like real `mysqldump` output and hand-written migrations.

/// A single auto-increment table created before any `USE`
pub const EXAMPLE_1: &str =
    "CREATE TABLE example1 (id INT(10) UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY);";

/// A database created, selected and dropped again
pub const CREATE_USE_DROP: &str =
    "CREATE DATABASE example_db; USE example_db; DROP DATABASE example_db;";

/// Shop schema with a migration applied on top
///
/// - `customers`: utf8mb4 table with a unique email
/// - `orders`: composite indexes, one of them redundant
/// - `audit_log`: no primary key, latin1 defaults
pub const SHOP: &str = r#"
-- Host: db1    Database: shop
/*!40101 SET NAMES utf8mb4 */;

CREATE DATABASE IF NOT EXISTS `shop`;
USE `shop`;

CREATE TABLE `customers` (
  `id` bigint unsigned NOT NULL AUTO_INCREMENT,
  `email` varchar(191) NOT NULL,
  `name` varchar(100) DEFAULT NULL,
  `country` char(2) CHARACTER SET ascii NOT NULL DEFAULT 'US',
  `created_at` datetime NOT NULL DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uq_email` (`email`)
) ENGINE=InnoDB AUTO_INCREMENT=5000 DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;

CREATE TABLE `orders` (
  `id` int NOT NULL AUTO_INCREMENT,
  `customer_id` bigint unsigned NOT NULL,
  `status` enum('new','paid','shipped') NOT NULL DEFAULT 'new',
  `total` decimal(10,2) NOT NULL,
  PRIMARY KEY (`id`),
  KEY `idx_customer` (`customer_id`),
  KEY `idx_customer_status` (`customer_id`,`status`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;

CREATE TABLE audit_log (
  happened_at timestamp NULL,
  message text
);

ALTER TABLE orders ADD COLUMN shipped_at datetime NULL, ADD INDEX idx_shipped (shipped_at);
CREATE INDEX idx_country ON customers (country);

CREATE USER 'app'@'%' IDENTIFIED BY 'secret';
CREATE USER 'report'@'10.0.0.%';
GRANT SELECT ON *.* TO 'report'@'10.0.0.%';
GRANT ALL PRIVILEGES ON shop.* TO 'app'@'%';
"#;

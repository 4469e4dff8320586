//! Test Module
//!
//! Test suite for the ACEE core.
//!
//! ## Test Categories
//! - `assistant_tests`: intent matching order, fallbacks, chat session timing
//! - `analytics_tests`: averages, per-course scores, distribution, trend, deadlines
//! - `portal_tests`: CRUD, cascade delete, write-through and corruption recovery
//! - `store_tests`: SQLite record store
//! - `config_tests`: environment configuration

pub mod portal_tests;

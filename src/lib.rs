//! jsonfilter - select values from JSON documents with path queries.
//!
//! The [`jsonpath`] module holds the query language: lexer, parser and the
//! evaluator that matches a parsed [`jsonpath::Query`] against a
//! `serde_json::Value`. [`file`] loads documents, [`output`] renders matches
//! as plain lines or shell `export` statements, and [`config`] provides
//! defaults for the command-line tool.

pub mod config;
pub mod file;
pub mod jsonpath;
pub mod output;

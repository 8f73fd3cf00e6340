//! recordhub - validated CRUD record APIs (students and notes) over a
//! document store
//!
//! Layers, bottom up:
//! - `storage`: document store trait, SQLite and in-process stores
//! - `schema`: rule tables and the generic validator
//! - `resources`: the student and note rule tables
//! - `repository`: validated CRUD per resource
//! - `api`: HTTP handlers, envelope and server
//! - `client`: form conversion and pre-checks done before a request is sent

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod observability;
pub mod repository;
pub mod resources;
pub mod schema;
pub mod storage;

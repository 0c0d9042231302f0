//! Daily work logs in, weekly reports and OKRs out.
//!
//! WorkPilot reads free-form daily logs, sorts each line into one of four
//! report buckets, asks an LLM to draft a weekly report or next quarter's OKR,
//! and checks what comes back against a fixed structural contract. A small
//! SQLite ledger keeps reports and career assets (projects, work items,
//! skills) between sessions.
//!
//! # Pipeline
//!
//! | Stage | Module | Fails? |
//! |-------|--------|--------|
//! | Segment into dated blocks | [`journal::segment`] | on malformed hour suffix |
//! | Classify by keyword | [`journal::classify`] | never |
//! | Deduplicate by containment | [`journal::dedup`] | never |
//! | Validate generated text | [`validate`] | never |
//! | Match project names | [`similarity`] | never |
//!
//! # Modules
//!
//! - [`config`]: configuration from TOML files and environment variables
//! - [`journal`]: daily-log parsing pipeline
//! - [`validate`]: weekly-report and OKR structure checks
//! - [`similarity`]: name scoring, best match, and grouping
//! - [`llm`]: chat-completions gateway with retry, plus a mock
//! - [`generate`]: report/OKR generation with deterministic fallback
//! - [`db`]: SQLite initialization, schema, migrations, and health checks
//! - [`ledger`]: report and career-asset persistence
//! - [`api`], [`tools`], [`server`]: HTTP and MCP surfaces
//! - [`cli`]: terminal subcommands

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod generate;
pub mod journal;
pub mod ledger;
pub mod llm;
pub mod server;
pub mod similarity;
pub mod tools;
pub mod validate;

//! # gitvis
//!
//! Conventional-commit git workflows that show the branch graph after every
//! change they make.
//!
//! ## Usage
//!
//! ```bash
//! gitvis commit -m "feat(auth): add login"
//! gitvis commit-branch feature/login -m "feat: login form"
//! gitvis merge feature/login
//! gitvis            # interactive menu
//! ```
//!
//! ## Modules
//!
//! - `alias` - Idempotent installation of graph-viewing git aliases
//! - `config` - Layered configuration (defaults, files, environment)
//! - `convention` - Commit message and branch name rules
//! - `error` - Structured workflow failures with stable error codes
//! - `git` - The `CommandRunner` seam, git command lines and output parsers
//! - `graph` - Plain-text rendering of commit history
//! - `interactive` - Numbered menu front end
//! - `subprocess` - Process execution abstraction for testing
//! - `workflow` - Step sequencing with a graph render after each change
pub mod alias;
pub mod config;
pub mod convention;
pub mod error;
pub mod git;
pub mod graph;
pub mod interactive;
pub mod subprocess;
pub mod workflow;

//! coursecat: course catalogs of language academies kept in AVL trees.
//!
//! Layers, innermost first:
//! - [`domain`]: the tree, course records, merges, statistics and renderers
//! - [`application`]: services that load catalogs and run merges
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: argument model, dispatch and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

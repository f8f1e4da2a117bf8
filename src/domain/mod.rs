//! Domain layer: catalog tree, course records and merge algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod avl;
pub mod catalog;
pub mod course;
pub mod error;
pub mod merge;
pub mod render;
pub mod stats;

pub use avl::{AvlTree, Position};
pub use catalog::{add_course, parse_catalog, Catalog};
pub use course::Course;
pub use error::{DomainError, DomainResult};
pub use merge::{added_offer, combine, common_offer, search};
pub use render::{preorder_indent, TreeDisplay};
pub use stats::{average_students, total_income, Dimension};

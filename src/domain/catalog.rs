//! Catalog: an academy's courses keyed by label

use tracing::{debug, instrument};

use crate::domain::avl::AvlTree;
use crate::domain::course::Course;
use crate::domain::error::{DomainError, DomainResult};

/// Courses of one academy, ordered by label.
pub type Catalog = AvlTree<String, Course>;

/// Insert `course` under its own label; a course with the same label is replaced.
pub fn add_course(catalog: &mut Catalog, course: Course) -> Option<Course> {
    catalog.insert(course.label(), course)
}

/// Parse catalog text into a tree.
///
/// The first line is a header and is skipped, as are blank lines. Every other
/// line must be a full course record; the first bad line aborts parsing with
/// its 1-based line number.
#[instrument(level = "debug", skip(content))]
pub fn parse_catalog(content: &str) -> DomainResult<Catalog> {
    let mut catalog = Catalog::new();

    for (number, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let course = line.parse::<Course>().map_err(|e| at_line(e, number + 1))?;
        if let Some(previous) = add_course(&mut catalog, course) {
            debug!("line {}: replaces {}", number + 1, previous.label());
        }
    }

    debug!("parsed {} courses", catalog.len());
    Ok(catalog)
}

fn at_line(error: DomainError, line: usize) -> DomainError {
    match error {
        DomainError::MalformedRecord { message, .. } => {
            DomainError::MalformedRecord { line, message }
        }
        other => DomainError::MalformedRecord {
            line,
            message: other.to_string(),
        },
    }
}

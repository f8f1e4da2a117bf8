//! Cross-catalog merges: common offer (intersection) and added offer (union).
//!
//! Both algorithms only read the two input catalogs and build a fresh third
//! one. Courses in the result are always new values, never shared with the
//! inputs.

use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::{debug, instrument, trace};

use crate::domain::avl::{AvlTree, Position};
use crate::domain::catalog::{add_course, Catalog};
use crate::domain::course::Course;
use crate::domain::error::{DomainError, DomainResult};

/// Search `key` in `tree` starting from `from` instead of the root.
///
/// Descends left or right by key comparison until the key is found or the
/// walk falls off the tree. Started at `tree.root()` this is the same as
/// `tree.lookup(key)`.
pub fn search<K, V, Q>(tree: &AvlTree<K, V>, from: Option<Position>, key: &Q) -> Option<Position>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = from;
    while let Some(pos) = current {
        let node_key = tree.key(pos)?;
        current = match key.cmp(node_key.borrow()) {
            Ordering::Equal => return Some(pos),
            Ordering::Less => tree.left(pos),
            Ordering::Greater => tree.right(pos),
        };
    }
    None
}

/// Combine two records of the same offering.
///
/// Enrollment is summed. Pricing, duration and identity come from the more
/// profitable side by total income; `a` wins ties.
pub fn combine(a: &Course, b: &Course) -> DomainResult<Course> {
    if !a.same_offering(b) {
        return Err(DomainError::NotSameOffering {
            left: a.label(),
            right: b.label(),
        });
    }

    let students = a.students().saturating_add(b.students());
    let winner = if a.benefit() >= b.benefit() { a } else { b };
    trace!(
        "combine {}: benefit {} vs {}",
        a.label(),
        a.benefit(),
        b.benefit()
    );
    Ok(winner.with_students(students))
}

/// Courses offered by both academies, profitability-merged.
#[instrument(level = "debug", skip_all, fields(a = a.len(), b = b.len()))]
pub fn common_offer(a: &Catalog, b: &Catalog) -> DomainResult<Catalog> {
    let mut common = Catalog::new();

    for (key, course_a) in a {
        let Some(course_b) = search(b, b.root(), key.as_str()).and_then(|pos| b.value(pos)) else {
            continue;
        };
        add_course(&mut common, combine(course_a, course_b)?);
    }

    debug!("common offer: {} courses", common.len());
    Ok(common)
}

/// Every course of both academies.
///
/// Exact matches are combined once. A course whose name also appears in the
/// other catalog with a different level or language is renamed to
/// `"<name> <academy>"` so both variants stay distinguishable. Anything else is
/// copied unchanged. When a course lands on a label already taken in the
/// result (a renamed variant meeting a course literally called
/// `"<name> <academy>"`), the two are combined, so no enrollment is lost.
#[instrument(level = "debug", skip_all, fields(a = a.len(), b = b.len()))]
pub fn added_offer(a: &Catalog, b: &Catalog, names: (&str, &str)) -> DomainResult<Catalog> {
    let (name_a, name_b) = names;
    let mut added = Catalog::new();

    for (key, course_a) in a {
        match search(b, b.root(), key.as_str()).and_then(|pos| b.value(pos)) {
            Some(course_b) => {
                add_course(&mut added, combine(course_a, course_b)?);
            }
            None => add_variant(&mut added, course_a, b, name_a)?,
        }
    }

    for (key, course_b) in b {
        // already combined in the first pass
        if search(&added, added.root(), key.as_str()).is_some()
            && search(a, a.root(), key.as_str()).is_some()
        {
            continue;
        }
        add_variant(&mut added, course_b, a, name_b)?;
    }

    debug!("added offer: {} courses", added.len());
    Ok(added)
}

/// Insert `course`, renamed after `academy` if `other` has a different variant
/// with the same name.
fn add_variant(
    target: &mut Catalog,
    course: &Course,
    other: &Catalog,
    academy: &str,
) -> DomainResult<()> {
    let collides = other
        .values()
        .any(|candidate| candidate.name() == course.name() && !candidate.same_offering(course));

    if collides {
        let renamed = course.renamed(format!("{} {}", course.name(), academy));
        debug!("rename {} -> {}", course.label(), renamed.label());
        merge_into(target, renamed)
    } else {
        merge_into(target, course.clone())
    }
}

/// Insert `course`, combining it with an entry already under its label.
fn merge_into(target: &mut Catalog, course: Course) -> DomainResult<()> {
    let label = course.label();
    let existing = search(target, target.root(), label.as_str()).and_then(|pos| target.value(pos));
    let merged = match existing {
        Some(existing) => {
            debug!("label clash on {}, combining", label);
            combine(existing, &course)?
        }
        None => course,
    };
    add_course(target, merged);
    Ok(())
}

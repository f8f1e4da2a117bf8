//! Catalog statistics

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::domain::catalog::Catalog;
use crate::domain::course::Course;

/// Course attribute to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Language,
    Level,
}

impl Dimension {
    fn of<'a>(&self, course: &'a Course) -> &'a str {
        match self {
            Dimension::Language => course.language(),
            Dimension::Level => course.level(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Language => write!(f, "language"),
            Dimension::Level => write!(f, "level"),
        }
    }
}

/// Mean number of students per group, groups in ascending order.
pub fn average_students(catalog: &Catalog, dimension: Dimension) -> BTreeMap<String, f64> {
    catalog
        .values()
        .map(|course| (dimension.of(course).to_string(), f64::from(course.students())))
        .into_group_map()
        .into_iter()
        .map(|(group, counts)| {
            let mean = counts.iter().sum::<f64>() / counts.len() as f64;
            (group, mean)
        })
        .collect()
}

/// Sum of the total income of every course.
pub fn total_income(catalog: &Catalog) -> f64 {
    catalog.values().map(Course::benefit).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::add_course;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        for (name, level, language, students) in [
            ("Eng", "B1", "English", 4),
            ("Eng", "B2", "English", 8),
            ("Fr", "B1", "French", 3),
        ] {
            let course = Course::new(name, 10, students, level, language, 2.0).unwrap();
            add_course(&mut catalog, course);
        }
        catalog
    }

    #[test]
    fn given_catalog_when_averaging_by_language_then_groups_sorted() {
        let averages = average_students(&sample(), Dimension::Language);
        let groups: Vec<(&String, &f64)> = averages.iter().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], (&"English".to_string(), &6.0));
        assert_eq!(groups[1], (&"French".to_string(), &3.0));
    }

    #[test]
    fn given_catalog_when_averaging_by_level_then_means_per_level() {
        let averages = average_students(&sample(), Dimension::Level);
        assert_eq!(averages.get("B1"), Some(&3.5));
        assert_eq!(averages.get("B2"), Some(&8.0));
    }

    #[test]
    fn given_catalog_when_total_income_then_sums_benefits() {
        // 10h * 2.0 * (4 + 8 + 3)
        assert_eq!(total_income(&sample()), 300.0);
    }

    #[test]
    fn given_empty_catalog_then_no_groups_and_zero_income() {
        let empty = Catalog::new();
        assert!(average_students(&empty, Dimension::Level).is_empty());
        assert_eq!(total_income(&empty), 0.0);
    }
}

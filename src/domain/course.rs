//! Course record: one offering of an academy

use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};

/// Number of comma-separated fields in a catalog line.
pub const RECORD_FIELDS: usize = 6;

/// A taught course offering.
///
/// Identity is the `(name, level, language)` triple, exposed as [`Course::label`].
/// Price, duration and enrollment may differ between two courses that are
/// otherwise the same offering.
#[derive(Debug, Clone)]
pub struct Course {
    name: String,
    duration: u32,
    students: u32,
    level: String,
    language: String,
    price: f64,
}

impl Course {
    /// Create a course, validating its numeric attributes.
    ///
    /// `students` is taken as a signed value so that a negative enrollment read
    /// from input is rejected here instead of wrapping.
    pub fn new(
        name: impl Into<String>,
        duration: u32,
        students: i64,
        level: impl Into<String>,
        language: impl Into<String>,
        price: f64,
    ) -> DomainResult<Self> {
        if duration == 0 {
            return Err(DomainError::InvalidAttribute {
                field: "duration",
                message: "must be at least one hour".to_string(),
            });
        }
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::InvalidAttribute {
                field: "price",
                message: format!("must be a non-negative amount, got {price}"),
            });
        }
        Ok(Self {
            name: name.into(),
            duration,
            students: validate_students(students)?,
            level: level.into(),
            language: language.into(),
            price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hours needed to complete the course.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Enrolled students.
    pub fn students(&self) -> u32 {
        self.students
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Price paid per student.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Update the enrollment. Negative values are rejected and leave the course unchanged.
    pub fn set_students(&mut self, students: i64) -> DomainResult<()> {
        self.students = validate_students(students)?;
        Ok(())
    }

    /// Total income of the offering: `price * duration * students`.
    pub fn benefit(&self) -> f64 {
        self.price * f64::from(self.duration) * f64::from(self.students)
    }

    /// Composite identity key `name_level_language`.
    pub fn label(&self) -> String {
        format!("{}_{}_{}", self.name, self.level, self.language)
    }

    /// True if both courses describe the same offering (name, level and language).
    pub fn same_offering(&self, other: &Course) -> bool {
        self.name == other.name && self.level == other.level && self.language == other.language
    }

    /// New course identical to this one apart from the name.
    pub fn renamed(&self, name: impl Into<String>) -> Course {
        Course {
            name: name.into(),
            ..self.clone()
        }
    }

    /// New course keeping this course's pricing and identity with a different enrollment.
    pub(crate) fn with_students(&self, students: u32) -> Course {
        Course {
            students,
            ..self.clone()
        }
    }
}

fn validate_students(students: i64) -> DomainResult<u32> {
    u32::try_from(students).map_err(|_| DomainError::InvalidAttribute {
        field: "students",
        message: format!("must be zero or greater, got {students}"),
    })
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.same_offering(other)
    }
}

impl Eq for Course {}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            self.name, self.duration, self.students, self.level, self.language, self.price
        )
    }
}

/// Parse one catalog line: `name,duration,students,level,language,price`.
///
/// The returned error carries line number 0; callers that know the position
/// rewrite it (see `catalog::parse_catalog`).
impl FromStr for Course {
    type Err = DomainError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != RECORD_FIELDS {
            return Err(malformed(format!(
                "expected {RECORD_FIELDS} fields, found {}",
                fields.len()
            )));
        }

        let duration = fields[1]
            .parse::<u32>()
            .map_err(|e| malformed(format!("duration '{}': {e}", fields[1])))?;
        let students = fields[2]
            .parse::<i64>()
            .map_err(|e| malformed(format!("students '{}': {e}", fields[2])))?;
        let price = fields[5]
            .parse::<f64>()
            .map_err(|e| malformed(format!("price '{}': {e}", fields[5])))?;

        Course::new(fields[0], duration, students, fields[3], fields[4], price)
    }
}

fn malformed(message: String) -> DomainError {
    DomainError::MalformedRecord { line: 0, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english(students: i64, price: f64) -> Course {
        Course::new("Eng", 10, students, "B1", "English", price).unwrap()
    }

    #[test]
    fn given_course_when_label_then_joins_name_level_language() {
        let course = english(5, 20.0);
        assert_eq!(course.label(), "Eng_B1_English");
    }

    #[test]
    fn given_course_when_benefit_then_is_total_income() {
        let course = english(5, 20.0);
        assert_eq!(course.benefit(), 1000.0);
    }

    #[test]
    fn given_negative_students_when_constructing_then_rejects() {
        let result = Course::new("Eng", 10, -1, "B1", "English", 20.0);
        assert!(matches!(
            result,
            Err(DomainError::InvalidAttribute { field: "students", .. })
        ));
    }

    #[test]
    fn given_zero_duration_when_constructing_then_rejects() {
        let result = Course::new("Eng", 0, 1, "B1", "English", 20.0);
        assert!(matches!(
            result,
            Err(DomainError::InvalidAttribute { field: "duration", .. })
        ));
    }

    #[test]
    fn given_nan_price_when_constructing_then_rejects() {
        let result = Course::new("Eng", 10, 1, "B1", "English", f64::NAN);
        assert!(result.is_err());
    }

    #[test]
    fn given_negative_update_when_set_students_then_keeps_previous_value() {
        let mut course = english(5, 20.0);
        assert!(course.set_students(-3).is_err());
        assert_eq!(course.students(), 5);

        course.set_students(12).unwrap();
        assert_eq!(course.students(), 12);
    }

    #[test]
    fn given_different_pricing_when_comparing_then_same_offering() {
        let a = english(5, 20.0);
        let b = Course::new("Eng", 40, 1, "B1", "English", 99.0).unwrap();
        assert_eq!(a, b);

        let c = Course::new("Eng", 10, 5, "B2", "English", 20.0).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn given_course_when_renamed_then_label_changes_and_original_untouched() {
        let a = english(5, 20.0);
        let renamed = a.renamed("Eng AcademyA");
        assert_eq!(renamed.label(), "Eng AcademyA_B1_English");
        assert_eq!(renamed.students(), 5);
        assert_eq!(a.name(), "Eng");
    }

    #[test]
    fn given_course_when_display_then_lists_all_fields() {
        let course = english(5, 20.5);
        assert_eq!(course.to_string(), "Eng, 10, 5, B1, English, 20.5");
    }

    #[test]
    fn given_valid_line_when_parsing_then_builds_course() {
        let course: Course = "French Basics, 30, 12, A1, French, 7.5".parse().unwrap();
        assert_eq!(course.name(), "French Basics");
        assert_eq!(course.duration(), 30);
        assert_eq!(course.students(), 12);
        assert_eq!(course.level(), "A1");
        assert_eq!(course.language(), "French");
        assert_eq!(course.price(), 7.5);
    }

    #[test]
    fn given_missing_field_when_parsing_then_malformed() {
        let result = "French Basics,30,12,A1,French".parse::<Course>();
        assert!(matches!(result, Err(DomainError::MalformedRecord { .. })));
    }

    #[test]
    fn given_non_numeric_price_when_parsing_then_malformed() {
        let result = "French Basics,30,12,A1,French,cheap".parse::<Course>();
        match result {
            Err(DomainError::MalformedRecord { message, .. }) => {
                assert!(message.contains("price"), "unexpected message: {message}")
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }
}

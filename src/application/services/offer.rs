//! Offer service: merges and statistics with configured academy names.

use std::collections::BTreeMap;

use tracing::{info, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{added_offer, average_students, common_offer, total_income, Catalog, Dimension};

/// Statistic computed over a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Metric {
    /// Average students per language
    Language,
    /// Average students per level
    Level,
    /// Total income of all courses
    Income,
}

/// Result of a [`Metric`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetricReport {
    Averages {
        dimension: Dimension,
        groups: BTreeMap<String, f64>,
    },
    Income(f64),
}

/// Runs the cross-catalog merges.
pub struct OfferService {
    academy_a: String,
    academy_b: String,
}

impl OfferService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            academy_a: settings.academy_a.clone(),
            academy_b: settings.academy_b.clone(),
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn common(&self, a: &Catalog, b: &Catalog) -> ApplicationResult<Catalog> {
        let merged = common_offer(a, b)?;
        info!("common offer: {} of {}/{} courses", merged.len(), a.len(), b.len());
        Ok(merged)
    }

    /// Added offer, renaming after the configured academies unless overridden.
    #[instrument(level = "debug", skip(self, a, b))]
    pub fn added(
        &self,
        a: &Catalog,
        b: &Catalog,
        name_a: Option<&str>,
        name_b: Option<&str>,
    ) -> ApplicationResult<Catalog> {
        let names = (
            name_a.unwrap_or(self.academy_a.as_str()),
            name_b.unwrap_or(self.academy_b.as_str()),
        );
        let merged = added_offer(a, b, names)?;
        info!("added offer: {} courses from {}/{}", merged.len(), a.len(), b.len());
        Ok(merged)
    }

    pub fn statistics(&self, catalog: &Catalog, metric: Metric) -> MetricReport {
        match metric {
            Metric::Language => MetricReport::Averages {
                dimension: Dimension::Language,
                groups: average_students(catalog, Dimension::Language),
            },
            Metric::Level => MetricReport::Averages {
                dimension: Dimension::Level,
                groups: average_students(catalog, Dimension::Level),
            },
            Metric::Income => MetricReport::Income(total_income(catalog)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{add_course, Course};

    fn catalog(courses: &[(&str, &str, i64)]) -> Catalog {
        let mut catalog = Catalog::new();
        for (name, level, students) in courses {
            add_course(
                &mut catalog,
                Course::new(*name, 10, *students, *level, "German", 5.0).unwrap(),
            );
        }
        catalog
    }

    #[test]
    fn given_settings_names_when_added_then_renamed_after_configured_academies() {
        let settings = Settings {
            academy_a: "North".into(),
            academy_b: "South".into(),
            ..Settings::default()
        };
        let service = OfferService::new(&settings);
        let a = catalog(&[("Deutsch", "A1", 2)]);
        let b = catalog(&[("Deutsch", "A2", 3)]);

        let merged = service.added(&a, &b, None, None).unwrap();

        assert!(merged.contains("Deutsch North_A1_German"));
        assert!(merged.contains("Deutsch South_A2_German"));
    }

    #[test]
    fn given_explicit_names_when_added_then_override_settings() {
        let service = OfferService::new(&Settings::default());
        let a = catalog(&[("Deutsch", "A1", 2)]);
        let b = catalog(&[("Deutsch", "A2", 3)]);

        let merged = service.added(&a, &b, Some("X"), None).unwrap();

        assert!(merged.contains("Deutsch X_A1_German"));
        assert!(merged.contains("Deutsch AcademyB_A2_German"));
    }

    #[test]
    fn given_income_metric_then_sums_total_income() {
        let service = OfferService::new(&Settings::default());
        let c = catalog(&[("Deutsch", "A1", 2), ("Deutsch", "A2", 4)]);
        assert_eq!(service.statistics(&c, Metric::Income), MetricReport::Income(300.0));
    }
}

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use crate::record::{Opportunity, Provider};

/// Isolated directory for snapshot and config files.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl UnitTestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            data_path,
        }
    }

    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }
}

/// The instant every fixture is evaluated at: 2025-06-01T00:00:00Z.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
}

/// One grant per status plus a nationwide and an undated one.
pub fn sample_grants() -> Vec<Opportunity> {
    vec![
        Opportunity::new("g-solar", "Solar Savings Rebate")
            .with_description("Rebate for rooftop solar installs")
            .with_window(date(2025, 1, 1), date(2025, 12, 31))
            .with_kind("rebate")
            .with_uses(["Solar", "Energy Efficiency"])
            .with_requirements(["Homeowner"]),
        Opportunity::new("g-roof-old", "Roof Replacement Program")
            .with_window(date(2024, 1, 1), date(2024, 12, 31))
            .with_kind("grant")
            .with_uses(["Roof Repair"])
            .with_requirements(["Homeowner", "Income Limit", "Inspection"]),
        Opportunity::new("g-national", "National Resilience Fund")
            .with_window(date(2025, 3, 1), date(2025, 9, 30))
            .nationwide(true)
            .with_kind("grant")
            .with_uses(["Storm Mitigation"]),
        Opportunity::new("g-flood", "Flood Barrier Loan")
            .with_window(date(2025, 7, 1), date(2025, 10, 1))
            .with_kind("loan")
            .with_uses(["Flood Protection"])
            .with_requirements(["Homeowner", "Flood Zone", "Insurance"]),
        Opportunity::new("g-undated", "Community Tree Grant")
            .with_kind("grant")
            .with_tags(["urban"]),
    ]
}

pub fn sample_agents() -> Vec<Provider> {
    vec![
        Provider::new("a-dana", "Dana Reyes")
            .with_rating(4.8)
            .with_response_hours(2)
            .with_specialties(["Flood", "Roof"])
            .with_certifications(["CPCU"])
            .online(true),
        Provider::new("a-sam", "Sam Okafor")
            .with_rating(4.2)
            .with_response_hours(24)
            .with_specialties(["Wildfire"]),
        Provider::new("a-lee", "Lee Park")
            .with_specialties(["Flood"])
            .with_certifications(["AINS"]),
    ]
}

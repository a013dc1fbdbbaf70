//! Imports the institutional activity catalog from CSV exports.
//!
//! Registrars maintain the catalog in spreadsheets; this module turns an
//! export into activity drafts the planning service can load in bulk.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::planning::domain::{FunctionalCategory, NewActivity};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { row: usize, problem: String },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::Row { row, problem } => {
                write!(f, "catalog row {}: {}", row, problem)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NewActivity>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<NewActivity>, CatalogImportError> {
        let mut drafts: Vec<NewActivity> = Vec::new();

        for record in parser::parse_rows(reader)? {
            if drafts.iter().any(|draft| draft.code == record.code) {
                return Err(CatalogImportError::Row {
                    row: record.row,
                    problem: format!("duplicate catalog code {}", record.code),
                });
            }

            drafts.push(NewActivity {
                code: record.code,
                category: record.category,
                description: record.description,
                max_period_hours: record.max_period_hours,
                max_weekly_hours: record.max_weekly_hours,
                evidence_required: record.evidence_required,
            });
        }

        Ok(drafts)
    }
}

/// The catalog the institution starts every academic year from.
pub fn standard_catalog() -> Vec<NewActivity> {
    vec![
        NewActivity {
            code: "DOC-01".to_string(),
            category: FunctionalCategory::Teaching,
            description: Some("Scheduled lecture hours".to_string()),
            max_period_hours: Some(320),
            max_weekly_hours: Some(20),
            evidence_required: true,
        },
        NewActivity {
            code: "DOC-02".to_string(),
            category: FunctionalCategory::Teaching,
            description: Some("Student tutoring and academic advising".to_string()),
            max_period_hours: Some(96),
            max_weekly_hours: Some(6),
            evidence_required: false,
        },
        NewActivity {
            code: "DOC-03".to_string(),
            category: FunctionalCategory::Teaching,
            description: Some("Exam preparation and grading".to_string()),
            max_period_hours: Some(64),
            max_weekly_hours: Some(4),
            evidence_required: false,
        },
        NewActivity {
            code: "INV-01".to_string(),
            category: FunctionalCategory::Research,
            description: Some("Funded research project participation".to_string()),
            max_period_hours: None,
            max_weekly_hours: None,
            evidence_required: true,
        },
        NewActivity {
            code: "INV-02".to_string(),
            category: FunctionalCategory::Research,
            description: Some("Thesis direction".to_string()),
            max_period_hours: Some(128),
            max_weekly_hours: Some(8),
            evidence_required: true,
        },
        NewActivity {
            code: "VIN-01".to_string(),
            category: FunctionalCategory::Outreach,
            description: Some("Community outreach program".to_string()),
            max_period_hours: None,
            max_weekly_hours: None,
            evidence_required: true,
        },
        NewActivity {
            code: "GES-01".to_string(),
            category: FunctionalCategory::Management,
            description: Some("Program coordination".to_string()),
            max_period_hours: Some(160),
            max_weekly_hours: Some(10),
            evidence_required: false,
        },
        NewActivity {
            code: "GES-02".to_string(),
            category: FunctionalCategory::Management,
            description: Some("Committee and board duty".to_string()),
            max_period_hours: Some(64),
            max_weekly_hours: Some(4),
            evidence_required: false,
        },
    ]
}

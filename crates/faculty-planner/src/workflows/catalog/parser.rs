use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::normalizer::category_for_token;
use super::CatalogImportError;
use crate::workflows::planning::domain::FunctionalCategory;

#[derive(Debug)]
pub(crate) struct CatalogRecord {
    pub(crate) row: usize,
    pub(crate) code: String,
    pub(crate) category: FunctionalCategory,
    pub(crate) description: Option<String>,
    pub(crate) max_period_hours: Option<u32>,
    pub(crate) max_weekly_hours: Option<u32>,
    pub(crate) evidence_required: bool,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    // Row numbers are spreadsheet-style, counting the header as row 1.
    for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = index + 2;
        let parsed = record?;
        records.push(parsed.into_record(row)?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(
        rename = "Description",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    description: Option<String>,
    #[serde(
        rename = "Max Period Hours",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    max_period_hours: Option<String>,
    #[serde(
        rename = "Max Weekly Hours",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    max_weekly_hours: Option<String>,
    #[serde(
        rename = "Evidence Required",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    evidence_required: Option<String>,
}

impl CatalogRow {
    fn into_record(self, row: usize) -> Result<CatalogRecord, CatalogImportError> {
        let code = self.code.trim().to_string();
        if code.is_empty() {
            return Err(CatalogImportError::Row {
                row,
                problem: "catalog code is blank".to_string(),
            });
        }

        let category =
            category_for_token(&self.category).ok_or_else(|| CatalogImportError::Row {
                row,
                problem: format!("unknown category {:?}", self.category),
            })?;

        Ok(CatalogRecord {
            row,
            code,
            category,
            description: self.description,
            max_period_hours: parse_hours(self.max_period_hours.as_deref(), "max period hours", row)?,
            max_weekly_hours: parse_hours(self.max_weekly_hours.as_deref(), "max weekly hours", row)?,
            evidence_required: parse_flag(self.evidence_required.as_deref(), row)?,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_hours(
    value: Option<&str>,
    column: &str,
    row: usize,
) -> Result<Option<u32>, CatalogImportError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| CatalogImportError::Row {
                row,
                problem: format!("{} is not a whole number of hours: {:?}", column, raw),
            }),
    }
}

fn parse_flag(value: Option<&str>, row: usize) -> Result<bool, CatalogImportError> {
    let Some(raw) = value else {
        return Ok(false);
    };

    match raw.trim().to_lowercase().as_str() {
        "si" | "sí" | "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(CatalogImportError::Row {
            row,
            problem: format!("evidence flag is not recognized: {:?}", raw),
        }),
    }
}

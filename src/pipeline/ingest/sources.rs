use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::IngestError;
use crate::models::{Category, KnowledgeChunk};

/// One row of a tabular knowledge source, keyed by trimmed column header.
///
/// All readers produce this shape, so the normalizers below depend on one
/// consistent record abstraction instead of per-format row types.
#[derive(Debug, Clone, Default)]
pub struct SourceRecord {
    fields: HashMap<String, String>,
}

impl SourceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &str, value: &str) {
        self.fields
            .insert(column.trim().to_string(), value.trim().to_string());
    }

    /// Cell value for a column; absent or blank cells read as "".
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    fn from_row(headers: &csv::StringRecord, row: &csv::StringRecord) -> Self {
        let mut record = Self::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            record.set(header, value);
        }
        record
    }
}

/// Read every row of a CSV source into `SourceRecord`s.
///
/// Rows with a deviant field count are tolerated (short rows read as
/// empty cells); rows the reader cannot decode are skipped with a log
/// line rather than failing the file.
pub fn read_csv_records(path: &Path) -> Result<Vec<SourceRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        match row {
            Ok(row) => records.push(SourceRecord::from_row(&headers, &row)),
            Err(e) => tracing::debug!(error = %e, "Skipping unreadable CSV row"),
        }
    }
    Ok(records)
}

/// A disease fact sheet: one text file, filename (minus extension) as the
/// disease name.
#[derive(Debug, Clone)]
pub struct DiseaseFile {
    pub name: String,
    pub text: String,
}

/// Read every `.txt` file in the disease directory, sorted by file name
/// for a deterministic ingestion order. Unreadable files are skipped with
/// a warning.
pub fn read_disease_files(dir: &Path) -> Result<Vec<DiseaseFile>, IngestError> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().trim().to_string())
            .unwrap_or_default();
        match fs::read_to_string(&path) {
            Ok(content) => files.push(DiseaseFile {
                name,
                text: content.trim().to_string(),
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable disease file");
            }
        }
    }
    Ok(files)
}

// ── Normalizers: one structured record → one KnowledgeChunk ──
//
// Each returns None when the identifying name field is empty or missing;
// such records are skipped, never errors.

pub fn medicine_chunk(record: &SourceRecord) -> Option<KnowledgeChunk> {
    let name = record.get("Name");
    if name.is_empty() {
        return None;
    }
    let text = format!(
        "Name: {name}\n\
         Contains: {}\n\
         ProductIntroduction: {}\n\
         ProductBenefits: {}\n\
         SideEffect: {}\n\
         HowToUse: {}\n\
         HowWorks: {}\n\
         QuickTips: {}\n\
         SafetyAdvice: {}\n\
         Chemical_Class: {}\n\
         Habit_Forming: {}\n\
         Therapeutic_Class: {}\n\
         Action_Class: {}",
        record.get("Contains"),
        record.get("ProductIntroduction"),
        record.get("ProductBenefits"),
        record.get("SideEffect"),
        record.get("HowToUse"),
        record.get("HowWorks"),
        record.get("QuickTips"),
        record.get("SafetyAdvice"),
        record.get("Chemical_Class"),
        record.get("Habit_Forming"),
        record.get("Therapeutic_Class"),
        record.get("Action_Class"),
    );
    Some(KnowledgeChunk::new(Category::Medicine, name, text))
}

pub fn remedy_chunk(record: &SourceRecord) -> Option<KnowledgeChunk> {
    let name = record.get("Name of Item");
    if name.is_empty() {
        return None;
    }
    let text = format!(
        "Name: {name}\n\
         Health Issue: {}\n\
         Remedy: {}\n\
         Yogasan: {}",
        record.get("Health Issue"),
        record.get("Home Remedy"),
        record.get("Yogasan"),
    );
    Some(KnowledgeChunk::new(Category::Remedy, name, text))
}

pub fn lab_test_chunk(record: &SourceRecord) -> Option<KnowledgeChunk> {
    let name = record.get("Parameter");
    if name.is_empty() {
        return None;
    }
    let text = format!(
        "Category: {}\n\
         Parameter: {name}\n\
         Male Range: {}\n\
         Female Range: {}\n\
         Child Range: {}\n\
         Neonate Range: {}\n\
         SI Unit: {}\n\
         Conventional Unit: {}\n\
         Interpretation: {}",
        record.get("Category"),
        record.get("Male Range"),
        record.get("Female Range"),
        record.get("Child Range"),
        record.get("Neonate Range"),
        record.get("SI Unit"),
        record.get("Conventional Unit"),
        record.get("Interpretation"),
    );
    Some(KnowledgeChunk::new(Category::LabTest, name, text))
}

/// Whole-file normalizer: empty names and empty fact sheets are skipped.
pub fn disease_chunk(file: &DiseaseFile) -> Option<KnowledgeChunk> {
    if file.name.is_empty() || file.text.is_empty() {
        return None;
    }
    Some(KnowledgeChunk::new(
        Category::Disease,
        file.name.as_str(),
        file.text.as_str(),
    ))
}

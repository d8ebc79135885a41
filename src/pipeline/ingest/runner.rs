use std::path::{Path, PathBuf};

use super::dedup::DedupIndex;
use super::sources::{
    disease_chunk, lab_test_chunk, medicine_chunk, read_csv_records, read_disease_files,
    remedy_chunk, SourceRecord,
};
use super::IngestError;
use crate::config;
use crate::models::KnowledgeChunk;
use crate::pipeline::storage::types::{
    Distance, EmbeddingModel, PointPayload, PointRecord, VectorStore,
};

/// Rows buffered before a flush for short tabular records.
const TABULAR_FLUSH_ROWS: usize = 1000;

/// Files buffered before a flush for long free-text fact sheets.
const DISEASE_FLUSH_FILES: usize = 500;

/// Page size for the dedup-building scroll.
const SCROLL_PAGE_SIZE: usize = 1000;

/// Locations of the four knowledge sources.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub medicines: PathBuf,
    pub remedies: PathBuf,
    pub lab_tests: PathBuf,
    pub diseases: PathBuf,
}

impl SourcePaths {
    pub fn from_config() -> Self {
        Self {
            medicines: config::medicine_file(),
            remedies: config::remedy_file(),
            lab_tests: config::lab_file(),
            diseases: config::disease_dir(),
        }
    }
}

/// Outcome counters for one source kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceReport {
    /// Chunks embedded and upserted this run.
    pub ingested: usize,
    /// Chunks dropped because their identity pair was already present.
    pub skipped_existing: usize,
    /// Records dropped for a missing identifying name or empty content.
    pub skipped_invalid: usize,
}

/// Outcome of a full ingestion run, per source kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestReport {
    pub medicines: SourceReport,
    pub remedies: SourceReport,
    pub lab_tests: SourceReport,
    pub diseases: SourceReport,
}

impl IngestReport {
    pub fn total_ingested(&self) -> usize {
        self.medicines.ingested
            + self.remedies.ingested
            + self.lab_tests.ingested
            + self.diseases.ingested
    }
}

/// Batch ingestion of the knowledge sources into the vector store.
///
/// A run is: ensure collection → rebuild the dedup index from the live
/// store → medicines → remedies → lab tests → diseases. Each source is
/// attempted even when an earlier one is absent; a missing file or
/// directory is a logged skip, not a failure.
pub struct KnowledgeIngestor<'a, E: EmbeddingModel, V: VectorStore> {
    embedder: &'a E,
    store: &'a V,
    sources: SourcePaths,
}

impl<'a, E: EmbeddingModel, V: VectorStore> KnowledgeIngestor<'a, E, V> {
    pub fn new(embedder: &'a E, store: &'a V, sources: SourcePaths) -> Self {
        Self {
            embedder,
            store,
            sources,
        }
    }

    pub fn run(&self) -> Result<IngestReport, IngestError> {
        self.store
            .ensure_collection(self.embedder.dimension(), Distance::Cosine)?;
        let mut dedup = DedupIndex::build(self.store, SCROLL_PAGE_SIZE)?;

        let mut report = IngestReport::default();
        report.medicines =
            self.ingest_tabular(&self.sources.medicines, "medicines", medicine_chunk, &mut dedup)?;
        report.remedies =
            self.ingest_tabular(&self.sources.remedies, "remedies", remedy_chunk, &mut dedup)?;
        report.lab_tests =
            self.ingest_tabular(&self.sources.lab_tests, "lab tests", lab_test_chunk, &mut dedup)?;
        report.diseases = self.ingest_diseases(&mut dedup)?;

        tracing::info!(total = report.total_ingested(), "Ingestion complete");
        Ok(report)
    }

    fn ingest_tabular(
        &self,
        path: &Path,
        label: &str,
        normalize: fn(&SourceRecord) -> Option<KnowledgeChunk>,
        dedup: &mut DedupIndex,
    ) -> Result<SourceReport, IngestError> {
        let mut report = SourceReport::default();
        if !path.exists() {
            tracing::warn!(source = label, path = %path.display(), "Source file not found, skipping");
            return Ok(report);
        }

        let records = read_csv_records(path)?;
        tracing::info!(source = label, rows = records.len(), "Ingesting tabular source");

        let mut batch: Vec<KnowledgeChunk> = Vec::new();
        for record in &records {
            let Some(chunk) = normalize(record) else {
                report.skipped_invalid += 1;
                tracing::debug!(source = label, "Record without identifying name skipped");
                continue;
            };
            if dedup.contains(chunk.category, &chunk.name) {
                report.skipped_existing += 1;
                continue;
            }
            batch.push(chunk);
            if batch.len() >= TABULAR_FLUSH_ROWS {
                self.flush(&mut batch, dedup, &mut report)?;
            }
        }
        self.flush(&mut batch, dedup, &mut report)?;

        tracing::info!(
            source = label,
            ingested = report.ingested,
            existing = report.skipped_existing,
            invalid = report.skipped_invalid,
            "Source done"
        );
        Ok(report)
    }

    fn ingest_diseases(&self, dedup: &mut DedupIndex) -> Result<SourceReport, IngestError> {
        let mut report = SourceReport::default();
        let dir = &self.sources.diseases;
        if !dir.is_dir() {
            tracing::warn!(path = %dir.display(), "Disease directory not found, skipping");
            return Ok(report);
        }

        let files = read_disease_files(dir)?;
        tracing::info!(files = files.len(), "Ingesting disease fact sheets");

        let mut batch: Vec<KnowledgeChunk> = Vec::new();
        for file in &files {
            let Some(chunk) = disease_chunk(file) else {
                report.skipped_invalid += 1;
                tracing::debug!(name = %file.name, "Empty disease file skipped");
                continue;
            };
            if dedup.contains(chunk.category, &chunk.name) {
                report.skipped_existing += 1;
                continue;
            }
            batch.push(chunk);
            if batch.len() >= DISEASE_FLUSH_FILES {
                self.flush(&mut batch, dedup, &mut report)?;
            }
        }
        self.flush(&mut batch, dedup, &mut report)?;

        tracing::info!(
            ingested = report.ingested,
            existing = report.skipped_existing,
            invalid = report.skipped_invalid,
            "Disease source done"
        );
        Ok(report)
    }

    /// Embed the buffered chunks, upsert them, then teach the dedup index
    /// their keys so later batches skip them.
    fn flush(
        &self,
        batch: &mut Vec<KnowledgeChunk>,
        dedup: &mut DedupIndex,
        report: &mut SourceReport,
    ) -> Result<(), IngestError> {
        if batch.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;

        let points: Vec<PointRecord> = batch
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| PointRecord {
                id: chunk.point_id(),
                vector,
                payload: PointPayload {
                    category: chunk.category.as_str().to_string(),
                    name: chunk.name.clone(),
                    text: chunk.text.clone(),
                },
            })
            .collect();
        self.store.upsert(&points)?;

        for chunk in batch.iter() {
            dedup.insert(chunk.category, &chunk.name);
        }
        report.ingested += batch.len();
        tracing::debug!(count = batch.len(), "Flushed chunk batch");
        batch.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::storage::embedder::MockEmbedder;
    use crate::pipeline::storage::vectordb::InMemoryVectorStore;
    use std::fs;
    use tempfile::TempDir;

    fn write_sources(dir: &TempDir) -> SourcePaths {
        let medicines = dir.path().join("medicines.csv");
        fs::write(
            &medicines,
            "Name,Contains,SideEffect\n\
             Paracetamol,Paracetamol 500mg,Nausea\n\
             Ibuprofen,Ibuprofen 400mg,Heartburn\n",
        )
        .unwrap();

        let remedies = dir.path().join("home_remedies.csv");
        fs::write(
            &remedies,
            "Name of Item,Health Issue,Home Remedy,Yogasan\n\
             Ginger,Sore throat,Ginger tea,Bhujangasana\n",
        )
        .unwrap();

        let lab_tests = dir.path().join("lab_report_master.csv");
        fs::write(
            &lab_tests,
            "Category,Parameter,Male Range,Female Range,Child Range,Neonate Range,SI Unit,Conventional Unit,Interpretation\n\
             Hematology,Hemoglobin,13.8-17.2,12.1-15.1,11-16,14-24,g/L,g/dL,Low suggests anemia\n",
        )
        .unwrap();

        let diseases = dir.path().join("diseases");
        fs::create_dir(&diseases).unwrap();
        fs::write(diseases.join("malaria.txt"), "Malaria is mosquito-borne.\n").unwrap();
        fs::write(diseases.join("empty.txt"), "   \n").unwrap();

        SourcePaths {
            medicines,
            remedies,
            lab_tests,
            diseases,
        }
    }

    #[test]
    fn run_ingests_every_source_kind() {
        let dir = TempDir::new().unwrap();
        let sources = write_sources(&dir);
        let embedder = MockEmbedder::with_dimension(8);
        let store = InMemoryVectorStore::new();

        let report = KnowledgeIngestor::new(&embedder, &store, sources)
            .run()
            .unwrap();

        assert_eq!(report.medicines.ingested, 2);
        assert_eq!(report.remedies.ingested, 1);
        assert_eq!(report.lab_tests.ingested, 1);
        assert_eq!(report.diseases.ingested, 1);
        assert_eq!(report.diseases.skipped_invalid, 1);
        assert_eq!(store.count(), 5);
        assert_eq!(store.dimension(), Some(8));
    }

    #[test]
    fn second_run_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let sources = write_sources(&dir);
        let embedder = MockEmbedder::with_dimension(8);
        let store = InMemoryVectorStore::new();

        let ingestor = KnowledgeIngestor::new(&embedder, &store, sources);
        ingestor.run().unwrap();
        let second = ingestor.run().unwrap();

        assert_eq!(second.total_ingested(), 0);
        assert_eq!(second.medicines.skipped_existing, 2);
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn dedup_ignores_case_and_whitespace_across_runs() {
        let dir = TempDir::new().unwrap();
        let mut sources = write_sources(&dir);

        let embedder = MockEmbedder::with_dimension(8);
        let store = InMemoryVectorStore::new();
        KnowledgeIngestor::new(&embedder, &store, sources.clone())
            .run()
            .unwrap();

        // Same medicine, different case and padding
        let respelled = dir.path().join("medicines_respelled.csv");
        fs::write(
            &respelled,
            "Name,Contains,SideEffect\n  paracetamol  ,Paracetamol 500mg,Nausea\n",
        )
        .unwrap();
        sources.medicines = respelled;

        let report = KnowledgeIngestor::new(&embedder, &store, sources)
            .run()
            .unwrap();
        assert_eq!(report.medicines.ingested, 0);
        assert_eq!(report.medicines.skipped_existing, 1);
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn duplicate_names_within_one_file_store_once() {
        let dir = TempDir::new().unwrap();
        let medicines = dir.path().join("medicines.csv");
        fs::write(
            &medicines,
            "Name,Contains\nAspirin,ASA\nAspirin,ASA again\n",
        )
        .unwrap();

        let sources = SourcePaths {
            medicines,
            remedies: dir.path().join("none.csv"),
            lab_tests: dir.path().join("none2.csv"),
            diseases: dir.path().join("none3"),
        };
        let embedder = MockEmbedder::with_dimension(8);
        let store = InMemoryVectorStore::new();

        KnowledgeIngestor::new(&embedder, &store, sources)
            .run()
            .unwrap();

        // both rows share one deterministic point id, so the store holds one
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn missing_sources_skip_without_failing_the_run() {
        let dir = TempDir::new().unwrap();
        let remedies = dir.path().join("home_remedies.csv");
        fs::write(
            &remedies,
            "Name of Item,Health Issue,Home Remedy,Yogasan\nHoney,Cough,Warm honey water,\n",
        )
        .unwrap();

        let sources = SourcePaths {
            medicines: dir.path().join("absent.csv"),
            remedies,
            lab_tests: dir.path().join("absent2.csv"),
            diseases: dir.path().join("absent-dir"),
        };
        let embedder = MockEmbedder::with_dimension(8);
        let store = InMemoryVectorStore::new();

        let report = KnowledgeIngestor::new(&embedder, &store, sources)
            .run()
            .unwrap();

        assert_eq!(report.medicines, SourceReport::default());
        assert_eq!(report.remedies.ingested, 1);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn rows_without_names_are_counted_invalid() {
        let dir = TempDir::new().unwrap();
        let medicines = dir.path().join("medicines.csv");
        fs::write(&medicines, "Name,Contains\n,mystery compound\nAspirin,ASA\n").unwrap();

        let sources = SourcePaths {
            medicines,
            remedies: dir.path().join("none.csv"),
            lab_tests: dir.path().join("none2.csv"),
            diseases: dir.path().join("none3"),
        };
        let embedder = MockEmbedder::with_dimension(8);
        let store = InMemoryVectorStore::new();

        let report = KnowledgeIngestor::new(&embedder, &store, sources)
            .run()
            .unwrap();
        assert_eq!(report.medicines.skipped_invalid, 1);
        assert_eq!(report.medicines.ingested, 1);
    }

    #[test]
    fn stored_payload_carries_category_name_text() {
        let dir = TempDir::new().unwrap();
        let sources = write_sources(&dir);
        let embedder = MockEmbedder::with_dimension(8);
        let store = InMemoryVectorStore::new();

        KnowledgeIngestor::new(&embedder, &store, sources)
            .run()
            .unwrap();

        let payloads: Vec<_> = store
            .scroll_all(100)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let hemoglobin = payloads
            .iter()
            .find(|p| p.name == "Hemoglobin")
            .expect("lab row stored");
        assert_eq!(hemoglobin.category, "lab_test");
        assert!(hemoglobin.text.contains("Male Range: 13.8-17.2"));
    }
}

//! Content loading.
//!
//! Bulk-loads raw skill records into a registry. Each record is accepted or
//! rejected on its own: one bad descriptor never blocks the others, and the
//! caller receives every rejection as an `(id, error)` pair.
//!
//! Records can be read from RON text; the bundled demo content lives in
//! `data/skills.ron`.

use super::definition::SkillId;
use super::record::SkillRecord;
use super::registry::SkillRegistry;
use crate::error::{ContentError, RegisterError};

const BUILTIN_SKILLS: &str = include_str!("../../data/skills.ron");

/// Outcome of a bulk load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// IDs registered, in input order.
    pub registered: Vec<SkillId>,
    /// Rejected records, keyed by their raw ID, in input order.
    pub failures: Vec<(i64, RegisterError)>,
}

impl LoadReport {
    /// Check whether every record was registered.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Register every valid record, collecting the failures.
pub fn load_batch(
    registry: &mut SkillRegistry,
    records: impl IntoIterator<Item = SkillRecord>,
) -> LoadReport {
    let mut report = LoadReport::default();

    for record in records {
        let raw_id = record.id;
        match registry.register(record) {
            Ok(id) => report.registered.push(id),
            Err(err) => {
                tracing::warn!("skipping skill {}: {}", raw_id, err);
                report.failures.push((raw_id, err));
            }
        }
    }

    tracing::debug!(
        "loaded {} skills ({} rejected)",
        report.registered.len(),
        report.failures.len()
    );
    report
}

/// Parse a RON list of skill records.
pub fn parse_records(text: &str) -> Result<Vec<SkillRecord>, ContentError> {
    Ok(ron::from_str(text)?)
}

/// Parse RON content and load it into the registry.
///
/// Fails only when the text itself cannot be parsed; invalid records are
/// reported in the returned `LoadReport`.
pub fn load_ron(registry: &mut SkillRegistry, text: &str) -> Result<LoadReport, ContentError> {
    let records = parse_records(text)?;
    Ok(load_batch(registry, records))
}

/// The demo skill set bundled with the crate.
pub fn builtin_records() -> Result<Vec<SkillRecord>, ContentError> {
    parse_records(BUILTIN_SKILLS)
}

//! Grade promotion on the target, plus the graduating-cohort export.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use cutover_core::config::TuningConfig;
use cutover_core::error::{CutoverError, Result};
use cutover_core::models::profile::{decode_row, Profile, Student};
use cutover_core::models::table::Table;
use cutover_core::store::TableStore;

use crate::export::SourceExport;
use crate::graduates::{write_graduates_csv, GraduateRecord};
use crate::paged::PagedReader;

#[derive(Debug, Clone)]
pub struct PromotionPolicy {
    pub from_grade: i64,
    pub graduating_grade: i64,
    pub batch_size: usize,
    pub export_dir: PathBuf,
}

impl From<&TuningConfig> for PromotionPolicy {
    fn from(tuning: &TuningConfig) -> Self {
        Self {
            from_grade: tuning.promote_from_grade,
            graduating_grade: tuning.graduating_grade,
            batch_size: tuning.batch_size,
            export_dir: PathBuf::from(&tuning.export_dir),
        }
    }
}

/// Number of students per grade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeDistribution {
    pub by_grade: BTreeMap<i64, usize>,
}

impl GradeDistribution {
    pub fn of(students: &[Student]) -> Self {
        let mut by_grade = BTreeMap::new();
        for student in students {
            *by_grade.entry(student.grade).or_insert(0) += 1;
        }
        Self { by_grade }
    }

    pub fn count(&self, grade: i64) -> usize {
        self.by_grade.get(&grade).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromotionReport {
    pub before: GradeDistribution,
    pub after: GradeDistribution,
    pub promoted: usize,
    pub graduates: Vec<GraduateRecord>,
    pub csv_path: Option<PathBuf>,
    /// Set when the cohort file could not be written. Grades stay updated.
    pub csv_warning: Option<String>,
}

async fn read_students<S>(target: &S, reader: &PagedReader) -> Result<Vec<Student>>
where
    S: TableStore + ?Sized,
{
    reader
        .fetch_all(target, Table::Students)
        .await?
        .iter()
        .map(decode_row::<Student>)
        .collect()
}

/// Join each graduating student with the email of its account and the
/// display name of its profile, both taken from the source export.
fn graduate_records(students: &[&Student], export: &SourceExport) -> Vec<GraduateRecord> {
    let emails = export.emails_by_id();
    let names: HashMap<String, String> = export
        .rows(Table::Profiles)
        .iter()
        .filter_map(|row| decode_row::<Profile>(row).ok())
        .filter_map(|p| Some((p.id, p.display_name?)))
        .collect();

    students
        .iter()
        .map(|s| GraduateRecord {
            id: s.id,
            user_id: s.user_id.clone(),
            email: emails.get(s.user_id.as_str()).copied().unwrap_or_default().to_string(),
            display_name: names.get(&s.user_id).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Move every student in `from_grade` up to `graduating_grade`, and export
/// the students who were already in `graduating_grade` beforehand.
///
/// A failing update batch aborts with [`CutoverError::Promotion`]. A failure
/// writing the cohort file is only recorded in the report.
pub async fn promote_grades<S>(
    target: &S,
    reader: &PagedReader,
    export: &SourceExport,
    policy: &PromotionPolicy,
    now: NaiveDateTime,
) -> Result<PromotionReport>
where
    S: TableStore + ?Sized,
{
    let students = read_students(target, reader).await?;
    let before = GradeDistribution::of(&students);

    let promotable: Vec<i64> = students
        .iter()
        .filter(|s| s.grade == policy.from_grade)
        .map(|s| s.id)
        .collect();
    let graduating: Vec<&Student> = students
        .iter()
        .filter(|s| s.grade == policy.graduating_grade)
        .collect();

    for (batch_index, ids) in promotable.chunks(policy.batch_size.max(1)).enumerate() {
        target
            .update_grade(ids, policy.graduating_grade)
            .await
            .map_err(|e| CutoverError::Promotion {
                batch_index,
                reason: e.to_string(),
            })?;
        debug!(batch_index, students = ids.len(), "grade batch updated");
    }
    info!(
        promoted = promotable.len(),
        from = policy.from_grade,
        to = policy.graduating_grade,
        "grades promoted"
    );

    let graduates = graduate_records(&graduating, export);
    let mut csv_path = None;
    let mut csv_warning = None;
    if !graduates.is_empty() {
        match write_graduates_csv(&policy.export_dir, &graduates, now) {
            Ok(path) => {
                info!(
                    path = %path.display(),
                    students = graduates.len(),
                    "graduating cohort exported"
                );
                csv_path = Some(path);
            }
            Err(e) => {
                warn!(error = %e, "failed to write graduating cohort file");
                csv_warning = Some(e.to_string());
            }
        }
    }

    let after = GradeDistribution::of(&read_students(target, reader).await?);

    Ok(PromotionReport {
        before,
        after,
        promoted: promotable.len(),
        graduates,
        csv_path,
        csv_warning,
    })
}

//! Batch mode: title every image in a directory.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::assets::decode::decode_source;
use crate::assets::font::FontSpec;
use crate::compose::engine::{Composer, TitleRequest};
use crate::compose::theme::{Theme, Tier};
use crate::compose::title::resolve_title;
use crate::foundation::error::{TitlerError, TitlerResult};
use crate::store::save_copy;

/// A directory-wide titling run. Every regular file in `input_dir` is
/// attempted; titles are derived from file names.
#[derive(Clone, Debug)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub tier: Tier,
    pub logo_path: Option<PathBuf>,
    pub font: FontSpec,
    /// Character replaced by spaces when deriving titles from file names.
    pub separator: char,
    pub theme: Theme,
}

/// Per-run tally. Failed entries keep their error so callers can report them;
/// each failure is also logged as it happens.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, TitlerError)>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Run a batch job, one composer per worker thread.
///
/// Enumeration is non-recursive. Files run in parallel, so when several derive
/// the same output name the writer's exclusive claim decides which gets the
/// base name and which get numeric suffixes. A file that fails to decode,
/// split, or save is recorded as a failure and the run continues.
#[tracing::instrument(skip(job), fields(input = %job.input_dir.display()))]
pub fn process_batch(job: &BatchJob) -> TitlerResult<BatchReport> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(&job.input_dir)
        .map_err(|e| {
            TitlerError::validation(format!(
                "cannot read input directory '{}': {e}",
                job.input_dir.display()
            ))
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    tracing::info!(count = files.len(), "starting batch run");

    let results: Vec<(PathBuf, TitlerResult<PathBuf>)> = files
        .par_iter()
        .map_init(
            || Composer::new(job.theme.clone()),
            |composer, path| (path.clone(), title_one(composer, job, path)),
        )
        .collect();

    let mut report = BatchReport::default();
    for (source, result) in results {
        match result {
            Ok(saved) => report.succeeded.push(saved),
            Err(err) => {
                tracing::warn!(source = %source.display(), error = %err, "skipping file");
                report.failed.push((source, err));
            }
        }
    }
    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "batch run finished"
    );
    Ok(report)
}

fn title_one(composer: &mut Composer, job: &BatchJob, path: &PathBuf) -> TitlerResult<PathBuf> {
    let source = decode_source(path)?;
    let title = resolve_title(None, Some(path), job.separator);
    let composed = composer.compose(&TitleRequest {
        source,
        title,
        tier: job.tier,
        logo_path: job.logo_path.clone(),
        font: job.font.clone(),
    })?;
    save_copy(&composed, &job.output_dir)
}

use crate::batch::outcome::{BatchProgress, BatchResult, ConversionOutcome};
use crate::batch::request::ConversionRequest;
use crate::batch::writer::{keep_broken_copy, write_output};
use crate::converter::SvgConverter;
use crate::scanner::FileFilter;
use crate::ui::GracefulShutdown;
use crate::vector::{current_year, override_xml_content, prepend_header, OverrideInfo};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

pub type ProgressCallback<'a> = &'a (dyn Fn(&BatchProgress) + Sync);

/// Runs one batch: every candidate file goes through convert, override,
/// header and write on its own, and a failure only affects that file.
pub struct BatchConverter<'a> {
    converter: &'a dyn SvgConverter,
    filter: &'a FileFilter,
    shutdown: Option<&'a GracefulShutdown>,
}

impl<'a> BatchConverter<'a> {
    pub fn new(converter: &'a dyn SvgConverter, filter: &'a FileFilter) -> Self {
        Self {
            converter,
            filter,
            shutdown: None,
        }
    }

    pub fn with_shutdown(mut self, shutdown: &'a GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn run(
        &self,
        request: &ConversionRequest,
        progress_callback: Option<ProgressCallback<'_>>,
    ) -> BatchResult {
        let start = Instant::now();

        let candidates: Vec<&PathBuf> = request
            .files
            .iter()
            .filter(|path| {
                let keep = self.filter.is_source_file(path);
                if !keep {
                    log::debug!("ignoring {}", path.display());
                }
                keep
            })
            .collect();

        log::info!(
            "converting {} of {} files with the {} converter",
            candidates.len(),
            request.files.len(),
            self.converter.name()
        );

        let year = current_year();
        let base_progress = BatchProgress::new(candidates.len());
        let processed = AtomicUsize::new(0);

        let process = |path: &PathBuf| -> ConversionOutcome {
            let outcome = self.process_file(path, request, year);

            if let Some(callback) = progress_callback {
                let mut progress = base_progress.clone();
                progress.files_processed = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.current_file = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string());
                callback(&progress);
            }

            outcome
        };

        let outcomes = map_in_order(&candidates, request.jobs, process);
        BatchResult::from_outcomes(outcomes, start.elapsed())
    }

    fn process_file(&self, path: &Path, request: &ConversionRequest, year: i32) -> ConversionOutcome {
        let source = path.to_path_buf();
        let output_path = match self.filter.output_file_name(path) {
            Some(name) => request.output_dir.join(name),
            None => {
                return ConversionOutcome::failed(
                    source,
                    request.output_dir.clone(),
                    "input has no file name",
                )
            }
        };

        if let Some(shutdown) = self.shutdown {
            if !shutdown.is_running() {
                log::debug!("skipping {} after cancellation", path.display());
                return ConversionOutcome::skipped(source, output_path);
            }
        }

        let xml = match self.converter.convert(path) {
            Ok(xml) => xml,
            Err(e) => {
                log::warn!("{}", e);
                if request.keep_broken {
                    keep_broken_copy(path, &request.output_dir, &request.broken_extension);
                }
                return ConversionOutcome::failed(source, output_path, e.to_string());
            }
        };

        let xml = apply_overrides(xml, request);
        let xml = if request.add_header {
            prepend_header(&xml, year)
        } else {
            xml
        };

        match write_output(&output_path, &xml) {
            Ok(()) => {
                log::debug!("wrote {}", output_path.display());
                ConversionOutcome::converted(source, output_path)
            }
            Err(e) => {
                log::warn!("{}", e);
                ConversionOutcome::failed(source, output_path, e.to_string())
            }
        }
    }
}

/// Forces the requested dimensions. Text that does not parse is returned
/// unchanged.
fn apply_overrides(xml: String, request: &ConversionRequest) -> String {
    let info = OverrideInfo::new(request.width, request.height);
    if !info.is_requested() {
        return xml;
    }

    match override_xml_content(&xml, &info) {
        Some(rewritten) => rewritten,
        None => {
            log::debug!("converter output did not parse; size override skipped");
            xml
        }
    }
}

#[cfg(feature = "parallel")]
fn map_in_order<F>(paths: &[&PathBuf], jobs: usize, process: F) -> Vec<ConversionOutcome>
where
    F: Fn(&PathBuf) -> ConversionOutcome + Sync + Send,
{
    use rayon::prelude::*;

    if jobs > 1 && paths.len() > 1 {
        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            // Indexed collect keeps input order.
            Ok(pool) => return pool.install(|| paths.par_iter().map(|p| process(*p)).collect()),
            Err(e) => log::warn!("worker pool unavailable, converting sequentially: {}", e),
        }
    }

    paths.iter().map(|p| process(*p)).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_in_order<F>(paths: &[&PathBuf], jobs: usize, process: F) -> Vec<ConversionOutcome>
where
    F: Fn(&PathBuf) -> ConversionOutcome,
{
    if jobs > 1 {
        log::debug!("built without the parallel feature; using one worker");
    }

    paths.iter().map(|p| process(*p)).collect()
}

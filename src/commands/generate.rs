//! `projgen generate` command.

use std::path::{Path, PathBuf};

use log::{error, info};

use crate::adapters::dry_run::DryRunFileSystem;
use crate::context::ServiceContext;
use crate::emit::{EmitSummary, EmitterRegistry, ProjectFileFormat};
use crate::model::descriptor::ModelDescriptor;
use crate::model::ingest::ingest;
use crate::model::platform::HostPlatform;
use crate::writer::Comparison;

/// Name of the file stamped into the intermediate directory after a run
/// that changed something.
pub const TIMESTAMP_FILE: &str = "Timestamp";

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Model file to ingest.
    pub model: PathBuf,
    /// `+`-separated format list.
    pub formats: String,
    /// Host override; detected when absent.
    pub host: Option<HostPlatform>,
    /// How existing files are compared against generated content.
    pub comparison: Comparison,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Per-backend write results, in registry order.
    pub summaries: Vec<EmitSummary>,
    /// Backends that failed, with their error.
    pub failures: Vec<(ProjectFileFormat, String)>,
    /// Where the timestamp was written, if anything changed.
    pub timestamp: Option<PathBuf>,
}

impl GenerationReport {
    /// Total number of files written across backends.
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.summaries.iter().map(|s| s.written.len()).sum()
    }
}

/// Execute the `generate` command.
///
/// With a dry-run capture, the paths a real run would write are listed
/// after the summary.
///
/// # Errors
///
/// Returns an error string if the model cannot be loaded, no valid format
/// was requested, or any backend failed.
pub fn run(
    ctx: &ServiceContext,
    options: &GenerateOptions,
    dry_run: Option<&DryRunFileSystem>,
) -> Result<(), String> {
    let report = run_with_context(ctx, options)?;
    print_report(&report);
    if let Some(capture) = dry_run {
        for path in capture.skipped_writes() {
            println!("would write {}", path.display());
        }
    }

    if report.failures.is_empty() {
        Ok(())
    } else {
        let names: Vec<&str> = report.failures.iter().map(|(f, _)| f.as_str()).collect();
        Err(format!("generation failed for: {}", names.join(", ")))
    }
}

/// Runs every requested backend with the given context.
///
/// A failing backend is logged and recorded in the report; the remaining
/// backends still run.
///
/// # Errors
///
/// Returns an error string if the model cannot be loaded, the format list
/// is empty after parsing, or the timestamp cannot be written.
pub fn run_with_context(
    ctx: &ServiceContext,
    options: &GenerateOptions,
) -> Result<GenerationReport, String> {
    let formats = ProjectFileFormat::parse_list(&options.formats)?;
    let descriptor = ModelDescriptor::load(ctx.fs.as_ref(), &options.model)?;
    let host = options.host.unwrap_or_else(HostPlatform::detect);
    let model = ingest(ctx, &descriptor, host);
    info!("Generating {} project(s) for {host:?} host", model.projects.len());

    let registry = EmitterRegistry::new();
    let mut report = GenerationReport::default();

    for format in registry.formats().into_iter().filter(|f| formats.contains(f)) {
        let Some(emitter) = registry.get(format) else {
            continue;
        };
        let result = emitter
            .generate(ctx, &model)
            .and_then(|outputs| outputs.write(ctx, format, options.comparison));
        match result {
            Ok(summary) => report.summaries.push(summary),
            Err(e) => {
                error!("{format} generation failed: {e}");
                report.failures.push((format, e));
            }
        }
    }

    if report.written_count() > 0 {
        let path = model.intermediate_dir.join(TIMESTAMP_FILE);
        write_timestamp(ctx, &path)?;
        report.timestamp = Some(path);
    }

    Ok(report)
}

fn write_timestamp(ctx: &ServiceContext, path: &Path) -> Result<(), String> {
    let stamp = ctx.clock.now().to_rfc3339();
    ctx.fs
        .write(path, &format!("{stamp}\n"))
        .map_err(|e| format!("failed to write {}: {e}", path.display()))
}

fn print_report(report: &GenerationReport) {
    for summary in &report.summaries {
        println!(
            "{}: {} written, {} unchanged",
            summary.format,
            summary.written.len(),
            summary.unchanged.len()
        );
    }
    for (format, e) in &report.failures {
        println!("{format}: failed ({e})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::FixedClock;
    use crate::test_support::{fixture_fs, FIXTURE_YAML};
    use chrono::{TimeZone, Utc};

    const MODEL: &str = "/work/model.yaml";

    fn options(formats: &str) -> GenerateOptions {
        GenerateOptions {
            model: PathBuf::from(MODEL),
            formats: formats.to_string(),
            host: Some(HostPlatform::Linux),
            comparison: Comparison::default(),
        }
    }

    fn context(fs: crate::adapters::memory::MemoryFileSystem) -> ServiceContext {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        ServiceContext::new(Box::new(fs), Box::new(clock))
    }

    #[test]
    fn generates_every_format_and_stamps_the_run() {
        let fs = fixture_fs().with_file(MODEL, FIXTURE_YAML);
        let ctx = context(fs.clone());

        let report = run_with_context(&ctx, &options("CodeLite+Eddie+VSCode")).unwrap();

        let formats: Vec<ProjectFileFormat> = report.summaries.iter().map(|s| s.format).collect();
        assert_eq!(formats, ProjectFileFormat::ALL.to_vec());
        assert!(report.failures.is_empty());

        let stamp = Path::new("/work/UE4/Engine/Intermediate/ProjectFiles/Timestamp");
        assert_eq!(report.timestamp.as_deref(), Some(stamp));
        assert_eq!(fs.contents(stamp).unwrap(), "2024-05-01T12:00:00+00:00\n");
        assert!(fs.contents(Path::new("/work/UE4/UE4.workspace")).is_some());
        assert!(fs.contents(Path::new("/work/UE4/.vscode/tasks.json")).is_some());
    }

    #[test]
    fn second_run_writes_nothing() {
        let fs = fixture_fs().with_file(MODEL, FIXTURE_YAML);
        let ctx = context(fs.clone());

        run_with_context(&ctx, &options("CodeLite+Eddie+VisualStudioCode")).unwrap();
        let writes = fs.write_count();

        let report = run_with_context(&ctx, &options("CodeLite+Eddie+VisualStudioCode")).unwrap();
        assert_eq!(fs.write_count(), writes);
        assert_eq!(report.written_count(), 0);
        assert!(report.timestamp.is_none());
        assert!(report.summaries.iter().all(|s| !s.unchanged.is_empty()));
    }

    #[test]
    fn formats_run_in_registry_order() {
        let fs = fixture_fs().with_file(MODEL, FIXTURE_YAML);
        let ctx = context(fs);

        let report = run_with_context(&ctx, &options("vscode+eddie")).unwrap();
        let formats: Vec<ProjectFileFormat> = report.summaries.iter().map(|s| s.format).collect();
        assert_eq!(formats, vec![ProjectFileFormat::Eddie, ProjectFileFormat::VisualStudioCode]);
    }

    #[test]
    fn failing_backends_are_reported_not_fatal() {
        let fs = fixture_fs().with_file(MODEL, FIXTURE_YAML).read_only();
        let ctx = context(fs);

        let report = run_with_context(&ctx, &options("Eddie+VSCode")).unwrap();
        assert_eq!(report.failures.len(), 2);
        assert!(report.summaries.is_empty());
        assert!(report.timestamp.is_none());

        let err = run(&ctx, &options("Eddie"), None).unwrap_err();
        assert!(err.contains("Eddie"));
    }

    #[test]
    fn missing_model_is_an_error() {
        let ctx = context(fixture_fs());
        let err = run_with_context(&ctx, &options("Eddie")).unwrap_err();
        assert!(err.contains("/work/model.yaml"));
    }

    #[test]
    fn unknown_formats_only_is_an_error() {
        let ctx = context(fixture_fs().with_file(MODEL, FIXTURE_YAML));
        assert!(run_with_context(&ctx, &options("VisualStudio")).is_err());
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let fs = fixture_fs().with_file(MODEL, FIXTURE_YAML);
        let capture = DryRunFileSystem::new(Box::new(fs.clone()));
        let ctx = ServiceContext::new(
            Box::new(capture.clone()),
            Box::new(FixedClock::at(Utc::now())),
        );

        let report = run_with_context(&ctx, &options("Eddie")).unwrap();
        assert_eq!(report.summaries[0].written.len(), 4);
        assert_eq!(fs.write_count(), 0);

        let skipped = capture.skipped_writes();
        assert_eq!(skipped.len(), 5);
        assert_eq!(skipped.last(), report.timestamp.as_ref());
    }

    #[test]
    fn exact_comparison_rewrites_case_only_changes() {
        let fs = fixture_fs().with_file(MODEL, FIXTURE_YAML);
        let ctx = context(fs.clone());
        run_with_context(&ctx, &options("Eddie")).unwrap();

        let master = Path::new("/work/UE4/Engine/Intermediate/ProjectFiles/UE4.wkst");
        let original = fs.contents(master).unwrap();
        ctx.fs.write(master, &original.to_uppercase()).unwrap();

        let lenient = run_with_context(&ctx, &options("Eddie")).unwrap();
        assert!(lenient.summaries[0].written.is_empty());

        let mut exact = options("Eddie");
        exact.comparison = Comparison::Exact;
        let report = run_with_context(&ctx, &exact).unwrap();
        assert_eq!(report.summaries[0].written, vec![master.to_path_buf()]);
        assert_eq!(fs.contents(master).unwrap(), original);
    }

    #[test]
    fn fresh_tree_settles_after_one_run() {
        let mut fs = crate::adapters::memory::MemoryFileSystem::new().with_file(MODEL, FIXTURE_YAML);
        for project in crate::test_support::fixture_descriptor().projects {
            for file in project.source_files {
                fs = fs.with_file(file.path, "");
            }
        }
        let ctx = context(fs.clone());
        let mut exact = options("CodeLite+Eddie+VisualStudioCode");
        exact.comparison = Comparison::Exact;

        run_with_context(&ctx, &exact).unwrap();
        let report = run_with_context(&ctx, &exact).unwrap();

        let rewritten: Vec<&PathBuf> = report.summaries.iter().flat_map(|s| &s.written).collect();
        assert!(rewritten.is_empty(), "rewritten on second run: {rewritten:?}");
        assert!(report.timestamp.is_none());
    }
}

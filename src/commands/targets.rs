//! `projgen targets` command.

use std::fmt::Write as _;
use std::path::Path;

use crate::context::ServiceContext;
use crate::model::descriptor::ModelDescriptor;
use crate::model::ingest::ingest;
use crate::model::platform::HostPlatform;
use crate::model::GenerationModel;

/// One row of the targets table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRow {
    /// Owning project name.
    pub project: String,
    /// Target name.
    pub target: String,
    /// Target type.
    pub target_type: String,
    /// Number of (platform, configuration) build products.
    pub products: usize,
}

/// Execute the `targets` command.
///
/// Displays a table of every ingested target with its project, type and
/// build product count.
///
/// # Errors
///
/// Returns an error string if the model cannot be loaded.
pub fn run(ctx: &ServiceContext, model_path: &Path, host: Option<HostPlatform>) -> Result<(), String> {
    let descriptor = ModelDescriptor::load(ctx.fs.as_ref(), model_path)?;
    let model = ingest(ctx, &descriptor, host.unwrap_or_else(HostPlatform::detect));

    let rows = rows(&model);
    if rows.is_empty() {
        println!("No targets found in model.");
        return Ok(());
    }
    print!("{}", render(&rows));
    println!("\n{} target(s) total.", rows.len());
    Ok(())
}

/// Rows in model order: projects by descriptor name, targets as declared.
#[must_use]
pub fn rows(model: &GenerationModel) -> Vec<TargetRow> {
    model
        .projects
        .iter()
        .flat_map(|project| {
            project.targets.iter().map(|target| TargetRow {
                project: project.name.clone(),
                target: target.name.clone(),
                target_type: target.target_type.to_string(),
                products: target.build_products.len(),
            })
        })
        .collect()
}

/// Renders rows as an aligned table with a header and separator line.
#[must_use]
pub fn render(rows: &[TargetRow]) -> String {
    let project_width = rows.iter().map(|r| r.project.len()).max().unwrap_or(7).max(7);
    let target_width = rows.iter().map(|r| r.target.len()).max().unwrap_or(6).max(6);
    let type_width = rows.iter().map(|r| r.target_type.len()).max().unwrap_or(4).max(4);
    let products_width = "PRODUCTS".len();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<project_width$}  {:<target_width$}  {:<type_width$}  {:>products_width$}",
        "PROJECT", "TARGET", "TYPE", "PRODUCTS",
    );
    let _ = writeln!(
        out,
        "{:-<project_width$}  {:-<target_width$}  {:-<type_width$}  {:-<products_width$}",
        "", "", "", "",
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<project_width$}  {:<target_width$}  {:<type_width$}  {:>products_width$}",
            row.project, row.target, row.target_type, row.products,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_model;

    #[test]
    fn rows_follow_model_order() {
        let rows = rows(&fixture_model(HostPlatform::Linux));
        let names: Vec<(&str, &str)> =
            rows.iter().map(|r| (r.project.as_str(), r.target.as_str())).collect();
        assert_eq!(
            names,
            vec![
                ("ShooterGame", "ShooterGame"),
                ("ShooterGame", "ShooterGameEditor"),
                ("UE4", "UE4Editor"),
                ("UE4", "ShaderCompileWorker"),
            ]
        );
        assert_eq!(rows[0].target_type, "Game");
    }

    #[test]
    fn table_columns_are_aligned() {
        let rows = vec![
            TargetRow {
                project: "UE4".to_string(),
                target: "ShaderCompileWorker".to_string(),
                target_type: "Program".to_string(),
                products: 10,
            },
            TargetRow {
                project: "ShooterGame".to_string(),
                target: "ShooterGame".to_string(),
                target_type: "Game".to_string(),
                products: 9,
            },
        ];
        let table = render(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("PROJECT      TARGET"));
        assert!(lines[1].starts_with("-----------  ---"));
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
        assert!(lines[3].ends_with("       9"));
    }

    #[test]
    fn missing_model_is_an_error() {
        let (ctx, _) = crate::test_support::fixture_context();
        let err = run(&ctx, Path::new("/nowhere.yaml"), Some(HostPlatform::Linux)).unwrap_err();
        assert!(err.contains("/nowhere.yaml"));
    }
}

//! Builds the [`GenerationModel`] from a loaded model descriptor.

use std::path::{Path, PathBuf};

use log::debug;

use crate::context::ServiceContext;
use crate::model::descriptor::{
    ModelDescriptor, PlatformSupport, ProjectDescriptor, ProjectKind, TargetRules,
};
use crate::model::platform::{Configuration, HostPlatform, Platform};
use crate::model::{
    has_extension, BuildProduct, CSharpOutput, GenerationModel, OutputKind, Project, SourceFile,
    Target,
};
use crate::naming::{compute_executable_name, LinkEnvironment};

/// Extensions retained for the IDE; everything else is dropped.
pub const INGESTED_EXTENSIONS: &[&str] = &[
    ".h", ".hpp", ".inl", ".c", ".cc", ".cpp", ".cs", ".uproject", ".uplugin", ".ini", ".usf",
    ".ush",
];

/// Normalizes `descriptor` into the model emitters consume.
///
/// Platform and SDK questions are answered by the descriptor itself; include
/// directories are checked for existence through the context's filesystem.
#[must_use]
pub fn ingest(ctx: &ServiceContext, descriptor: &ModelDescriptor, host: HostPlatform) -> GenerationModel {
    ingest_with(ctx, descriptor, descriptor, host)
}

/// Like [`ingest`], with platform questions answered by `support`.
#[must_use]
pub fn ingest_with(
    ctx: &ServiceContext,
    descriptor: &ModelDescriptor,
    support: &dyn PlatformSupport,
    host: HostPlatform,
) -> GenerationModel {
    let mut projects: Vec<Project> = descriptor
        .projects
        .iter()
        .filter(|p| {
            let keep = descriptor.include_engine_projects || !p.is_engine;
            if !keep {
                debug!("skipping engine project {}", p.path.display());
            }
            keep
        })
        .map(|p| ingest_project(ctx, descriptor, support, p))
        .collect();

    projects.sort_by(|a, b| {
        a.path
            .file_name()
            .cmp(&b.path.file_name())
            .then_with(|| a.path.cmp(&b.path))
    });

    let mut combined_include_paths = Vec::new();
    for path in projects.iter().flat_map(|p| &p.include_paths) {
        push_unique(&mut combined_include_paths, path);
    }

    GenerationModel {
        root_dir: descriptor.root_dir.clone(),
        engine_dir: descriptor.engine_dir.clone(),
        intermediate_dir: descriptor.intermediate_dir(),
        master_project_name: descriptor.master_project_name.clone(),
        host,
        use_precompiled: descriptor.use_precompiled,
        projects,
        combined_include_paths,
    }
}

fn ingest_project(
    ctx: &ServiceContext,
    descriptor: &ModelDescriptor,
    support: &dyn PlatformSupport,
    project: &ProjectDescriptor,
) -> Project {
    let name = project.name.clone().unwrap_or_else(|| {
        project
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let source_files: Vec<SourceFile> = project
        .source_files
        .iter()
        .filter(|f| is_ingested(&f.path))
        .map(|f| SourceFile { path: f.path.clone(), base_folder: f.base_folder.clone() })
        .collect();
    if source_files.is_empty() {
        debug!("project {name} has no source files after filtering");
    }

    let targets = project
        .targets
        .iter()
        .map(|rules| ingest_target(descriptor, support, rules))
        .collect();

    let mut include_paths = Vec::new();
    for path in project
        .include_paths
        .iter()
        .chain(&project.system_include_paths)
        .chain(&descriptor.host_include_paths)
    {
        if ctx.fs.is_dir(path) {
            push_unique(&mut include_paths, path);
        } else {
            debug!("include path {} does not exist", path.display());
        }
    }

    let csharp = match (project.kind, &project.csharp) {
        (ProjectKind::Csharp, Some(cs)) => Some(CSharpOutput {
            output_file: cs.output_file.clone(),
            configurations: Configuration::ALL
                .into_iter()
                .filter(|c| cs.configurations.contains(c))
                .collect(),
        }),
        _ => None,
    };

    Project {
        path: project.path.clone(),
        name,
        kind: project.kind,
        base_dir: project.base_dir.clone(),
        is_engine: project.is_engine,
        source_files,
        targets,
        include_paths,
        csharp,
    }
}

fn ingest_target(
    descriptor: &ModelDescriptor,
    support: &dyn PlatformSupport,
    rules: &TargetRules,
) -> Target {
    let platforms: Vec<Platform> = Platform::ALL
        .into_iter()
        .filter(|p| rules.platforms.contains(p) && descriptor.platforms.contains(p))
        .filter(|p| support.is_sdk_available(*p))
        .collect();

    let link = LinkEnvironment::for_target(rules);
    let kind = if link.compile_as_dll { OutputKind::Library } else { OutputKind::Executable };

    let mut build_products = Vec::new();
    for platform in platforms {
        for configuration in Configuration::ALL {
            if !support.is_valid_combination(rules, platform, configuration) {
                debug!("{} does not support {platform} {configuration}", rules.name);
                continue;
            }
            build_products.push(BuildProduct {
                platform,
                configuration,
                output: compute_executable_name(
                    &descriptor.engine_dir,
                    rules,
                    platform,
                    configuration,
                    link,
                ),
                project_file: rules.project_file.clone(),
                kind,
            });
        }
    }
    if build_products.is_empty() {
        debug!("target {} has no supported platform", rules.name);
    }

    Target {
        name: rules.name.clone(),
        target_type: rules.target_type,
        project_file: rules.project_file.clone(),
        build_products,
        defines: rules.defines.clone(),
    }
}

fn is_ingested(path: &Path) -> bool {
    let dotfile = path
        .file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'));
    !dotfile && has_extension(path, INGESTED_EXTENSIONS)
}

fn push_unique(paths: &mut Vec<PathBuf>, path: &Path) {
    if !paths.iter().any(|p| p == path) {
        paths.push(path.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::platform::TargetType;
    use crate::test_support::{fixture_context, fixture_descriptor};

    #[test]
    fn projects_are_sorted_by_descriptor_file_name() {
        let ctx = fixture_context().0;
        let model = ingest(&ctx, &fixture_descriptor(), HostPlatform::Linux);
        let names: Vec<&str> = model.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ShooterGame", "UE4", "UnrealBuildTool"]);
    }

    #[test]
    fn products_cover_only_available_and_valid_combinations() {
        let ctx = fixture_context().0;
        let model = ingest(&ctx, &fixture_descriptor(), HostPlatform::Linux);
        let shooter = &model.projects[0];
        let game = shooter.targets.iter().find(|t| t.name == "ShooterGame").unwrap();

        // Mac is configured but its SDK is missing.
        assert_eq!(game.platforms(), vec![Platform::Win64, Platform::Linux]);
        assert!(game.product_for(Platform::Linux, Configuration::Test).is_none());
        assert!(game.product_for(Platform::Win64, Configuration::Test).is_some());
        assert_eq!(game.build_products.len(), 9);
        assert!(game.is_foreign());
    }

    #[test]
    fn products_follow_canonical_order() {
        let ctx = fixture_context().0;
        let model = ingest(&ctx, &fixture_descriptor(), HostPlatform::Linux);
        let editor = &model.projects[1].targets[0];
        assert_eq!(editor.target_type, TargetType::Editor);
        let pairs: Vec<(Platform, Configuration)> =
            editor.build_products.iter().map(|p| (p.platform, p.configuration)).collect();
        let mut sorted = pairs.clone();
        sorted.sort();
        assert_eq!(pairs, sorted);
    }

    #[test]
    fn source_files_are_filtered_and_dotfiles_dropped() {
        let ctx = fixture_context().0;
        let model = ingest(&ctx, &fixture_descriptor(), HostPlatform::Linux);
        let shooter = &model.projects[0];
        let names: Vec<String> = shooter.source_files.iter().map(SourceFile::file_name).collect();
        assert!(names.contains(&"ShooterGame.uproject".to_string()));
        assert!(!names.iter().any(|n| n.starts_with('.')));
        assert!(!names.iter().any(|n| n.ends_with(".png")));
    }

    #[test]
    fn missing_include_paths_are_omitted_and_union_deduplicated() {
        let ctx = fixture_context().0;
        let model = ingest(&ctx, &fixture_descriptor(), HostPlatform::Linux);
        let engine = &model.projects[1];
        assert!(!engine.include_paths.iter().any(|p| p.ends_with("Missing")));
        assert!(engine.include_paths.contains(&PathBuf::from("/usr/include")));

        let occurrences = model
            .combined_include_paths
            .iter()
            .filter(|p| p.as_path() == Path::new("/usr/include"))
            .count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn engine_projects_can_be_excluded() {
        let ctx = fixture_context().0;
        let mut descriptor = fixture_descriptor();
        descriptor.include_engine_projects = false;
        let model = ingest(&ctx, &descriptor, HostPlatform::Linux);
        assert_eq!(model.projects.len(), 1);
        assert_eq!(model.projects[0].name, "ShooterGame");
    }

    #[test]
    fn reordered_input_produces_the_same_model() {
        let ctx = fixture_context().0;
        let descriptor = fixture_descriptor();
        let mut reversed = descriptor.clone();
        reversed.projects.reverse();

        let a = ingest(&ctx, &descriptor, HostPlatform::Linux);
        let b = ingest(&ctx, &reversed, HostPlatform::Linux);
        let paths = |m: &GenerationModel| m.projects.iter().map(|p| p.path.clone()).collect::<Vec<_>>();
        assert_eq!(paths(&a), paths(&b));
        assert_eq!(a.combined_include_paths, b.combined_include_paths);
    }

    #[test]
    fn target_without_supported_platforms_has_no_products() {
        struct NoSdks;
        impl PlatformSupport for NoSdks {
            fn is_sdk_available(&self, _platform: Platform) -> bool {
                false
            }
            fn is_valid_combination(&self, _: &TargetRules, _: Platform, _: Configuration) -> bool {
                true
            }
        }

        let ctx = fixture_context().0;
        let descriptor = fixture_descriptor();
        let model = ingest_with(&ctx, &descriptor, &NoSdks, HostPlatform::Linux);
        assert!(model
            .projects
            .iter()
            .flat_map(|p| &p.targets)
            .all(|t| t.build_products.is_empty()));
    }
}

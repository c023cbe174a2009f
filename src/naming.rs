//! Canonical output file names for built targets.
//!
//! Everything here is a pure function of the target rules and the
//! (platform, configuration) pair; no filesystem access happens.

use std::path::{Path, PathBuf};

use crate::model::descriptor::{BuildEnvironment, LinkType, TargetRules};
use crate::model::platform::{Configuration, Platform, TargetType};

/// The parts of a target's link environment that affect its output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkEnvironment {
    /// Console applications are never wrapped in a Mac application bundle.
    pub console_application: bool,
    /// Produce a dynamic library instead of an executable.
    pub compile_as_dll: bool,
}

impl LinkEnvironment {
    /// The link environment declared by a target's rules.
    #[must_use]
    pub fn for_target(rules: &TargetRules) -> Self {
        Self {
            console_application: rules.console_application,
            compile_as_dll: rules.compile_as_dll,
        }
    }
}

/// Whether `rules` links monolithically on `platform`.
#[must_use]
pub fn is_monolithic(rules: &TargetRules, platform: Platform) -> bool {
    platform.descriptor().always_monolithic || rules.resolved_link_type() == LinkType::Monolithic
}

/// Computes the path of the binary built for `rules` on `platform` in
/// `configuration`.
///
/// Binaries go under `<root>/Binaries/<Platform>[/<subfolder>]`, where the
/// root is the engine directory unless the target owns its binaries.
#[must_use]
pub fn compute_executable_name(
    engine_dir: &Path,
    rules: &TargetRules,
    platform: Platform,
    configuration: Configuration,
    link: LinkEnvironment,
) -> PathBuf {
    let monolithic = is_monolithic(rules, platform);

    let mut output_dir = output_root(engine_dir, rules, monolithic)
        .join("Binaries")
        .join(platform.as_str());
    if let Some(subfolder) = rules.exe_subfolder.as_deref().filter(|s| !s.is_empty()) {
        output_dir = output_dir.join(subfolder);
    }

    let mut name = if !monolithic && !matches!(rules.target_type, TargetType::Game | TargetType::Program)
    {
        rules.engine_app_name()
    } else {
        rules.name.clone()
    };

    let decorated = configuration != rules.undecorated_configuration
        && (configuration != Configuration::DebugGame || monolithic);
    if decorated {
        name.push_str(&format!("-{platform}-{configuration}"));
    }
    name.push_str(&rules.architecture);

    let descriptor = platform.descriptor();
    if link.compile_as_dll {
        name.push_str(descriptor.library_extension);
        return output_dir.join(name);
    }
    name.push_str(descriptor.executable_extension);

    if platform == Platform::Mac && !link.console_application {
        return output_dir
            .join(format!("{name}.app"))
            .join("Contents")
            .join("MacOS")
            .join(name);
    }
    output_dir.join(name)
}

fn output_root(engine_dir: &Path, rules: &TargetRules, monolithic: bool) -> PathBuf {
    let project_dir = rules.project_file.as_deref().and_then(Path::parent);
    let owns_binaries = if rules.target_type == TargetType::Program {
        !rules.output_to_engine_binaries
    } else {
        (monolithic || rules.build_environment == BuildEnvironment::Unique)
            && !rules.output_to_engine_binaries
    };
    match project_dir {
        Some(dir) if owns_binaries => dir.to_path_buf(),
        _ => engine_dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(yaml: &str) -> TargetRules {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn editor() -> TargetRules {
        rules("{ name: UE4Editor, type: Editor, platforms: [Win64, Mac, Linux] }")
    }

    fn name(rules: &TargetRules, platform: Platform, configuration: Configuration) -> PathBuf {
        compute_executable_name(
            Path::new("/UE4/Engine"),
            rules,
            platform,
            configuration,
            LinkEnvironment::for_target(rules),
        )
    }

    #[test]
    fn editor_development_is_undecorated() {
        let path = name(&editor(), Platform::Win64, Configuration::Development);
        assert_eq!(path, PathBuf::from("/UE4/Engine/Binaries/Win64/UE4Editor.exe"));
    }

    #[test]
    fn modular_debug_game_shares_the_development_name() {
        let path = name(&editor(), Platform::Win64, Configuration::DebugGame);
        assert!(path.ends_with("UE4Editor.exe"));
    }

    #[test]
    fn shipping_is_decorated_with_platform_and_configuration() {
        let path = name(&editor(), Platform::Win64, Configuration::Shipping);
        assert!(path.ends_with("UE4Editor-Win64-Shipping.exe"));
    }

    #[test]
    fn modular_game_editor_uses_engine_app_name() {
        let shooter = rules(
            "{ name: ShooterGameEditor, type: Editor, project_file: /Games/Shooter/ShooterGame.uproject }",
        );
        let path = name(&shooter, Platform::Linux, Configuration::Development);
        assert_eq!(path, PathBuf::from("/UE4/Engine/Binaries/Linux/UE4Editor"));
    }

    #[test]
    fn monolithic_game_lives_in_project_binaries() {
        let shooter = rules(
            "{ name: ShooterGame, type: Game, project_file: /Games/Shooter/ShooterGame.uproject }",
        );
        let path = name(&shooter, Platform::Linux, Configuration::DebugGame);
        assert_eq!(
            path,
            PathBuf::from("/Games/Shooter/Binaries/Linux/ShooterGame-Linux-DebugGame")
        );
    }

    #[test]
    fn forced_engine_output_keeps_engine_binaries() {
        let mut shooter = rules(
            "{ name: ShooterGame, type: Game, project_file: /Games/Shooter/ShooterGame.uproject }",
        );
        shooter.output_to_engine_binaries = true;
        let path = name(&shooter, Platform::Win64, Configuration::Development);
        assert_eq!(path, PathBuf::from("/UE4/Engine/Binaries/Win64/ShooterGame.exe"));
    }

    #[test]
    fn mac_gui_targets_point_inside_the_bundle() {
        let path = name(&editor(), Platform::Mac, Configuration::Development);
        assert_eq!(
            path,
            PathBuf::from("/UE4/Engine/Binaries/Mac/UE4Editor.app/Contents/MacOS/UE4Editor")
        );
    }

    #[test]
    fn mac_console_programs_are_not_bundled() {
        let worker = rules(
            "{ name: ShaderCompileWorker, type: Program, link_type: modular, console_application: true }",
        );
        let path = name(&worker, Platform::Mac, Configuration::Development);
        assert_eq!(path, PathBuf::from("/UE4/Engine/Binaries/Mac/ShaderCompileWorker"));
    }

    #[test]
    fn architecture_and_subfolder_are_applied() {
        let mut game = rules("{ name: Sample, type: Game }");
        game.architecture = "-armv7".to_string();
        game.exe_subfolder = Some("Tools".to_string());
        let path = name(&game, Platform::Android, Configuration::Shipping);
        assert_eq!(
            path,
            PathBuf::from("/UE4/Engine/Binaries/Android/Tools/Sample-Android-Shipping-armv7.so")
        );
    }

    #[test]
    fn dynamic_library_targets_use_library_extension() {
        let mut plugin = rules("{ name: Plugin, type: Program, link_type: modular }");
        plugin.compile_as_dll = true;
        let path = name(&plugin, Platform::Mac, Configuration::Development);
        assert_eq!(path, PathBuf::from("/UE4/Engine/Binaries/Mac/Plugin.dylib"));
    }

    #[test]
    fn always_monolithic_platforms_decorate_debug_game() {
        assert!(is_monolithic(&editor(), Platform::IOS));
        let path = name(&editor(), Platform::IOS, Configuration::DebugGame);
        assert!(path.ends_with("UE4Editor-IOS-DebugGame"));
    }
}

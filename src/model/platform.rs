//! Platforms, configurations, target types and their descriptors.
//!
//! Every platform-dependent decision in the generator goes through a
//! [`PlatformDescriptor`] (for target platforms) or a [`HostDescriptor`]
//! (for the machine the IDE runs on), selected once per lookup instead of
//! branching on the enum at each call site.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A platform a target can be built for.
///
/// Variant order is the canonical enumeration order used by every emitter.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// 32-bit Windows.
    Win32,
    /// 64-bit Windows.
    Win64,
    /// macOS.
    Mac,
    /// Linux.
    Linux,
    /// iOS.
    IOS,
    /// tvOS.
    TVOS,
    /// Android.
    Android,
    /// HTML5 / emscripten.
    HTML5,
}

/// Static facts about a target platform's binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDescriptor {
    /// Extension appended to executables, including the dot (may be empty).
    pub executable_extension: &'static str,
    /// Extension appended to dynamic libraries, including the dot.
    pub library_extension: &'static str,
    /// Whether every target on this platform links monolithically.
    pub always_monolithic: bool,
}

impl Platform {
    /// All platforms in canonical order.
    pub const ALL: [Platform; 8] = [
        Platform::Win32,
        Platform::Win64,
        Platform::Mac,
        Platform::Linux,
        Platform::IOS,
        Platform::TVOS,
        Platform::Android,
        Platform::HTML5,
    ];

    /// The platform name as the build tool spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Win32 => "Win32",
            Platform::Win64 => "Win64",
            Platform::Mac => "Mac",
            Platform::Linux => "Linux",
            Platform::IOS => "IOS",
            Platform::TVOS => "TVOS",
            Platform::Android => "Android",
            Platform::HTML5 => "HTML5",
        }
    }

    /// Binary naming facts for this platform.
    #[must_use]
    pub fn descriptor(self) -> PlatformDescriptor {
        match self {
            Platform::Win32 | Platform::Win64 => PlatformDescriptor {
                executable_extension: ".exe",
                library_extension: ".dll",
                always_monolithic: false,
            },
            Platform::Mac => PlatformDescriptor {
                executable_extension: "",
                library_extension: ".dylib",
                always_monolithic: false,
            },
            Platform::Linux => PlatformDescriptor {
                executable_extension: "",
                library_extension: ".so",
                always_monolithic: false,
            },
            Platform::IOS | Platform::TVOS => PlatformDescriptor {
                executable_extension: "",
                library_extension: ".dylib",
                always_monolithic: true,
            },
            Platform::Android => PlatformDescriptor {
                executable_extension: ".so",
                library_extension: ".so",
                always_monolithic: true,
            },
            Platform::HTML5 => PlatformDescriptor {
                executable_extension: ".js",
                library_extension: ".js",
                always_monolithic: true,
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Configuration {
    /// Everything unoptimized.
    Debug,
    /// Engine optimized, game modules unoptimized.
    DebugGame,
    /// The everyday configuration.
    Development,
    /// Final release.
    Shipping,
    /// Shipping with test hooks.
    Test,
}

impl Configuration {
    /// All configurations in canonical order.
    pub const ALL: [Configuration; 5] = [
        Configuration::Debug,
        Configuration::DebugGame,
        Configuration::Development,
        Configuration::Shipping,
        Configuration::Test,
    ];

    /// The configuration name as the build tool spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::DebugGame => "DebugGame",
            Configuration::Development => "Development",
            Configuration::Shipping => "Shipping",
            Configuration::Test => "Test",
        }
    }

    /// `true` for configurations whose name contains "Debug".
    #[must_use]
    pub fn is_debug(self) -> bool {
        self.as_str().contains("Debug")
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of binary a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// Cooked monolithic game executable.
    Game,
    /// Uncooked modular editor executable.
    Editor,
    /// Cooked game client without server code.
    Client,
    /// Cooked game server without client code.
    Server,
    /// Standalone program such as a shader compiler worker.
    Program,
}

impl TargetType {
    /// The type name as the build tool spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Game => "Game",
            TargetType::Editor => "Editor",
            TargetType::Client => "Client",
            TargetType::Server => "Server",
            TargetType::Program => "Program",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operating system the generated IDE files will be used on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum HostPlatform {
    /// Windows host.
    Windows,
    /// macOS host.
    Mac,
    /// Linux host.
    Linux,
}

/// Host-specific conventions for paths, tools and debuggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostDescriptor {
    /// Directory separator written into generated files.
    pub separator: char,
    /// Quote character used around paths containing spaces.
    pub quote: char,
    /// The target platform that runs natively on this host.
    pub target_platform: Platform,
    /// Batch file directory relative to the engine directory.
    pub batch_files_dir: &'static str,
    /// Extension of the build scripts.
    pub script_extension: &'static str,
    /// Program used to launch .NET tools, if the host cannot run them directly.
    pub tool_launcher: Option<&'static str>,
    /// Script (relative to the batch file directory) that builds C# projects.
    pub csharp_build_script: &'static str,
    /// Name of the `c_cpp_properties.json` configuration block.
    pub cpp_properties_name: &'static str,
    /// IntelliSense mode for the C/C++ extension.
    pub intellisense_mode: &'static str,
    /// Debugger type for native targets.
    pub native_debugger: &'static str,
    /// Debugger back-end for `cppdbg`, if any.
    pub mi_mode: Option<&'static str>,
    /// Debugger type for managed (.NET) targets.
    pub managed_debugger: &'static str,
    /// Problem matcher for compiler diagnostics.
    pub problem_matcher: &'static str,
    /// Framework search paths for IntelliSense.
    pub framework_paths: &'static [&'static str],
}

impl HostPlatform {
    /// Detects the host this process runs on, falling back to Linux.
    #[must_use]
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "windows" => HostPlatform::Windows,
            "macos" => HostPlatform::Mac,
            _ => HostPlatform::Linux,
        }
    }

    /// Conventions for this host.
    #[must_use]
    pub fn descriptor(self) -> HostDescriptor {
        match self {
            HostPlatform::Windows => HostDescriptor {
                separator: '\\',
                quote: '"',
                target_platform: Platform::Win64,
                batch_files_dir: "Build/BatchFiles",
                script_extension: ".bat",
                tool_launcher: None,
                csharp_build_script: "MSBuild.bat",
                cpp_properties_name: "Win32",
                intellisense_mode: "msvc-x64",
                native_debugger: "cppvsdbg",
                mi_mode: None,
                managed_debugger: "clr",
                problem_matcher: "$msCompile",
                framework_paths: &[],
            },
            HostPlatform::Mac => HostDescriptor {
                separator: '/',
                quote: '"',
                target_platform: Platform::Mac,
                batch_files_dir: "Build/BatchFiles/Mac",
                script_extension: ".sh",
                tool_launcher: Some("mono"),
                csharp_build_script: "RunXBuild.sh",
                cpp_properties_name: "Mac",
                intellisense_mode: "clang-x64",
                native_debugger: "cppdbg",
                mi_mode: Some("lldb"),
                managed_debugger: "mono",
                problem_matcher: "$gcc",
                framework_paths: &["/System/Library/Frameworks", "/Library/Frameworks"],
            },
            HostPlatform::Linux => HostDescriptor {
                separator: '/',
                quote: '"',
                target_platform: Platform::Linux,
                batch_files_dir: "Build/BatchFiles/Linux",
                script_extension: ".sh",
                tool_launcher: Some("mono"),
                csharp_build_script: "RunXBuild.sh",
                cpp_properties_name: "Linux",
                intellisense_mode: "clang-x64",
                native_debugger: "cppdbg",
                mi_mode: Some("gdb"),
                managed_debugger: "mono",
                problem_matcher: "$gcc",
                framework_paths: &[],
            },
        }
    }
}

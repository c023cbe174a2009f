//! Shared fixture for unit tests: a small engine tree plus one game.

use chrono::{TimeZone, Utc};

use crate::adapters::memory::{FixedClock, MemoryFileSystem};
use crate::context::ServiceContext;
use crate::model::descriptor::ModelDescriptor;
use crate::model::ingest::ingest;
use crate::model::platform::HostPlatform;
use crate::model::GenerationModel;

pub const FIXTURE_YAML: &str = r"
root_dir: /work/UE4
engine_dir: /work/UE4/Engine
master_project_name: UE4
platforms: [Win64, Linux, Mac]
sdks: { Win64: true, Linux: true }
host_include_paths: [/usr/include]
projects:
  - path: /work/UE4/Engine/Intermediate/ProjectFiles/UE4.vcxproj
    name: UE4
    base_dir: /work/UE4/Engine
    is_engine: true
    include_paths:
      - /work/UE4/Engine/Source/Runtime/Core/Public
      - /work/UE4/Engine/Source/Missing
    system_include_paths: [/usr/include]
    source_files:
      - path: /work/UE4/Engine/Source/Runtime/Core/Core.Build.cs
      - path: /work/UE4/Engine/Source/Runtime/Core/Public/CoreMinimal.h
      - path: /work/UE4/Engine/Source/Runtime/Core/Private/CoreMinimal.cpp
      - path: /work/UE4/Engine/Source/Runtime/Core/Private/Templates.inl
      - path: /work/UE4/Engine/Source/Programs/ShaderCompileWorker/ShaderCompileWorker.Build.cs
      - path: /work/UE4/Engine/Source/Programs/ShaderCompileWorker/Private/ShaderCompileWorker.cpp
      - path: /work/UE4/Engine/Shaders/Common.ush
      - path: /work/UE4/Engine/Config/BaseEngine.ini
      - path: /work/UE4/Engine/Documentation/Readme.h
    targets:
      - name: UE4Editor
        type: Editor
        platforms: [Win64, Linux, Mac]
        defines: [WITH_EDITOR=1, UE_BUILD_DEVELOPMENT=1]
      - name: ShaderCompileWorker
        type: Program
        link_type: modular
        console_application: true
        platforms: [Win64, Linux, Mac]
        defines: [UE_BUILD_DEVELOPMENT=1]
  - path: /work/UE4/Engine/Source/Programs/UnrealBuildTool/UnrealBuildTool.csproj
    kind: csharp
    base_dir: /work/UE4/Engine/Source/Programs/UnrealBuildTool
    is_engine: true
    source_files:
      - path: /work/UE4/Engine/Source/Programs/UnrealBuildTool/UnrealBuildTool.cs
    csharp:
      output_file: /work/UE4/Engine/Binaries/DotNET/UnrealBuildTool.exe
  - path: /work/Games/ShooterGame/Intermediate/ProjectFiles/ShooterGame.vcxproj
    base_dir: /work/Games/ShooterGame
    include_paths: [/work/Games/ShooterGame/Source/ShooterGame/Public]
    source_files:
      - path: /work/Games/ShooterGame/ShooterGame.uproject
      - path: /work/Games/ShooterGame/Source/ShooterGame/ShooterGame.Build.cs
      - path: /work/Games/ShooterGame/Source/ShooterGame/Public/ShooterGame.h
      - path: /work/Games/ShooterGame/Source/ShooterGame/Private/ShooterGame.cpp
      - path: /work/Games/ShooterGame/Source/.Hidden.h
      - path: /work/Games/ShooterGame/Config/DefaultGame.ini
      - path: /work/Games/ShooterGame/Content/Splash.png
    targets:
      - name: ShooterGame
        type: Game
        platforms: [Win64, Linux, Mac]
        project_file: /work/Games/ShooterGame/ShooterGame.uproject
        invalid_combinations: [{ platform: Linux, configuration: Test }]
        defines: [UE_GAME=1]
      - name: ShooterGameEditor
        type: Editor
        platforms: [Win64, Linux, Mac]
        project_file: /work/Games/ShooterGame/ShooterGame.uproject
        defines: [WITH_EDITOR=1]
";

pub fn fixture_descriptor() -> ModelDescriptor {
    ModelDescriptor::from_yaml(FIXTURE_YAML).unwrap()
}

/// Filesystem holding every file and directory the fixture refers to.
pub fn fixture_fs() -> MemoryFileSystem {
    let mut fs = MemoryFileSystem::new()
        .with_dir("/usr/include")
        .with_dir("/work/UE4/Engine/Source/Runtime/Core/Public")
        .with_dir("/work/UE4/Engine/Binaries")
        .with_dir("/work/UE4/Engine/Intermediate")
        .with_dir("/work/UE4/Engine/Source/Programs/UnrealBuildTool/obj")
        .with_dir("/work/Games/ShooterGame/Source/ShooterGame/Public")
        .with_dir("/work/Games/ShooterGame/Saved")
        .with_dir("/work/Games/ShooterGame/Binaries");
    for project in fixture_descriptor().projects {
        for file in project.source_files {
            fs = fs.with_file(file.path, "");
        }
    }
    fs
}

/// A context over [`fixture_fs`] plus a handle for inspecting it.
pub fn fixture_context() -> (ServiceContext, MemoryFileSystem) {
    let fs = fixture_fs();
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    (ServiceContext::new(Box::new(fs.clone()), Box::new(clock)), fs)
}

pub fn fixture_model(host: HostPlatform) -> GenerationModel {
    let (ctx, _) = fixture_context();
    ingest(&ctx, &fixture_descriptor(), host)
}

//! Normalized view of the model for the VSCode documents.

use crate::model::platform::Configuration;
use crate::model::{CSharpOutput, GenerationModel, Project, Target};

/// A native target together with its owning project.
#[derive(Debug, Clone, Copy)]
pub struct NativeTarget<'a> {
    /// Owning project.
    pub project: &'a Project,
    /// The target.
    pub target: &'a Target,
}

/// A C# project with its build outputs.
#[derive(Debug, Clone, Copy)]
pub struct CSharpProject<'a> {
    /// The project.
    pub project: &'a Project,
    /// Its build outputs.
    pub output: &'a CSharpOutput,
}

impl CSharpProject<'_> {
    /// Configurations the project builds in.
    #[must_use]
    pub fn configurations(&self) -> &[Configuration] {
        &self.output.configurations
    }
}

/// Native and C# projects, handled separately by every document.
#[derive(Debug, Clone, Default)]
pub struct ProjectData<'a> {
    /// Native targets with at least one build product, in model order.
    pub native: Vec<NativeTarget<'a>>,
    /// C# projects with declared outputs, in model order.
    pub csharp: Vec<CSharpProject<'a>>,
}

impl<'a> ProjectData<'a> {
    /// Collects the targets and projects the VSCode documents describe.
    #[must_use]
    pub fn from_model(model: &'a GenerationModel) -> Self {
        let native = model
            .native_projects()
            .flat_map(|project| project.targets.iter().map(move |target| NativeTarget { project, target }))
            .filter(|t| !t.target.build_products.is_empty())
            .collect();
        let csharp = model
            .csharp_projects()
            .filter_map(|project| project.csharp.as_ref().map(|output| CSharpProject { project, output }))
            .collect();
        Self { native, csharp }
    }
}

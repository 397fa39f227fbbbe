//! Project-type tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a project's technology stack.
///
/// Derived once per run from the project directory's top-level entries and
/// never re-derived mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    NextJs,
    Vite,
    React,
    Static,
    PythonServer,
    Unknown,
}

impl ProjectType {
    /// All classifiable types, Unknown excluded.
    pub const KNOWN: [ProjectType; 5] = [
        ProjectType::NextJs,
        ProjectType::Vite,
        ProjectType::React,
        ProjectType::Static,
        ProjectType::PythonServer,
    ];

    /// Whether this type goes through the Node build stage.
    pub fn requires_build(&self) -> bool {
        matches!(self, ProjectType::NextJs | ProjectType::Vite | ProjectType::React)
    }

    /// Whether this type is a Node-ecosystem project (manifest scaffolding,
    /// node/npm toolchain checks).
    pub fn requires_node(&self) -> bool {
        self.requires_build()
    }

    /// Tag used in prompts and AI responses.
    pub fn tag(&self) -> &'static str {
        match self {
            ProjectType::NextJs => "nextjs",
            ProjectType::Vite => "vite",
            ProjectType::React => "react",
            ProjectType::Static => "static",
            ProjectType::PythonServer => "python-flask",
            ProjectType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ProjectType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nextjs" | "next" | "next.js" => Ok(ProjectType::NextJs),
            "vite" => Ok(ProjectType::Vite),
            "react" => Ok(ProjectType::React),
            "static" => Ok(ProjectType::Static),
            "python-flask" | "python-server" | "flask" | "python" => Ok(ProjectType::PythonServer),
            "unknown" => Ok(ProjectType::Unknown),
            _ => Err(()),
        }
    }
}

use std::path::PathBuf;

use itertools::Itertools;
use receipt_template::Collision;
use thiserror::Error;

/// Everything that can stop a receipt run, one kind per failing step.
#[derive(Debug, Error)]
pub enum FillError {
    #[error("template file {} not found", .path.display())]
    TemplateMissing { path: PathBuf },

    #[error("cannot read template {}: {reason}", .path.display())]
    TemplateUnreadable { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid placeholder data: {0}")]
    Data(String),

    #[error("placeholder values contain other placeholders: {}", describe_collisions(.0))]
    TokenCollision(Vec<Collision>),

    #[error("template still has unfilled placeholders: {}", .0.join(", "))]
    UnresolvedTokens(Vec<String>),

    #[error("wkhtmltopdf executable not found (searched: {})", .searched.join(", "))]
    RendererUnavailable { searched: Vec<String> },

    #[error("wkhtmltopdf failed ({}): {stderr}", describe_status(.status))]
    RenderFailed { status: Option<i32>, stderr: String },

    #[error("cannot write {}: {reason}", .path.display())]
    OutputWrite { path: PathBuf, reason: String },
}

fn describe_collisions(collisions: &[Collision]) -> String {
    collisions
        .iter()
        .map(|c| format!("{} contains {}", c.token, c.contains))
        .join(", ")
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}

impl FillError {
    /// Process exit status for this kind. A missing template is always 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TemplateMissing { .. } => 1,
            Self::Config(_) | Self::Data(_) => 2,
            Self::TemplateUnreadable { .. }
            | Self::TokenCollision(_)
            | Self::UnresolvedTokens(_) => 3,
            Self::RendererUnavailable { .. } => 4,
            Self::RenderFailed { .. } => 5,
            Self::OutputWrite { .. } => 6,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TemplateMissing { .. } => {
                Some("Run from the directory that holds the template, or pass --template.")
            }
            Self::RendererUnavailable { .. } | Self::RenderFailed { .. } => Some(
                "Check that wkhtmltopdf is installed and on the system PATH, \
                 or set its location with --renderer (renderer.binary in the config).",
            ),
            Self::TokenCollision(_) | Self::UnresolvedTokens(_) => {
                Some("Fix the placeholder data, or drop --strict to fill it anyway.")
            }
            _ => None,
        }
    }
}

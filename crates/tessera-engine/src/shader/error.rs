use std::fmt;

use thiserror::Error;

/// Pipeline stage of a shader program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// Failure to turn a vertex/fragment source pair into a usable program.
///
/// Fatal for the renderer that requested the program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// A stage failed to parse or validate; `diagnostic` is the compiler output.
    #[error("{program}: {stage} stage failed to compile:\n{diagnostic}")]
    Compile {
        program: String,
        stage: Stage,
        diagnostic: String,
    },

    /// Stages compiled individually but do not fit together.
    #[error("{program}: link failed: {reason}")]
    Link { program: String, reason: String },

    #[error("{program}: {stage} stage has no `{name}` {kind}")]
    MissingHandle {
        program: String,
        stage: Stage,
        name: &'static str,
        kind: HandleKind,
    },

    #[error("{program}: `{name}` must be declared as {expected}")]
    HandleType {
        program: String,
        name: &'static str,
        expected: &'static str,
    },
}

/// What kind of handle a program exposes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HandleKind {
    Attribute,
    Uniform,
    EntryPoint,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandleKind::Attribute => "vertex attribute",
            HandleKind::Uniform => "uniform",
            HandleKind::EntryPoint => "entry point",
        })
    }
}

//! Error and warning types for route compilation.
//!
//! Fatal problems are [`RouteError`]s and abort the whole compile.
//! Everything else degrades per file and is reported as a [`Warning`],
//! both returned to the caller and printed through [`crate::log!`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::pages::PageKey;

/// Fatal route compilation errors.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Malformed segment syntax in a page file name.
    #[error("{message} (in `{}`)", file.display())]
    Syntax { file: PathBuf, message: String },

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    /// A host hook failed.
    #[error("`{hook}` hook failed")]
    Hook {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl RouteError {
    /// Returns true for errors caused by malformed page file names.
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

/// Error produced by the segment parser, before the file is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("Unfinished param \"{0}\"")]
    UnfinishedParam(String),

    #[error("Empty param")]
    EmptyParam,

    #[error("Unfinished group \"{0}\"")]
    UnfinishedGroup(String),

    #[error("Catch-all param \"{0}\" must be the final segment")]
    CatchAllNotLast(String),
}

impl SegmentError {
    /// Attach the offending file, producing a fatal [`RouteError::Syntax`].
    pub fn in_file(self, file: impl Into<PathBuf>) -> RouteError {
        RouteError::Syntax {
            file: file.into(),
            message: self.to_string(),
        }
    }
}

/// Recoverable conditions surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Two files resolved to the same route path.
    Collision {
        path: String,
        kept: PathBuf,
        dropped: PathBuf,
    },
    /// Two routes generated the same name.
    DuplicateName {
        name: String,
        file: Option<PathBuf>,
        existing: Option<PathBuf>,
    },
    /// A macro property was not statically serializable.
    Extraction { file: PathBuf, key: PageKey },
    /// The page metadata macro was not called with an object literal.
    InvalidMacroArgument { file: PathBuf, macro_name: String },
    /// The route rules payload could not be extracted.
    RuleParse { file: PathBuf, reason: String },
    /// Rules were declared on a page that has no single wildcard pattern.
    UnmappedRules { file: PathBuf, path: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collision {
                path,
                kept,
                dropped,
            } => write!(
                f,
                "route `{path}` is defined by both `{}` and `{}`, keeping the former",
                kept.display(),
                dropped.display()
            ),
            Self::DuplicateName {
                name,
                file,
                existing,
            } => {
                let file = display_opt(file.as_ref());
                match existing {
                    Some(existing) => write!(
                        f,
                        "route name `{name}` generated for `{file}` is the same as `{}`",
                        existing.display()
                    ),
                    None => write!(f, "route name `{name}` generated for `{file}` is a duplicate"),
                }
            }
            Self::Extraction { file, key } => write!(
                f,
                "skipping extraction of `{key}` as it is not statically serializable (reading `{}`)",
                file.display()
            ),
            Self::InvalidMacroArgument { file, macro_name } => write!(
                f,
                "`{macro_name}` must be called with an object literal (reading `{}`)",
                file.display()
            ),
            Self::RuleParse { file, reason } => write!(
                f,
                "ignoring route rules in `{}`: {reason}",
                file.display()
            ),
            Self::UnmappedRules { file, path } => write!(
                f,
                "route rules in `{}` ignored: `{path}` has more than one dynamic parameter",
                file.display()
            ),
        }
    }
}

fn display_opt(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "<virtual route>".to_owned(), |p| p.display().to_string())
}

/// Print a warning through the shared log channel.
pub fn report(warning: &Warning) {
    crate::log!("warn"; "{warning}");
}

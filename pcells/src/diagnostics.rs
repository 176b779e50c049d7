//! Recoverable issues raised while generating geometry.
//!
//! Generators never fail on out-of-range parameters. They clamp, record a
//! [`PcellIssue`] and carry on; the caller decides whether to surface it.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// A diagnostic issue that should be reported to users.
pub trait Diagnostic: Debug + Display {
    /// Returns an optional help message that should indicate
    /// what users need to do to resolve an issue.
    fn help(&self) -> Option<Box<dyn Display>> {
        None
    }

    /// Returns the severity of this issue.
    ///
    /// The default implementation returns [`Severity::default`].
    fn severity(&self) -> Severity {
        Default::default()
    }
}

/// An enumeration of possible severity levels.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    /// An informational message.
    Info,
    /// A warning.
    #[default]
    Warning,
    /// An error. Often, but not always, fatal.
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A collection of issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSet<T> {
    issues: Vec<T>,
    num_errors: usize,
    num_warnings: usize,
}

impl<T> IssueSet<T> {
    /// Creates a new, empty issue set.
    #[inline]
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            num_errors: 0,
            num_warnings: 0,
        }
    }

    /// Returns an iterator over all issues in the set.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.issues.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl<T: Diagnostic> IssueSet<T> {
    /// Adds the given issue to the issue set, logging it at its severity.
    pub fn add(&mut self, issue: T) {
        match issue.severity() {
            Severity::Error => {
                tracing::error!("{issue}");
                self.num_errors += 1;
            }
            Severity::Warning => {
                tracing::warn!("{issue}");
                self.num_warnings += 1;
            }
            Severity::Info => tracing::info!("{issue}"),
        }
        self.issues.push(issue);
    }

    pub fn has_error(&self) -> bool {
        self.num_errors > 0
    }

    #[inline]
    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    pub fn has_warning(&self) -> bool {
        self.num_warnings > 0
    }

    #[inline]
    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }
}

impl<T> IntoIterator for IssueSet<T> {
    type Item = T;
    type IntoIter = <Vec<T> as IntoIterator>::IntoIter;
    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<T> Default for IssueSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Display> Display for IssueSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for issue in self.issues.iter() {
            writeln!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// An issue raised by a device generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PcellIssue {
    /// A parameter was below the technology minimum and was clamped up to it.
    ParameterBelowMinimum {
        cell: &'static str,
        parameter: &'static str,
        /// Requested value, in microns.
        requested: f64,
        /// Technology minimum, in microns.
        minimum: f64,
    },
    /// A contact or via array has no room for a single cut.
    DegenerateGeometry {
        cell: &'static str,
        what: &'static str,
    },
}

impl Display for PcellIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParameterBelowMinimum {
                cell,
                parameter,
                requested,
                minimum,
            } => write!(
                f,
                "{cell}: {parameter} = {requested} is below the minimum of {minimum}; using the minimum"
            ),
            Self::DegenerateGeometry { cell, what } => {
                write!(f, "{cell}: {what} is too small for any contact")
            }
        }
    }
}

impl Diagnostic for PcellIssue {
    fn severity(&self) -> Severity {
        match self {
            Self::ParameterBelowMinimum { .. } => Severity::Warning,
            Self::DegenerateGeometry { .. } => Severity::Info,
        }
    }

    fn help(&self) -> Option<Box<dyn Display>> {
        match self {
            Self::ParameterBelowMinimum { .. } => Some(Box::new("review the generated layout")),
            Self::DegenerateGeometry { .. } => None,
        }
    }
}

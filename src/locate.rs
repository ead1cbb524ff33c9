//! # Grid Variable Locator
//!
//! Heuristic discovery of the (group, variable) pair inside a NetCDF file
//! that most plausibly holds a 2-D elevation-change (dh/dt) grid.
//!
//! The search is two-tiered, cheap-first:
//!
//! 1. **Root fast path**: scan only the root group's variables by name.
//!    The first variable whose lower-cased name contains a hint substring
//!    wins; otherwise the first root variable wins. Shape is never
//!    inspected on this tier.
//! 2. **Recursive fallback**: when the root holds no variables, walk the
//!    group tree depth-first and score every rank >= 2 variable from its
//!    name, its dimension names and its trailing 2-D footprint, keeping
//!    the first strictly-best candidate.
//!
//! The two tiers intentionally use different signals and may disagree on
//! the same file depending on whether it exposes root variables. Callers
//! must treat the result as a best guess; [`Confidence`] reports which
//! branch produced it.

use log::debug;
use std::collections::HashSet;
use thiserror::Error;

/// Name substrings that mark a variable as a plausible rate/elevation-change
/// field. Matched against lower-cased variable names.
pub const VAR_NAME_HINTS: [&str; 7] = ["dh", "dhdt", "elev", "height", "dz", "rate", "change"];

/// Dimension names that mark a spatial (x/y/lon/lat) axis.
pub const SPATIAL_DIM_NAMES: [&str; 10] =
    ["x", "y", "lon", "lat", "xc", "yc", "nx", "ny", "xgrid", "ygrid"];

/// Score added when a variable name contains a hint substring.
pub const NAME_HINT_WEIGHT: i64 = 1000;

/// Score added when any dimension name is a known spatial axis.
pub const SPATIAL_DIM_WEIGHT: i64 = 500;

/// Errors produced by the locator.
#[derive(Debug, Error)]
pub enum LocateError {
    /// No variable anywhere in the file qualifies: the root holds no
    /// variables and no rank >= 2 variable exists in any group (or the
    /// file format exposes no group tree to scan).
    #[error("no suitable grid variable found in any group")]
    NotFound,

    /// Underlying NetCDF error while opening or reading metadata.
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),
}

/// How the selection was made. The fast path silently degrades to "first
/// variable" when no name hint matches, which callers may want to surface
/// rather than trust blindly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Root fast path, variable name matched a hint substring.
    NameHint,
    /// Root fast path, no hint matched; first enumerated variable returned.
    FirstAvailable,
    /// Recursive fallback, best-scoring candidate across the group tree.
    Scored,
}

/// The (group path, variable name) pair returned to the caller.
///
/// `group` is `""` for the root group, otherwise a `parent/child` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub group: String,
    pub variable: String,
    pub confidence: Confidence,
}

impl Selection {
    /// Human-readable group label, `/` for the root.
    pub fn group_label(&self) -> &str {
        if self.group.is_empty() { "/" } else { &self.group }
    }
}

/// Transient scored guess produced during traversal.
#[derive(Debug, Clone)]
struct Candidate {
    score: i64,
    group_path: String,
    name: String,
    shape: Vec<usize>,
}

/// Cheap substring matcher over the fixed hint set.
#[derive(Debug, Clone)]
pub struct HintMatcher {
    hints: Vec<String>,
}

impl Default for HintMatcher {
    fn default() -> Self {
        HintMatcher {
            hints: VAR_NAME_HINTS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl HintMatcher {
    /// Returns true when the lower-cased name contains any hint substring.
    pub fn matches(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.hints.iter().any(|h| lowered.contains(h.as_str()))
    }
}

/// Numeric scorer combining name, dimension-name and area signals.
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    matcher: HintMatcher,
    spatial_dims: HashSet<String>,
    name_weight: i64,
    spatial_weight: i64,
}

impl Default for CandidateScorer {
    fn default() -> Self {
        CandidateScorer {
            matcher: HintMatcher::default(),
            spatial_dims: SPATIAL_DIM_NAMES.iter().map(|d| d.to_string()).collect(),
            name_weight: NAME_HINT_WEIGHT,
            spatial_weight: SPATIAL_DIM_WEIGHT,
        }
    }
}

impl CandidateScorer {
    /// Scores one variable. Returns `None` for rank < 2 variables, which
    /// are never candidates on the recursive tier.
    pub fn score(&self, name: &str, dim_names: &[String], shape: &[usize]) -> Option<i64> {
        if shape.len() < 2 {
            return None;
        }
        let name_score = if self.matcher.matches(name) {
            self.name_weight
        } else {
            0
        };
        let has_space_dims = dim_names
            .iter()
            .any(|d| self.spatial_dims.contains(&d.to_lowercase()));
        let space_bonus = if has_space_dims { self.spatial_weight } else { 0 };
        // Trailing 2-D footprint of the variable.
        let area: i64 = shape[shape.len() - 2..].iter().map(|&s| s as i64).product();
        Some(name_score + space_bonus + area)
    }
}

/// Two-tier locator strategy: name-only fast path over the root, scored
/// depth-first traversal over the group tree as fallback.
#[derive(Debug, Clone, Default)]
pub struct GridLocator {
    matcher: HintMatcher,
    scorer: CandidateScorer,
}

impl GridLocator {
    pub fn new() -> Self {
        GridLocator::default()
    }

    /// Opens the file at `path` read-only and locates the grid variable.
    pub fn locate_path<P: AsRef<std::path::Path>>(&self, path: P) -> Result<Selection, LocateError> {
        let file = netcdf::open(path)?;
        self.locate(&file)
    }

    /// Locates the grid variable in an already-open file.
    ///
    /// Pure read: nothing in the file is mutated, and the selection is
    /// recomputed on every call.
    pub fn locate(&self, file: &netcdf::File) -> Result<Selection, LocateError> {
        if let Some(selection) = self.root_fast_path(file) {
            debug!(
                "fast path selected '{}' ({:?})",
                selection.variable, selection.confidence
            );
            return Ok(selection);
        }
        self.scan_groups(file)
    }

    /// Tier 1: name-only scan of the root group, in native enumeration
    /// order. Returns `None` when the root holds no variables.
    fn root_fast_path(&self, file: &netcdf::File) -> Option<Selection> {
        let names: Vec<String> = file.variables().map(|v| v.name()).collect();
        if names.is_empty() {
            return None;
        }
        for name in &names {
            if self.matcher.matches(name) {
                return Some(Selection {
                    group: String::new(),
                    variable: name.clone(),
                    confidence: Confidence::NameHint,
                });
            }
        }
        // Heuristic default, not a validated selection.
        Some(Selection {
            group: String::new(),
            variable: names[0].clone(),
            confidence: Confidence::FirstAvailable,
        })
    }

    /// Tier 2: pre-order depth-first traversal scoring every rank >= 2
    /// variable. Ties break toward the first-seen candidate (replacement
    /// requires a strictly greater score).
    fn scan_groups(&self, file: &netcdf::File) -> Result<Selection, LocateError> {
        let root = file.root().ok_or(LocateError::NotFound)?;
        let mut best: Option<Candidate> = None;
        self.walk(&root, "", &mut best);

        match best {
            Some(cand) => {
                debug!(
                    "group scan selected '{}/{}' with score {} (shape {:?})",
                    cand.group_path, cand.name, cand.score, cand.shape
                );
                Ok(Selection {
                    group: cand.group_path,
                    variable: cand.name,
                    confidence: Confidence::Scored,
                })
            }
            None => Err(LocateError::NotFound),
        }
    }

    fn walk(&self, group: &netcdf::Group, path: &str, best: &mut Option<Candidate>) {
        for var in group.variables() {
            let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
            let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
            let name = var.name();
            if let Some(score) = self.scorer.score(&name, &dim_names, &shape) {
                let replaces = best.as_ref().map(|b| score > b.score).unwrap_or(true);
                if replaces {
                    *best = Some(Candidate {
                        score,
                        group_path: path.to_string(),
                        name,
                        shape,
                    });
                }
            }
        }
        for sub in group.groups() {
            let sub_name = sub.name();
            let sub_path = if path.is_empty() {
                sub_name
            } else {
                format!("{}/{}", path, sub_name)
            };
            self.walk(&sub, &sub_path, best);
        }
    }
}

/// Convenience wrapper using the default hint set and weights.
pub fn find_grid_variable(file: &netcdf::File) -> Result<Selection, LocateError> {
    GridLocator::new().locate(file)
}

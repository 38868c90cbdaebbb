//! Parsing of `git status --short --no-renames` output.

/// Staged file names partitioned by operation.
///
/// The partition order (added, then removed, then modified) is also the
/// order the pipeline processes files in, keeping output reproducible
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl StagedChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Partition short-format status output into added/removed/modified sets.
///
/// Each line is a two-column status code, a space, and the path. Lines too
/// short to carry a path are skipped, as are codes other than A/D/M (e.g.
/// untracked `??` entries, which are not staged).
pub fn parse_status(status: &str) -> StagedChanges {
    let mut changes = StagedChanges::default();

    for line in status.lines() {
        if line.len() < 4 {
            continue;
        }
        let code = line[..2].trim();
        let file = line[3..].trim();
        if file.is_empty() {
            continue;
        }
        match code {
            "A" => changes.added.push(file.to_string()),
            "D" => changes.removed.push(file.to_string()),
            "M" => changes.modified.push(file.to_string()),
            _ => {}
        }
    }

    changes
}

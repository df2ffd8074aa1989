use std::fmt;

/// Kind of change reported for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
}

impl ChangeKind {
    /// Single-letter marker shown in the file list
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Added => "A",
            Self::Modified => "M",
            Self::Deleted => "D",
            Self::Renamed => "R",
            Self::Untracked => "??",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Untracked => "untracked",
        };
        write!(f, "{name}")
    }
}

/// One entry of a change listing. A new listing replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Repository-relative path
    pub path: String,
    pub change_kind: ChangeKind,
    /// Staged at the time of the listing
    pub is_staged: bool,
    pub is_tracked: bool,
}

/// Parse `git status --porcelain -z` output.
///
/// Records are NUL-terminated `XY path` entries; X is the index status,
/// Y the worktree status. Paths are raw bytes, never C-quoted. A rename
/// or copy entry carries the destination path and is followed by one
/// extra record holding the source path. Records too short to carry a
/// path are skipped.
pub fn parse_porcelain(output: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    let mut records = output.split('\0');
    while let Some(record) = records.next() {
        let Some(file) = parse_status_record(record) else {
            continue;
        };
        if matches!(file.change_kind, ChangeKind::Renamed) {
            // Source path of the rename
            records.next();
        }
        files.push(file);
    }
    files
}

fn parse_status_record(record: &str) -> Option<ChangedFile> {
    let mut chars = record.chars();
    let staged = chars.next()?;
    let unstaged = chars.next()?;
    let path = record.get(3..)?;
    if path.is_empty() {
        return None;
    }

    let untracked = staged == '?' && unstaged == '?';
    let renamed = matches!(staged, 'R' | 'C') || matches!(unstaged, 'R' | 'C');
    let change_kind = if untracked {
        ChangeKind::Untracked
    } else if renamed {
        ChangeKind::Renamed
    } else if staged == 'A' || unstaged == 'A' {
        ChangeKind::Added
    } else if staged == 'D' || unstaged == 'D' {
        ChangeKind::Deleted
    } else {
        ChangeKind::Modified
    };

    Some(ChangedFile {
        path: path.to_string(),
        change_kind,
        is_staged: staged != ' ' && staged != '?',
        is_tracked: !untracked,
    })
}

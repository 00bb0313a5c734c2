/// Kind of change observed in one diff snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The file did not exist before (new file header or untracked file).
    NewFile,
    /// File-level modification without line detail. The reconciler ignores it.
    Modified,
    /// The file was removed.
    Deleted,
    /// A `+` content line.
    AddedLine,
    /// A `-` content line.
    RemovedLine,
}

/// One normalized change extracted from diff text.
///
/// Produced and consumed within a single refresh cycle; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub file: String,
    pub kind: ChangeKind,
    pub function_name: Option<String>,
    pub content: String,
}

impl ChangeEvent {
    pub fn new_file(file: impl Into<String>) -> Self {
        Self::file_level(file, ChangeKind::NewFile)
    }

    pub fn modified(file: impl Into<String>) -> Self {
        Self::file_level(file, ChangeKind::Modified)
    }

    pub fn deleted(file: impl Into<String>) -> Self {
        Self::file_level(file, ChangeKind::Deleted)
    }

    pub fn added_line(
        file: impl Into<String>,
        content: impl Into<String>,
        function_name: Option<String>,
    ) -> Self {
        Self {
            file: file.into(),
            kind: ChangeKind::AddedLine,
            function_name,
            content: content.into(),
        }
    }

    pub fn removed_line(
        file: impl Into<String>,
        content: impl Into<String>,
        function_name: Option<String>,
    ) -> Self {
        Self {
            file: file.into(),
            kind: ChangeKind::RemovedLine,
            function_name,
            content: content.into(),
        }
    }

    fn file_level(file: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            file: file.into(),
            kind,
            function_name: None,
            content: String::new(),
        }
    }
}

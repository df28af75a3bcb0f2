use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("commit message must not be empty")]
    EmptyCommitMessage,

    #[error("uncommitted changes on branch {branch}")]
    UncommittedChanges { branch: String },

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("commit prefix {prefix} is ambiguous ({matches} matches)")]
    AmbiguousCommit { prefix: String, matches: usize },

    #[error("no node at path: {0}")]
    PathNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("tree error: {0}")]
    Tree(#[from] plotweave_tree::TreeError),

    #[error("history error: {0}")]
    History(#[from] plotweave_history::HistoryError),

    #[error("store error: {0}")]
    Store(#[from] plotweave_store::StoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;

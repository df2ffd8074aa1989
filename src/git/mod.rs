// Git module: the version-control adapter used by the session

mod repository;
mod status;
mod utils;

pub use repository::{GitCli, Vcs};
pub use status::{ChangeKind, ChangedFile, parse_porcelain};
pub use utils::{discover_repo_root, run_git_command};

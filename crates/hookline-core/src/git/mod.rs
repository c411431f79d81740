//! Git plumbing: the repository inspector and the unified diff parser.

pub mod diff;
pub mod repo;

pub use diff::{added_lines, parse_hunk_header, HunkRange};
pub use repo::{Base, Comparison, GitRepo, Target, EMPTY_TREE_SHA1};

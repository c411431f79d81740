//! Parsing of the ref lists git writes to `pre-push` and `post-rewrite`
//! hooks on stdin.

/// Whether `sha` is git's all-zero placeholder for "no object".
pub(crate) fn is_null(sha: &str) -> bool {
    !sha.is_empty() && sha.bytes().all(|b| b == b'0')
}

/// One line of `pre-push` input:
/// `<local ref> <local sha> <remote ref> <remote sha>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushedRef {
    pub local_ref: String,
    pub local_sha: String,
    pub remote_ref: String,
    pub remote_sha: String,
}

impl PushedRef {
    pub fn parse_all(input: &str) -> Vec<PushedRef> {
        input
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                Some(PushedRef {
                    local_ref: fields.next()?.to_string(),
                    local_sha: fields.next()?.to_string(),
                    remote_ref: fields.next()?.to_string(),
                    remote_sha: fields.next()?.to_string(),
                })
            })
            .collect()
    }

    /// The remote ref does not exist yet.
    pub fn created(&self) -> bool {
        is_null(&self.remote_sha)
    }

    /// The push deletes the remote ref.
    pub fn deleted(&self) -> bool {
        is_null(&self.local_sha)
    }
}

/// One line of `post-rewrite` input: `<old sha> <new sha> [<extra>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenCommit {
    pub old_sha: String,
    pub new_sha: String,
}

impl RewrittenCommit {
    pub fn parse_all(input: &str) -> Vec<RewrittenCommit> {
        input
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                Some(RewrittenCommit {
                    old_sha: fields.next()?.to_string(),
                    new_sha: fields.next()?.to_string(),
                })
            })
            .collect()
    }
}

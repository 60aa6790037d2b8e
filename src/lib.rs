//! # Aula (role-scoped staff authentication)
//!
//! `aula` authenticates institutional users (administrators and teaching staff)
//! and issues a signed, role-scoped session token.
//!
//! ## Login flow
//!
//! 1. The email/password pair is checked against the credential store.
//! 2. The identity's role decides the branch: administrators get a token at once.
//! 3. Staff members are scoped to a single course. With exactly one course
//!    assignment the token is issued directly; with several, the caller receives
//!    the candidate list and must finalize the login by picking one.
//! 4. Finalization always re-checks the chosen course against the assignment
//!    table, since the caller controls every field of that request.
//!
//! Two lightweight entry points (`check-user` and `manual-login`) issue short-lived
//! generic tokens without any course scoping.

pub mod aula;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}

//! Build identification from the local git checkout.

use std::fs;
use std::path::Path;

/// Resolve the commit hash the checkout at `repo_dir` points at.
///
/// `HEAD` is followed one level when it is a symbolic `ref: <path>`; the ref
/// is looked up as a loose file first and in `packed-refs` second. Returns an
/// empty string when there is no repository or the ref cannot be resolved.
pub fn git_commit(repo_dir: &Path) -> String {
    let git_dir = repo_dir.join(".git");
    let head = match fs::read_to_string(git_dir.join("HEAD")) {
        Ok(head) => head,
        Err(_) => return String::new(),
    };

    let Some(reference) = head.strip_prefix("ref: ") else {
        return head.trim().to_string();
    };
    let reference = reference.trim();

    if let Ok(target) = fs::read_to_string(git_dir.join(reference)) {
        return target.trim().to_string();
    }

    match fs::read_to_string(git_dir.join("packed-refs")) {
        Ok(packed) => find_packed_ref(&packed, reference).unwrap_or_default(),
        Err(e) => {
            tracing::debug!(reference, error = %e, "Unresolvable git reference");
            String::new()
        }
    }
}

fn find_packed_ref(packed: &str, reference: &str) -> Option<String> {
    packed
        .lines()
        .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
        .filter_map(|line| line.split_once(' '))
        .find(|(_, name)| name.trim() == reference)
        .map(|(hash, _)| hash.to_string())
}

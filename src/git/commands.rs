//! Token lists for every git invocation the workflows make
//!
//! Each function returns the full command, program first. Keeping them in one
//! place pins down the exact engine surface this crate depends on.

use super::types::GraphScope;

/// Field separator used in the log format (ASCII unit separator)
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// `%h %D %ar %an %s`, unit-separated
pub const LOG_FORMAT: &str = "--pretty=format:%h%x1f%D%x1f%ar%x1f%an%x1f%s";

fn git<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    std::iter::once("git".to_string())
        .chain(args.into_iter().map(|s| s.as_ref().to_string()))
        .collect()
}

pub fn stage_all() -> Vec<String> {
    git(["add", "--all"])
}

pub fn commit(message: &str) -> Vec<String> {
    git(["commit", "-m", message])
}

pub fn current_branch() -> Vec<String> {
    git(["branch", "--show-current"])
}

pub fn upstream() -> Vec<String> {
    git(["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"])
}

pub fn push(remote: &str, branch: &str, set_upstream: bool) -> Vec<String> {
    if set_upstream {
        git(["push", "-u", remote, branch])
    } else {
        git(["push", remote, branch])
    }
}

/// Lists `name` if it exists as a local branch; empty output otherwise
pub fn find_local_branch(name: &str) -> Vec<String> {
    git(["branch", "--list", name])
}

pub fn create_and_switch(name: &str) -> Vec<String> {
    git(["checkout", "-b", name])
}

pub fn switch(name: &str) -> Vec<String> {
    git(["checkout", name])
}

pub fn delete_branch(name: &str) -> Vec<String> {
    git(["branch", "-D", name])
}

pub fn delete_remote_branch(remote: &str, name: &str) -> Vec<String> {
    git(["push", remote, "--delete", name])
}

pub fn merge(branch: &str) -> Vec<String> {
    git(["merge", "--no-edit", branch])
}

pub fn fetch_all() -> Vec<String> {
    git(["fetch", "--all"])
}

pub fn pull(remote: &str, branch: &str) -> Vec<String> {
    git(["pull", remote, branch])
}

pub fn local_branches() -> Vec<String> {
    git(["branch", "--format=%(refname:short)"])
}

pub fn remote_branches() -> Vec<String> {
    git(["branch", "--remotes", "--format=%(refname:short)"])
}

pub fn remote_url(remote: &str) -> Vec<String> {
    git(["remote", "get-url", remote])
}

pub fn add_remote(remote: &str, url: &str) -> Vec<String> {
    git(["remote", "add", remote, url])
}

pub fn set_remote_url(remote: &str, url: &str) -> Vec<String> {
    git(["remote", "set-url", remote, url])
}

/// Graph log limited to `max_count` commits; non-positive means no limit.
pub fn log_graph(max_count: i64, scope: GraphScope) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        "--graph".to_string(),
        "--decorate=full".to_string(),
        LOG_FORMAT.to_string(),
    ];
    if max_count > 0 {
        args.push(format!("--max-count={max_count}"));
    }
    match scope {
        GraphScope::Local => {
            args.extend(["--branches", "--tags", "HEAD"].map(String::from));
        }
        GraphScope::All => args.push("--all".to_string()),
    }
    git(args)
}

pub fn config_get(scope_flag: &str, key: &str) -> Vec<String> {
    git(["config", scope_flag, "--get", key])
}

pub fn config_set(scope_flag: &str, key: &str, value: &str) -> Vec<String> {
    git(["config", scope_flag, key, value])
}

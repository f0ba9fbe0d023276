use std::{fs, path::Path, process::Command, time::SystemTime};

fn main() {
  let now = SystemTime::now()
    .duration_since(SystemTime::UNIX_EPOCH)
    .map(|d| d.as_millis())
    .unwrap_or(0);
  println!("cargo:rustc-env=BUILD_TIME={}", now);

  println!("cargo:rerun-if-changed=.git/HEAD");
  if Path::new(".git/refs/heads").exists() {
    println!("cargo:rerun-if-changed=.git/refs/heads");
  }

  let (branch, commit) = git(&["rev-parse", "--abbrev-ref", "HEAD"])
    .zip(git(&["rev-parse", "HEAD"]))
    .or_else(read_head)
    .unwrap_or_else(|| ("unknown".into(), "unknown".into()));

  // seconds from git, reported in millis like BUILD_TIME
  let commit_time = git(&["show", "-s", "--format=%ct", "HEAD"])
    .and_then(|s| s.parse::<u64>().ok())
    .map(|t| t * 1000)
    .unwrap_or(0);

  println!("cargo:rustc-env=GIT_BRANCH={}", branch);
  println!("cargo:rustc-env=GIT_COMMIT={}", commit);
  println!("cargo:rustc-env=GIT_COMMIT_TIME={}", commit_time);
}

fn git(args: &[&str]) -> Option<String> {
  let output = Command::new("git").args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let text = String::from_utf8(output.stdout).ok()?;
  Some(text.trim().to_string()).filter(|s| !s.is_empty())
}

/// Source checkouts without a git binary (container builds).
fn read_head() -> Option<(String, String)> {
  let head = fs::read_to_string(".git/HEAD").ok()?;
  let head = head.trim();
  match head.strip_prefix("ref: ") {
    Some(reference) => {
      let branch = reference.rsplit('/').next().unwrap_or("unknown").to_string();
      let commit = fs::read_to_string(Path::new(".git").join(reference)).ok()?;
      Some((branch, commit.trim().to_string()))
    }
    None => Some(("HEAD".into(), head.to_string())),
  }
}

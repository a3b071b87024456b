fn main() {
    git_revision::set();
}

mod git_revision {
    use std::env;
    use std::process::Command;

    const GIT_REVISION: &str = "GIT_REVISION";

    pub fn set() {
        println!("cargo:rerun-if-env-changed={GIT_REVISION}");

        if env::var(GIT_REVISION).is_ok() {
            println!("Environment variable {GIT_REVISION} is set. Not setting.");
            return;
        }

        println!("cargo:rustc-env={GIT_REVISION}={}", revision());
    }

    // Builds from a source tarball have no git metadata.
    fn revision() -> String {
        let Ok(git_status) = Command::new("git").args(["status", "--porcelain"]).output() else {
            return "unknown".to_string();
        };

        if !git_status.status.success() {
            return "unknown".to_string();
        }

        if !git_status.stdout.is_empty() {
            return "dirty".to_string();
        }

        match Command::new("git").args(["rev-parse", "HEAD"]).output() {
            Ok(out) if out.status.success() => {
                String::from_utf8_lossy(&out.stdout).trim().to_string()
            },
            _ => "unknown".to_string(),
        }
    }
}

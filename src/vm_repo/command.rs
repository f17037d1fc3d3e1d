// Bounded subprocess execution, optionally inside the host root via chroot

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

pub struct CommandRunner {
    /// Host root to chroot into; `None` runs commands directly.
    chroot: Option<PathBuf>,
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(chroot: Option<PathBuf>, timeout: Duration) -> Self {
        Self { chroot, timeout }
    }

    pub(super) fn command(&self, program: &str, args: &[&str]) -> Command {
        let mut cmd = match &self.chroot {
            Some(root) => {
                let mut c = Command::new("chroot");
                c.arg(root).arg(program);
                c
            }
            None => Command::new(program),
        };
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Stdout of a successful run. Non-zero exit, spawn failure and timeout are errors.
    pub async fn output(&self, program: &str, args: &[&str]) -> anyhow::Result<String> {
        let out = timeout(self.timeout, self.command(program, args).output())
            .await
            .map_err(|_| anyhow::anyhow!("{} timed out after {:?}", program, self.timeout))??;
        anyhow::ensure!(out.status.success(), "{} exited with {}", program, out.status);
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

//! # DruDock Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Every DruDock command ends in the same place: an external program (usually
//! `docker-compose`) run through this module. It provides:
//!
//! - **`CommandLine`**: A structured program + argument list. It is only turned into a
//!   shell line (quoted with `shlex`) at the moment it is executed, so command
//!   construction can be unit-tested without spawning anything.
//! - **`ProcessSpec`**: One invocation: the command, an absolute timeout (default
//!   3600s), an idle timeout (default 600s) and a tty flag (default off).
//! - **`ExitPolicy`**: Which exit codes count as success. Zero always does; the
//!   default policy also tolerates `129`, which `docker-compose exec` returns after an
//!   interactive session (see docker/compose#3379). Settings can override the set.
//! - **`run`**: Executes a spec, streaming output line by line to a `Reporter`.
//!
//! ## Execution Modes
//!
//! - **Streamed** (`tty == false`): the command runs under `sh -c` with stdout and
//!   stderr piped. Both pipes are read concurrently and every line is forwarded to
//!   `Reporter::info` as soon as it arrives. The combined output is also kept, byte for
//!   byte, in the returned `ProcessOutcome`. The shell gets its own process group, and
//!   the whole group is killed if the absolute timeout passes or if no output arrives
//!   within the idle timeout.
//! - **Attached** (`tty == true`): the child inherits the operator's terminal, which
//!   interactive clients (`mysql`, `redis-cli monitor`, `bash`) require. It stays in the
//!   foreground process group, so the shell `exec`s the command line and a timeout kill
//!   reaches the command itself. Output goes straight to the terminal and is not
//!   captured, so only the absolute timeout applies.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::{self, CommandLine, ExitPolicy, ProcessSpec};
//!
//! # async fn run_example(reporter: &dyn crate::common::ui::Reporter) -> crate::core::error::Result<()> {
//! let cmd = CommandLine::new("docker-compose")
//!     .args(["-f", "./docker_demo/docker-compose.yml", "exec", "-T", "redis"])
//!     .args(["redis-cli", "info"]);
//! let outcome = process::run(&ProcessSpec::new(cmd), &ExitPolicy::default(), reporter).await?;
//! assert!(outcome.success);
//! # Ok(())
//! # }
//! ```
//!
use crate::common::ui::{RecordingReporter, Reporter};
use crate::core::error::{DrudockError, Result};
use anyhow::{anyhow, Context};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::{sleep, sleep_until, timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

/// Default absolute timeout for a single invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);
/// Default maximum silence before a streamed invocation is killed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);
/// Exit code `docker-compose exec` reports after a tty session ends normally.
pub const COMPOSE_EXEC_TTY_EXIT: i32 = 129;
/// Stand-in deadline for timeouts too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Replacement text for secret arguments in displayed command lines.
const REDACTED: &str = "****";

/// A program and its arguments, plus optional file redirections.
///
/// `Display` masks arguments added with [`CommandLine::secret_arg`]; only
/// [`CommandLine::to_shell_line`] reveals them, for the shell the runner spawns.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    /// (argument index, length of the readable prefix)
    secrets: Vec<(usize, usize)>,
    stdin_file: Option<PathBuf>,
    stdout_file: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secrets: Vec::new(),
            stdin_file: None,
            stdout_file: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends `<visible><secret>` as one argument. Displayed and logged forms show
    /// `visible` followed by a mask, e.g. `-p****`.
    pub fn secret_arg(mut self, visible: &str, secret: &str) -> Self {
        self.secrets.push((self.args.len(), visible.len()));
        self.args.push(format!("{}{}", visible, secret));
        self
    }

    /// Feed the given file to the program's stdin (`< file`).
    pub fn stdin_from(mut self, path: impl AsRef<Path>) -> Self {
        self.stdin_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Write the program's stdout to the given file (`> file`).
    pub fn stdout_to(mut self, path: impl AsRef<Path>) -> Self {
        self.stdout_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Serialises the command into a single POSIX shell line.
    ///
    /// Every word is quoted with `shlex`; a word containing a NUL byte cannot be
    /// quoted and is passed through unchanged.
    pub fn to_shell_line(&self) -> String {
        self.render(false)
    }

    fn render(&self, redact: bool) -> String {
        let args = self.args.iter().enumerate().map(|(i, arg)| {
            match self.secrets.iter().find(|(idx, _)| *idx == i) {
                Some((_, visible)) if redact => {
                    let prefix = arg.get(..*visible).unwrap_or_default();
                    quote(&format!("{}{}", prefix, REDACTED))
                }
                _ => quote(arg),
            }
        });
        let mut line = std::iter::once(quote(&self.program))
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(path) = &self.stdin_file {
            line.push_str(" < ");
            line.push_str(&quote(&path.to_string_lossy()));
        }
        if let Some(path) = &self.stdout_file {
            line.push_str(" > ");
            line.push_str(&quote(&path.to_string_lossy()));
        }
        line
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandLine").field(&self.render(true)).finish()
    }
}

fn quote(word: &str) -> String {
    shlex::try_quote(word)
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| word.to_string())
}

/// Everything needed to run one external command.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub command: CommandLine,
    pub timeout: Duration,
    pub idle_timeout: Duration,
    pub tty: bool,
}

impl ProcessSpec {
    pub fn new(command: CommandLine) -> Self {
        Self {
            command,
            timeout: DEFAULT_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            tty: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_tty(mut self, tty: bool) -> Self {
        self.tty = tty;
        self
    }
}

/// Set of non-zero exit codes that are still treated as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitPolicy {
    tolerated: BTreeSet<i32>,
}

impl Default for ExitPolicy {
    fn default() -> Self {
        Self::with_tolerated([COMPOSE_EXEC_TTY_EXIT])
    }
}

impl ExitPolicy {
    /// Only exit code 0 succeeds.
    pub fn strict() -> Self {
        Self {
            tolerated: BTreeSet::new(),
        }
    }

    pub fn with_tolerated(codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            tolerated: codes.into_iter().filter(|c| *c != 0).collect(),
        }
    }

    pub fn is_success(&self, code: i32) -> bool {
        code == 0 || self.tolerated.contains(&code)
    }

    pub fn tolerated(&self) -> impl Iterator<Item = i32> + '_ {
        self.tolerated.iter().copied()
    }
}

/// Result of a successful (or tolerated) invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    /// Combined stdout/stderr. Always empty for attached (tty) runs.
    pub output: String,
    pub success: bool,
}

/// Runs `spec`, reporting output through `reporter`.
///
/// # Errors
///
/// Returns `DrudockError::ProcessExecution` when the process cannot be spawned, exits
/// with a code `policy` does not accept, is terminated by a signal, or is killed by
/// either timeout (in which case `exit_code` is `None`).
#[instrument(skip_all, fields(cmd = %spec.command, tty = spec.tty))]
pub async fn run(
    spec: &ProcessSpec,
    policy: &ExitPolicy,
    reporter: &dyn Reporter,
) -> Result<ProcessOutcome> {
    // Logs and errors only ever see the redacted form.
    let line = spec.command.to_string();
    debug!(
        "Running '{}' (timeout: {:?}, idle timeout: {:?})",
        line, spec.timeout, spec.idle_timeout
    );
    if spec.tty {
        run_attached(spec, &line, policy).await
    } else {
        run_streamed(spec, &line, policy, reporter).await
    }
}

/// Runs `command` without reporting anything and returns its output.
///
/// Uses a strict exit policy: tolerated codes only make sense for interactive exec.
pub async fn capture(command: CommandLine, limit: Duration) -> Result<ProcessOutcome> {
    let recorder = RecordingReporter::new();
    let spec = ProcessSpec::new(command)
        .with_timeout(limit)
        .with_idle_timeout(limit);
    run(&spec, &ExitPolicy::strict(), &recorder).await
}

fn shell(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script).kill_on_drop(true);
    cmd
}

fn deadline_after(limit: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(limit).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Kills the child's whole process group, then the child itself, and reaps it.
async fn kill_group(child: &mut Child, line: &str) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!("Failed to signal process group of '{}': {}", line, e);
        }
    }
    if let Err(e) = child.kill().await {
        warn!("Failed to kill '{}': {}", line, e);
    }
}

async fn run_streamed(
    spec: &ProcessSpec,
    line: &str,
    policy: &ExitPolicy,
    reporter: &dyn Reporter,
) -> Result<ProcessOutcome> {
    let mut cmd = shell(&spec.command.to_shell_line());
    #[cfg(unix)]
    cmd.process_group(0);
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(line, e))?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_lines(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_lines(stderr, tx.clone()));
    }
    // Only the reader tasks hold senders now; `recv` yields None once both pipes close.
    drop(tx);

    let deadline = deadline_after(spec.timeout);
    let mut output: Vec<u8> = Vec::new();
    let mut killed_because: Option<String> = None;

    loop {
        tokio::select! {
            chunk = rx.recv() => match chunk {
                Some(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    reporter.info(text.trim_end_matches(['\n', '\r']));
                    output.extend_from_slice(&bytes);
                }
                None => break,
            },
            _ = sleep(spec.idle_timeout) => {
                killed_because = Some(format!(
                    "no output for {}s, idle timeout exceeded",
                    spec.idle_timeout.as_secs_f64()
                ));
                break;
            }
            _ = sleep_until(deadline) => {
                killed_because = Some(format!("timed out after {}s", spec.timeout.as_secs_f64()));
                break;
            }
        }
    }

    // Pipes are closed but the process may still be alive without printing anything.
    let mut status = None;
    if killed_because.is_none() {
        match timeout_at(deadline, child.wait()).await {
            Ok(waited) => {
                status = Some(
                    waited.with_context(|| format!("Failed to wait for command '{}'", line))?,
                );
            }
            Err(_) => {
                killed_because = Some(format!("timed out after {}s", spec.timeout.as_secs_f64()));
            }
        }
    }

    let output = String::from_utf8_lossy(&output).into_owned();
    match (status, killed_because) {
        (Some(status), _) => classify(line, status, output, policy),
        (None, reason) => {
            let reason = reason.unwrap_or_else(|| "killed".to_string());
            warn!("Killing '{}': {}", line, reason);
            kill_group(&mut child, line).await;
            Err(anyhow!(DrudockError::ProcessExecution {
                cmd: line.to_string(),
                exit_code: None,
                reason,
                output,
            }))
        }
    }
}

async fn run_attached(spec: &ProcessSpec, line: &str, policy: &ExitPolicy) -> Result<ProcessOutcome> {
    let mut child = shell(&format!("exec {}", spec.command.to_shell_line()))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| spawn_error(line, e))?;

    match timeout_at(deadline_after(spec.timeout), child.wait()).await {
        Ok(waited) => {
            let status =
                waited.with_context(|| format!("Failed to wait for command '{}'", line))?;
            classify(line, status, String::new(), policy)
        }
        Err(_) => {
            warn!("Killing attached command '{}' after {:?}", line, spec.timeout);
            if let Err(e) = child.kill().await {
                warn!("Failed to kill '{}': {}", line, e);
            }
            Err(anyhow!(DrudockError::ProcessExecution {
                cmd: line.to_string(),
                exit_code: None,
                reason: format!("timed out after {}s", spec.timeout.as_secs_f64()),
                output: String::new(),
            }))
        }
    }
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<Vec<u8>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    loop {
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(buf).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Stopped reading child output: {}", e);
                break;
            }
        }
    }
}

fn classify(
    line: &str,
    status: ExitStatus,
    output: String,
    policy: &ExitPolicy,
) -> Result<ProcessOutcome> {
    match status.code() {
        Some(0) => Ok(ProcessOutcome {
            exit_code: 0,
            output,
            success: true,
        }),
        Some(code) if policy.is_success(code) => {
            info!("'{}' exited with tolerated code {}", line, code);
            Ok(ProcessOutcome {
                exit_code: code,
                output,
                success: true,
            })
        }
        Some(code) => Err(anyhow!(DrudockError::ProcessExecution {
            cmd: line.to_string(),
            exit_code: Some(code),
            reason: format!("exit code {}", code),
            output,
        })),
        None => Err(anyhow!(DrudockError::ProcessExecution {
            cmd: line.to_string(),
            exit_code: None,
            reason: "terminated by signal".to_string(),
            output,
        })),
    }
}

fn spawn_error(line: &str, e: std::io::Error) -> anyhow::Error {
    anyhow!(DrudockError::ProcessExecution {
        cmd: line.to_string(),
        exit_code: None,
        reason: format!("failed to start: {}", e),
        output: String::new(),
    })
}

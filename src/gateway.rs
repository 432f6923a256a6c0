use crate::{
    command::{CommandOutput, CommandRunner},
    config::HypervisorConfig,
    log_debug, log_info, log_warn,
    machine::MachineState,
};
use async_trait::async_trait;
use std::fmt;
use std::io;

/// Text explaining why a clone or destroy command failed, as reported by the
/// hypervisor tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic(pub String);

impl Diagnostic {
    fn from_output(output: &CommandOutput) -> Self {
        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            return Diagnostic(stderr.to_string());
        }
        let stdout = output.stdout.trim();
        if !stdout.is_empty() {
            return Diagnostic(stdout.to_string());
        }
        Diagnostic("command exited with a failure status".to_string())
    }

    fn from_spawn(program: &str, err: &io::Error) -> Self {
        Diagnostic(format!("failed to run {}: {}", program, err))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle and inspection operations against the hypervisor.
///
/// Implementations never fail the caller for listing or inspection: failures
/// become an empty list, `MachineState::Unknown` or `None`.
#[async_trait]
pub trait Hypervisor: Send + Sync {
    /// Whether the management CLI can be executed at all.
    async fn is_available(&self) -> bool;

    /// Names of every defined machine, running or not, in listing order.
    async fn list_machines(&self) -> Vec<String>;

    async fn query_state(&self, name: &str) -> MachineState;

    /// MAC of the first bridged interface.
    async fn query_hardware_address(&self, name: &str) -> Option<String>;

    /// Issues a start and returns without waiting for the transition.
    async fn start(&self, name: &str);

    /// Issues a graceful shutdown and returns without waiting for the transition.
    async fn stop(&self, name: &str);

    /// Full-copy clone of `source` under `new_name`.
    async fn clone_machine(&self, source: &str, new_name: &str) -> Result<(), Diagnostic>;

    /// Removes the definition of `name` and all attached storage. Does not
    /// check whether the machine is running.
    async fn destroy(&self, name: &str) -> Result<(), Diagnostic>;
}

/// [`Hypervisor`] backed by the `virsh` and `virt-clone` command-line tools.
pub struct VirshGateway<R> {
    runner: R,
    config: HypervisorConfig,
}

impl<R: CommandRunner> VirshGateway<R> {
    pub fn new(runner: R, config: HypervisorConfig) -> Self {
        Self { runner, config }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn virsh(&self, args: &[&str]) -> io::Result<CommandOutput> {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 2);
        if let Some(uri) = &self.config.connect_uri {
            full.push("-c");
            full.push(uri);
        }
        full.extend_from_slice(args);
        self.runner.run(&self.config.program, &full).await
    }

    /// Runs a read-only virsh query and returns stdout, or `None` on any failure.
    async fn query(&self, args: &[&str]) -> Option<String> {
        match self.virsh(args).await {
            Ok(output) if output.success => Some(output.stdout),
            Ok(output) => {
                log_warn!("virsh {} failed: {}", args.join(" "), output.stderr.trim());
                None
            }
            Err(e) => {
                log_warn!("Failed to run {}: {}", self.config.program, e);
                None
            }
        }
    }

    async fn fire(&self, verb: &str, name: &str) {
        log_info!("Issuing virsh {} for '{}'", verb, name);
        match self.virsh(&[verb, name]).await {
            Ok(output) if output.success => {}
            Ok(output) => log_warn!(
                "virsh {} '{}' reported failure: {}",
                verb,
                name,
                output.stderr.trim()
            ),
            Err(e) => log_warn!("Failed to run {} {}: {}", self.config.program, verb, e),
        }
    }
}

#[async_trait]
impl<R: CommandRunner> Hypervisor for VirshGateway<R> {
    async fn is_available(&self) -> bool {
        self.runner
            .run(&self.config.program, &["--version"])
            .await
            .map(|output| output.success)
            .unwrap_or(false)
    }

    async fn list_machines(&self) -> Vec<String> {
        self.query(&["list", "--all", "--name"])
            .await
            .map(|stdout| parse_name_list(&stdout))
            .unwrap_or_default()
    }

    async fn query_state(&self, name: &str) -> MachineState {
        self.query(&["domstate", name])
            .await
            .map(|stdout| MachineState::from_domstate(&stdout))
            .unwrap_or(MachineState::Unknown)
    }

    async fn query_hardware_address(&self, name: &str) -> Option<String> {
        let stdout = self.query(&["domiflist", name]).await?;
        let mac = parse_interface_mac(&stdout, &self.config.interface_prefix);
        log_debug!("Hardware address of '{}': {:?}", name, mac);
        mac
    }

    async fn start(&self, name: &str) {
        self.fire("start", name).await;
    }

    async fn stop(&self, name: &str) {
        self.fire("shutdown", name).await;
    }

    async fn clone_machine(&self, source: &str, new_name: &str) -> Result<(), Diagnostic> {
        log_info!("Cloning '{}' to '{}'", source, new_name);

        let mut args: Vec<&str> = Vec::new();
        if let Some(uri) = &self.config.connect_uri {
            args.push("--connect");
            args.push(uri);
        }
        args.extend_from_slice(&["--original", source, "--name", new_name, "--auto-clone"]);

        let program = &self.config.clone_program;
        match self.runner.run(program, &args).await {
            Ok(output) if output.success => Ok(()),
            Ok(output) => {
                let diagnostic = Diagnostic::from_output(&output);
                log_warn!("Clone of '{}' failed: {}", source, diagnostic);
                Err(diagnostic)
            }
            Err(e) => Err(Diagnostic::from_spawn(program, &e)),
        }
    }

    async fn destroy(&self, name: &str) -> Result<(), Diagnostic> {
        log_info!("Undefining '{}' and removing its storage", name);

        match self.virsh(&["undefine", name, "--remove-all-storage"]).await {
            Ok(output) if output.success => Ok(()),
            Ok(output) => {
                let diagnostic = Diagnostic::from_output(&output);
                log_warn!("Removal of '{}' failed: {}", name, diagnostic);
                Err(diagnostic)
            }
            Err(e) => Err(Diagnostic::from_spawn(&self.config.program, &e)),
        }
    }
}

fn parse_name_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// `virsh domiflist` columns: Interface Type Source Model MAC
fn parse_interface_mac(stdout: &str, prefix: &str) -> Option<String> {
    stdout
        .lines()
        .filter(|line| line.contains(prefix))
        .find_map(|line| line.split_whitespace().nth(4))
        .map(str::to_string)
}

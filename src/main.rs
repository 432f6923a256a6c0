use anyhow::Context;
use clap::Parser;
use virtdeck::{
    Dashboard, HostResolver, SystemRunner, TerminalConsole, VirshGateway,
    config::VirtdeckConfig,
    console::restore_terminal,
    log_info, logger,
    preflight::run_preflight,
};

/// Terminal dashboard for libvirt virtual machines.
///
/// Reads optional settings from $VIRTDECK_CONFIG or the per-user config
/// directory (virtdeck/config.toml).
#[derive(Parser)]
#[command(name = "virtdeck")]
#[command(version, about)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    let config_path = VirtdeckConfig::default_path();
    let config = VirtdeckConfig::load_or_default(config_path.as_deref()).with_context(|| {
        format!(
            "failed to load configuration from {}",
            config_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".to_string())
        )
    })?;

    let log_path = logger::init_logger(&config.logging).context("failed to set up logging")?;
    log_info!("virtdeck starting, logging to {}", log_path.display());

    run_preflight(&config);

    let gateway = VirshGateway::new(SystemRunner, config.hypervisor.clone());
    let resolver = HostResolver::new(SystemRunner, config.network.clone());
    let mut dashboard = Dashboard::new(gateway, resolver, config.dashboard.machine_limit());

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    let mut console = TerminalConsole::enter().context("failed to initialise the terminal")?;
    let outcome = dashboard.run(&mut console).await;
    console.restore().context("failed to restore the terminal")?;
    outcome.context("dashboard terminated with an error")?;

    log_info!("virtdeck exiting");
    Ok(())
}

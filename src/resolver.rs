use crate::{
    command::CommandRunner, config::NetworkConfig, log_debug, log_warn, machine::Address,
};
use async_trait::async_trait;

/// Maps a hardware address to an IP address.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, hardware_address: Option<&str>) -> Address;
}

/// Resolves against the host's ARP cache first, then its neighbour table.
/// Every call queries both sources afresh.
pub struct HostResolver<R> {
    runner: R,
    config: NetworkConfig,
}

impl<R: CommandRunner> HostResolver<R> {
    pub fn new(runner: R, config: NetworkConfig) -> Self {
        Self { runner, config }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn table(&self, program: &str, args: &[&str]) -> Option<String> {
        match self.runner.run(program, args).await {
            Ok(output) if output.success => Some(output.stdout),
            Ok(output) => {
                log_debug!("{} {} failed: {}", program, args.join(" "), output.stderr.trim());
                None
            }
            Err(e) => {
                log_warn!("Failed to run {}: {}", program, e);
                None
            }
        }
    }
}

#[async_trait]
impl<R: CommandRunner> AddressResolver for HostResolver<R> {
    async fn resolve(&self, hardware_address: Option<&str>) -> Address {
        let Some(mac) = hardware_address else {
            return Address::NotApplicable;
        };

        if let Some(table) = self.table(&self.config.arp_program, &["-an"]).await {
            if let Some(ip) = find_in_arp_table(&table, mac) {
                return Address::Ip(ip);
            }
        }

        if let Some(table) = self.table(&self.config.neighbor_program, &["neigh"]).await {
            if let Some(ip) = find_in_neighbor_table(&table, mac) {
                return Address::Ip(ip);
            }
        }

        log_debug!("No host table entry for {}", mac);
        Address::Unknown
    }
}

/// `arp -an` rows look like `? (192.168.122.45) at 52:54:00:6b:3c:58 [ether] on virbr0`.
/// The parenthesised address counts only when the MAC follows it on the same line.
pub fn find_in_arp_table(table: &str, mac: &str) -> Option<String> {
    let mac = mac.to_lowercase();
    for line in table.lines() {
        for (open, _) in line.match_indices('(') {
            let after_open = &line[open + 1..];
            let Some(close) = after_open.find(')') else {
                continue;
            };
            let candidate = &after_open[..close];
            let is_ip_shaped = !candidate.is_empty()
                && candidate.chars().all(|c| c.is_ascii_digit() || c == '.');
            if is_ip_shaped && after_open[close + 1..].to_lowercase().contains(&mac) {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

/// `ip neigh` rows start with the address: `192.168.122.45 dev virbr0 lladdr 52:54:00:6b:3c:58 REACHABLE`.
pub fn find_in_neighbor_table(table: &str, mac: &str) -> Option<String> {
    let mac = mac.to_lowercase();
    table
        .lines()
        .find(|line| line.to_lowercase().contains(&mac))
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
}

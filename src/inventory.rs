use crate::{
    config::MAX_MACHINES,
    gateway::Hypervisor,
    log_debug, log_info,
    machine::{Address, MachineRecord, MachineState},
    resolver::AddressResolver,
};
use chrono::{DateTime, Local};
use std::collections::HashSet;

/// One complete, ordered view of the fleet. Replaced wholesale on refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Vec<MachineRecord>,
    pub taken_at: DateTime<Local>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            taken_at: Local::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MachineRecord> {
        self.records.get(index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|record| record.name == name)
    }
}

/// Builds a snapshot of at most `limit` machines (never more than 99), in the
/// hypervisor's listing order. Only running machines get an address lookup.
pub async fn build_snapshot<H, A>(gateway: &H, resolver: &A, limit: usize) -> Snapshot
where
    H: Hypervisor + ?Sized,
    A: AddressResolver + ?Sized,
{
    let limit = limit.min(MAX_MACHINES);
    let names = gateway.list_machines().await;

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for name in names {
        if records.len() == limit {
            break;
        }
        if !seen.insert(name.clone()) {
            log_debug!("Skipping duplicate listing entry '{}'", name);
            continue;
        }

        let state = gateway.query_state(&name).await;
        let address = match state {
            MachineState::Running => {
                let mac = gateway.query_hardware_address(&name).await;
                resolver.resolve(mac.as_deref()).await
            }
            _ => Address::NotApplicable,
        };

        records.push(MachineRecord::new(records.len() + 1, name, state, address));
    }

    log_info!("Snapshot built with {} machines", records.len());

    Snapshot {
        records,
        taken_at: Local::now(),
    }
}

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineState {
    Running,
    ShutOff,
    Unknown,
}

impl MachineState {
    /// Maps `virsh domstate` output. Anything other than running or shut off
    /// (paused, crashed, in shutdown, ...) offers no primary action, so it
    /// folds into `Unknown`.
    pub fn from_domstate(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "running" => MachineState::Running,
            "shut off" => MachineState::ShutOff,
            _ => MachineState::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MachineState::Running => "running",
            MachineState::ShutOff => "shut off",
            MachineState::Unknown => "unknown",
        }
    }

    pub fn primary_action(&self) -> PrimaryAction {
        match self {
            MachineState::Running => PrimaryAction::Stop,
            MachineState::ShutOff => PrimaryAction::Start,
            MachineState::Unknown => PrimaryAction::None,
        }
    }

    pub fn secondary_actions(&self) -> Vec<SecondaryAction> {
        match self {
            MachineState::ShutOff => vec![SecondaryAction::Clone, SecondaryAction::Delete],
            _ => vec![SecondaryAction::Clone],
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Start,
    Stop,
    None,
}

impl PrimaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            PrimaryAction::Start => "Start",
            PrimaryAction::Stop => "Stop",
            PrimaryAction::None => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryAction {
    Clone,
    Delete,
}

impl SecondaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            SecondaryAction::Clone => "Clone",
            SecondaryAction::Delete => "Delete",
        }
    }
}

/// Best-effort network address of a machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Ip(String),
    /// The machine is not running, or it has no bridged interface.
    NotApplicable,
    /// Neither host table knew the hardware address.
    Unknown,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ip(ip) => f.write_str(ip),
            Address::NotApplicable => f.write_str("N/A"),
            Address::Unknown => f.write_str("Unknown"),
        }
    }
}

/// One row of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineRecord {
    pub ordinal: usize,
    pub name: String,
    pub state: MachineState,
    pub address: Address,
    pub primary_action: PrimaryAction,
    pub secondary_actions: Vec<SecondaryAction>,
}

impl MachineRecord {
    /// Builds a record whose actions are derived from `state`.
    pub fn new(ordinal: usize, name: String, state: MachineState, address: Address) -> Self {
        Self {
            ordinal,
            name,
            state,
            address,
            primary_action: state.primary_action(),
            secondary_actions: state.secondary_actions(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, MachineState::Running)
    }

    pub fn can_delete(&self) -> bool {
        self.secondary_actions.contains(&SecondaryAction::Delete)
    }

    pub fn secondary_label(&self) -> String {
        self.secondary_actions
            .iter()
            .map(SecondaryAction::label)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [MachineState; 3] = [
        MachineState::Running,
        MachineState::ShutOff,
        MachineState::Unknown,
    ];

    #[test]
    fn domstate_parsing() {
        assert_eq!(MachineState::from_domstate("running\n\n"), MachineState::Running);
        assert_eq!(MachineState::from_domstate("shut off\n"), MachineState::ShutOff);
        assert_eq!(MachineState::from_domstate("Shut Off"), MachineState::ShutOff);
        assert_eq!(MachineState::from_domstate("paused"), MachineState::Unknown);
        assert_eq!(MachineState::from_domstate(""), MachineState::Unknown);
    }

    #[test]
    fn primary_action_follows_state() {
        for state in ALL_STATES {
            let record = MachineRecord::new(1, "vm".into(), state, Address::NotApplicable);
            match record.primary_action {
                PrimaryAction::Start => assert_eq!(state, MachineState::ShutOff),
                PrimaryAction::Stop => assert_eq!(state, MachineState::Running),
                PrimaryAction::None => assert_eq!(state, MachineState::Unknown),
            }
        }
    }

    #[test]
    fn delete_only_offered_when_shut_off() {
        for state in ALL_STATES {
            let record = MachineRecord::new(1, "vm".into(), state, Address::NotApplicable);
            assert!(record.secondary_actions.contains(&SecondaryAction::Clone));
            assert_eq!(record.can_delete(), state == MachineState::ShutOff);
        }
    }

    #[test]
    fn address_display() {
        assert_eq!(Address::Ip("10.0.0.5".into()).to_string(), "10.0.0.5");
        assert_eq!(Address::NotApplicable.to_string(), "N/A");
        assert_eq!(Address::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn secondary_label_joins_actions() {
        let off = MachineRecord::new(1, "a".into(), MachineState::ShutOff, Address::NotApplicable);
        assert_eq!(off.secondary_label(), "Clone / Delete");
        let on = MachineRecord::new(2, "b".into(), MachineState::Running, Address::Unknown);
        assert_eq!(on.secondary_label(), "Clone");
    }
}

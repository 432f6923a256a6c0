use crate::{gateway::Hypervisor, log_debug, machine::PrimaryAction};

/// What the dispatcher handed to the hypervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Started(String),
    Stopped(String),
    Nothing,
}

impl Dispatched {
    /// One-line status text for the dashboard footer.
    pub fn status_line(&self) -> Option<String> {
        match self {
            Dispatched::Started(name) => Some(format!("start issued for {} (press r to refresh)", name)),
            Dispatched::Stopped(name) => Some(format!("shutdown issued for {} (press r to refresh)", name)),
            Dispatched::Nothing => None,
        }
    }
}

/// Issues the primary action for `name`. The transition is not awaited; the
/// next snapshot may still show the old state.
pub async fn apply_primary_action<H>(gateway: &H, name: &str, action: PrimaryAction) -> Dispatched
where
    H: Hypervisor + ?Sized,
{
    match action {
        PrimaryAction::Start => {
            gateway.start(name).await;
            Dispatched::Started(name.to_string())
        }
        PrimaryAction::Stop => {
            gateway.stop(name).await;
            Dispatched::Stopped(name.to_string())
        }
        PrimaryAction::None => {
            log_debug!("No primary action available for '{}'", name);
            Dispatched::Nothing
        }
    }
}

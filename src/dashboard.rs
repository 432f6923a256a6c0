use crate::{
    Result,
    console::Console,
    dispatch::apply_primary_action,
    gateway::Hypervisor,
    inventory::{Snapshot, build_snapshot},
    log_info,
    machine::MachineRecord,
    resolver::AddressResolver,
    workflow::{CloneOutcome, DeleteOutcome, WorkflowKind, clone_workflow, delete_workflow},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Dashboard commands decoded from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Confirm,
    Clone,
    Delete,
    Refresh,
    Quit,
    Other,
}

impl Key {
    pub fn from_event(event: KeyEvent) -> Self {
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return match event.code {
                KeyCode::Char('c') => Key::Quit,
                _ => Key::Other,
            };
        }
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => Key::Up,
            KeyCode::Down | KeyCode::Char('j') => Key::Down,
            KeyCode::Enter => Key::Confirm,
            KeyCode::Char('c') | KeyCode::Char('C') => Key::Clone,
            KeyCode::Char('d') | KeyCode::Char('D') => Key::Delete,
            KeyCode::Char('r') | KeyCode::Char('R') => Key::Refresh,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Key::Quit,
            _ => Key::Other,
        }
    }
}

/// Why the dashboard cannot offer any interaction beyond quitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    HypervisorMissing,
    NoMachines,
}

impl UnavailableReason {
    pub fn message(&self) -> &'static str {
        match self {
            UnavailableReason::HypervisorMissing => "virsh is not installed or cannot be executed.",
            UnavailableReason::NoMachines => "No virtual machines were found.",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            UnavailableReason::HypervisorMissing => {
                "Install the libvirt client tools (e.g. `sudo apt install libvirt-clients`)."
            }
            UnavailableReason::NoMachines => "Create one with virt-manager or virt-install.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Browsing,
    InWorkflow(WorkflowKind),
    Unavailable(UnavailableReason),
    Terminated,
}

/// Everything the renderer needs: current state, snapshot and selection.
#[derive(Debug, Clone)]
pub struct View {
    pub state: ViewState,
    pub snapshot: Snapshot,
    pub selected: usize,
    pub status: Option<String>,
}

impl View {
    fn new() -> Self {
        Self {
            state: ViewState::Loading,
            snapshot: Snapshot::empty(),
            selected: 0,
            status: None,
        }
    }

    pub fn selected_record(&self) -> Option<&MachineRecord> {
        self.snapshot.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.snapshot.len() {
            self.selected += 1;
        }
    }

    /// Replaces the snapshot and keeps the selection index, clamped to the new size.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.selected = self.selected.min(self.snapshot.len().saturating_sub(1));
    }
}

/// The interaction loop state machine. Owns the snapshot and selection; every
/// hypervisor call is awaited in turn.
pub struct Dashboard<H, A> {
    gateway: H,
    resolver: A,
    limit: usize,
    view: View,
}

impl<H, A> Dashboard<H, A>
where
    H: Hypervisor,
    A: AddressResolver,
{
    pub fn new(gateway: H, resolver: A, limit: usize) -> Self {
        Self {
            gateway,
            resolver,
            limit,
            view: View::new(),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn state(&self) -> &ViewState {
        &self.view.state
    }

    pub fn gateway(&self) -> &H {
        &self.gateway
    }

    pub fn is_terminated(&self) -> bool {
        self.view.state == ViewState::Terminated
    }

    /// Leaves `Loading`: either `Browsing` or the diagnostic screen.
    pub async fn load(&mut self) {
        if !self.gateway.is_available().await {
            log_info!("Hypervisor CLI unavailable");
            self.view.state = ViewState::Unavailable(UnavailableReason::HypervisorMissing);
            return;
        }

        self.refresh().await;
        self.view.state = if self.view.snapshot.is_empty() {
            ViewState::Unavailable(UnavailableReason::NoMachines)
        } else {
            ViewState::Browsing
        };
    }

    pub async fn refresh(&mut self) {
        let snapshot = build_snapshot(&self.gateway, &self.resolver, self.limit).await;
        self.view.replace_snapshot(snapshot);
    }

    pub async fn handle_key<C>(&mut self, key: Key, console: &mut C) -> Result<()>
    where
        C: Console + ?Sized,
    {
        match self.view.state {
            ViewState::Browsing => self.browse(key, console).await,
            ViewState::Unavailable(_) => {
                if key == Key::Quit {
                    self.view.state = ViewState::Terminated;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn browse<C>(&mut self, key: Key, console: &mut C) -> Result<()>
    where
        C: Console + ?Sized,
    {
        match key {
            Key::Up => self.view.move_up(),
            Key::Down => self.view.move_down(),
            Key::Confirm => {
                if let Some(record) = self.view.selected_record() {
                    let (name, action) = (record.name.clone(), record.primary_action);
                    let dispatched = apply_primary_action(&self.gateway, &name, action).await;
                    self.view.status = dispatched.status_line();
                    self.refresh().await;
                }
            }
            Key::Refresh => {
                self.view.status = None;
                self.refresh().await;
            }
            Key::Clone => {
                if let Some(name) = self.view.selected_record().map(|r| r.name.clone()) {
                    self.view.state = ViewState::InWorkflow(WorkflowKind::Clone);
                    let outcome = clone_workflow(&self.gateway, console, &name).await;
                    self.view.state = ViewState::Browsing;
                    self.view.status = match outcome? {
                        CloneOutcome::Cloned(new_name) => {
                            Some(format!("{} created from {}", new_name, name))
                        }
                        _ => None,
                    };
                    self.refresh().await;
                }
            }
            Key::Delete => {
                if let Some(name) = self.view.selected_record().map(|r| r.name.clone()) {
                    self.view.state = ViewState::InWorkflow(WorkflowKind::Delete);
                    let outcome = delete_workflow(&self.gateway, console, &name).await;
                    self.view.state = ViewState::Browsing;
                    self.view.status = match outcome? {
                        DeleteOutcome::Deleted => Some(format!("{} deleted", name)),
                        _ => None,
                    };
                    self.refresh().await;
                }
            }
            Key::Quit => self.view.state = ViewState::Terminated,
            Key::Other => {}
        }
        Ok(())
    }

    /// Runs until the operator quits.
    pub async fn run<C>(&mut self, console: &mut C) -> Result<()>
    where
        C: Console + ?Sized,
    {
        if self.view.state == ViewState::Loading {
            console.render(&self.view)?;
            self.load().await;
        }

        while !self.is_terminated() {
            console.render(&self.view)?;
            let key = console.next_key()?;
            self.handle_key(key, console).await?;
        }
        Ok(())
    }
}

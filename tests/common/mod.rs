// Test doubles shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use virtdeck::{
    Address, AddressResolver, Console, Diagnostic, Hypervisor, Key, MachineState, Notice,
    dashboard::{View, ViewState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    State(String),
    HardwareAddress(String),
    Start(String),
    Stop(String),
    Clone(String, String),
    Destroy(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Start(_) | Call::Stop(_) | Call::Clone(_, _) | Call::Destroy(_)
        )
    }
}

#[derive(Debug, Clone)]
struct FakeMachine {
    name: String,
    state: MachineState,
    mac: Option<String>,
}

/// In-memory hypervisor that records every call. Start and stop leave the
/// state untouched unless instant transitions are enabled, mimicking a slow
/// guest.
pub struct FakeHypervisor {
    available: bool,
    instant_transitions: bool,
    machines: Mutex<Vec<FakeMachine>>,
    calls: Mutex<Vec<Call>>,
    clone_failure: Option<String>,
    destroy_failure: Option<String>,
}

impl FakeHypervisor {
    pub fn new() -> Self {
        Self {
            available: true,
            instant_transitions: false,
            machines: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            clone_failure: None,
            destroy_failure: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn with_machine(self, name: &str, state: MachineState) -> Self {
        let mac = format!("52:54:00:00:00:{:02x}", self.machines.lock().unwrap().len());
        self.with_machine_mac(name, state, Some(&mac))
    }

    pub fn with_machine_mac(self, name: &str, state: MachineState, mac: Option<&str>) -> Self {
        self.machines.lock().unwrap().push(FakeMachine {
            name: name.to_string(),
            state,
            mac: mac.map(str::to_string),
        });
        self
    }

    pub fn with_instant_transitions(mut self) -> Self {
        self.instant_transitions = true;
        self
    }

    pub fn failing_clone(mut self, diagnostic: &str) -> Self {
        self.clone_failure = Some(diagnostic.to_string());
        self
    }

    pub fn failing_destroy(mut self, diagnostic: &str) -> Self {
        self.destroy_failure = Some(diagnostic.to_string());
        self
    }

    pub fn set_state(&self, name: &str, state: MachineState) {
        if let Some(machine) = self.machines.lock().unwrap().iter_mut().find(|m| m.name == name) {
            machine.state = state;
        }
    }

    pub fn reorder(&self, names: &[&str]) {
        let mut machines = self.machines.lock().unwrap();
        machines.sort_by_key(|m| names.iter().position(|n| *n == m.name).unwrap_or(usize::MAX));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.machines.lock().unwrap().iter().map(|m| m.name.clone()).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn transition(&self, name: &str, state: MachineState) {
        if self.instant_transitions {
            self.set_state(name, state);
        }
    }
}

#[async_trait]
impl Hypervisor for FakeHypervisor {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn list_machines(&self) -> Vec<String> {
        self.record(Call::List);
        if !self.available {
            return Vec::new();
        }
        self.names()
    }

    async fn query_state(&self, name: &str) -> MachineState {
        self.record(Call::State(name.to_string()));
        self.machines
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.state)
            .unwrap_or(MachineState::Unknown)
    }

    async fn query_hardware_address(&self, name: &str) -> Option<String> {
        self.record(Call::HardwareAddress(name.to_string()));
        self.machines
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.mac.clone())
    }

    async fn start(&self, name: &str) {
        self.record(Call::Start(name.to_string()));
        self.transition(name, MachineState::Running);
    }

    async fn stop(&self, name: &str) {
        self.record(Call::Stop(name.to_string()));
        self.transition(name, MachineState::ShutOff);
    }

    async fn clone_machine(&self, source: &str, new_name: &str) -> Result<(), Diagnostic> {
        self.record(Call::Clone(source.to_string(), new_name.to_string()));
        if let Some(diagnostic) = &self.clone_failure {
            return Err(Diagnostic(diagnostic.clone()));
        }
        self.machines.lock().unwrap().push(FakeMachine {
            name: new_name.to_string(),
            state: MachineState::ShutOff,
            mac: None,
        });
        Ok(())
    }

    async fn destroy(&self, name: &str) -> Result<(), Diagnostic> {
        self.record(Call::Destroy(name.to_string()));
        if let Some(diagnostic) = &self.destroy_failure {
            return Err(Diagnostic(diagnostic.clone()));
        }
        self.machines.lock().unwrap().retain(|m| m.name != name);
        Ok(())
    }
}

/// Resolver with a fixed MAC to IP table.
#[derive(Default)]
pub struct FakeResolver {
    table: HashMap<String, String>,
    lookups: Mutex<Vec<Option<String>>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, mac: &str, ip: &str) -> Self {
        self.table.insert(mac.to_string(), ip.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<Option<String>> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressResolver for FakeResolver {
    async fn resolve(&self, hardware_address: Option<&str>) -> Address {
        self.lookups
            .lock()
            .unwrap()
            .push(hardware_address.map(str::to_string));
        match hardware_address {
            None => Address::NotApplicable,
            Some(mac) => self
                .table
                .get(mac)
                .map(|ip| Address::Ip(ip.clone()))
                .unwrap_or(Address::Unknown),
        }
    }
}

/// Console fed from queues. Runs out of keys by quitting.
#[derive(Default)]
pub struct ScriptedConsole {
    keys: VecDeque<Key>,
    answers: VecDeque<Option<String>>,
    pub prompts: Vec<String>,
    pub progress: Vec<Notice>,
    pub acknowledged: Vec<Notice>,
    pub rendered: Vec<ViewState>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(mut self, keys: &[Key]) -> Self {
        self.keys.extend(keys.iter().copied());
        self
    }

    pub fn answering(mut self, answer: Option<&str>) -> Self {
        self.answers.push_back(answer.map(str::to_string));
        self
    }
}

impl Console for ScriptedConsole {
    fn render(&mut self, view: &View) -> virtdeck::Result<()> {
        self.rendered.push(view.state.clone());
        Ok(())
    }

    fn next_key(&mut self) -> virtdeck::Result<Key> {
        Ok(self.keys.pop_front().unwrap_or(Key::Quit))
    }

    fn prompt(&mut self, label: &str, _max_len: usize) -> virtdeck::Result<Option<String>> {
        self.prompts.push(label.to_string());
        Ok(self.answers.pop_front().flatten())
    }

    fn progress(&mut self, notice: &Notice) -> virtdeck::Result<()> {
        self.progress.push(notice.clone());
        Ok(())
    }

    fn acknowledge(&mut self, notice: &Notice) -> virtdeck::Result<()> {
        self.acknowledged.push(notice.clone());
        Ok(())
    }
}

use crate::{config::VirtdeckConfig, log_info, log_warn};
use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: String,
    pub purpose: &'static str,
    pub required: bool,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct PreflightSummary {
    pub tool_status: Vec<ToolStatus>,
    pub issues: Vec<String>,
}

impl PreflightSummary {
    pub fn is_ready(&self) -> bool {
        self.tool_status
            .iter()
            .all(|tool| tool.available || !tool.required)
    }
}

impl fmt::Display for PreflightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "virtdeck preflight")?;
        for tool in &self.tool_status {
            writeln!(
                f,
                "  - {} ({}): {}",
                tool.name,
                tool.purpose,
                if tool.available { "available" } else { "missing" }
            )?;
        }
        if self.issues.is_empty() {
            writeln!(f, "ready")
        } else {
            writeln!(f, "issues:")?;
            for issue in &self.issues {
                writeln!(f, "  - {}", issue)?;
            }
            Ok(())
        }
    }
}

/// Checks which of the configured host tools can be found. Only the
/// hypervisor CLI is required; the rest degrade single features.
pub fn run_preflight(config: &VirtdeckConfig) -> PreflightSummary {
    let path = env::var_os("PATH").unwrap_or_default();
    let summary = summarize(vec![
        probe_tool(&config.hypervisor.program, "inventory and lifecycle", true, &path),
        probe_tool(&config.hypervisor.clone_program, "cloning", false, &path),
        probe_tool(&config.network.arp_program, "address lookup", false, &path),
        probe_tool(&config.network.neighbor_program, "address lookup", false, &path),
    ]);

    if summary.is_ready() {
        log_info!("Preflight passed");
    }
    for issue in &summary.issues {
        log_warn!("Preflight: {}", issue);
    }
    summary
}

fn summarize(tool_status: Vec<ToolStatus>) -> PreflightSummary {
    let issues = tool_status
        .iter()
        .filter(|tool| !tool.available)
        .map(|tool| {
            if tool.required {
                format!("{} command missing from PATH; the dashboard cannot run", tool.name)
            } else {
                format!("{} command missing from PATH; {} unavailable", tool.name, tool.purpose)
            }
        })
        .collect();

    PreflightSummary {
        tool_status,
        issues,
    }
}

fn probe_tool(name: &str, purpose: &'static str, required: bool, path: &OsStr) -> ToolStatus {
    ToolStatus {
        name: name.to_string(),
        purpose,
        required,
        available: find_in_path(name, path),
    }
}

fn find_in_path(program: &str, path: &OsStr) -> bool {
    if program.contains('/') {
        return Path::new(program).is_file();
    }
    env::split_paths(path).any(|dir| dir.join(program).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn tool(name: &str, required: bool, available: bool) -> ToolStatus {
        ToolStatus {
            name: name.into(),
            purpose: "testing",
            required,
            available,
        }
    }

    #[test]
    fn missing_optional_tool_is_still_ready() {
        let summary = summarize(vec![tool("virsh", true, true), tool("arp", false, false)]);
        assert!(summary.is_ready());
        assert_eq!(summary.issues.len(), 1);
        assert!(summary.issues[0].contains("arp"));
    }

    #[test]
    fn missing_hypervisor_is_not_ready() {
        let summary = summarize(vec![tool("virsh", true, false)]);
        assert!(!summary.is_ready());
        let printed = summary.to_string();
        assert!(printed.contains("virsh (testing): missing"));
        assert!(printed.contains("cannot run"));
    }

    #[test]
    fn path_lookup_finds_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        File::create(dir.path().join("virsh")).unwrap();
        let path = env::join_paths([dir.path()]).unwrap();

        assert!(find_in_path("virsh", &path));
        assert!(!find_in_path("virt-clone", &path));
        let absolute = dir.path().join("virsh");
        assert!(find_in_path(absolute.to_str().unwrap(), OsStr::new("")));
    }
}

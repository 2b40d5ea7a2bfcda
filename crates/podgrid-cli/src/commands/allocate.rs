use std::path::Path;

use podgrid_core::{AllocatorConfig, Network, Scenario};
use podgrid_placement::{CpuAssignment, allocate_pod_network, numa_cpu_select};
use serde::Serialize;
use tracing::{debug, info};

use crate::Format;

/// What the allocator proposed for one scenario.
#[derive(Debug, Serialize)]
pub struct AllocationReport {
    pub node: String,
    pub pod: String,
    pub requested_cores: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
}

pub fn cpuset(path: &Path, config: &AllocatorConfig, format: Format) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let report = evaluate(&scenario, config, true, false)?;
    print_report(&report, format)
}

pub fn network(path: &Path, format: Format) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let report = evaluate(&scenario, &AllocatorConfig::default(), false, true)?;
    print_report(&report, format)
}

pub fn allocate(path: &Path, config: &AllocatorConfig, format: Format) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let report = evaluate(&scenario, config, true, true)?;
    print_report(&report, format)
}

fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let scenario = Scenario::from_file(path)?;
    info!(
        path = %path.display(),
        node = %scenario.node.name,
        pod = %scenario.pod.name,
        bound_pods = scenario.existing.len(),
        "loaded scenario"
    );
    Ok(scenario)
}

pub fn evaluate(
    scenario: &Scenario,
    config: &AllocatorConfig,
    with_cpu: bool,
    with_network: bool,
) -> anyhow::Result<AllocationReport> {
    let Scenario { node, pod, existing } = scenario;

    let cpu = if with_cpu {
        Some(numa_cpu_select(pod, node, existing, config)?)
    } else {
        None
    };
    let network = if with_network {
        Some(allocate_pod_network(pod, node, existing)?)
    } else {
        None
    };

    debug!(node = %node.name, pod = %pod.name, with_cpu, with_network, "evaluated scenario");

    Ok(AllocationReport {
        node: node.name.clone(),
        pod: pod.name.clone(),
        requested_cores: pod.total_cpu_request(),
        cpu,
        network,
    })
}

fn print_report(report: &AllocationReport, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Text => print!("{}", format_report(report)),
    }
    Ok(())
}

pub fn format_report(report: &AllocationReport) -> String {
    let mut out = format!(
        "pod {} on node {} ({} cores requested)\n",
        report.pod, report.node, report.requested_cores
    );

    if let Some(cpu) = &report.cpu {
        if report.requested_cores == 0 {
            out.push_str("  cpu:     no dedicated cpu set\n");
        } else {
            out.push_str(&format!("  flat:    {}\n", or_none(&cpu.flat_cpu_set())));
            match cpu.numa_node {
                Some(node) => out.push_str(&format!("  numa:    {} (node {node})\n", cpu.numa_cpu_set())),
                None => out.push_str("  numa:    -\n"),
            }
            if cpu.is_empty() {
                out.push_str("  ✗ not enough free cores on this node\n");
            }
        }
    }

    if let Some(net) = &report.network {
        if net.is_assigned() {
            out.push_str(&format!(
                "  network: {} gw {} mac {} vlan {} ({})\n",
                net.address,
                net.gateway,
                net.mac_address,
                net.vlan_id,
                net.mode.label()
            ));
        } else {
            out.push_str("  network: not required\n");
        }
    }

    out
}

fn or_none(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

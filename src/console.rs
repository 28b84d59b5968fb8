//! Pretty terminal output with colors and badges.

use std::fmt::Write;

use colored::Colorize;

use crate::discovery::{DiscoveredService, DiscoveryReport};

// === Startup ===

pub fn print_banner() {
    println!();
    println!("{}", "╔═══════════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║                                                           ║".cyan());
    println!("║     {}                                      ║", "📊 podpulse v0.1.0".bold().white());
    println!("║     {}          ║", "Host metrics and sibling service discovery".dimmed());
    println!("{}", "║                                                           ║".cyan());
    println!("{}", "╚═══════════════════════════════════════════════════════════╝".cyan());
    println!();
}

pub fn print_startup(addr: &str, pod_name: &str) {
    println!("{} {}", "✓".green().bold(), "Server ready".white().bold());
    println!("  {} {}", "→".dimmed(), format!("http://{}/metrics", addr).cyan().underline());
    if !pod_name.is_empty() {
        println!("  {} {}", "pod:".dimmed(), pod_name.white());
    }
    println!();
    println!("{}", "Endpoints:".white().bold());
    println!("  {} {} {}", "GET ".green(), "/metrics".white(), "Host CPU/memory snapshot".dimmed());
    println!("  {} {}  {}", "GET ".green(), "/health".white(), "Health check".dimmed());
    println!();
}

// === Badges ===

fn badge(text: &str, fg: colored::Color, bg: colored::Color) -> colored::ColoredString {
    format!(" {} ", text).color(fg).on_color(bg).bold()
}

pub fn log_discovery_failure(reason: &str) {
    eprintln!("{} {}", badge("DISCOVERY", colored::Color::White, colored::Color::Red), reason.red());
}

// === Discovery ===

/// In-cluster DNS URL for the service's first port.
pub fn example_url(svc: &DiscoveredService) -> Option<String> {
    let port = svc.ports.first()?.port;
    Some(format!(
        "http://{}.{}.svc.cluster.local:{}/api/somepath",
        svc.name, svc.namespace, port
    ))
}

fn format_labels(svc: &DiscoveredService) -> String {
    let pairs: Vec<String> = svc.labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", pairs.join(", "))
}

pub fn render_discovery_report(report: &DiscoveryReport) -> String {
    let mut out = String::new();

    if report.services.is_empty() {
        let _ = writeln!(
            out,
            "{} No services found with label selector '{}' in namespace '{}'.",
            badge("EMPTY", colored::Color::Black, colored::Color::Yellow),
            report.label_selector,
            report.namespace
        );
        return out;
    }

    let _ = writeln!(out, "{}", "Dynamically discovered microservices:".white().bold());
    for svc in &report.services {
        let _ = writeln!(out, "  - {} {}", "Name:".dimmed(), svc.name.cyan().bold());
        let _ = writeln!(out, "    {} {}", "Namespace:".dimmed(), svc.namespace);
        let _ = writeln!(out, "    {} {}", "ClusterIP:".dimmed(), svc.cluster_ip);
        let _ = writeln!(out, "    {} {}", "Labels:".dimmed(), format_labels(svc));

        if svc.ports.is_empty() {
            let _ = writeln!(out, "    {}", format!("Service {} has no ports defined.", svc.name).yellow());
            continue;
        }

        let _ = writeln!(out, "    {}", "Ports:".dimmed());
        for p in &svc.ports {
            let _ = writeln!(
                out,
                "      - Port: {}, Protocol: {}, TargetPort: {}, Name: {}",
                p.port, p.protocol, p.target_port, p.name
            );
        }
        if let Some(url) = example_url(svc) {
            let _ = writeln!(out, "    {} {}", "Example URL:".dimmed(), url.underline());
        }
    }
    out
}

pub fn print_discovery_report(report: &DiscoveryReport) {
    print!("{}", render_discovery_report(report));
}

//! Port candidate listing.

use {
    crate::{build_discovery, config::Config},
    anyhow::Result,
    console::style,
};

/// Index of the preferred port in `candidates`, if resolution put it first.
fn preferred_index(candidates: &[String], preferred: Option<&str>) -> Option<usize> {
    match (candidates.first(), preferred) {
        (Some(first), Some(preferred)) if first == preferred => Some(0),
        _ => None,
    }
}

/// List command implementation.
pub(crate) fn cmd_list(config: &Config, json: bool) -> Result<()> {
    let discovery = build_discovery(config);
    let candidates = discovery.candidates(config.discovery());
    let preferred = preferred_index(
        &candidates,
        config
            .discovery()
            .port
            .as_deref(),
    );

    if json {
        let output = serde_json::json!({
            "ok": true,
            "data": {
                "ports": candidates,
                "preferred": preferred.map(|i| candidates[i].as_str()),
            }
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output)?
        );
        return Ok(());
    }

    eprintln!(
        "{}",
        style("Port candidates (in connection order):")
            .bold()
            .underlined()
    );

    if candidates.is_empty() {
        eprintln!("  {}", style("No candidate ports found").dim());
        return Ok(());
    }

    for (i, port) in candidates
        .iter()
        .enumerate()
    {
        let marker = if preferred == Some(i) {
            format!(" {}", style("(last used)").yellow())
        } else {
            String::new()
        };
        eprintln!(
            "  {} {}{}",
            style(format!("{:>2}.", i + 1)).dim(),
            style(port).cyan(),
            marker
        );
    }

    Ok(())
}

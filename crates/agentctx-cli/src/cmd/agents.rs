use crate::output::{print_json, print_table};
use agentctx_core::agent::{AgentType, OutputFormat};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct AgentRow {
    agent: AgentType,
    name: &'static str,
    path: &'static str,
    format: OutputFormat,
    exists: bool,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let rows: Vec<AgentRow> = AgentType::all()
        .iter()
        .map(|&agent| AgentRow {
            agent,
            name: agent.display_name(),
            path: agent.relative_path(),
            format: agent.format(),
            exists: agent.path(root).is_file(),
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.agent.to_string(),
                r.name.to_string(),
                r.path.to_string(),
                r.format.to_string(),
                if r.exists { "yes" } else { "-" }.to_string(),
            ]
        })
        .collect();
    print_table(&["AGENT", "NAME", "PATH", "FORMAT", "EXISTS"], &table);
    Ok(())
}

use crate::output::{display_path, print_json};
use agentctx_core::agent::AgentType;
use agentctx_core::config::Config;
use agentctx_core::feature;
use agentctx_core::updater::{self, UpdateRequest};
use anyhow::Context;
use std::path::Path;

/// `agentctx update [AGENT_TYPE]`: merge the current feature's plan into one
/// agent file, or into every agent file already present.
pub fn run(
    root: &Path,
    agent: Option<&str>,
    feature: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    // Reject a bad agent name before touching git or the filesystem.
    let agent = agent.map(str::parse::<AgentType>).transpose()?;

    let config = Config::load(root).context("failed to load .specify/config.yaml")?;
    let feature = feature::resolve(root, feature)
        .current_feature()
        .context("cannot determine the current feature")?;
    tracing::debug!(feature = %feature, root = %root.display(), "updating agent context");

    let req = UpdateRequest::new(root, &feature, &config);
    let outcomes = match agent {
        Some(agent) => vec![updater::update_one(&req, agent)
            .with_context(|| format!("failed to update {agent} context file"))?],
        None => updater::update_all(&req).context("failed to update agent context files")?,
    };

    if json {
        print_json(&outcomes)?;
        return Ok(());
    }
    for outcome in &outcomes {
        println!(
            "{}: {}",
            outcome.status.as_str(),
            display_path(root, &outcome.path)
        );
    }
    Ok(())
}

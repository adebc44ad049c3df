use crate::output::{display_path, print_json};
use agentctx_core::config::Config;
use agentctx_core::feature;
use agentctx_core::paths;
use agentctx_core::plan::TechStack;
use agentctx_core::updater;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Status {
    feature: String,
    plan: String,
    plan_exists: bool,
    tech: TechStack,
    recent_features: Vec<String>,
}

pub fn run(root: &Path, feature: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load .specify/config.yaml")?;
    let source = feature::resolve(root, feature);
    let current = source
        .current_feature()
        .context("cannot determine the current feature")?;
    let recent_features = source
        .recent_features(config.history_limit.max(1))
        .context("failed to list recent features")?;

    let plan_path = paths::plan_path(root, &current);
    let status = Status {
        plan: display_path(root, &plan_path),
        plan_exists: plan_path.is_file(),
        tech: updater::load_tech_stack(root, &current, &config),
        feature: current,
        recent_features,
    };

    if json {
        return print_json(&status);
    }

    println!("Feature: {}", status.feature);
    let missing = if status.plan_exists { "" } else { " (missing)" };
    println!("Plan:    {}{missing}", status.plan);
    println!();
    println!("Tech stack:");
    println!("  language:     {}", status.tech.language);
    println!("  framework:    {}", status.tech.framework);
    println!("  database:     {}", status.tech.database);
    println!("  project type: {}", status.tech.project_type);
    println!();
    println!("Recent features:");
    if status.recent_features.is_empty() {
        println!("  (none)");
    }
    for f in &status.recent_features {
        println!("  {f}");
    }
    Ok(())
}

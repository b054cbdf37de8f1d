use crate::io::{read_input, write_output};
use anyhow::{Context, Result};
use clap::Args;
use leafpath::v1::{IndexingPolicy, parse, render_lines, traverse};
use std::path::PathBuf;

/// Indexing policy options. Flags add to whatever `--config` loads.
#[derive(Args, Debug, Default, Clone)]
pub struct PolicyArgs {
    /// JSON policy file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Always index the first occurrence of TAG (legacy rule)
    #[arg(long = "legacy-index", value_name = "TAG")]
    pub legacy_index: Vec<String>,

    /// Force `[1]` on the first occurrence of TAG
    #[arg(long = "force-index", value_name = "TAG", conflicts_with = "force_index_all")]
    pub force_index: Vec<String>,

    /// Force `[1]` on the first occurrence of every tag
    #[arg(long)]
    pub force_index_all: bool,

    /// Never show `[1]` for TAG, whatever the other rules say
    #[arg(long = "no-index-exception", value_name = "TAG")]
    pub exceptions: Vec<String>,

    /// Render attribute NAME as a `[@NAME="value"]` predicate (repeatable, in order)
    #[arg(long = "attribute", value_name = "NAME")]
    pub attributes: Vec<String>,

    /// Skip TAG and everything beneath it
    #[arg(long = "ignore", value_name = "TAG")]
    pub ignore: Vec<String>,
}

impl PolicyArgs {
    pub fn resolve(&self) -> Result<IndexingPolicy> {
        let mut policy = match &self.config {
            Some(path) => IndexingPolicy::load(path)
                .with_context(|| format!("Failed to load policy {:?}", path))?,
            None => IndexingPolicy::default(),
        };

        for tag in &self.legacy_index {
            policy = policy.with_legacy_index(tag);
        }
        if self.force_index_all {
            policy = policy.force_all();
        }
        for tag in &self.force_index {
            policy = policy.with_forced(tag);
        }
        for tag in &self.exceptions {
            policy = policy.with_exception(tag);
        }
        for name in &self.attributes {
            policy = policy.with_attribute(name);
        }
        for tag in &self.ignore {
            policy = policy.with_ignored(tag);
        }

        tracing::debug!(?policy, "resolved indexing policy");
        Ok(policy)
    }
}

pub fn run(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    policy: PolicyArgs,
    iterative: bool,
) -> Result<()> {
    let content = read_input(input.as_ref())?;
    let policy = policy.resolve()?;
    let lines = flatten_content(&content, &policy, iterative)?;
    write_output(output.as_ref(), &lines)
}

fn flatten_content(content: &str, policy: &IndexingPolicy, iterative: bool) -> Result<String> {
    let doc = parse(content).context("Failed to parse XML document")?;
    let leaves = if iterative {
        traverse::flatten_iterative(&doc, policy)
    } else {
        traverse::flatten(&doc, policy)
    };
    Ok(render_lines(&leaves))
}

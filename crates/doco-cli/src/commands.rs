use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use doco_core::CoreConfig;
use doco_model::UiFlag;
use tracing::{info, info_span};

use crate::cli::{FlagsArgs, ReplayArgs};
use crate::summary::apply_table_style;
use doco_cli::replay::{ReplayResult, replay};
use doco_cli::script::Script;

pub fn run_flags(args: &FlagsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut table = Table::new();
    table.set_header(vec!["Flag", "Description", "Default"]);
    apply_table_style(&mut table);
    for &flag in UiFlag::all() {
        table.add_row(vec![
            flag.name().to_string(),
            flag.label().to_string(),
            config.ui.value(flag).to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_replay(args: &ReplayArgs) -> Result<ReplayResult> {
    let span = info_span!("replay", script = %args.script.display());
    let _guard = span.enter();

    let config = load_config(args.config.as_deref())?;
    let script = Script::load(&args.script)?;
    info!(
        documents = script.documents.len(),
        intents = script.intents.len(),
        "loaded intent script"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build async runtime")?;
    let result = runtime.block_on(replay(&script, config));
    info!(
        rejected = result.rejected_count(),
        revision = result.snapshot.revision,
        "replay finished"
    );
    Ok(result)
}

fn load_config(path: Option<&Path>) -> Result<CoreConfig> {
    match path {
        Some(path) => {
            CoreConfig::load(path).with_context(|| format!("load config {}", path.display()))
        }
        None => Ok(CoreConfig::default()),
    }
}

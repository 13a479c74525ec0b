//! tablesync - drive editable tables on a shared channel
//!
//! Opens a number of table instances on one channel, replays a JSON-lines
//! script against them and prints every committed `change` together with the
//! rendered tables after each step.

mod script;

use anyhow::{bail, Context, Result};
use clap::Parser;
use edit_table::{ChannelHub, EditableTable, HubConfig, Subscription, TableConfig, TableMessage};
use script::{parse_script, Action, ScriptStep};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tablesync")]
#[command(about = "Replay a script against editable tables sharing a channel", long_about = None)]
struct Cli {
    /// JSON file with `hub` and `table` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script to replay, one JSON step per line (reads stdin if omitted)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Number of table instances on the channel
    #[arg(long, default_value_t = 2)]
    instances: usize,

    /// Channel name, overriding the configured one
    #[arg(long)]
    channel: Option<String>,
}

/// Contents of the `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    hub: HubConfig,
    table: TableConfig,
}

const DEFAULT_CHANNEL: &str = "tables";

/// The owner and the tables it drives.
struct Session {
    owner: Subscription<TableMessage>,
    tables: Vec<EditableTable>,
}

impl Session {
    fn new(config: FileConfig, channel: &str, instances: usize) -> Result<Self> {
        let hub = ChannelHub::new(config.hub);
        let table_config = TableConfig {
            channel: Some(channel.to_string()),
            ..config.table
        };

        let tables = (0..instances)
            .map(|i| {
                EditableTable::new(hub.clone(), table_config.clone())
                    .with_context(|| format!("failed to create table {i}"))
            })
            .collect::<Result<Vec<_>>>()?;
        let owner = hub.open(channel).context("failed to open owner subscription")?;

        tracing::info!("Opened {} table(s) on channel {}", tables.len(), channel);
        Ok(Self { owner, tables })
    }

    fn table_mut(&mut self, instance: usize) -> Result<&mut EditableTable> {
        let count = self.tables.len();
        match self.tables.get_mut(instance) {
            Some(table) => Ok(table),
            None => bail!("no table instance {instance} (have {count})"),
        }
    }

    fn apply(&mut self, action: Action) -> Result<bool> {
        let handled = match action {
            Action::Post(message) => {
                let delivered = self.owner.post(message).context("failed to post")?;
                tracing::debug!("Owner post queued for {} table(s)", delivered);
                true
            }
            Action::Cell { instance, cell, event } => self.table_mut(instance)?.cell_event(cell, event),
            Action::Trigger { instance, row, event } => self.table_mut(instance)?.delete_event(row, event),
        };
        Ok(handled)
    }

    /// Deliver queued messages until every queue is empty.
    fn settle(&mut self) {
        while self.tables.iter_mut().map(EditableTable::pump).sum::<usize>() > 0 {}
    }

    fn committed(&mut self) -> Vec<TableMessage> {
        self.owner
            .drain()
            .into_iter()
            .map(|e| e.payload)
            .filter(|m| matches!(m, TableMessage::Change(_)))
            .collect()
    }
}

fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read script from stdin")?;
            Ok(text)
        }
    }
}

fn read_config(path: Option<&PathBuf>) -> Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    let config = read_config(cli.config.as_ref())?;
    let channel = cli
        .channel
        .clone()
        .or_else(|| config.table.channel.clone())
        .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
    let steps: Vec<ScriptStep> = parse_script(&read_script(cli.script.as_ref())?)?;

    let mut session = Session::new(config, &channel, cli.instances)?;

    for (n, step) in steps.iter().enumerate() {
        let action = step.action().with_context(|| format!("step {}", n + 1))?;
        let handled = session.apply(action)?;
        session.settle();

        println!("## step {} {}{}", n + 1, step.name(), if handled { "" } else { " (ignored)" });
        for message in session.committed() {
            println!("change {}", message.to_json()?);
        }
        for (i, table) in session.tables.iter().enumerate() {
            println!("# table {} {:?}", i, table.state());
            print!("{}", table.render_text());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    run(Cli::parse())
}

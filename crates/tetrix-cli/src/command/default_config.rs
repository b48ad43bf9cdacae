use std::path::PathBuf;

use tetrix_engine::EngineConfig;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    let DefaultConfigArg { output } = arg;
    util::write_json(&EngineConfig::default(), output.as_deref())
}

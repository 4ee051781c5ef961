use std::env;
use std::path::Path;

use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [log_path, dest] = args.as_slice() else {
        bail!("usage: eprime2tsv <eprime_log> <output_dir>");
    };
    eprime2tsv::convert(Path::new(log_path), Path::new(dest))?;

    Ok(())
}

use clap::Parser;
use vmf_cli::{run, Args};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let output = run(&args)?;
    eprintln!("Wrote {}", output.display());
    Ok(())
}

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use structopt::StructOpt;

#[derive(Clone, Debug, StructOpt)]
pub struct OutputOptions {
  #[structopt(long = "output", short = "o")]
  pub file: Option<PathBuf>,
  #[structopt(long)]
  pub log: Option<PathBuf>,
}

#[allow(dead_code)]
pub fn write_json(root: &json::JsonValue, file: Option<&Path>) -> Result<()> {
  match file {
    Some(path) => {
      let mut writer = io::BufWriter::new(std::fs::File::create(path)?);
      root.write_pretty(&mut writer, 2)?;
      writer.flush()?;
    }
    None => {
      let stdout = io::stdout();
      let mut out = stdout.lock();
      root.write_pretty(&mut out, 2)?;
      writeln!(out)?;
    }
  }
  Ok(())
}

//! Log setup.
//!
//! The terminal belongs to the UI, so records go to a file when one is
//! given. Without a file nothing is logged unless `RUST_LOG` asks for it.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.format_timestamp_millis().init();
    Ok(())
}

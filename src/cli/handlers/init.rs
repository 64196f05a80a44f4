use std::path::Path;

use crate::cli::commands::{ConfigAction, ConfigCmd, InitArgs};
use crate::io::config_io;

/// Write the commented default config.toml into the data directory.
pub fn cmd_init(args: InitArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_io::write_default_config(data_dir, args.force)?;
    tracing::info!(path = %path.display(), force = args.force, "wrote default config");
    println!("Wrote {}", path.display());
    println!("Edit it to set crew names, colours and validation limits.");
    Ok(())
}

pub fn cmd_config(cmd: ConfigCmd, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match cmd.action {
        ConfigAction::Set(args) => {
            let mut doc = config_io::read_config_doc(data_dir)?;
            config_io::set_value(&mut doc, &args.key, &args.value)?;
            config_io::write_config_doc(data_dir, &doc)?;
            tracing::info!(key = %args.key, value = %args.value, "config updated");
            println!("{} = {}", args.key, args.value);
        }
        ConfigAction::Path => {
            println!("{}", config_io::config_path(data_dir).display());
        }
    }
    Ok(())
}

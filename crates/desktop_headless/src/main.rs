//! Headless desktop session driven by a command script on stdin.
//!
//! Usage: `desktop_headless [config.toml] < commands.txt`. Without a config path the desktop boots
//! with in-memory storage and the built-in appearance catalog. Run `help` for the command list.

mod script;

use std::io;

use anyhow::{Context, Result};
use desktop_runtime::{DesktopConfig, DesktopContext};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => DesktopConfig::load(&path)
            .with_context(|| format!("failed to load desktop config from {path}"))?,
        None => DesktopConfig::default(),
    };

    let mut context = DesktopContext::from_config(&config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let failures = script::run_script(&mut context, stdin.lock(), &mut stdout.lock())?;

    context.shutdown();
    if failures > 0 {
        log::warn!("{failures} command(s) failed");
        std::process::exit(1);
    }
    Ok(())
}

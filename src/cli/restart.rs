//! `rconbot restart` - run the restart from the terminal

use crate::server::load_config;
use anyhow::{bail, Result};
use rconbot_core::Restarter;

pub async fn run() -> Result<()> {
    let config = load_config()?;
    let restarter = Restarter::new(config.restart);

    let transcript = restarter.restart().await;
    print!("{}", transcript);

    if !transcript.succeeded() {
        bail!("Restart finished with failures");
    }
    Ok(())
}

//! Init-config command - write the default configuration file

use crate::config::{Config, ConfigManager};
use crate::error::ModsyncResult;
use crate::ui::{self, UiContext};

/// Execute the init-config command
pub async fn execute(manager: &ConfigManager) -> ModsyncResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() {
        ui::config_exists(&ctx, path);
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::config_written(&ctx, path);

    Ok(())
}

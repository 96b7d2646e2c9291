use crate::settings::{save_settings, settings_path, Settings};

pub fn run(force: bool) -> anyhow::Result<()> {
    let path = settings_path();
    if path.exists() && !force {
        println!("Settings already exist at {} (use --force to overwrite)", path.display());
        return Ok(());
    }
    let written = save_settings(&Settings::default())?;
    println!("Wrote default settings to {}", written.display());
    Ok(())
}

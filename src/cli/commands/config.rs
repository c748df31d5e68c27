use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{error, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", ConfigLogic::render(cfg)?);
        }

        if *edit_config {
            let path = Config::config_file();
            if !path.exists() {
                warning(format!(
                    "{} does not exist yet, run `punchsync init` first",
                    path.display()
                ));
                return Ok(());
            }
            match ConfigLogic::edit(&path, editor.as_deref()) {
                Ok(used) => success(format!("Configuration file edited using '{}'", used)),
                Err(e) => error(e),
            }
        }
    }

    Ok(())
}

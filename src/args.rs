use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (defaults are used when it does not exist)
    #[arg(long, default_value = Config::FILE_NAME)]
    pub config: PathBuf,

    /// Window width, overriding the config file
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height, overriding the config file
    #[arg(long)]
    pub height: Option<u32>,

    /// Also write logs to daily files in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    /// Applies command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_config() {
        let args = Args::parse_from(["texcubes"]);
        assert_eq!(args.config, PathBuf::from("texcubes.toml"));
        assert!(args.width.is_none() && args.log_dir.is_none());
    }

    #[test]
    fn size_flags_override_config() {
        let args = Args::parse_from(["texcubes", "--width", "1920", "--height", "1080"]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!((config.window.width, config.window.height), (1920, 1080));
    }

    #[test]
    fn unset_flags_leave_config_alone() {
        let args = Args::parse_from(["texcubes", "--height", "900"]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!((config.window.width, config.window.height), (800, 900));
    }
}

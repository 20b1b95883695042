use crate::config::Settings;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "vocalis")]
#[command(about = "Vocalis SaaS backend - AI voice generation with Metronome billing")]
pub struct ServerArgs {
    #[arg(long, default_value = "vocalis.toml")]
    pub config: String,

    #[arg(long, help = "Bind address override")]
    pub host: Option<String>,

    #[arg(long, help = "Port override")]
    pub port: Option<u16>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ServerArgs {
    /// CLI 參數覆蓋配置檔
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if self.verbose {
            settings.app.debug = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let args = ServerArgs {
            config: "vocalis.toml".to_string(),
            host: Some("127.0.0.1".to_string()),
            port: Some(9999),
            verbose: true,
        };

        let mut settings = Settings::default();
        args.apply_to(&mut settings);

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9999);
        assert!(settings.app.debug);
    }

    #[test]
    fn test_no_overrides_keep_settings() {
        let args = ServerArgs {
            config: "vocalis.toml".to_string(),
            host: None,
            port: None,
            verbose: false,
        };

        let mut settings = Settings::default();
        args.apply_to(&mut settings);

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8000);
    }
}

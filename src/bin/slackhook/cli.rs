use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Post notifications to Slack incoming webhooks", long_about = None)]
pub struct Cli {
    /// Chemin du fichier de réglages TOML.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Chemin du fichier des cibles (JSON), relatif au répertoire courant.
    #[arg(long, value_name = "PATH")]
    pub config_path: Option<String>,

    /// Retourne un code de sortie non nul si l'opération échoue.
    #[arg(long, action = ArgAction::SetTrue)]
    pub strict: bool,

    /// Utilise un layer JSON pour les logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Filtre de logs explicite (ex. "slackhook=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Liste les cibles configurées.
    List,
    /// Teste l'accessibilité TCP de la cible sélectionnée.
    Check(TargetArgs),
    /// Envoie un message à la cible sélectionnée.
    Send {
        #[command(flatten)]
        target: TargetArgs,

        /// Texte du message.
        message: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Canal de la cible ; la première cible est utilisée si absent.
    #[arg(long)]
    pub channel: Option<String>,

    /// Application de la cible (défaut : "none").
    #[arg(long, requires = "channel")]
    pub app: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn send_accepts_target_and_message() {
        let cli = Cli::try_parse_from([
            "slackhook",
            "--strict",
            "send",
            "--channel",
            "ops",
            "--app",
            "bot",
            "deploy finished",
        ])
        .unwrap_or_else(|err| panic!("failed to parse args: {err}"));
        assert!(cli.strict);
        match cli.command {
            Command::Send { target, message } => {
                assert_eq!(target.channel.as_deref(), Some("ops"));
                assert_eq!(target.app.as_deref(), Some("bot"));
                assert_eq!(message, "deploy finished");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn app_requires_channel() {
        assert!(Cli::try_parse_from(["slackhook", "check", "--app", "bot"]).is_err());
    }
}

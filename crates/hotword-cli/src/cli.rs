use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "hotword - type a short trigger, get a longer text in its place",
    long_about = "hotword watches your keystrokes in the background. When you type one of the \
                  triggers from config.txt it erases the trigger and pastes the replacement \
                  text through the clipboard (your clipboard contents are overwritten)."
)]
pub struct Hotword {
    #[clap(subcommand)]
    pub commands: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new expansion rule
    Add {
        #[clap(long, short = 't', help = "Trigger sequence to type")]
        trigger: String,

        #[clap(long, short = 'r', help = "Text pasted in place of the trigger")]
        replacement: String,
    },
    /// Delete every rule with the given trigger
    Delete {
        #[clap(long, short = 't', help = "Trigger of the rule to delete")]
        trigger: String,
    },
    /// Change the replacement text of an existing rule
    Update {
        #[clap(long, short = 't', help = "Trigger of the rule to update")]
        trigger: String,

        #[clap(long, short = 'r', help = "New replacement text")]
        replacement: String,
    },
    /// List all the configured rules
    List,
    /// Start the hotword daemon in the background
    Start,
    /// Stop the hotword daemon
    Stop,
    /// Check the status of the hotword daemon
    Status,
    /// Ask the running daemon to reload config.txt
    Reload,
    /// Run the expansion engine in the foreground
    Run {
        #[clap(long, help = "Log expansions instead of typing them")]
        dry_run: bool,
    },
    /// Open the configuration directory
    Open,
    // Hidden command used internally to run the daemon worker
    #[clap(hide = true)]
    DaemonWorker,
}

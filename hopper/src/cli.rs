use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hopper")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Serial device or TCP host:port of the radio
    /// (e.g. /dev/ttyUSB0 or 192.168.1.2:4403); auto-detects serial if unset
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// Print machine-readable JSON instead of colored text
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Show debug-level logs
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Show info-level logs
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot adapter, printing inbound messages until the link drops
    Run,

    /// Send a single text message and exit
    Send {
        /// Message text to send
        #[arg(short = 'm', long)]
        text: String,

        /// Destination node number; broadcast when omitted
        #[arg(long)]
        dest: Option<u32>,

        /// Channel index; primary channel when omitted
        #[arg(short = 'c', long)]
        channel: Option<u32>,
    },
}

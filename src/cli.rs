use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "sahayak",
    author,
    version,
    about = "Community assistant backed by a cascade of AI providers",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chat with the assistant
    Chat(ChatArgs),

    /// Agent chat that also classifies the message (type/category/priority)
    Agent(ChatArgs),

    /// List the models each provider can serve
    Models,

    /// Show provider availability and the active primary provider
    Status,

    /// Curated recommendations for a community profile
    Recommend {
        /// Community profile (farmer, student, business, ...)
        #[arg(long, default_value = "general")]
        community_type: String,

        /// Print the recommendations as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message for the assistant
    pub message: String,

    /// Language code (en, hi)
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Preferred model; silently ignored if no provider serves it
    #[arg(short, long)]
    pub model: Option<String>,

    /// Community profile passed as context (farmer, student, business, ...)
    #[arg(long)]
    pub community_type: Option<String>,

    /// Location passed as context
    #[arg(long)]
    pub location: Option<String>,

    /// Print the reply as JSON instead of styled terminal output
    #[arg(long)]
    pub json: bool,
}

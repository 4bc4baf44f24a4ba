use clap::{Parser, Subcommand};

/// `aviation-ai` - Flight-training assistant with handbook retrieval and
/// weather/route lookups.
#[derive(Parser, Debug)]
#[command(name = "aviation-ai")]
#[command(version)]
#[command(about = "Flight-training assistant backed by FAA handbook retrieval.", long_about = None)]
pub struct Cli {
    /// Log at DEBUG instead of the configured level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway (chat, METAR and route endpoints)
    Gateway {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the current METAR for an airport code or place name
    Metar {
        /// Four-letter station code or free-form place
        query: String,

        /// Follow with the chat prompt that asks for a plain-language decode
        #[arg(long)]
        chat_prompt: bool,
    },

    /// Look up the best-match route between two airports
    Route {
        /// Departure ICAO code
        from: String,

        /// Arrival ICAO code
        to: String,

        /// Print decoded lat/lon points instead of the encoded polyline
        #[arg(long)]
        decode: bool,
    },

    /// Ask one question and stream the answer to stdout
    Ask {
        /// The question
        question: String,
    },
}

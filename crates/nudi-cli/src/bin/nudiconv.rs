use clap::{Parser, Subcommand};

use nudi_cli::commands::accuracy_ops::{self, AccuracyOptions, CaseFilter};
use nudi_cli::commands::{convert_ops, rules_ops};
use nudi_core::Direction;

#[derive(Parser)]
#[command(name = "nudiconv", about = "Nudi/Baraha legacy ASCII <-> Unicode Kannada converter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert legacy ASCII text to Unicode Kannada
    Forward {
        /// Text to convert
        text: String,
        /// Custom forward rule table (JSON)
        #[arg(long)]
        rules: Option<String>,
    },
    /// Convert Unicode Kannada text to legacy ASCII
    Reverse {
        /// Text to convert
        text: String,
        /// Custom reverse rule table (JSON)
        #[arg(long)]
        rules: Option<String>,
    },
    /// Convert a UTF-8 text file
    File {
        /// forward (a2u) or reverse (u2a)
        direction: Direction,
        /// Input file
        input: String,
        /// Output file
        output: String,
        /// Custom rule table (JSON)
        #[arg(long)]
        rules: Option<String>,
    },
    /// Export or validate rule tables
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
    /// Show every pipeline stage for one input
    Explain {
        /// forward (a2u) or reverse (u2a)
        direction: Direction,
        /// Text to explain
        text: String,
        /// Custom rule table (JSON)
        #[arg(long)]
        rules: Option<String>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run conversion accuracy tests from a structured TOML corpus
    Accuracy {
        /// Path to the accuracy corpus TOML file
        corpus_file: String,
        /// Filter by tag (only run cases with this tag)
        #[arg(long)]
        tag: Option<String>,
        /// Filter by category (only run cases in this category)
        #[arg(long)]
        category: Option<String>,
        /// Custom forward rule table (JSON)
        #[arg(long)]
        forward_rules: Option<String>,
        /// Custom reverse rule table (JSON)
        #[arg(long)]
        reverse_rules: Option<String>,
        /// Show passing cases too (default: only failures and skips)
        #[arg(long)]
        verbose: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// Print the embedded default table
    Export {
        /// forward (a2u) or reverse (u2a)
        direction: Direction,
    },
    /// Validate a custom rule table
    Validate {
        /// forward (a2u) or reverse (u2a)
        direction: Direction,
        /// Path to the JSON file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Forward { text, rules } => {
            convert_ops::convert_cmd(Direction::Forward, &text, rules.as_deref())
        }
        Command::Reverse { text, rules } => {
            convert_ops::convert_cmd(Direction::Reverse, &text, rules.as_deref())
        }
        Command::File {
            direction,
            input,
            output,
            rules,
        } => convert_ops::file_cmd(direction, &input, &output, rules.as_deref()),
        Command::Rules { action } => match action {
            RulesAction::Export { direction } => rules_ops::rules_export(direction),
            RulesAction::Validate { direction, file } => {
                rules_ops::rules_validate(direction, &file)
            }
        },
        Command::Explain {
            direction,
            text,
            rules,
            json,
        } => convert_ops::explain_cmd(direction, &text, rules.as_deref(), json),
        Command::Accuracy {
            corpus_file,
            tag,
            category,
            forward_rules,
            reverse_rules,
            verbose,
            json,
        } => accuracy_ops::accuracy_cmd(
            &corpus_file,
            AccuracyOptions {
                filter: CaseFilter { tag, category },
                forward_rules: forward_rules.as_deref(),
                reverse_rules: reverse_rules.as_deref(),
                verbose,
                json,
            },
        ),
    }
}

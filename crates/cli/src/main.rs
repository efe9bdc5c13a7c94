use clap::{Parser, Subcommand};
use hai_core::{
    normalize_with, AssistantService, CoreConfig, ExtractionStrategy, MedicineRecord,
    NormalizedResponse,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hai")]
#[command(about = "Hospital AI assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a healthcare question
    Ask {
        /// The question to send
        question: String,
    },
    /// Analyse a file containing a medicine name
    Analyze {
        /// Path to a short text file holding the medicine name
        path: PathBuf,
    },
    /// Normalize a saved model reply without calling the API
    Normalize {
        /// File holding the reply (reads stdin when omitted)
        path: Option<PathBuf>,
        /// Use balanced-brace extraction instead of first/last brace
        #[arg(long)]
        balanced: bool,
    },
}

fn print_normalized(response: &NormalizedResponse) {
    match response {
        NormalizedResponse::Parsed(data) => {
            let record = MedicineRecord::from_data(data);
            for (field, value) in record.fields() {
                println!("{field}: {value}");
            }
        }
        NormalizedResponse::Unparsed(raw) => {
            eprintln!("Model reply could not be parsed as JSON; raw reply follows.");
            println!("{raw}");
        }
    }
}

fn read_input(path: Option<PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn service() -> Result<AssistantService, Box<dyn std::error::Error>> {
    let cfg = Arc::new(CoreConfig::from_env()?);
    let service = AssistantService::with_groq(cfg)?;
    if !service.is_inference_configured() {
        eprintln!("Warning: GROQ_API_KEY is not set; requests will fail.");
    }
    Ok(service)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Ask { question }) => match service()?.answer_question(&question).await {
            Ok(answer) => println!("{}", answer),
            Err(e) => eprintln!("Error answering question: {}", e),
        },
        Some(Commands::Analyze { path }) => {
            let bytes = std::fs::read(&path)?;
            match service()?.analyze_upload(&bytes).await {
                Ok(response) => print_normalized(&response),
                Err(e) => eprintln!("Error analysing {}: {}", path.display(), e),
            }
        }
        Some(Commands::Normalize { path, balanced }) => {
            let reply = read_input(path)?;
            let strategy = if balanced {
                ExtractionStrategy::Balanced
            } else {
                ExtractionStrategy::OuterBraces
            };
            let response = normalize_with(&reply, strategy);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        None => {
            println!("Use 'hai --help' for commands");
        }
    }

    Ok(())
}

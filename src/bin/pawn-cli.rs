use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "pawn-cli")]
#[command(about = "Command-line client for the pawn gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the gateway is up
    Health,
    /// Print the player location
    GetLocation,
    /// Move the player
    SetLocation {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
    },
    /// Print the player rotation
    GetRotation,
    /// Rotate the player
    SetRotation {
        #[arg(allow_negative_numbers = true)]
        pitch: f64,
        #[arg(allow_negative_numbers = true)]
        yaw: f64,
        #[arg(allow_negative_numbers = true)]
        roll: f64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{url}/health")).send().await?,
        Commands::GetLocation => client.get(format!("{url}/player/get_location")).send().await?,
        Commands::SetLocation { x, y, z } => {
            client
                .put(format!("{url}/player/set_location"))
                .json(&json!({ "x": x, "y": y, "z": z }))
                .send()
                .await?
        }
        Commands::GetRotation => client.get(format!("{url}/player/get_rotation")).send().await?,
        Commands::SetRotation { pitch, yaw, roll } => {
            client
                .put(format!("{url}/player/set_rotation"))
                .json(&json!({ "pitch": pitch, "yaw": yaw, "roll": roll }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let envelope: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if envelope.get("success") != Some(&Value::Bool(true)) {
        std::process::exit(2);
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for the MCP relay", long_about = None)]
struct Cli {
    #[arg(short, long, env = "RELAY_URL", default_value = "http://localhost:80")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay liveness
    Health,
    /// Print the relay's OpenAPI schema
    Schema {
        /// Fetch the indented text rendering instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Call an upstream endpoint through a function_call envelope
    Call {
        endpoint: String,
        /// Parameters as a JSON value
        #[arg(short, long, default_value = "{}")]
        params: String,
    },
    /// Forward a body to an upstream endpoint unchanged
    Raw {
        endpoint: String,
        #[arg(short, long, default_value = "")]
        body: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Schema { text: true } => {
            let res = client
                .get(format!("{}/openapi.txt", base))
                .header(ACCEPT, "text/plain")
                .send()
                .await?;
            println!("{}", res.text().await?);
        }
        Commands::Schema { text: false } => {
            let res = client.get(format!("{}/openapi.json", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Call { endpoint, params } => {
            let parameters: Value = serde_json::from_str(&params)?;
            let envelope = json!({
                "function_call": { "name": endpoint, "parameters": parameters }
            });
            let res = client
                .post(format!("{}/proxy/{}", base, endpoint))
                .json(&envelope)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Raw { endpoint, body } => {
            let res = client
                .post(format!("{}/proxy/{}", base, endpoint))
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;

    // The relay answers 200 even when forwarding failed; surface that.
    if let Some(error) = json.get("error").and_then(Value::as_str) {
        eprintln!("Relay error (status {}): {}", json["status"], error);
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

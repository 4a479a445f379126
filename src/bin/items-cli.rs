use clap::{Parser, Subcommand};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "items-cli")]
#[command(about = "Command-line client for the Items API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000", env = "ITEMS_API_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call the root endpoint
    Hello,
    /// List all items
    List,
    /// Add an item
    Add { name: String },
    /// Show one item
    Get { id: String },
    /// Rename an item
    Update { id: String, name: String },
    /// Delete an item
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (method, path, body) = match cli.command {
        Commands::Hello => (Method::GET, "/".to_string(), None),
        Commands::List => (Method::GET, "/api/items".to_string(), None),
        Commands::Add { name } => (Method::POST, "/api/items".to_string(), Some(json!({ "item": name }))),
        Commands::Get { id } => (Method::GET, format!("/api/items/{}", id), None),
        Commands::Update { id, name } => (
            Method::PUT,
            format!("/api/items/{}", id),
            Some(json!({ "item": name })),
        ),
        Commands::Delete { id } => (Method::DELETE, format!("/api/items/{}", id), None),
    };

    let mut request = client.request(method, format!("{}{}", base, path));
    if let Some(body) = body {
        request = request.json(&body);
    }
    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let is_json = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if is_json {
        let json: Value = res.json().await?;
        print_status(status);
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print_status(status);
        println!("{}", res.text().await?);
    }
    Ok(())
}

fn print_status(status: StatusCode) {
    if status.is_success() {
        println!("Status: {}", status);
    } else {
        eprintln!("Error: API returned status {}", status);
    }
}

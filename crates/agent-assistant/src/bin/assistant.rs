//! Multi-agent assistant CLI
//!
//! # Usage
//!
//! ```bash
//! export GOOGLE_API_KEY="..."
//! export OPENWEATHER_API_KEY="..."
//! export GOOGLE_MAPS_API_KEY="..."
//!
//! # Interactive session
//! cargo run --bin assistant
//!
//! # One question
//! cargo run --bin assistant -- --prompt "What's the weather in Seoul?"
//! ```

use agent_assistant::{AssistantConfig, WeatherClient, maps_toolsets_from_file, root_agent};
use agent_core::Context;
use agent_llm::Message;
use agent_llm::providers::GeminiProvider;
use agent_mcp::MCPToolset;
use agent_runtime::{AgentRuntime, ExecutorEventHandler, LlmAgent};
use anyhow::Context as _;
use async_trait::async_trait;
use clap::Parser;
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "assistant")]
#[command(about = "Root agent with search, code, maps and weather specialists", long_about = None)]
struct Args {
    /// Ask one question and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// MCP config file with additional servers for MapsAgent
    #[arg(long)]
    mcp_config: Option<PathBuf>,

    /// Maximum model calls per agent turn
    #[arg(long, default_value_t = 10)]
    max_iterations: usize,
}

/// Prints tool activity as it happens
struct ToolActivity;

#[async_trait]
impl ExecutorEventHandler for ToolActivity {
    async fn on_tool_start(&self, _id: &str, name: &str, input: &Value) {
        println!("  -> {name} {input}");
    }

    async fn on_tool_done(
        &self,
        _id: &str,
        name: &str,
        result: std::result::Result<&Value, &str>,
        duration_ms: u64,
    ) {
        match result {
            Ok(_) => println!("  <- {name} ({duration_ms} ms)"),
            Err(e) => println!("  <- {name} failed ({duration_ms} ms): {e}"),
        }
    }
}

fn extra_maps_toolsets(path: Option<&PathBuf>) -> anyhow::Result<Vec<MCPToolset>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    maps_toolsets_from_file(path)
        .with_context(|| format!("failed to load MCP config {}", path.display()))
}

fn new_session() -> Context {
    Context::new().with_session_id(uuid::Uuid::new_v4().to_string())
}

async fn ask(
    agent: &LlmAgent,
    conversation: &mut Vec<Message>,
    context: &Context,
    handler: &Arc<dyn ExecutorEventHandler>,
    input: &str,
) -> agent_core::Result<String> {
    let checkpoint = conversation.len();
    conversation.push(Message::user(input));
    let result = agent
        .run_turn(conversation, context, Some(handler.clone()))
        .await;
    if result.is_err() {
        conversation.truncate(checkpoint);
    }
    result
}

async fn repl(
    agent: &LlmAgent,
    handler: &Arc<dyn ExecutorEventHandler>,
) -> anyhow::Result<()> {
    println!("Ask about anything: search, code, maps or weather.");
    println!("Commands: /reset (new conversation), /exit\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut conversation = Vec::new();
    let mut context = new_session();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let input = input.trim();
        match input {
            "" => continue,
            "/exit" => break,
            "/reset" => {
                conversation.clear();
                context = new_session();
                println!("Conversation cleared.\n");
                continue;
            }
            _ => {}
        }

        match ask(agent, &mut conversation, &context, handler, input).await {
            Ok(answer) => println!("{answer}\n"),
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agent_utils::init_tracing();

    let args = Args::parse();
    let config = AssistantConfig::from_env();

    let provider = GeminiProvider::from_env().context("Gemini provider is not configured")?;
    let handler: Arc<dyn ExecutorEventHandler> = Arc::new(ToolActivity);

    let runtime = AgentRuntime::builder()
        .provider(Arc::new(provider))
        .max_iterations(args.max_iterations)
        .event_handler(handler.clone())
        .build()?;

    let descriptor = root_agent(
        &config,
        WeatherClient::new(config.openweather_api_key.clone()),
        extra_maps_toolsets(args.mcp_config.as_ref())?,
    )?;

    info!(root_model = %config.root_model, specialist_model = %config.specialist_model, "Starting assistant");
    let agent = runtime.build_agent(&descriptor).await?;

    let outcome = match args.prompt {
        Some(prompt) => {
            let mut conversation = Vec::new();
            ask(&agent, &mut conversation, &new_session(), &handler, &prompt)
                .await
                .map(|answer| println!("{answer}"))
                .map_err(anyhow::Error::from)
        }
        None => repl(&agent, &handler).await,
    };

    runtime.shutdown().await?;
    outcome
}

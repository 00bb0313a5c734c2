mod helper;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use futures::StreamExt;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing_subscriber::EnvFilter;

use dce_application::{CommandOutput, DceService, Tone};
use dce_core::collaborator::{ChatChunk, ChatClient, ChatMessage, VcsClient};
use dce_core::config::DceConfig;
use dce_infrastructure::{ConfigLoader, GitCli, TreeSitterSymbolExtractor};
use dce_interaction::OllamaChatClient;

use helper::CliHelper;

const EXIT_WORDS: &[&str] = &["exit", "quit", "q", "/exit", "/quit", "/q", "/e"];

#[derive(Parser, Debug)]
#[command(name = "dce", version, about = "Dynamic Context Engine chat REPL")]
struct Cli {
    /// Repository to track (any directory inside the work tree)
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Seconds between background diff polls
    #[arg(long, env = "DCE_POLL_INTERVAL_SECS")]
    poll_interval: Option<u64>,

    /// Ollama endpoint
    #[arg(long, env = "DCE_LLM_ENDPOINT")]
    endpoint: Option<String>,

    /// Model name
    #[arg(long, env = "DCE_LLM_MODEL")]
    model: Option<String>,
}

impl Cli {
    fn apply(&self, mut config: DceConfig) -> DceConfig {
        if let Some(secs) = self.poll_interval {
            config.poll_interval_secs = secs;
        }
        if let Some(endpoint) = &self.endpoint {
            config.llm.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        config
    }
}

fn is_exit(input: &str) -> bool {
    EXIT_WORDS.contains(&input.to_lowercase().as_str())
}

fn print_output(output: &CommandOutput) {
    for line in &output.lines {
        let text = line.text.as_str();
        match line.tone {
            Tone::Heading => println!("{}", text.bright_magenta().bold()),
            Tone::Plain => println!("{}", text),
            Tone::Success => println!("{}", text.green()),
            Tone::Warning => println!("{}", text.yellow()),
            Tone::Error => println!("{}", text.red()),
        }
    }
}

/// Streams one assistant reply to stdout and returns its full text.
async fn stream_reply(chat: &OllamaChatClient, messages: &[ChatMessage]) -> Result<String> {
    let mut stream = chat.stream_response(messages).await?;
    let mut reply = String::new();
    let mut stdout = std::io::stdout();

    while let Some(chunk) = stream.next().await {
        match chunk? {
            ChatChunk::Text(text) => {
                print!("{}", text.bright_blue());
                stdout.flush()?;
                reply.push_str(&text);
            }
            ChatChunk::Done => break,
        }
    }
    println!();
    Ok(reply)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = cli.apply(ConfigLoader::load()?);

    let git = GitCli::discover(&cli.repo).await?;
    tracing::info!("Tracking repository at {}", git.repo_root().display());
    let chat = OllamaChatClient::from_config(&config.llm);
    let service = DceService::new(
        config,
        Arc::new(git),
        Arc::new(TreeSitterSymbolExtractor::new()),
    );

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== DCE REPL ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Model: {}. Type 'quit' to exit.", chat.model()).bright_black()
    );
    println!();

    // ===== Activation =====
    let Some(activation) = read_activation(&mut rl, &service).await? else {
        println!("{}", "Goodbye!".bright_green());
        return Ok(());
    };
    let conversation_id = activation.session.conversation_id().to_string();

    // ===== Chat Loop =====
    let mut history: Vec<ChatMessage> = Vec::new();
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if is_exit(trimmed) {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                match service.handle_command(&conversation_id, trimmed).await {
                    Ok(Some(output)) => {
                        print_output(&output);
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        eprintln!("{}", format!("Error: {}", e).red());
                        continue;
                    }
                }

                history.push(ChatMessage::user(trimmed));
                let messages = service.augment(&conversation_id, &history).await?;
                match stream_reply(&chat, &messages).await {
                    Ok(reply) => history.push(ChatMessage::assistant(reply)),
                    Err(e) => {
                        history.pop();
                        eprintln!("{}", format!("LLM request failed: {}", e).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    service.shutdown().await;
    Ok(())
}

/// Prompts for the initial task description until a session is activated.
///
/// Returns `None` if the user exits first.
async fn read_activation(
    rl: &mut Editor<CliHelper, DefaultHistory>,
    service: &DceService,
) -> Result<Option<dce_application::Activation>> {
    println!("{}", "What are we working on today?".bright_yellow());
    loop {
        match rl.readline("task> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if is_exit(trimmed) {
                    return Ok(None);
                }
                if trimmed.starts_with('/') {
                    println!(
                        "{}",
                        "Describe the task first; commands are available once the DCE is active."
                            .bright_black()
                    );
                    continue;
                }

                match service.activate(trimmed).await {
                    Ok(activation) => {
                        for log in &activation.log_lines {
                            println!("{}", format!("  {}", log).bright_black());
                        }
                        println!("{}", "[DCE] Dynamic Context Engine activated".green());
                        let id = activation.session.conversation_id().to_string();
                        if let Some(output) = service.handle_command(&id, "/tasks").await? {
                            print_output(&output);
                        }
                        return Ok(Some(activation));
                    }
                    Err(e) => {
                        eprintln!("{}", format!("[X] Failed to build tasks: {}", e).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err.into()),
        }
    }
}

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use atelier_chat::{
    config::{ChatConfig, ScanConfig},
    logging, ChatController, ChatMessage,
};
use catalog::{
    patterns::CATEGORIES, Difficulty, DesignStudio, MeasurementMethod, MeasurementSheet,
    PatternAction, PatternLibrary, Selection, StudioAction,
};
use respond::QuickAction;

#[derive(Parser, Debug)]
#[command(name = "atelier", version, about = "AI stylist chat and design catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chat with the AI stylist
    Chat(ChatConfig),
    /// Print the stylist's reply to a single message
    Ask {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Browse the pattern library
    Patterns {
        #[arg(short, long, default_value = "All")]
        category: Selection<String>,
        #[arg(short, long, default_value = "All")]
        difficulty: Selection<Difficulty>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List design studio fabrics
    Fabrics {
        #[arg(short, long, default_value_t = false)]
        sustainable: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fill in body measurements
    Measure {
        #[arg(short, long, default_value = "ai")]
        method: MeasurementMethod,
        /// Run the simulated AI body scan
        #[arg(long, default_value_t = false)]
        scan: bool,
        /// Measurement entries as `id=value`, e.g. `--set waist=28`
        #[arg(long = "set", value_parser = parse_key_val)]
        entries: Vec<(String, String)>,
        #[command(flatten)]
        scan_config: ScanConfig,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Chat(config) => run_chat(config).await,
        Command::Ask { text } => {
            let reply = respond::classify(&text.join(" "));
            println!("{}", reply.text);
            println!("Suggestions: {}", reply.suggestions.iter().join(" | "));
            Ok(())
        }
        Command::Patterns {
            category,
            difficulty,
            json,
        } => list_patterns(category, difficulty, json),
        Command::Fabrics { sustainable, json } => list_fabrics(sustainable, json),
        Command::Measure {
            method,
            scan,
            entries,
            scan_config,
            json,
        } => measure(method, scan, entries, scan_config, json).await,
    }
}

async fn run_chat(config: ChatConfig) -> Result<()> {
    info!(
        "Starting stylist chat (compose delay = {}ms)",
        config.compose_delay_ms
    );
    let mut controller = ChatController::new(&config);
    let mut messages = controller.subscribe();

    println!("   - Commands available: [ '.suggest <n>' | '.quick <action>' | '.history' | '.export' | '.voice' | '.quit' ]");
    println!(
        "   - Quick actions: {}",
        QuickAction::ALL
            .iter()
            .map(|x| format!("{} ({})", x, x.id()))
            .join(", ")
    );
    println!();
    for message in controller.snapshot() {
        print_message(&message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        print!("You: ");
        io::stdout().flush()?;

        let input_txt = match lines.next_line().await.context("failed to read stdin")? {
            Some(line) => line,
            None => break,
        };

        let sent = match process_repl_commands(&input_txt) {
            CliReplActions::ProcessInput => {
                controller.set_input(input_txt);
                controller.send_input()
            }
            CliReplActions::SelectSuggestion(n) => {
                let suggestions = controller.latest_suggestions();
                match n.checked_sub(1).and_then(|i| suggestions.get(i)) {
                    Some(suggestion) => controller.select_suggestion(suggestion),
                    None => {
                        println!("No suggestion #{n} (there are {})", suggestions.len());
                        continue;
                    }
                }
            }
            CliReplActions::QuickAction(action) => controller.quick_action(action),
            CliReplActions::PrintHistory => {
                controller.snapshot().iter().for_each(print_message);
                continue;
            }
            CliReplActions::Export => {
                println!("{}", controller.export_json()?);
                continue;
            }
            CliReplActions::ToggleVoice => {
                if controller.toggle_listening() {
                    println!("🎤 Listening (voice input is simulated, keep typing)");
                } else {
                    println!("🎤 Stopped listening");
                }
                continue;
            }
            CliReplActions::Reprompt => continue,
            CliReplActions::Quit => break,
        };

        if sent.is_none() {
            continue;
        }

        println!("AI Stylist is typing...");
        controller.wait_idle().await;
        while let Ok(message) = messages.try_recv() {
            if !message.is_user() {
                print_message(&message);
            }
        }
    }

    controller.shutdown();
    info!("Chat session ended");
    Ok(())
}

fn print_message(message: &ChatMessage) {
    let speaker = if message.is_user() { "You" } else { "AI Stylist" };
    println!(
        "[{}] {speaker}: {}",
        message.timestamp().format("%H:%M"),
        message.text()
    );
    if let Some(suggestions) = message.suggestions() {
        for (i, suggestion) in suggestions.iter().enumerate() {
            println!("      {}. {suggestion}", i + 1);
        }
    }
}

enum CliReplActions {
    ProcessInput,
    SelectSuggestion(usize),
    QuickAction(QuickAction),
    PrintHistory,
    Export,
    ToggleVoice,
    Reprompt,
    Quit,
}

fn process_repl_commands(input_txt: &str) -> CliReplActions {
    let input_txt = input_txt.trim();
    if !input_txt.starts_with('.') {
        return CliReplActions::ProcessInput;
    }

    let input_tokens = input_txt.split_ascii_whitespace().collect::<Vec<_>>();
    match input_tokens[..] {
        [".quit"] => CliReplActions::Quit,
        [".history"] => CliReplActions::PrintHistory,
        [".export"] => CliReplActions::Export,
        [".voice"] => CliReplActions::ToggleVoice,
        [".suggest", n] => match n.parse() {
            Ok(n) => CliReplActions::SelectSuggestion(n),
            Err(_) => {
                println!("Command usage: .suggest <NUMBER>");
                CliReplActions::Reprompt
            }
        },
        [".quick", action] => match action.parse() {
            Ok(action) => CliReplActions::QuickAction(action),
            Err(e) => {
                println!("{e}");
                CliReplActions::Reprompt
            }
        },
        _ => CliReplActions::ProcessInput,
    }
}

fn list_patterns(
    category: Selection<String>,
    difficulty: Selection<Difficulty>,
    json: bool,
) -> Result<()> {
    let mut library = PatternLibrary::load()?;
    library
        .apply(PatternAction::SelectCategory(category))
        .with_context(|| format!("expected one of: All, {}", CATEGORIES.join(", ")))?;
    library.apply(PatternAction::SelectDifficulty(difficulty))?;

    let visible: Vec<_> = library.visible().collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    println!(
        "Patterns (category = {}, difficulty = {}): {} found",
        library.category(),
        library.difficulty(),
        visible.len()
    );
    for pattern in visible {
        println!("  #{} {pattern}", pattern.id);
        println!(
            "      sizes: {} / formats: {}",
            pattern.sizes.join(" "),
            pattern.formats.join(", ")
        );
    }
    Ok(())
}

fn list_fabrics(sustainable: bool, json: bool) -> Result<()> {
    let mut studio = DesignStudio::load()?;
    if sustainable {
        studio.apply(StudioAction::ToggleSustainableOnly)?;
    }

    let fabrics: Vec<_> = studio.visible_fabrics().collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&fabrics)?);
        return Ok(());
    }

    println!("{}", studio.ai_suggestion());
    for fabric in fabrics {
        let marker = if fabric.sustainable { "♻" } else { " " };
        println!(
            "  {marker} {:<10} ${}/yard",
            fabric.name, fabric.price_per_yard
        );
    }
    Ok(())
}

async fn measure(
    method: MeasurementMethod,
    scan: bool,
    entries: Vec<(String, String)>,
    scan_config: ScanConfig,
    json: bool,
) -> Result<()> {
    let mut sheet = MeasurementSheet::new();
    sheet.set_method(method);

    if scan {
        sheet.run_body_scan(scan_config.scan_delay()).await;
    }
    for (id, value) in entries {
        sheet.update(&id, value)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&sheet)?);
        return Ok(());
    }

    for measurement in sheet.measurements() {
        let required = if measurement.required { "*" } else { " " };
        println!(
            "  {required} {:<15} {:>6} {}",
            measurement.label, measurement.value, measurement.unit
        );
    }
    if sheet.is_complete() {
        println!("All required measurements are filled in");
    } else {
        println!(
            "Missing: {}",
            sheet.missing_required().map(|x| x.label).join(", ")
        );
    }
    Ok(())
}

fn parse_key_val(
    s: &str,
) -> Result<(String, String), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid id=value: no `=` found in `{s}`"))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

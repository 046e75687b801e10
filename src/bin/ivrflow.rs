use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ivrflow::cli::{build_classifier, build_runtime, flow_summaries};
use ivrflow::config::env::{FLOWS_DIR_ENV, SEED_ENV};
use ivrflow::utils::LoggingConfig;
use ivrflow::IvrSettings;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "ivrflow", version, about = "Train IVR flow interpreter", author)]
struct Cli {
    /// 流程目录
    #[arg(long, global = true, env = FLOWS_DIR_ENV)]
    flows: Option<PathBuf>,
    /// 模拟后端随机种子
    #[arg(long, global = true, env = SEED_ENV)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Flows {
        #[command(subcommand)]
        command: FlowCommand,
    },
    /// 识别一段文本的意图与实体
    Classify { text: Vec<String> },
    /// 交互式通话（从标准输入逐行读取）
    Chat,
}

#[derive(Subcommand)]
enum FlowCommand {
    List,
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    let mut settings = IvrSettings::from_env()?;
    if let Some(flows) = cli.flows {
        settings.flows_dir = flows;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    match cli.command {
        Command::Flows { command } => handle_flows(&settings, command).await?,
        Command::Classify { text } => handle_classify(&settings, &text.join(" "))?,
        Command::Chat => handle_chat(&settings).await?,
    }
    Ok(())
}

async fn handle_flows(settings: &IvrSettings, command: FlowCommand) -> anyhow::Result<()> {
    let runtime = build_runtime(settings).await?;
    let summaries = flow_summaries(runtime.store());
    if summaries.is_empty() {
        println!("No flows found in directory `{}`", settings.flows_dir.display());
        return Ok(());
    }

    match command {
        FlowCommand::List => {
            println!("{:<28} {:<20} {}", "Name", "Entry", "States");
            for entry in &summaries {
                println!("{:<28} {:<20} {}", entry.name, entry.entry_state, entry.states);
            }
        }
        FlowCommand::Check => {
            let mut total = 0;
            for entry in &summaries {
                for issue in &entry.issues {
                    println!("{}: {}", entry.name, issue);
                    total += 1;
                }
            }
            if total == 0 {
                println!("{} flows checked, no issues", summaries.len());
            } else {
                anyhow::bail!("{total} issue(s) found");
            }
        }
    }
    Ok(())
}

fn handle_classify(settings: &IvrSettings, text: &str) -> anyhow::Result<()> {
    let classifier = build_classifier(settings)?;
    let output = serde_json::json!({
        "recognition": classifier.extract_intent(text),
        "context": classifier.understand_context(text),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn handle_chat(settings: &IvrSettings) -> anyhow::Result<()> {
    let runtime = build_runtime(settings).await?;
    let (mut call, reply) = runtime.start();
    print_reply(&reply.message, &reply.options);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = runtime.handle_input(&mut call, &line);
        print_reply(&reply.message, &reply.options);
        if reply.is_end {
            break;
        }
    }

    let summary = runtime.end(call);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn print_reply(message: &str, options: &std::collections::BTreeMap<String, String>) {
    println!("IVR: {message}");
    for (key, label) in options {
        println!("  [{key}] {label}");
    }
}

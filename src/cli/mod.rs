use crate::{
    server::{self, AppState},
    GenerationClient, GenerationConfig, Orchestrator, PlanLog, TravelRequest,
};
use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, io::Read, net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("travel-planner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-agent travel planner backed by an LLM")
        .subcommand_required(true)
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("Generation API key (or set GEMINI_API_KEY / OPENAI_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("OpenAI-compatible base URL (or set TRAVEL_PLANNER_BASE_URL / OPENAI_BASE_URL)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Model name (or set TRAVEL_PLANNER_MODEL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .value_parser(clap::value_parser!(u64))
                .help("Per-call timeout in seconds (or set TRAVEL_PLANNER_TIMEOUT_SECS)"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .default_value("127.0.0.1"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .value_parser(clap::value_parser!(u16))
                        .default_value("8000"),
                )
                .arg(log_dir_arg())
                .arg(
                    Arg::new("no-log")
                        .long("no-log")
                        .action(ArgAction::SetTrue)
                        .help("Do not write completed plans to disk"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Create one travel plan and print it as JSON")
                .arg(
                    Arg::new("request")
                        .short('r')
                        .long("request")
                        .value_name("FILE")
                        .conflicts_with("destination")
                        .help("Read the travel request JSON from FILE (`-` for stdin)"),
                )
                .arg(
                    Arg::new("destination")
                        .index(1)
                        .required_unless_present("request")
                        .help("Where to travel"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("YYYY-MM-DD")
                        .required_unless_present("request"),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .value_name("YYYY-MM-DD")
                        .required_unless_present("request"),
                )
                .arg(
                    Arg::new("travelers")
                        .short('n')
                        .long("travelers")
                        .value_name("COUNT")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("budget")
                        .short('b')
                        .long("budget")
                        .value_name("AMOUNT"),
                )
                .arg(
                    Arg::new("interest")
                        .short('i')
                        .long("interest")
                        .value_name("INTEREST")
                        .action(ArgAction::Append)
                        .help("Interest to plan around (repeatable)"),
                )
                .arg(
                    Arg::new("save")
                        .long("save")
                        .action(ArgAction::SetTrue)
                        .help("Also write the plan to the log directory"),
                )
                .arg(log_dir_arg()),
        )
}

fn log_dir_arg() -> Arg {
    Arg::new("log-dir")
        .long("log-dir")
        .value_name("DIR")
        .help("Directory for saved plans (or set TRAVEL_PLANNER_LOG_DIR, default `logs`)")
}

/// CLI entry point for the travel-planner binary
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let config = generation_config(&matches);
    info!(model = %config.model, base_url = %config.base_url, "generation settings");
    let client = GenerationClient::new(config)?;
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(client)));

    match matches.subcommand() {
        Some(("serve", sub)) => serve(sub, orchestrator).await,
        Some(("plan", sub)) => plan(sub, &orchestrator).await,
        _ => Err(anyhow!("a subcommand is required")),
    }
}

fn generation_config(matches: &ArgMatches) -> GenerationConfig {
    let mut config = GenerationConfig::from_env();

    if let Some(api_key) = matches.get_one::<String>("api-key") {
        config = config.with_api_key(api_key.clone());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.clone());
    }
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*secs));
    }

    config
}

fn plan_log(matches: &ArgMatches) -> PlanLog {
    matches
        .get_one::<String>("log-dir")
        .cloned()
        .or_else(|| env::var("TRAVEL_PLANNER_LOG_DIR").ok())
        .map(PlanLog::new)
        .unwrap_or_default()
}

async fn serve(matches: &ArgMatches, orchestrator: Arc<Orchestrator>) -> anyhow::Result<()> {
    let host = matches
        .get_one::<String>("host")
        .map(String::as_str)
        .unwrap_or("127.0.0.1");
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8000);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("Invalid server address")?;

    let saved_plans = (!matches.get_flag("no-log")).then(|| plan_log(matches));
    if let Some(log) = &saved_plans {
        info!("Saving plans to {}", log.dir().display());
    }

    info!(
        "Starting AI Travel Planner API v{} (ai_enabled={})",
        env!("CARGO_PKG_VERSION"),
        orchestrator.ai_enabled()
    );

    let state = AppState::new(orchestrator).with_plan_log(saved_plans);
    server::serve(addr, state).await
}

async fn plan(matches: &ArgMatches, orchestrator: &Orchestrator) -> anyhow::Result<()> {
    let request = match matches.get_one::<String>("request") {
        Some(source) => read_request(source)?,
        None => request_from_args(matches)?,
    };

    let plan = match orchestrator.create_plan(&request).await {
        Ok(plan) => plan,
        Err(e) => {
            error!("Travel planning failed: {}", e);
            return Err(e.into());
        }
    };

    if matches.get_flag("save") {
        let path = plan_log(matches).write(&plan).await?;
        info!("Saved travel plan to: {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn request_from_args(matches: &ArgMatches) -> anyhow::Result<TravelRequest> {
    let required = |name: &str| {
        matches
            .get_one::<String>(name)
            .cloned()
            .ok_or_else(|| anyhow!("--{name} is required"))
    };

    let mut request = TravelRequest::new(
        required("destination")?,
        required("start")?,
        required("end")?,
        matches.get_one::<u32>("travelers").copied().unwrap_or(1),
    );

    if let Some(budget) = matches.get_one::<String>("budget") {
        request = request.with_budget(budget.clone());
    }
    if let Some(interests) = matches.get_many::<String>("interest") {
        request = request.with_interests(interests.cloned());
    }

    Ok(request)
}

fn read_request(source: &str) -> anyhow::Result<TravelRequest> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read request file {source}"))?
    };

    parse_request(&raw)
}

fn parse_request(raw: &str) -> anyhow::Result<TravelRequest> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        anyhow!("invalid travel request at {}: {}", location, err.inner())
    })
}

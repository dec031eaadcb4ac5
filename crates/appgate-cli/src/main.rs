use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use appgate_core::config::{GatewayConfig, LogFormat, LoggingConfig, load_registry};
use appgate_core::domain::{AppId, DispatchRequest, ExAppResponse};
use appgate_core::impls::{AuthHeaders, HttpDispatchService, InMemoryExAppRegistry, LoopbackTransport};
use appgate_core::ports::{SystemClock, UlidGenerator};
use appgate_core::{Gateway, GatewayBuilder};

/// appgate: forward requests to registered ExApps
#[derive(Parser, Debug)]
#[command(name = "appgate")]
#[command(about = "Resolve registered ExApps and forward requests to them")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the public summary of an ExApp
    Info {
        app_id: String,
    },

    /// Dispatch a request to an ExApp (loopback transport: the response echoes
    /// what would have been sent)
    Call {
        app_id: String,
        route: String,

        #[arg(short, long, default_value = "POST")]
        method: String,

        /// Acting user; omit for an app-level call
        #[arg(short, long)]
        user: Option<String>,

        /// Request params as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        /// Transport options as a JSON object (headers, timeout)
        #[arg(short, long)]
        options: Option<String>,

        /// Use the async dispatch path
        #[arg(long = "async")]
        use_async: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let config = GatewayConfig::from_env().context("loading configuration")?;
    init_tracing(&config.logging);

    let gateway = build_gateway(&config)?;

    match args.command {
        Command::Info { app_id } => {
            let Some(summary) = gateway.get_exapp_info(&AppId::new(&app_id)) else {
                eprintln!("ExApp `{app_id}` not found");
                return Ok(ExitCode::FAILURE);
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Call {
            app_id,
            route,
            method,
            user,
            params,
            options,
            use_async,
        } => {
            let mut request = DispatchRequest::new(route)
                .with_method(method.to_uppercase().parse().context("invalid --method")?)
                .with_params(json_object("--params", params.as_deref())?)
                .with_options(json_object("--options", options.as_deref())?);
            if let Some(user) = user {
                request = request.with_user(user);
            }

            let app_id = AppId::new(app_id);
            if use_async {
                call_async(&gateway, &app_id, request)
            } else {
                call_sync(&gateway, &app_id, request)
            }
        }
    }
}

fn call_sync(
    gateway: &Gateway,
    app_id: &AppId,
    request: DispatchRequest,
) -> anyhow::Result<ExitCode> {
    match gateway.dispatch_sync(app_id, request) {
        Ok(response) => print_response(&response),
        Err(payload) => {
            println!("{}", serde_json::to_string(&payload)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn call_async(
    gateway: &Gateway,
    app_id: &AppId,
    request: DispatchRequest,
) -> anyhow::Result<ExitCode> {
    // Not-found is reported here, before any runtime work starts.
    let pending = gateway.dispatch_async(app_id, request)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let response = runtime.block_on(pending)?;
    print_response(&response)
}

fn print_response(response: &ExAppResponse) -> anyhow::Result<ExitCode> {
    info!(status = %response.status, bytes = response.body.len(), "ExApp responded");
    match response.json::<serde_json::Value>() {
        Ok(v) => println!("{}", serde_json::to_string_pretty(&v)?),
        Err(_) => println!("{}", response.text()),
    }
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_gateway(config: &GatewayConfig) -> anyhow::Result<Gateway> {
    let registry = match &config.registry_file {
        Some(path) => load_registry(path)?,
        None => InMemoryExAppRegistry::new(),
    };
    info!(apps = registry.len(), "registry loaded");

    let auth = AuthHeaders::new(
        config.aa_version.clone(),
        Arc::new(UlidGenerator::new(SystemClock)),
    );
    let dispatcher = HttpDispatchService::new(Arc::new(LoopbackTransport::new()), auth);

    Ok(GatewayBuilder::new()
        .registry(Arc::new(registry))
        .dispatcher(Arc::new(dispatcher))
        .build()?)
}

fn json_object(flag: &str, raw: Option<&str>) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    let Some(raw) = raw else {
        return Ok(serde_json::Map::new());
    };
    let value: serde_json::Value =
        serde_json::from_str(raw).with_context(|| format!("{flag} is not valid JSON"))?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => bail!("{flag} must be a JSON object"),
    }
}

/// Falls back to `info` on a malformed directive and says so on stderr,
/// since no subscriber exists yet to carry the warning.
fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("warning: ignoring log filter '{directive}' ({e}), using 'info'");
        EnvFilter::new("info")
    })
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = env_filter(&logging.filter);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

//! tts-console — 交互式语音合成控制台
//!
//! Usage:
//!   tts-console [--base-url <url>] [--policy <continuous|capped>] [--save-dir <dir>]
//!
//! Each line read from stdin is sent for synthesis and played back.
//! `:status` re-checks the backend, `:quit` exits.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tts_console::console::TerminalView;
use tts_console::playback::{FilePlayback, PlaybackDevice};
use tts_console::{BackendConfig, ClientController, PollPolicy, Severity};

#[derive(Debug, Default)]
struct Options {
    base_url: Option<String>,
    policy: Option<PollPolicy>,
    save_dir: Option<PathBuf>,
}

enum Command {
    Run(Options),
    Help,
    Version,
}

fn print_usage() {
    println!(
        r#"tts-console — text-to-speech console client

USAGE:
    tts-console [OPTIONS]

OPTIONS:
    --base-url <url>            Backend base URL (default http://127.0.0.1:5000)
    --policy <policy>           Status polling: continuous (every 30s) or capped (3 checks, every 300s)
    --save-dir <dir>            Write audio files to <dir> instead of playing them
    -h, --help                  Show this help message
    -V, --version               Show version information

COMMANDS (stdin):
    <text>                      Synthesize and play <text>
    :status                     Check the backend status now
    :quit                       Exit

ENVIRONMENT:
    TTS_CONSOLE_BASE_URL        Backend base URL
    TTS_CONSOLE_HTTP_TIMEOUT_SECS
                                HTTP timeout in seconds (default 30)
    TTS_CONSOLE_PROXY_URL       Proxy for all backend requests
    TTS_CONSOLE_POLL_POLICY     continuous | capped
    RUST_LOG                    Diagnostics filter (default tts_console=info)"#
    );
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--base-url" => {
                options.base_url = Some(iter.next().context("--base-url needs a value")?.clone());
            }
            "--policy" => {
                let raw = iter.next().context("--policy needs a value")?;
                options.policy = Some(raw.parse()?);
            }
            "--save-dir" => {
                options.save_dir =
                    Some(PathBuf::from(iter.next().context("--save-dir needs a value")?));
            }
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            other => bail!("Unknown argument: {other}"),
        }
    }
    Ok(Command::Run(options))
}

fn playback_device(save_dir: Option<PathBuf>) -> Result<Arc<dyn PlaybackDevice>> {
    #[cfg(feature = "audio-output")]
    {
        if save_dir.is_none() {
            match tts_console::playback::RodioPlayback::new() {
                Ok(device) => return Ok(Arc::new(device)),
                Err(e) => tracing::warn!(error = %e, "no audio output, writing files instead"),
            }
        }
    }

    let dir = save_dir.unwrap_or_else(|| std::env::temp_dir().join("tts-console"));
    let device = FilePlayback::new(&dir)
        .with_context(|| format!("cannot use output directory {}", dir.display()))?;
    println!("Audio files are written to {}", dir.display());
    Ok(Arc::new(device))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tts_console=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_usage();
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("tts-console {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    let mut backend_config = BackendConfig::from_env()?;
    if let Some(url) = &options.base_url {
        backend_config = backend_config.with_base_url(url)?;
    }
    let policy = match options.policy {
        Some(policy) => policy,
        None => PollPolicy::from_env()?,
    };

    println!("Backend: {}", backend_config.base_url());
    println!("Status polling: {}", policy);

    let controller = ClientController::builder()
        .backend_config(backend_config)
        .playback(playback_device(options.save_dir)?)
        .view(Arc::new(TerminalView::new()))
        .policy(policy)
        .build()?;

    controller.initialize().await;
    println!("Type text and press Enter to speak it; :status to re-check, :quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":status" => controller.check_status().await,
            _ if !controller.play_enabled() => {
                // Same as clicking a disabled play button: nothing is sent.
                controller.add_log(
                    "Playback is unavailable right now; wait or use :status",
                    Severity::Error,
                );
            }
            _ => {
                let controller = controller.clone();
                let text = line.clone();
                tokio::spawn(async move { controller.submit_and_play(&text).await });
            }
        }
    }

    controller.shutdown();
    Ok(())
}

use crate::api::{self, AppState};
use crate::config::Settings;
use crate::log::ActivityLogger;
use crate::tools::generate::{DisabledGenerator, HttpGenerator, TextGenerator};
use crate::tools::paginate::PaginateOptions;
use crate::tools::render::{ChromiumOptions, ChromiumRenderer, Renderer};
use crate::ApiResponse;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "revex", version, about = "Extract product reviews from any page (JSON only)")]
pub struct Cli {
    #[command(flatten)]
    overrides: Overrides,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve `GET /api/reviews?url=...`
    Serve {
        /// Address to bind, e.g. 0.0.0.0:5000
        #[arg(long)]
        bind: Option<String>,
    },
    /// Extract reviews from one URL and print them as JSON
    Extract {
        url: String,
    },
    /// Show the activity log, most recent first
    Logs {
        /// Only entries for this host
        #[arg(long)]
        host: Option<String>,
        /// Only failed requests
        #[arg(long)]
        errors: bool,
    },
}

/// Command-line overrides on top of `REVEX_*` environment settings.
#[derive(Args)]
struct Overrides {
    /// Stop after this many pages (0 = no limit)
    #[arg(long, global = true)]
    max_pages: Option<usize>,
    /// CSS locator of the "next page" control
    #[arg(long, global = true)]
    next_selector: Option<String>,
    /// Wait after the first navigation, in milliseconds
    #[arg(long, global = true)]
    settle_ms: Option<u64>,
    /// Wait after clicking "next", in milliseconds
    #[arg(long, global = true)]
    click_settle_ms: Option<u64>,
    /// Text-generation endpoint used for selector inference
    #[arg(long, global = true)]
    model_url: Option<String>,
    /// Chromium executable
    #[arg(long, global = true)]
    chrome_path: Option<String>,
}

impl Overrides {
    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.max_pages {
            settings.max_pages = v;
        }
        if let Some(v) = self.next_selector {
            settings.next_selector = v;
        }
        if let Some(v) = self.settle_ms {
            settings.initial_settle_ms = v;
        }
        if let Some(v) = self.click_settle_ms {
            settings.click_settle_ms = v;
        }
        if let Some(v) = self.model_url {
            settings.model_url = Some(v);
        }
        if let Some(v) = self.chrome_path {
            settings.chrome_path = Some(v);
        }
    }
}

/// Build the injected capabilities from settings.
pub fn build_state(settings: &Settings) -> crate::Result<AppState> {
    let generator: Arc<dyn TextGenerator> = match &settings.model_url {
        Some(url) => Arc::new(HttpGenerator::new(
            url.clone(),
            settings.model_token.as_deref(),
            settings.generation_timeout(),
        )?),
        None => {
            tracing::warn!("no model endpoint configured; using fallback selectors only");
            Arc::new(DisabledGenerator)
        }
    };
    let renderer: Arc<dyn Renderer> =
        Arc::new(ChromiumRenderer::new(ChromiumOptions::from(settings)));

    Ok(AppState {
        renderer,
        generator,
        options: PaginateOptions::from(settings),
    })
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    cli.overrides.apply(&mut settings);

    match cli.cmd {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            let state = build_state(&settings)?;
            api::serve(&settings.bind, state).await
        }
        Command::Extract { url } => {
            let state = build_state(&settings)?;
            let result = api::extract_url(
                state.renderer.as_ref(),
                state.generator.as_ref(),
                Some(&url),
                &state.options,
            )
            .await;
            finish(result);
            Ok(())
        }
        Command::Logs { host, errors } => {
            let logger = ActivityLogger::new()?;
            finish(logger.read_logs(host.as_deref(), errors));
            Ok(())
        }
    }
}

fn finish<T: serde::Serialize>(res: crate::Result<T>) {
    match res {
        Ok(v) => print_json(ApiResponse::ok(v)),
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}

fn print_json<T: serde::Serialize>(val: T) {
    match serde_json::to_string_pretty(&val) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing to JSON: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_replace_settings() {
        let cli = Cli::try_parse_from([
            "revex",
            "extract",
            "https://shop.example",
            "--max-pages",
            "3",
            "--next-selector",
            "button.more",
            "--click-settle-ms",
            "100",
        ])
        .unwrap();

        let mut settings = Settings::default();
        cli.overrides.apply(&mut settings);
        assert_eq!(settings.max_pages(), Some(3));
        assert_eq!(settings.next_selector, "button.more");
        assert_eq!(settings.click_settle_ms, 100);
        assert_eq!(settings.initial_settle_ms, 5_000);
    }

    #[test]
    fn logs_command_takes_filters() {
        let cli =
            Cli::try_parse_from(["revex", "logs", "--host", "shop.example", "--errors"]).unwrap();
        match cli.cmd {
            Command::Logs { host, errors } => {
                assert_eq!(host.as_deref(), Some("shop.example"));
                assert!(errors);
            }
            _ => panic!("expected logs command"),
        }
    }

    #[test]
    fn state_without_model_uses_disabled_generator() {
        let state = build_state(&Settings::default()).unwrap();
        assert_eq!(state.generator.name(), "disabled");
        assert_eq!(state.renderer.name(), "chromium");
        assert_eq!(state.options.next_selector, "a.next-page");
    }
}

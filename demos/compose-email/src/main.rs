//! Terminal shell around the email writer core.
//!
//! Collects raw thoughts, tone and optional reply context from the command
//! line, submits them, and renders the idle, loading and settled views. The
//! dark mode preference is restored at startup and written back when toggled.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use email_writer::adapters::connect;
use email_writer::config::{
    DisplayPreferences, FilePreferenceStore, GeneratorConfig, PreferenceStore,
};
use email_writer::kernel::{RequestController, RequestSnapshot, RequestState};
use email_writer::primitives::{GenerationRequest, GenerationResult, Tone};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "compose-email", about = "Turn rough notes into a polished email")]
struct Args {
    /// What you want to say, however rough.
    thoughts: Option<String>,

    /// Tone preset.
    #[arg(long, short, default_value_t = Tone::Professional)]
    tone: Tone,

    /// Email you are replying to.
    #[arg(long, short)]
    context: Option<String>,

    /// Preference file holding the dark mode flag.
    #[arg(long, default_value = "email-writer-preferences.json")]
    prefs: PathBuf,

    /// Flip dark mode and remember the choice.
    #[arg(long)]
    toggle_dark_mode: bool,

    /// Print the available tones and exit.
    #[arg(long)]
    list_tones: bool,
}

#[derive(Clone, Copy)]
struct Theme {
    accent: &'static str,
    body: &'static str,
}

impl Theme {
    const RESET: &'static str = "\x1b[0m";

    const fn for_preferences(preferences: DisplayPreferences) -> Self {
        if preferences.dark_mode {
            Self {
                accent: "\x1b[38;5;75m",
                body: "\x1b[38;5;252m",
            }
        } else {
            Self {
                accent: "\x1b[38;5;25m",
                body: "\x1b[38;5;236m",
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    email_writer::telemetry::init("warn").context("failed to initialise logging")?;
    let args = Args::parse();

    if args.list_tones {
        for tone in Tone::ALL {
            println!("{:<13} {}", tone.as_str(), tone.description());
        }
        return Ok(());
    }

    let store = FilePreferenceStore::new(&args.prefs);
    let mut preferences = store.load().context("failed to load preferences")?;
    if args.toggle_dark_mode {
        preferences = preferences.toggled();
        store.save(preferences).context("failed to save preferences")?;
        info!(dark_mode = preferences.dark_mode, "dark mode toggled");
    }
    let theme = Theme::for_preferences(preferences);

    let Some(thoughts) = args.thoughts else {
        render(&mut io::stdout().lock(), theme, &RequestSnapshot::default())
            .context("failed to write to stdout")?;
        return Ok(());
    };
    let mut request = GenerationRequest::new(thoughts, args.tone)?;
    if let Some(context) = args.context {
        request = request.with_context_email(context);
    }

    let config = GeneratorConfig::from_env().context("invalid generator configuration")?;
    let generator = connect(config).context("failed to build generation client")?;
    let controller = Arc::new(RequestController::new(generator));
    let mut updates = controller.subscribe();

    let handle = match controller.submit_detached(request) {
        Ok(handle) => handle,
        Err(reason) => bail!("submission ignored: {reason}"),
    };

    loop {
        let snapshot = updates.borrow_and_update().clone();
        render(&mut io::stdout().lock(), theme, &snapshot)
            .context("failed to write to stdout")?;
        if snapshot.state() == RequestState::Settled {
            break;
        }
        if updates.changed().await.is_err() {
            break;
        }
    }

    let result = handle.await.context("generation task panicked")?;
    debug!(success = result.is_success(), "done");
    Ok(())
}

fn render(out: &mut impl Write, theme: Theme, snapshot: &RequestSnapshot) -> io::Result<()> {
    match (snapshot.state(), snapshot.result()) {
        (RequestState::Idle, _) => writeln!(
            out,
            "{}Your generated email will appear here.{}\nEnter your thoughts and select a tone to get started.",
            theme.accent,
            Theme::RESET
        ),
        (RequestState::InFlight, _) => {
            writeln!(out, "{}Generating your email...{}", theme.accent, Theme::RESET)
        }
        (RequestState::Settled, Some(GenerationResult::Success { text })) => writeln!(
            out,
            "{}Generated email{}\n\n{}{text}{}",
            theme.accent,
            Theme::RESET,
            theme.body,
            Theme::RESET
        ),
        (RequestState::Settled, Some(failure @ GenerationResult::Failure { .. })) => {
            writeln!(out, "{}", failure.display_text())
        }
        (RequestState::Settled, None) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn idle_view_prompts_for_input() {
        let mut out = Vec::new();
        let theme = Theme::for_preferences(DisplayPreferences::default());
        render(&mut out, theme, &RequestSnapshot::default()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Your generated email will appear here."));
    }

    #[test]
    fn write_failures_are_returned() {
        let theme = Theme::for_preferences(DisplayPreferences { dark_mode: true });
        let err = render(&mut ClosedPipe, theme, &RequestSnapshot::default()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}

use anyhow::Context;
use badgesmith::app::{Dispatcher, Outcome};
use badgesmith::i18n::{Locale, Text};
use badgesmith::platform::{Clipboard, DirectorySink, Notifier, Platform, Toast, ToastKind};
use badgesmith::storage::FileStore;
use badgesmith::{Action, BadgeConfig, LogoPreset, LogoRegistry, RasterExporter, Session, Snippet, Theme};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const PROVIDER_ESCAPES: &str = "Provider escaping: a single `_` renders as a space, `__` as an \
underscore and `--` as a dash. Whitespace is always sent as an encoded space.";

#[derive(Parser)]
#[command(name = "badgesmith", version, about = "Build, copy and export shields-style badges")]
struct Cli {
    /// Profile directory holding the persisted form state and history
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Badge provider root
    #[arg(long, global = true)]
    provider_root: Option<String>,

    /// Fetch timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Interface language for this run (does not change the saved one)
    #[arg(long, global = true)]
    lang: Option<Locale>,

    /// Extra SVG logos to register; the file stem becomes the logo id
    #[arg(long = "logo-file", global = true)]
    logo_files: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the current badge and its snippets
    Show,
    /// Change form fields
    #[command(after_help = PROVIDER_ESCAPES)]
    Set {
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        message: Option<String>,
        /// Hex color (with or without '#') or a provider color name
        #[arg(long)]
        color: Option<String>,
        /// Logo id, see `badgesmith logos`
        #[arg(long, conflicts_with = "no_logo")]
        logo: Option<String>,
        #[arg(long)]
        no_logo: bool,
    },
    /// Copy the badge to the clipboard
    ///
    /// With the system clipboard on Linux the command keeps serving the text
    /// until another application copies something.
    Copy {
        #[arg(value_enum, default_value_t = SnippetArg::Url)]
        format: SnippetArg,
        /// Copy the URL stored in this history entry instead
        #[arg(long)]
        entry: Option<i64>,
    },
    /// Rasterize the badge and save it as badge.png
    Export {
        /// Target directory (defaults to the download directory)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
    },
    /// Save the current badge to history
    Save,
    /// List saved badges, newest first
    History,
    /// Load a history entry back into the form
    Load { id: i64 },
    /// Remove every history entry
    ClearHistory {
        #[arg(long, short)]
        yes: bool,
    },
    /// List available logos
    Logos,
    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
    /// Change the saved interface language
    Locale { locale: Locale },
}

#[derive(Clone, Copy, ValueEnum)]
enum SnippetArg {
    Url,
    Markdown,
    Html,
}

impl From<SnippetArg> for Snippet {
    fn from(s: SnippetArg) -> Self {
        match s {
            SnippetArg::Url => Snippet::Url,
            SnippetArg::Markdown => Snippet::Markdown,
            SnippetArg::Html => Snippet::Html,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

#[cfg(feature = "system-clipboard")]
fn platform_clipboard() -> Box<dyn Clipboard + Send> {
    match badgesmith::platform::SystemClipboard::new() {
        Ok(c) => Box::new(c.hold_until_replaced(true)),
        Err(e) => {
            log::warn!("{}", e);
            Box::new(badgesmith::platform::UnavailableClipboard)
        }
    }
}

#[cfg(not(feature = "system-clipboard"))]
fn platform_clipboard() -> Box<dyn Clipboard + Send> {
    Box::new(badgesmith::platform::MemoryClipboard::new())
}

fn print_toast(t: &Toast) {
    let marker = match t.kind {
        ToastKind::Success => "✓",
        ToastKind::Error => "✗",
    };
    eprintln!("{} {}: {}", marker, t.title, t.message);
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "s" | "si" | "sí"))
}

/// Returns `Ok(false)` when an action failed; its toast was already printed.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = BadgeConfig::default();
    if let Some(root) = cli.provider_root {
        config.provider_root = root;
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout_ms = ms;
    }
    if let Command::Export { scale, .. } = &cli.command {
        config.scale = *scale;
    }
    config.validate()?;

    let mut logos = LogoRegistry::bundled();
    for path in &cli.logo_files {
        logos = logos.with_preset(LogoPreset::from_svg_file(path)?)?;
    }

    let store = match cli.profile {
        Some(dir) => FileStore::new(dir),
        None => FileStore::default_profile()?,
    };
    log::debug!("profile directory: {}", store.dir().display());

    let mut session = Session::open(store, logos, &config);
    let locale = cli.lang.unwrap_or(session.locale());

    let out_dir = match &cli.command {
        Command::Export { out: Some(dir), .. } => DirectorySink::new(dir.clone()),
        _ => DirectorySink::default_location(),
    };
    let mut notifier = Notifier::new(config.toast_duration());
    notifier.on_show(print_toast);
    let platform = Platform::new(platform_clipboard(), Box::new(out_dir), notifier);
    let exporter = RasterExporter::new(&config).context("failed to set up exporter")?;
    let mut dispatcher = Dispatcher::new(platform, exporter);

    let actions: Vec<Action> = match cli.command {
        Command::Show => {
            let state = session.state();
            let locator = session.locator();
            println!("{}\n", locale.t(Text::AppTitle));
            println!("{}: {}", locale.t(Text::Label), state.spec.label);
            println!("{}: {}", locale.t(Text::Message), state.spec.message);
            println!("{}: {}", locale.t(Text::Color), state.spec.color);
            let logo = session
                .logos()
                .get(&state.spec.logo_id)
                .map(|p| p.display_name.as_str())
                .unwrap_or(locale.t(Text::NoLogo));
            println!("{}: {}", locale.t(Text::Logo), logo);
            println!("{}: {:?}", locale.t(Text::Theme), state.theme);
            println!("{}: {}", locale.t(Text::Language), locale.native_name());
            println!();
            println!("{}:", locale.t(Text::Preview));
            for kind in Snippet::ALL {
                println!("{}\n  {}", kind.name(), locator.snippet(kind));
            }
            vec![]
        }
        Command::Set { label, message, color, logo, no_logo } => {
            let mut actions = Vec::new();
            if let Some(v) = label {
                actions.push(Action::SetLabel(v));
            }
            if let Some(v) = message {
                actions.push(Action::SetMessage(v));
            }
            if let Some(v) = color {
                actions.push(Action::SetColor(v));
            }
            if let Some(id) = logo {
                if session.logos().get(&id).is_none() {
                    anyhow::bail!("unknown logo id: {} (see `badgesmith logos`)", id);
                }
                actions.push(Action::SelectLogo(id));
            }
            if no_logo {
                actions.push(Action::SelectLogo(String::new()));
            }
            actions
        }
        Command::Copy { format, entry } => match entry {
            Some(id) => vec![Action::CopyEntry(id)],
            None => vec![Action::Copy(format.into())],
        },
        Command::Export { .. } => vec![Action::DownloadPng],
        Command::Save => vec![Action::SaveToHistory],
        Command::History => {
            let history = &session.state().history;
            if history.is_empty() {
                println!("{}", locale.t(Text::NoHistoryYet));
            }
            for entry in history.iter() {
                let when = entry
                    .created_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("{}  {}  {} / {}  [{}]", entry.id, when, entry.label, entry.message, entry.color);
                println!("    {}", entry.url);
            }
            vec![]
        }
        Command::Load { id } => vec![Action::LoadEntry(id)],
        Command::ClearHistory { yes } => {
            if yes || confirm(&format!("{}?", locale.t(Text::ClearHistory)))? {
                vec![Action::ClearHistory]
            } else {
                vec![]
            }
        }
        Command::Logos => {
            let selected = session.state().spec.logo_id.clone();
            for p in session.logos().presets() {
                let mark = if p.id == selected { "*" } else { " " };
                println!("{} {:<12} {}", mark, p.id, p.display_name);
            }
            vec![]
        }
        Command::Theme { mode } => match mode {
            None => {
                println!("{:?}", session.state().theme);
                vec![]
            }
            Some(ThemeArg::Light) => vec![Action::SetTheme(Theme::Light)],
            Some(ThemeArg::Dark) => vec![Action::SetTheme(Theme::Dark)],
            Some(ThemeArg::Toggle) => vec![Action::ToggleTheme],
        },
        Command::Locale { locale } => vec![Action::SetLocale(locale)],
    };

    let mut failed = false;
    for action in actions {
        let effects = session.handle(action);
        for outcome in dispatcher.run(effects, locale).await {
            match outcome {
                Outcome::Copied(text) => println!("{}", text),
                Outcome::Downloaded(path) => println!("{}", path.display()),
                Outcome::Failed(_) => failed = true,
                Outcome::Notified => {}
            }
        }
    }

    Ok(!failed)
}

#[tokio::main]
async fn main() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .try_init();

    match run(Cli::parse()).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("badgesmith: {:#}", e);
            std::process::exit(1);
        }
    }
}

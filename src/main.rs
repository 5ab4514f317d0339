use anyhow::{Context, Result, bail};
use clap::Parser;
use embed::{Environment, Host, NavigationTiming, ReadyState, Registration, WidgetOptions};
use std::io::Read;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Prerenders `<lazy-youtube>` widgets in an HTML page.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// HTML file to read; stdin when omitted
    input: Option<PathBuf>,

    /// TOML file with a [widget] table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Custom element tag name, overrides the config file
    #[arg(long)]
    tag: Option<String>,

    /// Simulate a host without custom element support
    #[arg(long)]
    no_custom_elements: bool,

    /// Click the Nth widget (1-based, document order); repeatable
    #[arg(long, value_name = "N")]
    activate: Vec<usize>,

    /// Print a tree outline instead of markup
    #[arg(long)]
    outline: bool,

    /// Fill `.dom-complete-time` elements as if the page completed after MS milliseconds
    #[arg(long, value_name = "MS")]
    timing: Option<f64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let markup = read_input(cli.input.as_ref())?;
    let options = load_options(&cli)?;
    let environment = Environment {
        custom_elements: !cli.no_custom_elements,
    };

    let mut host = Host::parse(&markup, environment, options)?;
    match host.register() {
        Registration::Defined { mounted, failed } => {
            log::info!("{} widget(s) mounted", mounted.len());
            for (id, err) in failed {
                log::warn!("widget {id:?} left as authored: {err}");
            }
        }
        Registration::Degraded { rewritten } => {
            log::info!("{} widget(s) rewritten as plain embeds", rewritten.len());
        }
    }

    let widgets = host.widget_ids();
    for n in &cli.activate {
        let Some(&id) = n.checked_sub(1).and_then(|i| widgets.get(i)) else {
            bail!("--activate {n}: page has {} widget(s)", widgets.len());
        };
        if !host.click(id) {
            log::warn!("widget {n} did not activate");
        }
    }

    if let Some(ms) = cli.timing {
        host.report_timing(
            ReadyState::Complete,
            NavigationTiming {
                dom_complete_ms: ms,
            },
        );
    }

    if cli.outline {
        for line in host.outline(usize::MAX) {
            println!("{line}");
        }
    } else {
        println!("{}", host.render());
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut markup = String::new();
            std::io::stdin()
                .read_to_string(&mut markup)
                .context("reading stdin")?;
            Ok(markup)
        }
    }
}

fn load_options(cli: &Cli) -> Result<WidgetOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            WidgetOptions::from_toml_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => WidgetOptions::default(),
    };
    if let Some(tag) = &cli.tag {
        options.tag_name = tag.clone();
    }
    Ok(options)
}

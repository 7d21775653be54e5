//! nirlens - stage an image, submit it to the NIR detection service, and
//! review the detections.
//!
//! One invocation drives one analysis pass:
//! 1. Stage the image (picker or drop semantics)
//! 2. POST it to `{base}/predict` as multipart form data
//! 3. Render the projected result
//! 4. Optionally save the annotated image

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use nirlens::notify::{Notifier, NotifyMode};
use nirlens::render;
use nirlens::theme::{Theme, ThemeMode};
use nirlens::{ClientConfig, PredictClient, UploadWorkflow};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Submit an image to the NIR object-detection service"
)]
struct Args {
    /// Image file to analyze.
    image: PathBuf,

    /// Base URL of the inference service. Overrides the config file.
    #[arg(long, env = "NIRLENS_BASE_URL")]
    base_url: Option<String>,

    /// Treat the image as dropped rather than picked. Affects only the
    /// rejection wording, as in the original upload surface.
    #[arg(long)]
    dropped: bool,

    /// Save the annotated image (as annotated_image.jpg) after a
    /// successful detection.
    #[arg(long)]
    save: bool,

    /// Directory the annotated image is saved under.
    #[arg(long, env = "NIRLENS_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Color scheme: 'light' or 'dark'.
    #[arg(long, env = "NIRLENS_THEME", default_value = "light")]
    theme: String,

    /// Notice style: 'auto', 'plain', or 'pretty'.
    #[arg(long, default_value = "auto")]
    ui: String,

    /// Print the projected result as JSON instead of the rendered summary.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = ClientConfig::load()?;
    if let Some(base_url) = &args.base_url {
        config.set_base_url(base_url)?;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }

    let theme_mode = match args.theme.as_str() {
        "light" => ThemeMode::Light,
        "dark" => ThemeMode::Dark,
        other => return Err(anyhow!("unknown theme '{}'; expected light or dark", other)),
    };
    let theme = Theme::new(theme_mode, std::io::stdout().is_terminal());

    let notify_mode = match args.ui.as_str() {
        "plain" => NotifyMode::Plain,
        "pretty" => NotifyMode::Pretty,
        _ => NotifyMode::Auto,
    };
    let mut notifier = Notifier::new(notify_mode, std::io::stderr().is_terminal());

    log::info!("nirlens demo client");
    log::info!("  endpoint: {}/predict", config.base_url);
    log::info!("  image: {}", args.image.display());
    if let Some(timeout) = config.request_timeout {
        log::info!("  request timeout: {}s", timeout.as_secs());
    }

    let client = PredictClient::new(&config.base_url, config.request_timeout);
    let mut workflow = UploadWorkflow::new(client);

    if args.dropped {
        workflow.drop_file(&args.image, &mut notifier)?;
    } else {
        workflow.select_file(&args.image, &mut notifier)?;
    }

    workflow.submit(&mut notifier)?;

    if let Some(result) = workflow.result() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else {
            print!(
                "{}",
                render::render_result(result, workflow.last_elapsed(), &theme)
            );
        }
    }

    if args.save {
        let path = workflow.download(&config.output_dir, &mut notifier)?;
        log::info!("annotated image saved to {}", path.display());
    }

    Ok(())
}

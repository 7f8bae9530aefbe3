//! CLI logic for the Sowchart flowchart viewer.
//!
//! The CLI performs the bootstrap sequence a front end would: load the
//! configuration and corpus (an explicit `--corpus`, else `products.toml`
//! beside the configuration file, else the bundled one), bring up the configured diagram engine behind the
//! readiness signal, launch the selection controller, then drive it from the
//! chosen subcommand.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, FormatArg};

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{info, warn};

use sowchart::{
    FailureKind, SowchartError,
    config::{AppConfig, EngineConfig, EngineKind},
    controller::{ControllerBuilder, SelectionController},
    corpus::Corpus,
    export::{DirectoryTarget, ResvgSnapshotter},
    filename::ExportFormat,
    notice::{Notice, Notifier},
    readiness::{self, EngineSignal},
    render::{CommandEngine, Engine, NativeEngine, RenderOutcome},
    view::{ENGINE_UNAVAILABLE_MESSAGE, RENDER_FAILED_MESSAGE},
};

type Controller = SelectionController<Engine, ResvgSnapshotter>;

/// Prints user-facing notices on stderr.
#[derive(Debug, Default, Clone, Copy)]
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{notice}");
    }
}

/// Run the Sowchart CLI application
///
/// # Errors
///
/// Returns `SowchartError` for:
/// - Configuration or corpus loading errors
/// - Unknown product ids
/// - Render failures (the engine rejected the source or is unavailable)
/// - Export errors
pub async fn run(args: &Args) -> Result<(), SowchartError> {
    let settings = config::load_settings(args.config.as_deref().map(Path::new))?;
    let corpus_path = args
        .corpus
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| settings.sibling_corpus());
    let corpus = Arc::new(load_corpus(corpus_path.as_deref())?);
    let app_config = settings.config;
    info!(products = corpus.len(); "Corpus loaded");

    match &args.command {
        Command::List => {
            for product in corpus.all() {
                println!(
                    "{:<16} {:<24} {}",
                    product.id(),
                    product.name(),
                    product.description()
                );
            }
            Ok(())
        }
        Command::Show { product } => {
            let controller = launch(corpus, &app_config, None).await?;
            let outcome = select(&controller, product).await;
            print_page(&controller);
            outcome
        }
        Command::Export {
            product,
            format,
            out_dir,
        } => {
            let controller = launch(corpus, &app_config, out_dir.as_ref().map(PathBuf::from)).await?;
            select(&controller, product).await?;
            for export_format in format.formats() {
                let download = match export_format {
                    ExportFormat::Svg => controller.export_vector()?,
                    ExportFormat::Png => controller.export_raster().await?,
                };
                println!("{}", download.location.display());
            }
            Ok(())
        }
    }
}

fn load_corpus(path: Option<&Path>) -> Result<Corpus, SowchartError> {
    match path {
        Some(path) => {
            info!(path = path.display().to_string(); "Loading corpus");
            let text = fs::read_to_string(path)?;
            Ok(Corpus::from_toml(&text)?)
        }
        None => Ok(Corpus::bundled()?),
    }
}

async fn launch(
    corpus: Arc<Corpus>,
    app_config: &AppConfig,
    out_dir: Option<PathBuf>,
) -> Result<Controller, SowchartError> {
    let mut builder =
        ControllerBuilder::new(corpus, app_config)?.with_notifier(Arc::new(ConsoleNotifier));
    if let Some(out_dir) = out_dir {
        builder = builder.with_download_target(Arc::new(DirectoryTarget::new(out_dir)));
    }

    let (signal, ready) = readiness::channel();
    let (controller, ()) = tokio::join!(
        builder.launch(ready, Some(ResvgSnapshotter::new())),
        bring_up_engine(app_config.engine(), signal),
    );
    Ok(controller)
}

/// Resolves the readiness signal with the configured engine.
async fn bring_up_engine(config: &EngineConfig, signal: EngineSignal<Engine>) {
    match config.kind() {
        EngineKind::Native => signal.ready(Engine::Native(NativeEngine::new())),
        EngineKind::Command => {
            match CommandEngine::locate(config.command(), config.args().to_vec()).await {
                Some(engine) => signal.ready(Engine::Command(engine)),
                None => {
                    warn!(command = config.command(); "Diagram engine command not found");
                    signal.absent();
                }
            }
        }
    }
}

async fn select(controller: &Controller, product: &str) -> Result<(), SowchartError> {
    match controller.select_product(product).await {
        None => Err(SowchartError::UnknownProduct(product.to_string())),
        Some(RenderOutcome::Rendered { .. } | RenderOutcome::Superseded) => Ok(()),
        Some(RenderOutcome::Failed) => Err(SowchartError::Render {
            message: RENDER_FAILED_MESSAGE.to_string(),
            kind: FailureKind::MalformedInput,
        }),
        Some(RenderOutcome::Unavailable) => Err(SowchartError::Render {
            message: ENGINE_UNAVAILABLE_MESSAGE.to_string(),
            kind: FailureKind::EnvironmentMissing,
        }),
    }
}

fn print_page(controller: &Controller) {
    let page = controller.page();
    println!("{}", page.title());
    for card in page.cards() {
        let marker = if card.is_active() { '*' } else { ' ' };
        println!("{marker} {:<16} {}", card.id(), card.name());
    }
    println!("{}", controller.region().markup());
}

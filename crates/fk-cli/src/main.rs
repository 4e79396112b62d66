//! Furniture Kit entry point
//!
//! Builds the design from a parameter file (or the built-in table), solves
//! it and writes the solved scene as RON.

use std::path::PathBuf;

use anyhow::Context;
use fk_core::fk_cad::{MateSolver, PrismKernel};
use fk_core::{CutList, Design, DesignParams, RonSink, Scene, SceneSink, check_interference};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Cli {
    /// RON parameter file; the built-in table is used when omitted
    params: Option<PathBuf>,

    /// Where to write the solved scene
    #[arg(short, long, default_value = "design.ron")]
    output: PathBuf,

    /// Largest mate residual accepted by the solver
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f32,
}

impl Cli {
    fn run(self) -> anyhow::Result<()> {
        let params = match &self.params {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading parameters");
                let context = || format!("failed to load parameters from {}", path.display());
                DesignParams::load(path).with_context(context)?
            }
            None => DesignParams::default(),
        };

        let kernel = PrismKernel::new();
        let solver = MateSolver::new().with_tolerance(self.tolerance);
        let design =
            Design::build_with(&kernel, &solver, &params).context("failed to build design")?;

        let cut_list = CutList::from_assembly(&kernel, &design.assembly);
        for line in cut_list.to_string().lines() {
            tracing::info!("{}", line);
        }

        let interferences = check_interference(&design.assembly);
        if interferences.is_empty() {
            tracing::info!("No interferences");
        } else {
            tracing::warn!(count = interferences.len(), "Design has interfering parts");
        }

        let scene = Scene::from_assembly(&design.assembly);
        let output = self.output.display();
        let mut sink =
            RonSink::create(&self.output).with_context(|| format!("failed to create {output}"))?;
        sink.write_scene(&scene)
            .with_context(|| format!("failed to write {output}"))?;

        tracing::info!(
            parts = scene.root.part_count(),
            output = %output,
            "Design exported"
        );
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    use clap::Parser;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fk_cli=info,fk_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Furniture Kit");

    cli.run()
}

mod args;
mod logging;

use std::{ops::ControlFlow, path::Path, process::ExitCode, sync::Arc, time::Instant};

use ansi_term::Colour;
use args::{InputArgs, OutputArgs};
use clap::Parser;
use sugar_path::SugarPath;
use tapack::{
  BuildResult, BundlerOptions, Compiler, LoggingPlugin, OsFileSystem, OutputOptions,
  ResolveOptions, Stats, StatsAsset,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,

  /// Rebuild whenever a bundled file changes.
  #[clap(long, short)]
  watch: bool,

  /// A `tracing` filter such as `info` or `tapack=debug`. Overrides `TAPACK_LOG`.
  #[clap(long)]
  log_level: Option<String>,
}

fn print_output_assets(output_path: &Path, assets: &[StatsAsset]) {
  let left = assets.iter().map(|asset| asset.filename.len()).max().unwrap_or_default();
  let sizes =
    assets.iter().map(|asset| format!("{:.2}", asset.size as f64 / 1024.0)).collect::<Vec<_>>();
  let right = sizes.iter().map(String::len).max().unwrap_or_default();

  let dim = Colour::White.dimmed();
  let color = Colour::Cyan;
  let dir = format!("{}/", output_path.display());

  for (asset, size) in assets.iter().zip(sizes) {
    println!(
      "{}{}{:left$} {}{:right$}{} kB",
      dim.paint(&dir),
      color.paint(&asset.filename),
      "",
      dim.paint("chunk │ size: "),
      "",
      size,
      left = left - asset.filename.len(),
      right = right - size.len()
    );
  }
}

fn report(output_path: &Path, result: &BuildResult<Stats>) {
  match result {
    Ok(stats) => print_output_assets(output_path, &stats.assets),
    Err(errors) => {
      for error in &**errors {
        println!("{} {error:#}", Colour::Red.paint("Error:"));
      }
    }
  }
}

#[tokio::main]
async fn main() -> ExitCode {
  let args = Commands::parse();
  logging::init_logging(args.log_level.as_deref());

  let context = args.input.context.as_deref().unwrap_or(Path::new(".")).absolutize();
  let options = BundlerOptions {
    entry: Some(args.input.entry_option()),
    context: Some(context),
    output: Some(OutputOptions { path: args.output.dir, filename: args.output.filename }),
    resolve: Some(ResolveOptions { extensions: args.input.extensions }),
    ..Default::default()
  };

  let compiler = match Compiler::with_plugins(
    options,
    Arc::new(OsFileSystem),
    vec![Arc::new(LoggingPlugin)],
  ) {
    Ok(compiler) => compiler,
    Err(errors) => {
      report(Path::new(""), &Err(errors));
      return ExitCode::FAILURE;
    }
  };
  let output_path = compiler.options().output_path.clone();

  if args.watch {
    let watched = compiler
      .watch(|result| {
        report(&output_path, result);
        if result.is_ok() {
          println!("\n{} Watching for changes", Colour::Green.paint("✔"));
        }
        ControlFlow::Continue(())
      })
      .await;
    return if watched.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE };
  }

  let start = Instant::now();
  let result = compiler.run().await;
  report(&output_path, &result);
  if result.is_err() {
    return ExitCode::FAILURE;
  }

  let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
  println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
  ExitCode::SUCCESS
}

//! Trains the digit classifier on MNIST.
//!
//! Usage:
//!   backprop-nn [DATA_DIR] [--config train.json] [--spec net.json]
//!
//! `DATA_DIR` (default `mnist`) must hold the four standard IDX files.
//! Set `RUST_LOG=info` for per-epoch progress, `RUST_LOG=debug` for batch losses.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;

use backprop_nn::{train_loop, Dataset, NetworkSpec, RandomSource, TrainConfig};

const N_CLASSES: usize = 10;

struct Args {
    data_dir: PathBuf,
    config: Option<String>,
    spec: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { data_dir: PathBuf::from("mnist"), config: None, spec: None };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(it.next().context("--config needs a path")?),
            "--spec" => args.spec = Some(it.next().context("--spec needs a path")?),
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            dir => args.data_dir = PathBuf::from(dir),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => TrainConfig::load_json(path).with_context(|| format!("loading {path}"))?,
        None => TrainConfig::default(),
    };

    let dir = &args.data_dir;
    let train_set = Dataset::load(
        dir.join("train-images-idx3-ubyte"),
        dir.join("train-labels-idx1-ubyte"),
        N_CLASSES,
    )
    .context("loading training set")?;
    let test_set = Dataset::load(
        dir.join("t10k-images-idx3-ubyte"),
        dir.join("t10k-labels-idx1-ubyte"),
        N_CLASSES,
    )
    .context("loading test set")?;

    let spec = match &args.spec {
        Some(path) => NetworkSpec::load_json(path).with_context(|| format!("loading {path}"))?,
        None => NetworkSpec::classifier(train_set.input_size(), N_CLASSES),
    };

    let mut rng = RandomSource::from_seed(0.0, 1.0, config.seed)?;
    let mut network = spec.build(&mut rng)?;
    info!("built network '{}' with {} layers", spec.name, network.layers().len());

    let history = train_loop(&mut network, &train_set, Some(&test_set), &config)?;
    for stats in &history {
        let test = stats.test.map_or(String::from("-"), |t| {
            format!("loss {:.4} error {:.4}", t.mean_loss, t.error_rate)
        });
        println!(
            "epoch {:>3}  lr {:.4}  train loss {:.4} error {:.4}  test {}",
            stats.epoch, stats.learning_rate, stats.train.mean_loss, stats.train.error_rate, test
        );
    }
    Ok(())
}

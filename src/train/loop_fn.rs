use std::time::Instant;

use log::{debug, info};

use crate::data::idx::Dataset;
use crate::error::{NetError, Result};
use crate::network::network::{argmax, Network};
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::{EpochStats, PassStats};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the statistics of
/// every completed epoch.
///
/// Each epoch trains on `train_set` in order, then evaluates `test_set`
/// (forward only) when given. If an epoch's mean training loss is worse than
/// the previous epoch's, the learning rate is multiplied by
/// `config.decay_factor`.
pub fn train_loop(
    network: &mut Network,
    train_set: &Dataset,
    test_set: Option<&Dataset>,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    config.validate()?;
    let mut sgd = Sgd::new(config.learning_rate)?;
    let mut prev_loss = f64::MAX;
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        info!("running epoch {epoch}");
        let t_start = Instant::now();
        let learning_rate = sgd.learning_rate;

        let train = run_epoch(network, train_set, &sgd, config.batch_size, true)?;
        info!(
            "epoch {epoch}: train mean loss {:.4}, error rate {:.4}",
            train.mean_loss, train.error_rate
        );

        let test = match test_set {
            Some(set) => {
                let stats = run_epoch(network, set, &sgd, config.batch_size, false)?;
                info!(
                    "epoch {epoch}: test mean loss {:.4}, error rate {:.4}",
                    stats.mean_loss, stats.error_rate
                );
                Some(stats)
            }
            None => None,
        };

        if prev_loss < train.mean_loss {
            info!("mean loss {:.4} is worse than previous {:.4}", train.mean_loss, prev_loss);
            sgd.decay(config.decay_factor);
        }
        prev_loss = train.mean_loss;

        history.push(EpochStats {
            epoch,
            train,
            test,
            learning_rate,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        });
    }

    Ok(history)
}

/// Runs one pass over `dataset` in order.
///
/// Every sample is forwarded, classified by argmax and scored with
/// cross-entropy. With `train` set, each sample is also backpropagated and
/// `optimizer` flushes the accumulated gradient after every `batch_size`
/// samples and once more after the last sample.
pub fn run_epoch(
    network: &mut Network,
    dataset: &Dataset,
    optimizer: &Sgd,
    batch_size: usize,
    train: bool,
) -> Result<PassStats> {
    if dataset.is_empty() {
        return Err(NetError::Dataset("cannot run a pass over an empty dataset".into()));
    }
    if batch_size == 0 {
        return Err(NetError::InvalidConfig("batch_size must be at least 1".into()));
    }

    let n = dataset.len();
    let mut wrong = 0usize;
    let mut total_loss = 0.0;
    let mut batch_loss = 0.0;
    let mut in_batch = 0usize;
    let mut batch_id = 0usize;

    for sample in 0..n {
        let target = dataset.target(sample);
        let output = network.forward(&dataset.input(sample))?;
        if argmax(&output) != dataset.label(sample) as usize {
            wrong += 1;
        }

        let loss = network.calc_loss(&target)?;
        total_loss += loss;

        if train {
            network.backward(&target)?;
            batch_loss += loss;
            in_batch += 1;
            if in_batch == batch_size || sample + 1 == n {
                debug!("batch loss[{batch_id}]: {:.4}", batch_loss / in_batch as f64);
                optimizer.step(network);
                batch_loss = 0.0;
                in_batch = 0;
                batch_id += 1;
            }
        }
    }

    Ok(PassStats {
        mean_loss: total_loss / n as f64,
        error_rate: wrong as f64 / n as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::data::idx::encode_idx;
    use crate::math::rng::RandomSource;

    /// Two 2x2 "images": bright top row is class 0, bright bottom row class 1.
    fn toy_set() -> Dataset {
        let images: Vec<Vec<u8>> = (0..8)
            .map(|i| if i % 2 == 0 { vec![250, 240, 5, 10] } else { vec![8, 3, 245, 250] })
            .collect();
        let labels: Vec<u8> = (0..8).map(|i| (i % 2) as u8).collect();
        let (img, lbl) = encode_idx(2, 2, &images, &labels);
        Dataset::parse(&img, &lbl, 2).unwrap()
    }

    fn toy_net() -> Network {
        let mut rng = RandomSource::seeded(0.0, 1.0, 17).unwrap();
        let mut net = Network::new(false);
        net.add_dense(4, 3, ActivationFunction::ReLU, &mut rng).unwrap();
        net.add_dense(3, 2, ActivationFunction::Softmax, &mut rng).unwrap();
        net
    }

    #[test]
    fn evaluation_pass_leaves_weights_alone() {
        let mut net = toy_net();
        let before: Vec<_> = net.layers().iter().map(|l| l.weights().clone()).collect();
        let sgd = Sgd::new(0.5).unwrap();
        let stats = run_epoch(&mut net, &toy_set(), &sgd, 3, false).unwrap();
        let after: Vec<_> = net.layers().iter().map(|l| l.weights().clone()).collect();
        assert_eq!(before, after);
        assert!(stats.mean_loss > 0.0);
        assert!((0.0..=1.0).contains(&stats.error_rate));
    }

    #[test]
    fn training_pass_flushes_every_batch() {
        let mut net = toy_net();
        let sgd = Sgd::new(0.5).unwrap();
        // 8 samples with batch 3: the trailing partial batch is flushed too
        run_epoch(&mut net, &toy_set(), &sgd, 3, true).unwrap();
        assert!(net.layers().iter().all(|l| l.sample_count() == 0));
    }

    #[test]
    fn training_reduces_loss_on_separable_data() {
        let mut net = toy_net();
        let set = toy_set();
        let config = TrainConfig { epochs: 30, batch_size: 2, learning_rate: 0.5, ..TrainConfig::default() };
        let history = train_loop(&mut net, &set, Some(&set), &config).unwrap();
        assert_eq!(history.len(), 30);
        let first = history[0].train.mean_loss;
        let last = history[29].train.mean_loss;
        assert!(last < first, "loss did not fall: {first} -> {last}");
        assert!(history[29].test.is_some());
    }

    #[test]
    fn rejects_empty_dataset() {
        let (img, lbl) = encode_idx(2, 2, &[], &[]);
        let empty = Dataset::parse(&img, &lbl, 2).unwrap();
        let mut net = toy_net();
        let sgd = Sgd::new(0.1).unwrap();
        assert!(run_epoch(&mut net, &empty, &sgd, 1, true).is_err());
    }
}

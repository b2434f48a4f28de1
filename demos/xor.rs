use backprop_nn::{ActivationFunction, Network, RandomSource, Sgd};

fn main() -> backprop_nn::Result<()> {
    env_logger::init();

    let mut rng = RandomSource::seeded(-1.0, 1.0, 7)?;
    let mut network = Network::new(false);
    network.add_dense(2, 8, ActivationFunction::Swish, &mut rng)?;
    network.add_dense(8, 2, ActivationFunction::Softmax, &mut rng)?;

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    // one-hot: [false, true]
    let targets = vec![
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ];

    let optimizer = Sgd::new(0.5)?;
    let epochs = 5000;

    for epoch in 0..epochs {
        let mut loss = 0.0;
        for (input, target) in inputs.iter().zip(targets.iter()) {
            network.forward(input)?;
            loss += network.calc_loss(target)?;
            network.backward(target)?;
        }
        optimizer.step(&mut network);
        if epoch % 500 == 0 {
            println!("Epoch {epoch}: loss = {:.6}", loss / inputs.len() as f64);
        }
    }

    for input in &inputs {
        let output = network.forward(input)?;
        println!("Input: {:?} -> P(true) = {:.4}", input, output[1]);
    }
    Ok(())
}

// Tests for the activation variants: value ranges, the preserved sigmoid
// sign convention and behaviour on extreme inputs.

use approx::assert_relative_eq;

use backprop_nn::activation::activation::{sigmoid, softmax, swish};
use backprop_nn::ActivationFunction;

fn sweep() -> Vec<f64> {
    (-40..=40).map(|i| i as f64 * 0.37).collect()
}

#[test]
fn relu_is_non_negative_and_identity_above_zero() {
    let xs = sweep();
    let out = ActivationFunction::ReLU.activation(&xs);
    for (&x, &y) in xs.iter().zip(&out) {
        assert!(y >= 0.0);
        if x > 0.0 {
            assert_eq!(y, x);
        } else {
            assert_eq!(y, 0.0);
        }
    }
}

#[test]
fn softmax_is_a_distribution() {
    let vectors = vec![
        vec![0.0],
        vec![1.0, 2.0, 3.0],
        vec![-5.0, 0.0, 5.0, 10.0],
        vec![700.0, 710.0, -300.0],
        vec![-1e4, -1e4 + 1.0],
        sweep(),
    ];
    for v in vectors {
        let p = softmax(&v);
        assert_eq!(p.len(), v.len());
        assert_relative_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(p.iter().all(|&x| x > 0.0 && x <= 1.0), "{p:?}");
    }
}

#[test]
fn softmax_is_shift_invariant() {
    let a = softmax(&[0.1, 0.5, -0.3]);
    let b = softmax(&[100.1, 100.5, 99.7]);
    for (x, y) in a.iter().zip(&b) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12);
    }
}

#[test]
fn sigmoid_decreases_with_input() {
    // 1 / (1 + e^x) is a decreasing function
    let xs = sweep();
    let ys = ActivationFunction::Sigmoid.activation(&xs);
    assert!(ys.windows(2).all(|w| w[0] >= w[1]));
    assert_relative_eq!(sigmoid(-3.0) + sigmoid(3.0), 1.0, epsilon = 1e-12);
}

#[test]
fn gradients_are_finite_over_wide_range() {
    let xs: Vec<f64> = vec![-1000.0, -50.0, -1.0, 0.0, 1.0, 50.0, 1000.0];
    for act in [
        ActivationFunction::ReLU,
        ActivationFunction::Sigmoid,
        ActivationFunction::Swish,
        ActivationFunction::Softmax,
    ] {
        for g in act.gradient(&xs) {
            assert!(g.is_finite(), "{act:?} gradient not finite");
        }
        for y in act.activation(&xs) {
            assert!(y.is_finite(), "{act:?} activation not finite");
        }
    }
}

#[test]
fn swish_matches_definition() {
    for x in sweep() {
        assert_relative_eq!(swish(x), x * sigmoid(x));
    }
}

#[test]
fn activation_kind_serializes_by_name() {
    let kinds = [
        ActivationFunction::ReLU,
        ActivationFunction::Sigmoid,
        ActivationFunction::Swish,
        ActivationFunction::Softmax,
    ];
    let json = serde_json::to_string(&kinds).unwrap();
    assert_eq!(json, r#"["ReLU","Sigmoid","Swish","Softmax"]"#);
}

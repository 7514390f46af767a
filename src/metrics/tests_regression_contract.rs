use super::*;
use crate::primitives::Vector;

#[test]
fn test_r2_perfect() {
    let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let r2 = r_squared(&y, &y).expect("same length");
    assert!((r2 - 1.0).abs() < 1e-12);
}

#[test]
fn test_r2_upper_bound() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let y_pred = Vector::from_slice(&[1.1, 2.2, 2.8, 4.1, 4.9]);
    let r2 = r_squared(&y_true, &y_pred).expect("same length");
    assert!(r2 <= 1.0);
    assert!(r2 > 0.9);
}

#[test]
fn test_r2_negative_for_bad_predictions() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let y_pred = Vector::from_slice(&[10.0, 20.0, 30.0, 40.0, 50.0]);
    let r2 = r_squared(&y_true, &y_pred).expect("same length");
    assert!(r2 < 0.0, "R²={r2} should be negative for predictions worse than the mean");
}

#[test]
fn test_r2_mean_prediction_is_zero() {
    let y_true = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let y_pred = Vector::from_slice(&[2.0, 2.0, 2.0]);
    let r2 = r_squared(&y_true, &y_pred).expect("same length");
    assert!(r2.abs() < 1e-12);
}

#[test]
fn test_r2_constant_target() {
    let y_true = Vector::from_slice(&[4.0, 4.0]);
    assert_eq!(r_squared(&y_true, &y_true).expect("same length"), 1.0);
    let off = Vector::from_slice(&[4.0, 5.0]);
    assert_eq!(r_squared(&y_true, &off).expect("same length"), 0.0);
}

#[test]
fn test_mse_known_value() {
    let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
    let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
    let err = mse(&y_true, &y_pred).expect("same length");
    assert!((err - 0.375).abs() < 1e-12);
}

#[test]
fn test_mse_non_negative_and_zero_on_match() {
    let y = Vector::from_slice(&[-1.0, 0.0, 1.0]);
    assert_eq!(mse(&y, &y).expect("same length"), 0.0);
}

#[test]
fn test_length_mismatch_is_error() {
    let a = Vector::from_slice(&[1.0, 2.0]);
    let b = Vector::from_slice(&[1.0]);
    assert!(matches!(
        mse(&a, &b),
        Err(RegsimError::DimensionMismatch { .. })
    ));
    assert!(r_squared(&a, &b).is_err());
}

#[test]
fn test_empty_is_error() {
    let e: Vector<f64> = Vector::from_vec(vec![]);
    assert!(matches!(mse(&e, &e), Err(RegsimError::EmptyInput(_))));
}

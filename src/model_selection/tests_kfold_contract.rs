use super::*;
use crate::linear_model::LinearRegression;
use crate::tree::RandomForestRegressor;

#[test]
fn test_kfold_produces_k_splits() {
    let splits = KFold::new(5).split(100).expect("valid split");
    assert_eq!(splits.len(), 5);
}

#[test]
fn test_kfold_every_sample_in_one_test_fold() {
    let splits = KFold::new(5).split(23).expect("valid split");

    let mut test_counts = vec![0usize; 23];
    for (train, test) in &splits {
        assert_eq!(train.len() + test.len(), 23);
        for &idx in test {
            test_counts[idx] += 1;
        }
    }
    assert!(test_counts.iter().all(|&c| c == 1));
}

#[test]
fn test_kfold_unshuffled_is_contiguous_with_remainder_first() {
    let splits = KFold::new(3).split(7).expect("valid split");
    assert_eq!(splits[0].1, vec![0, 1, 2]);
    assert_eq!(splits[1].1, vec![3, 4]);
    assert_eq!(splits[2].1, vec![5, 6]);
    assert_eq!(splits[1].0, vec![0, 1, 2, 5, 6]);
}

#[test]
fn test_kfold_rejects_too_few_samples() {
    assert!(matches!(
        KFold::new(5).split(4),
        Err(RegsimError::InvalidHyperparameter { .. })
    ));
    assert!(KFold::new(1).split(10).is_err());
}

#[test]
fn test_cross_validate_linear_perfect_fit() {
    let x = Matrix::from_vec(20, 1, (0..20).map(f64::from).collect()).expect("20x1");
    let y = Vector::from_vec((0..20).map(|i| 3.0 * f64::from(i) - 2.0).collect());

    let result = cross_validate(&LinearRegression::new(), &x, &y, &KFold::new(5))
        .expect("cross-validation should succeed");
    assert_eq!(result.scores.len(), 5);
    assert!(result.mean() > 0.999);
    assert!(result.std() < 1e-6);
}

#[test]
fn test_cross_validate_propagates_fit_errors() {
    // Two rows per training fold cannot support an intercept and two features.
    let x = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 7.0]).expect("3x2");
    let y = Vector::from_slice(&[1.0, 2.0, 3.0]);
    assert!(cross_validate(&LinearRegression::new(), &x, &y, &KFold::new(3)).is_err());
}

#[test]
fn test_grid_search_reports_every_candidate() {
    let x = Matrix::from_vec(30, 1, (0..30).map(f64::from).collect()).expect("30x1");
    let y = Vector::from_vec((0..30).map(|i| f64::from(i % 7)).collect());

    let result = grid_search(
        &[1usize, 2, 3, 4],
        |&n| RandomForestRegressor::new(n).with_random_state(0),
        &x,
        &y,
        &KFold::new(5),
    )
    .expect("grid search should succeed");

    assert_eq!(result.params, vec![1, 2, 3, 4]);
    assert_eq!(result.scores.len(), 4);
    let best = result.best_index();
    assert_eq!(result.best_param, result.params[best]);
    assert!(result.scores.iter().all(|&s| s <= result.best_score));
}

#[test]
fn test_grid_search_ties_keep_first() {
    let result = GridSearchResult {
        best_param: 0,
        best_score: 0.0,
        params: vec![1, 2, 3],
        scores: vec![0.5, 0.7, 0.7],
    };
    assert_eq!(result.best_index(), 1);
}

#[test]
fn test_grid_search_empty_is_error() {
    let x = Matrix::from_vec(10, 1, (0..10).map(f64::from).collect()).expect("10x1");
    let y = Vector::from_vec((0..10).map(f64::from).collect());
    let empty: [usize; 0] = [];
    assert!(matches!(
        grid_search(&empty, |&n| RandomForestRegressor::new(n), &x, &y, &KFold::new(5)),
        Err(RegsimError::EmptyInput(_))
    ));
}

use super::*;
use crate::dgp::{LinearDgp, NonLinearDgp};
use crate::linear_model::LinearRegression;

/// Adapter that fails once it reaches a given training size.
struct FailingAdapter {
    fail_at_size: usize,
}

impl ModelAdapter for FailingAdapter {
    fn name(&self) -> &str {
        "linearRegression"
    }

    fn fit(&self, x: &Matrix<f64>, y: &Vector<f64>, _seed: u64) -> Result<Box<dyn FittedModel>> {
        if x.n_rows() >= self.fail_at_size {
            return Err(RegsimError::SingularMatrix {
                context: "injected failure".into(),
            });
        }
        let mut model = LinearRegression::new();
        model.fit(x, y)?;
        Ok(Box::new(model))
    }
}

fn linear_sim(sizes: Vec<usize>) -> MonteCarloSimulation {
    MonteCarloSimulation::new(Box::new(LinearDgp::new()), sizes).expect("positive sizes")
}

#[test]
fn test_new_rejects_zero_size() {
    let err = MonteCarloSimulation::new(Box::new(LinearDgp::new()), vec![100, 0])
        .expect_err("zero size must be rejected");
    assert!(matches!(err, RegsimError::InvalidConfig(_)));
}

#[test]
fn test_new_rejects_empty_sizes() {
    assert!(MonteCarloSimulation::new(Box::new(LinearDgp::new()), vec![]).is_err());
}

#[test]
fn test_results_follow_sample_size_order() {
    let mut sim = linear_sim(vec![200, 50, 100]);
    sim.simulate(&OlsAdapter::new(), 2, Evaluation::Rss)
        .expect("simulate should succeed");

    let rss = sim.results().get("linearRegression").expect("present");
    assert_eq!(rss.len(), 3);
    assert_eq!(sim.sample_sizes(), &[200, 50, 100]);
}

#[test]
fn test_rss_is_near_noise_variance_for_ols_on_linear() {
    let mut sim = linear_sim(vec![1000]);
    sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss)
        .expect("simulate should succeed");

    let rss = sim.results().get("linearRegression").expect("present")[0];
    // Unit-variance noise; a well-specified OLS fit should land close to 1.
    assert!(rss > 0.4 && rss < 2.0, "rss = {rss}");
}

#[test]
fn test_r2_is_high_for_ols_on_linear() {
    let mut sim = linear_sim(vec![500]);
    sim.simulate(&OlsAdapter::new(), 2, Evaluation::R2)
        .expect("simulate should succeed");

    let r2 = sim.results().get("linearRegression").expect("present")[0];
    assert!(r2 > 0.99, "r2 = {r2}");
}

#[test]
fn test_single_iteration_mean_equals_raw_score() {
    let mut sim = linear_sim(vec![80]);
    sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss)
        .expect("simulate should succeed");
    let aggregate = sim.results().get("linearRegression").expect("present")[0];

    let dgp = LinearDgp::new();
    let test = dgp.generate(80, DEFAULT_TEST_SIZE).expect("n > 0");
    let train = dgp.generate(0, 80).expect("n > 0");
    let model = OlsAdapter::new()
        .fit(&train.x, &train.y, 0)
        .expect("fit should succeed");
    let raw = Evaluation::Rss
        .score(model.as_ref(), &test)
        .expect("score should succeed");

    assert_eq!(aggregate, raw);
}

#[test]
fn test_simulation_is_deterministic() {
    let run = || {
        let mut sim = linear_sim(vec![100, 1000]);
        sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss)
            .expect("simulate should succeed");
        sim.into_results()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_resimulate_replaces_entry() {
    let mut sim = linear_sim(vec![60, 120]);
    sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss)
        .expect("simulate should succeed");
    sim.simulate(&OlsAdapter::new(), 2, Evaluation::R2)
        .expect("simulate should succeed");

    assert_eq!(sim.results().len(), 1);
    let r2 = sim.results().get("linearRegression").expect("present");
    assert_eq!(r2.len(), 2);
    assert!(r2.iter().all(|&v| v > 0.9));
}

#[test]
fn test_failure_leaves_previous_entry_untouched() {
    let mut sim = linear_sim(vec![50, 500]);
    sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss)
        .expect("simulate should succeed");
    let before = sim.results().clone();

    let err = sim
        .simulate(&FailingAdapter { fail_at_size: 500 }, 1, Evaluation::Rss)
        .expect_err("second size fails");
    assert!(matches!(err, RegsimError::SingularMatrix { .. }));
    assert_eq!(sim.results(), &before);
}

#[test]
fn test_failure_on_fresh_method_records_nothing() {
    let mut sim = linear_sim(vec![50]);
    assert!(sim
        .simulate(&FailingAdapter { fail_at_size: 1 }, 1, Evaluation::R2)
        .is_err());
    assert!(sim.results().is_empty());
}

#[test]
fn test_ols_needs_more_rows_than_features() {
    // Three features plus an intercept need at least four training rows.
    let mut sim = linear_sim(vec![3]);
    assert!(matches!(
        sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss),
        Err(RegsimError::InvalidHyperparameter { ref param, .. }) if param == "n_samples"
    ));
    assert!(sim.results().is_empty());

    let mut sim = linear_sim(vec![4]);
    sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss)
        .expect("four rows determine the fit");
}

#[test]
fn test_zero_simulations_is_error() {
    let mut sim = linear_sim(vec![50]);
    assert!(matches!(
        sim.simulate(&OlsAdapter::new(), 0, Evaluation::R2),
        Err(RegsimError::InvalidHyperparameter { .. })
    ));
}

#[test]
fn test_history_records_every_fit() {
    let mut sim = linear_sim(vec![30, 40]);
    sim.simulate(&OlsAdapter::new(), 3, Evaluation::R2)
        .expect("simulate should succeed");

    assert_eq!(sim.history().len(), 6);
    let last = sim.history().last().expect("non-empty");
    assert_eq!(last.sample_size, 40);
    assert_eq!(last.iteration, 2);
    assert_eq!(last.method, "linearRegression");
}

/// Adapter that refuses one training seed.
struct SeedFailingAdapter {
    seed: u64,
}

impl ModelAdapter for SeedFailingAdapter {
    fn name(&self) -> &str {
        "linearRegression"
    }

    fn fit(&self, x: &Matrix<f64>, y: &Vector<f64>, seed: u64) -> Result<Box<dyn FittedModel>> {
        if seed == self.seed {
            return Err(RegsimError::EmptyInput(format!("refusing seed {seed}")));
        }
        OlsAdapter::new().fit(x, y, seed)
    }
}

#[test]
fn test_history_keeps_models_fitted_before_failure() {
    let mut sim = linear_sim(vec![20, 30]);
    assert!(sim
        .simulate(&SeedFailingAdapter { seed: 2 }, 4, Evaluation::Rss)
        .is_err());

    // Size 20 fails at iteration 2, after two models were fitted.
    assert_eq!(sim.history().len(), 2);
    let last = sim.history().last().expect("non-empty");
    assert_eq!(last.sample_size, 20);
    assert_eq!(last.iteration, 1);
    assert!(sim.results().is_empty());
}

#[test]
fn test_history_capacity_is_respected() {
    let mut sim = linear_sim(vec![30, 40]).with_history_capacity(4);
    sim.simulate(&OlsAdapter::new(), 3, Evaluation::R2)
        .expect("simulate should succeed");

    assert_eq!(sim.history().len(), 4);
    assert_eq!(sim.history().evicted(), 2);
}

#[test]
fn test_custom_test_size() {
    let sim = linear_sim(vec![30]).with_test_size(250);
    assert_eq!(sim.test_size(), 250);
    assert_eq!(sim.dgp_name(), "linearDGP");
}

#[test]
fn test_forest_beats_ols_on_nonlinear() {
    let mut sim =
        MonteCarloSimulation::new(Box::new(NonLinearDgp::new()), vec![300]).expect("positive");
    let forest = RandomForestCv::new().with_max_estimators(3);
    sim.simulate(&forest, 1, Evaluation::Rss)
        .expect("forest simulate should succeed");
    sim.simulate(&OlsAdapter::new(), 1, Evaluation::Rss)
        .expect("ols simulate should succeed");

    let forest_rss = sim.results().get("randomForestCV").expect("present")[0];
    let ols_rss = sim.results().get("linearRegression").expect("present")[0];
    assert!(
        forest_rss < ols_rss,
        "forest {forest_rss} should beat ols {ols_rss}"
    );
    let methods: Vec<&str> = sim.results().methods().collect();
    assert_eq!(methods, vec!["randomForestCV", "linearRegression"]);
}

#[test]
fn test_evaluation_parsing() {
    assert_eq!("R2".parse::<Evaluation>().expect("known"), Evaluation::R2);
    assert_eq!("RSS".parse::<Evaluation>().expect("known"), Evaluation::Rss);
    assert!(matches!(
        "MAE".parse::<Evaluation>(),
        Err(RegsimError::UnsupportedEvaluation(ref mode)) if mode == "MAE"
    ));
    for mode in ["r2", "rss", "Rss", " R2"] {
        assert!(matches!(
            mode.parse::<Evaluation>(),
            Err(RegsimError::UnsupportedEvaluation(_))
        ));
    }
    assert_eq!(Evaluation::Rss.to_string(), "RSS");
    assert!(Evaluation::R2.higher_is_better());
    assert!(!Evaluation::Rss.higher_is_better());
}

#[test]
fn test_method_kind_builds_named_adapters() {
    assert_eq!(MethodKind::Ols.build().name(), "linearRegression");
    assert_eq!(MethodKind::Forest.build().name(), "randomForestCV");
    assert_eq!("forest".parse::<MethodKind>().expect("known"), MethodKind::Forest);
    assert!("svm".parse::<MethodKind>().is_err());
}

#[test]
fn test_forest_cv_rejects_empty_grid() {
    let dgp = NonLinearDgp::new();
    let train = dgp.generate(0, 50).expect("n > 0");
    let adapter = RandomForestCv::new().with_max_estimators(0);
    assert!(adapter.fit(&train.x, &train.y, 0).is_err());
    assert_eq!(RandomForestCv::new().grid(), (1..=10).collect::<Vec<_>>());
}

#[test]
fn test_forest_cv_refit_follows_seed() {
    let dgp = NonLinearDgp::new();
    let train = dgp.generate(0, 60).expect("n > 0");
    let test = dgp.generate(60, 20).expect("n > 0");
    let adapter = RandomForestCv::new().with_max_estimators(2).with_n_folds(3);

    let predict = |seed: u64| {
        adapter
            .fit(&train.x, &train.y, seed)
            .expect("fit should succeed")
            .predict(&test.x)
            .expect("predict should succeed")
    };

    assert_eq!(predict(4), predict(4));
    assert_ne!(predict(4), predict(5));
}

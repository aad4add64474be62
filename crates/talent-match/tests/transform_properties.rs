use proptest::prelude::*;
use proptest::test_runner::Config;
use talent_match::workflows::matching::{tv_match, tv_match_batch};

proptest! {
    #![proptest_config(Config::with_cases(256))]
    #[test]
    fn match_stays_within_bounds(
        value in -1_000.0_f64..1_000.0,
        mean in -500.0_f64..500.0,
        std_dev in 0.01_f64..200.0
    ) {
        let score = tv_match(value, Some(mean), Some(std_dev));
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn value_at_the_mean_is_a_perfect_match(
        mean in -500.0_f64..500.0,
        std_dev in 0.01_f64..200.0
    ) {
        prop_assert_eq!(tv_match(mean, Some(mean), Some(std_dev)), 100.0);
    }

    #[test]
    fn flat_or_undefined_baselines_never_match(value in -1_000.0_f64..1_000.0) {
        prop_assert_eq!(tv_match(value, Some(value), Some(0.0)), 0.0);
        prop_assert_eq!(tv_match(value, None, Some(5.0)), 0.0);
        prop_assert_eq!(tv_match(value, Some(value), None), 0.0);
    }

    #[test]
    fn batch_agrees_with_scalar(
        values in prop::collection::vec(-1_000.0_f64..1_000.0, 0..32),
        mean in -500.0_f64..500.0,
        std_dev in 0.0_f64..200.0
    ) {
        let batch = tv_match_batch(&values, Some(mean), Some(std_dev));
        let scalar: Vec<f64> = values
            .iter()
            .map(|value| tv_match(*value, Some(mean), Some(std_dev)))
            .collect();
        prop_assert_eq!(batch, scalar);
    }
}

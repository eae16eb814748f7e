use proptest::prelude::*;
use shelf_core::config::ShelfConfig;
use shelf_core::constants::MAX_ACTIVITY_HISTORY;

proptest! {
    #[test]
    fn activity_history_within_cap_is_accepted(limit in 1usize..=MAX_ACTIVITY_HISTORY) {
        let mut config = ShelfConfig::default();
        config.storage.activity_history_limit = limit;
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn activity_history_above_cap_is_rejected(limit in (MAX_ACTIVITY_HISTORY + 1)..100_000usize) {
        let mut config = ShelfConfig::default();
        config.storage.activity_history_limit = limit;
        prop_assert!(config.validate().is_err());
    }

    #[test]
    fn decay_base_must_be_positive_and_finite(base in prop::num::f64::ANY) {
        let mut config = ShelfConfig::default();
        config.recommend.decay_base = base;
        let valid = base.is_finite() && base > 0.0;
        prop_assert_eq!(config.validate().is_ok(), valid);
    }
}

//! Global utility functions, publicly re-exported in `prelude.rs`.

pub mod atomic_ops;
pub mod general;
pub mod smoothing;
pub mod timer;
pub mod window;

pub use atomic_ops::AtomicOps;
pub use general::*;
pub use smoothing::*;
pub use timer::TimerThread;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_conversion() {
        let level = 0.5;
        let db = level_to_db(level);
        assert!(within_tolerance(db, -6.020_599_913_279_624, 1e-12));
        assert!(within_tolerance(db_to_level(db), level, 1e-12));
    }

    #[test]
    fn test_floored_conversion() {
        assert_eq!(gain_to_db(0.0), -72.0);
        assert_eq!(gain_to_db(-1.0), -72.0);
        assert_eq!(gain_to_db(f64::NAN), -72.0);
        assert_eq!(gain_to_db(1e-9), -72.0);
        assert_eq!(gain_to_db_floored(1e-9, -48.0), -48.0);
        assert!(within_tolerance(gain_to_db(1.0), 0.0, 1e-12));
    }

    #[test]
    fn test_log_mapping() {
        assert!(within_tolerance(map_from_log10(20.0, 20.0, 20000.0), 0.0, 1e-12));
        assert!(within_tolerance(map_from_log10(20000.0, 20.0, 20000.0), 1.0, 1e-12));
        // one decade of three
        assert!(within_tolerance(map_from_log10(200.0, 20.0, 20000.0), 1.0 / 3.0, 1e-12));
    }

    #[test]
    fn test_range_mapping() {
        assert!(within_tolerance(map(-36.0, 0.0, -72.0, 0.0, 100.0), 50.0, 1e-12));
        assert!(within_tolerance(normalize(5.0, 0.0, 10.0), 0.5, 1e-12));
        assert!(within_tolerance(scale(0.25, 0.0, 8.0), 2.0, 1e-12));
    }
}

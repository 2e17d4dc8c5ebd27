//! Closed-form entropy-rate formulas for LZ factor counts.
//!
//! For a sequence of length `n` parsed into `c` factors:
//! - LZ76: `h = c·log2 n / n`
//! - LZ77: `h = (c·log2 c + 2c·log2(n/c)) / n`
//! - LZ78: `h = c·(log2 a + log2 c) / n`, with `a` the alphabet size
//!
//! Both converge slowly, so they are attenuated by the finite-size correction
//! `log2 n / (log2 n + r·log2 log2 n)` with convergence rate `r` in `[0, 2]`.
//!
//! Every function here either returns a finite value or `ArithmeticDomain`.

use crate::error::{ComplexityError, Result};
use crate::factorize::FactorizationMethod;

/// Largest accepted convergence rate.
pub const MAX_CONVERGENCE_RATE: f64 = 2.0;

/// Passes a finite value through, otherwise reports what produced it.
pub fn ensure_finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComplexityError::ArithmeticDomain(format!(
            "{} is not finite ({})",
            what, value
        )))
    }
}

fn check_counts(factor_count: usize, n: usize) -> Result<()> {
    if n == 0 {
        return Err(ComplexityError::ArithmeticDomain(
            "sequence length is zero".to_string(),
        ));
    }
    if factor_count == 0 {
        return Err(ComplexityError::ArithmeticDomain(
            "log2 of a zero factor count".to_string(),
        ));
    }
    if factor_count > n {
        return Err(ComplexityError::ArithmeticDomain(format!(
            "factor count {} exceeds sequence length {}",
            factor_count, n
        )));
    }
    Ok(())
}

/// Raw LZ76 rate in bits per symbol.
pub fn lz76_rate(factor_count: usize, n: usize) -> Result<f64> {
    check_counts(factor_count, n)?;
    let c = factor_count as f64;
    let n = n as f64;
    ensure_finite(c * n.log2() / n, "LZ76 rate")
}

/// Raw LZ77 rate in bits per symbol.
pub fn lz77_rate(factor_count: usize, n: usize) -> Result<f64> {
    check_counts(factor_count, n)?;
    let c = factor_count as f64;
    let n = n as f64;
    ensure_finite((c * c.log2() + 2.0 * c * (n / c).log2()) / n, "LZ77 rate")
}

/// Raw LZ78 rate in bits per symbol.
pub fn lz78_rate(factor_count: usize, n: usize, alphabet_size: u32) -> Result<f64> {
    check_counts(factor_count, n)?;
    if alphabet_size < 2 {
        return Err(ComplexityError::ArithmeticDomain(format!(
            "alphabet size {} gives a non-positive symbol cost",
            alphabet_size
        )));
    }
    let c = factor_count as f64;
    let a = alphabet_size as f64;
    ensure_finite(c * (a.log2() + c.log2()) / n as f64, "LZ78 rate")
}

/// The finite-size correction factor; needs `n >= 2` so that `log2 log2 n` exists.
pub fn finite_size_correction(n: usize, convergence_rate: f64) -> Result<f64> {
    if !(0.0..=MAX_CONVERGENCE_RATE).contains(&convergence_rate) {
        return Err(ComplexityError::InvalidInput(format!(
            "convergence rate must lie in [0, {}], got {}",
            MAX_CONVERGENCE_RATE, convergence_rate
        )));
    }
    if n < 2 {
        return Err(ComplexityError::ArithmeticDomain(format!(
            "finite-size correction needs at least 2 symbols, got {}",
            n
        )));
    }
    let log_n = (n as f64).log2();
    let denominator = log_n + convergence_rate * log_n.log2();
    if denominator <= 0.0 {
        return Err(ComplexityError::ArithmeticDomain(format!(
            "correction denominator {} is not positive",
            denominator
        )));
    }
    ensure_finite(log_n / denominator, "finite-size correction")
}

/// Formula rate times the finite-size correction.
pub fn corrected_rate(
    method: FactorizationMethod,
    factor_count: usize,
    n: usize,
    alphabet_size: u32,
    convergence_rate: f64,
) -> Result<f64> {
    let raw = match method {
        FactorizationMethod::Lz76 => lz76_rate(factor_count, n)?,
        FactorizationMethod::Lz77 => lz77_rate(factor_count, n)?,
        FactorizationMethod::Lz78 => lz78_rate(factor_count, n, alphabet_size)?,
    };
    ensure_finite(
        raw * finite_size_correction(n, convergence_rate)?,
        "corrected rate",
    )
}

/// `value / baseline`, refusing a zero or non-finite baseline.
pub fn normalize(value: f64, baseline: f64) -> Result<f64> {
    if !baseline.is_finite() || baseline <= 0.0 {
        return Err(ComplexityError::ArithmeticDomain(format!(
            "cannot normalize by baseline {}",
            baseline
        )));
    }
    ensure_finite(value / baseline, "normalized estimate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lz76_rate_known_value() {
        // c = n / log2 n on 1024 symbols gives one bit per symbol.
        let h = lz76_rate(1024 / 10, 1024).unwrap();
        assert!((h - 102.0 * 10.0 / 1024.0).abs() < 1e-12);
        assert!(lz76_rate(0, 16).is_err());
    }

    #[test]
    fn test_lz77_rate_known_value() {
        // c = n: every symbol its own factor -> log2 c + 0.
        let h = lz77_rate(8, 8).unwrap();
        assert!((h - 3.0).abs() < 1e-12);
        // c = 2, n = 16384: (2 + 4·13) / 16384.
        let h = lz77_rate(2, 16384).unwrap();
        assert!((h - 54.0 / 16384.0).abs() < 1e-15);
    }

    #[test]
    fn test_lz78_rate_known_value() {
        // c = 4, n = 10, a = 2: 4·(1 + 2) / 10.
        assert!((lz78_rate(4, 10, 2).unwrap() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_count_and_length_are_domain_errors() {
        assert!(matches!(lz77_rate(0, 10), Err(ComplexityError::ArithmeticDomain(_))));
        assert!(matches!(lz77_rate(1, 0), Err(ComplexityError::ArithmeticDomain(_))));
        assert!(matches!(lz78_rate(0, 5, 2), Err(ComplexityError::ArithmeticDomain(_))));
    }

    #[test]
    fn test_single_factor_is_finite() {
        // c = 1 makes c·log2 c vanish but must not produce NaN.
        let h = lz77_rate(1, 1024).unwrap();
        assert!((h - 20.0 / 1024.0).abs() < 1e-12);
    }

    #[test]
    fn test_correction_factor() {
        // n = 2: log2 log2 2 = 0, so the factor is exactly 1.
        assert_eq!(finite_size_correction(2, 1.5).unwrap(), 1.0);
        // n = 65536: 16 / (16 + 1·4).
        assert!((finite_size_correction(65536, 1.0).unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(finite_size_correction(1000, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_correction_domain() {
        assert!(matches!(
            finite_size_correction(1, 1.0),
            Err(ComplexityError::ArithmeticDomain(_))
        ));
        assert!(matches!(
            finite_size_correction(100, 2.5),
            Err(ComplexityError::InvalidInput(_))
        ));
        assert!(finite_size_correction(100, -0.1).is_err());
    }

    #[test]
    fn test_normalize_rejects_zero_baseline() {
        assert!(matches!(normalize(0.5, 0.0), Err(ComplexityError::ArithmeticDomain(_))));
        assert_eq!(normalize(0.5, 2.0).unwrap(), 0.25);
    }
}

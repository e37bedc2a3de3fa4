// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validation framework for baseline comparison.
//!
//! Used by the `validate_*` binaries to compare simulation results
//! against documented baselines from the published model. Each check
//! prints a formatted pass/fail line with the actual value, the
//! expected value, and the tolerance applied.
//!
//! Every validation binary follows the same contract:
//! - hardcoded expected values sourced from the published model runs,
//! - explicit pass/fail per check with human-readable output,
//! - exit code 0 = all passed, 1 = at least one failed.
//!
//! Prefer the [`Validator`] struct over bare [`check`] calls; it tracks
//! pass/fail counts automatically.

/// Compare `actual` against `expected` within absolute `tolerance`.
///
/// Prints a formatted `[OK]` or `[FAIL]` line and returns whether the
/// check passed. Tolerance of `0.0` requires exact match.
///
/// ```
/// use circadia::validation::check;
///
/// assert!(check("half", 0.5, 0.5, 0.0));
/// assert!(!check("deliberate fail", 2.0, 1.0, 0.5));
/// ```
#[must_use]
pub fn check(label: &str, actual: f64, expected: f64, tolerance: f64) -> bool {
    let pass = (actual - expected).abs() <= tolerance;
    let tag = if pass { "OK" } else { "FAIL" };
    println!("  [{tag}]  {label}: {actual:.6} (expected {expected:.6}, tol {tolerance:.6})");
    pass
}

/// Compare an exact count, with no floating-point conversion.
///
/// ```
/// use circadia::validation::check_count;
///
/// assert!(check_count("state columns", 221, 221));
/// assert!(!check_count("mismatched", 10, 20));
/// ```
#[must_use]
pub fn check_count(label: &str, actual: usize, expected: usize) -> bool {
    let pass = actual == expected;
    let tag = if pass { "OK" } else { "FAIL" };
    println!("  [{tag}]  {label}: {actual} (expected {expected})");
    pass
}

/// Print summary and return whether all checks passed.
#[must_use]
pub fn print_result(name: &str, passed: u32, total: u32) -> bool {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("  {name}: {passed}/{total} checks passed");
    if passed == total {
        println!("  RESULT: PASS");
    } else {
        println!("  RESULT: FAIL ({} checks failed)", total - passed);
    }
    println!("═══════════════════════════════════════════════════════════");
    passed == total
}

// ── Validator: structured check accumulator ───────────────────

/// Accumulated validation state, removing manual pass/fail bookkeeping.
///
/// # Examples
///
/// ```
/// use circadia::validation::Validator;
///
/// let mut v = Validator::new("doc-test");
/// v.check("pi", std::f64::consts::PI, 3.14159, 1e-4);
/// v.check_count("cells", 60, 60);
/// assert_eq!(v.counts(), (2, 2));
/// ```
pub struct Validator {
    name: String,
    passed: u32,
    total: u32,
}

impl Validator {
    /// Create a new validator for the given binary name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        println!("═══════════════════════════════════════════════════════════");
        println!("  {name}");
        println!("═══════════════════════════════════════════════════════════\n");
        Self {
            name,
            passed: 0,
            total: 0,
        }
    }

    /// Print a section header (no check counted).
    pub fn section(&self, label: &str) {
        println!("\n{label}");
    }

    /// Check an f64 value against expected within tolerance.
    pub fn check(&mut self, label: &str, actual: f64, expected: f64, tolerance: f64) {
        self.total += 1;
        if check(label, actual, expected, tolerance) {
            self.passed += 1;
        }
    }

    /// Check an exact count.
    pub fn check_count(&mut self, label: &str, actual: usize, expected: usize) {
        self.total += 1;
        if check_count(label, actual, expected) {
            self.passed += 1;
        }
    }

    /// Check a boolean condition.
    pub fn check_true(&mut self, label: &str, condition: bool) {
        self.total += 1;
        let tag = if condition { "OK" } else { "FAIL" };
        println!("  [{tag}]  {label}");
        if condition {
            self.passed += 1;
        }
    }

    /// Retrieve current (passed, total) for external logic.
    #[must_use]
    pub const fn counts(&self) -> (u32, u32) {
        (self.passed, self.total)
    }

    /// Print summary and exit with 0 (pass) or 1 (fail).
    pub fn finish(self) -> ! {
        let ok = print_result(&self.name, self.passed, self.total);
        std::process::exit(i32::from(!ok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_exact_match() {
        assert!(check("exact", 42.0, 42.0, 0.0));
    }

    #[test]
    fn check_within_tolerance() {
        assert!(check("close", 42.001, 42.0, 0.01));
    }

    #[test]
    fn check_outside_tolerance() {
        assert!(!check("far", 50.0, 42.0, 1.0));
    }

    #[test]
    fn check_count_exact() {
        assert!(check_count("exact", 42, 42));
    }

    #[test]
    fn check_count_mismatch() {
        assert!(!check_count("diff", 42, 43));
    }

    #[test]
    fn print_result_pass() {
        assert!(print_result("test", 3, 3));
    }

    #[test]
    fn print_result_fail() {
        assert!(!print_result("test", 2, 3));
    }

    #[test]
    fn validator_accumulates() {
        let mut v = Validator::new("test");
        v.check("ok", 1.0, 1.0, 0.0);
        v.check("fail", 2.0, 1.0, 0.0);
        v.check_count("count_ok", 5, 5);
        v.check_count("count_fail", 4, 5);
        v.check_true("cond", true);
        assert_eq!(v.counts(), (3, 5));
    }

    #[test]
    fn validator_section_does_not_count() {
        let v = Validator::new("test");
        v.section("── some section ──");
        assert_eq!(v.counts(), (0, 0));
    }
}

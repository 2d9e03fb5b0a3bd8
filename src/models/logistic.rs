use serde::{Deserialize, Serialize};

/// Three-parameter logistic growth curve: P(t) = K / (1 + A * e^(-k*t))
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticCurve {
    /// Carrying capacity K, the asymptote of the curve
    pub capacity: f64,
    /// Initial-condition ratio A = K/P(0) - 1
    pub ratio: f64,
    /// Growth-rate constant k
    pub rate: f64,
}

impl LogisticCurve {
    pub const PARAMETER_COUNT: usize = 3;

    pub fn new(capacity: f64, ratio: f64, rate: f64) -> Self {
        Self {
            capacity,
            ratio,
            rate,
        }
    }

    /// Build a curve through `initial_value` at t = 0.
    pub fn from_initial_value(capacity: f64, initial_value: f64, rate: f64) -> Self {
        Self::new(capacity, capacity / initial_value - 1.0, rate)
    }

    /// Parameters in solver order: K, A, k.
    pub fn to_array(&self) -> [f64; 3] {
        [self.capacity, self.ratio, self.rate]
    }

    pub fn from_array(params: [f64; 3]) -> Self {
        Self::new(params[0], params[1], params[2])
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Evaluate the curve at time `t`.
    ///
    /// # Examples
    ///
    /// ```
    /// use catch_growth_analyzer::LogisticCurve;
    ///
    /// let curve = LogisticCurve::new(100.0, 4.0, 0.07);
    /// assert!((curve.evaluate(0.0) - 20.0).abs() < 1e-12);
    /// ```
    pub fn evaluate(&self, t: f64) -> f64 {
        self.capacity / (1.0 + self.ratio * (-self.rate * t).exp())
    }

    /// Partial derivatives (dP/dK, dP/dA, dP/dk) at time `t`.
    pub fn gradient(&self, t: f64) -> [f64; 3] {
        let e = (-self.rate * t).exp();
        let d = 1.0 + self.ratio * e;
        let d2 = d * d;
        [
            1.0 / d,
            -self.capacity * e / d2,
            self.capacity * self.ratio * t * e / d2,
        ]
    }

    /// P(0) = K / (1 + A)
    pub fn initial_value(&self) -> f64 {
        self.capacity / (1.0 + self.ratio)
    }

    /// Time of fastest growth, where P = K/2.
    pub fn inflection_time(&self) -> Option<f64> {
        if self.ratio > 0.0 && self.rate > 0.0 {
            Some(self.ratio.ln() / self.rate)
        } else {
            None
        }
    }

    /// Peak absolute growth rate, reached at the inflection point.
    pub fn max_growth_rate(&self) -> f64 {
        self.capacity * self.rate / 4.0
    }

    /// Time at which the curve reaches `fraction * K`.
    pub fn time_to_fraction(&self, fraction: f64) -> Option<f64> {
        if !(fraction > 0.0 && fraction < 1.0) || self.ratio <= 0.0 || self.rate == 0.0 {
            return None;
        }
        // K/(1 + A e^{-kt}) = fK  =>  e^{-kt} = (1/f - 1)/A
        let inner = (1.0 / fraction - 1.0) / self.ratio;
        Some(-inner.ln() / self.rate)
    }
}

impl std::fmt::Display for LogisticCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "P(t) = {:.4} / (1 + {:.4} e^(-{:.5} t))",
            self.capacity, self.ratio, self.rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    fn reference_curve() -> LogisticCurve {
        LogisticCurve::new(100.3, 4.32, 0.07)
    }

    #[test]
    fn test_initial_value() {
        let curve = reference_curve();
        assert_approx_eq!(curve.evaluate(0.0), curve.initial_value(), 1e-12);
        assert_approx_eq!(curve.initial_value(), 100.3 / 5.32, 1e-12);
    }

    #[test]
    fn test_from_initial_value_roundtrip() {
        let curve = LogisticCurve::from_initial_value(100.0, 18.0, 0.05);
        assert_approx_eq!(curve.evaluate(0.0), 18.0, 1e-10);
        assert_approx_eq!(curve.ratio, 100.0 / 18.0 - 1.0, 1e-12);
    }

    #[test]
    fn test_inflection_at_half_capacity() {
        let curve = reference_curve();
        let t = curve.inflection_time().unwrap();
        assert_approx_eq!(curve.evaluate(t), curve.capacity / 2.0, 1e-9);
        assert_approx_eq!(t, 4.32f64.ln() / 0.07, 1e-12);
    }

    #[test]
    fn test_no_inflection_when_starting_above_half() {
        let curve = LogisticCurve::new(100.0, -0.2, 0.05);
        assert!(curve.inflection_time().is_none());
    }

    #[test]
    fn test_time_to_fraction() {
        let curve = reference_curve();
        let t90 = curve.time_to_fraction(0.9).unwrap();
        assert_approx_eq!(curve.evaluate(t90), 0.9 * curve.capacity, 1e-9);
        assert!(curve.time_to_fraction(1.0).is_none());
        assert!(curve.time_to_fraction(0.0).is_none());
    }

    #[test]
    fn test_max_growth_rate_matches_derivative() {
        let curve = reference_curve();
        let t = curve.inflection_time().unwrap();
        let h = 1e-5;
        let slope = (curve.evaluate(t + h) - curve.evaluate(t - h)) / (2.0 * h);
        assert_approx_eq!(slope, curve.max_growth_rate(), 1e-6);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let curve = reference_curve();
        let t = 17.0;
        let grad = curve.gradient(t);
        let base = curve.to_array();
        for (i, g) in grad.iter().enumerate() {
            let h = 1e-6 * base[i].abs().max(1.0);
            let mut up = base;
            let mut down = base;
            up[i] += h;
            down[i] -= h;
            let numeric = (LogisticCurve::from_array(up).evaluate(t)
                - LogisticCurve::from_array(down).evaluate(t))
                / (2.0 * h);
            assert!(
                (numeric - g).abs() < 1e-5 * g.abs().max(1.0),
                "parameter {i}: analytic {g}, numeric {numeric}"
            );
        }
    }

    #[test]
    fn test_display() {
        let text = reference_curve().to_string();
        assert!(text.contains("100.3000"));
        assert!(text.contains("4.3200"));
    }

    #[test]
    fn test_curve_json_roundtrip() {
        let curve = reference_curve();
        let json = serde_json::to_string(&curve).unwrap();
        assert!(json.contains("capacity"));
        let back: LogisticCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
    }

    proptest! {
        #[test]
        fn prop_increasing_and_bounded(
            capacity in 1.0f64..500.0,
            ratio in 0.01f64..50.0,
            rate in 0.001f64..1.0,
            t in 0.0f64..200.0,
        ) {
            let curve = LogisticCurve::new(capacity, ratio, rate);
            let now = curve.evaluate(t);
            let later = curve.evaluate(t + 1.0);
            prop_assert!(later >= now);
            prop_assert!(now > 0.0);
            prop_assert!(now <= capacity);
        }

        #[test]
        fn prop_approaches_capacity(
            capacity in 1.0f64..500.0,
            ratio in 0.01f64..50.0,
            rate in 0.05f64..1.0,
        ) {
            let curve = LogisticCurve::new(capacity, ratio, rate);
            let far = curve.evaluate(2000.0);
            prop_assert!((far - capacity).abs() < 1e-6 * capacity);
        }
    }
}

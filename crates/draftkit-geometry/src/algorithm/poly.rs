//! Real roots of low-degree polynomials.
//!
//! Degrees one and two are solved in closed form. Cubics and quartics take the
//! eigenvalues of the companion matrix and polish the real ones with Newton
//! steps against the original coefficients.

use nalgebra::DMatrix;
use smallvec::SmallVec;

pub type Roots = SmallVec<[f64; 4]>;

/// Evaluates `coeffs` (highest degree first) at `x` with Horner's scheme.
pub fn evaluate(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, c| acc * x + c)
}

fn derivative(coeffs: &[f64]) -> SmallVec<[f64; 4]> {
    let n = coeffs.len().saturating_sub(1);
    coeffs[..n]
        .iter()
        .enumerate()
        .map(|(i, c)| c * (n - i) as f64)
        .collect()
}

/// Real roots of `a·x² + b·x + c`, ascending, with a double root reported once.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::new();
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 {
        return roots;
    }
    if a.abs() <= 1e-14 * scale {
        if b.abs() > 1e-14 * scale {
            roots.push(-c / b);
        }
        return roots;
    }
    let disc = b * b - 4.0 * a * c;
    let tol = 1e-12 * (b * b).max((4.0 * a * c).abs()).max(f64::MIN_POSITIVE);
    if disc < -tol {
        return roots;
    }
    if disc <= tol {
        roots.push(-b / (2.0 * a));
        return roots;
    }
    // Numerically stable pair.
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let (r0, r1) = if q != 0.0 { (q / a, c / q) } else { (0.0, 0.0) };
    roots.push(r0.min(r1));
    roots.push(r0.max(r1));
    roots
}

/// Real roots of a polynomial of degree at most four, highest coefficient first.
///
/// Leading coefficients that vanish relative to the largest one are dropped,
/// so callers can pass a nominal quartic that degenerates to a lower degree.
pub fn solve_polynomial(coeffs: &[f64]) -> Roots {
    let scale = coeffs.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    if scale == 0.0 {
        return Roots::new();
    }
    let first = coeffs
        .iter()
        .position(|c| c.abs() > 1e-12 * scale)
        .unwrap_or(coeffs.len());
    let coeffs = &coeffs[first..];
    match coeffs.len() {
        0 | 1 => Roots::new(),
        2 => {
            let mut r = Roots::new();
            r.push(-coeffs[1] / coeffs[0]);
            r
        }
        3 => solve_quadratic(coeffs[0], coeffs[1], coeffs[2]),
        _ => companion_roots(coeffs),
    }
}

fn companion_roots(coeffs: &[f64]) -> Roots {
    let n = coeffs.len() - 1;
    let lead = coeffs[0];
    let mut companion = DMatrix::<f64>::zeros(n, n);
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }
    for i in 0..n {
        companion[(i, n - 1)] = -coeffs[n - i] / lead;
    }
    let eigen = companion.complex_eigenvalues();
    let d = derivative(coeffs);
    let mut roots = Roots::new();
    for z in eigen.iter() {
        if z.im.abs() > 1e-6 * (1.0 + z.re.abs()) {
            continue;
        }
        roots.push(polish(coeffs, &d, z.re));
    }
    roots.sort_by(|a, b| a.total_cmp(b));
    roots.dedup_by(|b, a| (*a - *b).abs() <= 1e-7 * (1.0 + a.abs()));
    roots
}

/// A few Newton steps, keeping the best iterate by residual.
fn polish(coeffs: &[f64], d: &[f64], x0: f64) -> f64 {
    let mut x = x0;
    let mut best = (evaluate(coeffs, x).abs(), x);
    for _ in 0..8 {
        let fx = evaluate(coeffs, x);
        let dx = evaluate(d, x);
        if dx == 0.0 || fx == 0.0 {
            break;
        }
        x -= fx / dx;
        let r = evaluate(coeffs, x).abs();
        if r < best.0 {
            best = (r, x);
        }
    }
    best.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roots(found: &[f64], expected: &[f64]) {
        assert_eq!(found.len(), expected.len(), "roots {:?}", found);
        for (f, e) in found.iter().zip(expected) {
            assert!((f - e).abs() < 1e-8, "{} vs {}", f, e);
        }
    }

    #[test]
    fn test_quadratic() {
        assert_roots(&solve_quadratic(1.0, -3.0, 2.0), &[1.0, 2.0]);
        assert_roots(&solve_quadratic(1.0, 2.0, 1.0), &[-1.0]);
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_cubic_and_quartic() {
        // (x - 1)(x - 2)(x + 3)
        assert_roots(&solve_polynomial(&[1.0, 0.0, -7.0, 6.0]), &[-3.0, 1.0, 2.0]);
        // (x² - 1)(x² - 4)
        assert_roots(&solve_polynomial(&[1.0, 0.0, -5.0, 0.0, 4.0]), &[-2.0, -1.0, 1.0, 2.0]);
        // x⁴ + 1 has no real roots
        assert!(solve_polynomial(&[1.0, 0.0, 0.0, 0.0, 1.0]).is_empty());
    }

    #[test]
    fn test_degenerate_leading_terms() {
        assert_roots(&solve_polynomial(&[0.0, 0.0, 2.0, -4.0]), &[2.0]);
    }
}

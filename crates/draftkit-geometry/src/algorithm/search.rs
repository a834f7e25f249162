//! Deterministic one-dimensional searches over curve parameters.
//!
//! Everything here is bounded by the iteration ceiling and the bracket floor
//! in [`SearchSettings`]; when a budget runs out the best candidate seen so far
//! is returned.

use nalgebra::{Matrix2, Vector2};
use tracing::{trace, warn};

use draftkit_core::SearchSettings;

use super::distance::point_segment_distance_squared;
use crate::model::{ParametricCurve, Vector};

const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Result of a bracketed minimisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub t: f64,
    pub value: f64,
    pub iterations: usize,
    /// False when the iteration ceiling was hit before the last stage finished.
    pub converged: bool,
}

/// Nearest point on a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    pub t: f64,
    pub point: Vector,
    pub distance: f64,
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Staged golden-section minimisation of `f` starting from `bracket`.
///
/// The coarse, refine and precision stages each re-bracket around the current
/// best point and shrink until the bracket is narrower than the stage width
/// times the domain span. A stage that converges onto its bracket edge, or a
/// precision stage whose minimum repeats `stagnation_limit` times there, has
/// its bracket doubled and runs again, at most `stagnation_limit` times. The
/// search never leaves `domain`.
pub fn minimize<F: Fn(f64) -> f64>(f: F, bracket: (f64, f64), domain: (f64, f64), settings: &SearchSettings) -> Minimum {
    let (lo, hi) = ordered(domain);
    let span = (hi - lo).max(f64::MIN_POSITIVE);
    let (a, b) = ordered(bracket);
    let (mut a, mut b) = (a.clamp(lo, hi), b.clamp(lo, hi));

    let mut best = Minimum {
        t: a,
        value: f(a),
        iterations: 0,
        converged: true,
    };
    for t in [b, 0.5 * (a + b)] {
        let v = f(t);
        if v < best.value {
            best.t = t;
            best.value = v;
        }
    }

    let stages = [
        settings.coarse_tolerance,
        settings.refine_tolerance,
        settings.precision_tolerance,
    ];
    let mut iterations = 0usize;
    for (stage, &width) in stages.iter().enumerate() {
        if stage > 0 {
            let half = (b - a).max(width * span) * 4.0;
            a = (best.t - half).max(lo);
            b = (best.t + half).min(hi);
        }
        let target = width * span;
        let mut stage_iterations = 0usize;
        let mut stagnant = 0usize;
        let mut doublings = 0usize;
        let (mut outer_a, mut outer_b) = (a, b);

        let mut x1 = b - INV_PHI * (b - a);
        let mut x2 = a + INV_PHI * (b - a);
        let mut f1 = f(x1);
        let mut f2 = f(x2);

        loop {
            let w = b - a;
            let pinned = (best.t - outer_a <= 2.0 * w && outer_a > lo) || (outer_b - best.t <= 2.0 * w && outer_b < hi);
            let finished = w <= target || w <= settings.bracket_floor * best.t.abs().max(1.0);
            let plateau = stage == 2 && stagnant >= settings.stagnation_limit;
            if (finished || plateau) && pinned && doublings < settings.stagnation_limit {
                // The minimum keeps landing on the bracket edge: widen and retry.
                let half = 2.0 * (outer_b - outer_a).max(target);
                a = (best.t - half).max(lo);
                b = (best.t + half).min(hi);
                outer_a = a;
                outer_b = b;
                x1 = b - INV_PHI * (b - a);
                x2 = a + INV_PHI * (b - a);
                f1 = f(x1);
                f2 = f(x2);
                doublings += 1;
                stagnant = 0;
                trace!(stage, a, b, doublings, "minimiser bracket doubled");
                continue;
            }
            if finished {
                break;
            }
            if stage_iterations >= settings.max_iterations {
                warn!(stage, iterations = stage_iterations, "minimiser hit its iteration ceiling");
                best.converged = false;
                break;
            }
            stage_iterations += 1;

            if f1 < f2 {
                b = x2;
                x2 = x1;
                f2 = f1;
                x1 = b - INV_PHI * (b - a);
                f1 = f(x1);
            } else {
                a = x1;
                x1 = x2;
                f1 = f2;
                x2 = a + INV_PHI * (b - a);
                f2 = f(x2);
            }

            let (t, v) = if f1 < f2 { (x1, f1) } else { (x2, f2) };
            let previous = best.value;
            if v < best.value {
                best.t = t;
                best.value = v;
            }
            trace!(stage, a, b, t = best.t, value = best.value, "minimiser step");

            if (previous - best.value).abs() <= f64::EPSILON * best.value.abs().max(1.0) {
                stagnant += 1;
            } else {
                stagnant = 0;
            }
        }
        iterations += stage_iterations;
    }
    best.iterations = iterations;
    best
}

/// Two-phase nearest-point search on a parametric curve.
///
/// Phase one samples the curve and ranks the sampled segments by their
/// distance to `p`. Phase two runs [`minimize`] on the squared distance around
/// the best few candidates.
pub fn nearest_on_curve<C: ParametricCurve + ?Sized>(curve: &C, p: &Vector, settings: &SearchSettings) -> CurveHit {
    const CANDIDATES: usize = 4;

    let domain = curve.domain();
    let (t0, t1) = domain;
    let n = (settings.coarse_samples * curve.segment_count()).max(8);
    let ts: Vec<f64> = (0..=n).map(|i| t0 + (t1 - t0) * i as f64 / n as f64).collect();
    let points: Vec<Vector> = ts.iter().map(|t| curve.point_at(*t)).collect();

    let mut ranked: Vec<(f64, usize)> = points
        .windows(2)
        .enumerate()
        .map(|(i, w)| (point_segment_distance_squared(p, &w[0], &w[1]), i))
        .collect();
    ranked.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));

    let objective = |t: f64| curve.point_at(t).distance_squared_to(p);
    let mut best: Option<Minimum> = None;
    let mut visited: Vec<usize> = Vec::with_capacity(CANDIDATES);
    for &(_, i) in &ranked {
        if visited.len() >= CANDIDATES {
            break;
        }
        if visited.iter().any(|&v| v.abs_diff(i) <= 1) {
            continue;
        }
        visited.push(i);
        let lo = ts[i.saturating_sub(1)];
        let hi = ts[(i + 2).min(n)];
        let m = minimize(&objective, (lo, hi), domain, settings);
        if best.map_or(true, |b| m.value < b.value) {
            best = Some(m);
        }
    }

    let t = best.map_or(t0, |b| b.t);
    let point = curve.point_at(t);
    CurveHit {
        t,
        point,
        distance: point.distance_to(p),
    }
}

/// Parameters in `domain` where `g` vanishes.
///
/// Sign changes between samples are bisected. Sample triples whose absolute
/// value dips without a sign change are minimised, and accepted as touching
/// roots when the residual is below `tolerance`.
pub fn find_roots<F: Fn(f64) -> f64>(
    g: F,
    domain: (f64, f64),
    samples: usize,
    tolerance: f64,
    settings: &SearchSettings,
) -> Vec<f64> {
    let (t0, t1) = ordered(domain);
    let span = (t1 - t0).max(f64::MIN_POSITIVE);
    let n = samples.max(2);
    let ts: Vec<f64> = (0..=n).map(|i| t0 + span * i as f64 / n as f64).collect();
    let gs: Vec<f64> = ts.iter().map(|t| g(*t)).collect();
    let mut roots = Vec::new();

    for i in 0..=n {
        if gs[i] == 0.0 {
            roots.push(ts[i]);
            continue;
        }
        if i < n && gs[i + 1] != 0.0 && gs[i].signum() != gs[i + 1].signum() {
            roots.push(bisect(&g, ts[i], ts[i + 1], gs[i], span, settings));
        }
    }

    let mut last_dip: Option<usize> = None;
    for i in 1..n {
        let (gp, gc, gn) = (gs[i - 1], gs[i], gs[i + 1]);
        let same_sign = gp.signum() == gc.signum() && gc.signum() == gn.signum();
        if same_sign && gc.abs() <= gp.abs() && gc.abs() <= gn.abs() {
            if last_dip == Some(i - 1) {
                continue;
            }
            last_dip = Some(i);
            let m = minimize(|t| g(t).abs(), (ts[i - 1], ts[i + 1]), (t0, t1), settings);
            if m.value <= tolerance {
                roots.push(m.t);
            }
        }
    }

    roots.sort_by(|a, b| a.total_cmp(b));
    roots.dedup_by(|b, a| (*b - *a).abs() <= settings.precision_tolerance.max(1e-12) * span * 10.0);
    roots
}

fn bisect<F: Fn(f64) -> f64>(g: &F, mut a: f64, mut b: f64, mut ga: f64, span: f64, settings: &SearchSettings) -> f64 {
    let target = settings.precision_tolerance * span;
    for _ in 0..settings.max_iterations {
        if b - a <= target || b - a <= settings.bracket_floor * a.abs().max(1.0) {
            break;
        }
        let m = 0.5 * (a + b);
        let gm = g(m);
        if gm == 0.0 {
            return m;
        }
        if gm.signum() == ga.signum() {
            a = m;
            ga = gm;
        } else {
            b = m;
        }
    }
    0.5 * (a + b)
}

/// Parameter pairs `(t, s)` where two curves meet.
///
/// Both curves are sampled; sample-segment pairs closer than their own length
/// seed an alternating minimisation of the squared gap `|a(t) − b(s)|²`,
/// finished with Newton steps on `a(t) − b(s) = 0`. Pairs whose final squared
/// gap is at most `tolerance` are returned, deduplicated by point distance
/// `merge`.
pub fn curve_curve_meets<A, B>(a: &A, b: &B, tolerance: f64, merge: f64, settings: &SearchSettings) -> Vec<(f64, f64)>
where
    A: ParametricCurve + ?Sized,
    B: ParametricCurve + ?Sized,
{
    let sample = |c: &dyn Fn(f64) -> Vector, (t0, t1): (f64, f64), n: usize| -> Vec<(f64, Vector)> {
        (0..=n)
            .map(|i| {
                let t = t0 + (t1 - t0) * i as f64 / n as f64;
                (t, c(t))
            })
            .collect()
    };
    let na = (settings.coarse_samples * a.segment_count()).max(8);
    let nb = (settings.coarse_samples * b.segment_count()).max(8);
    let sa = sample(&|t: f64| a.point_at(t), a.domain(), na);
    let sb = sample(&|t: f64| b.point_at(t), b.domain(), nb);

    let mut seeds = Vec::new();
    for wa in sa.windows(2) {
        let la = wa[0].1.distance_to(&wa[1].1);
        for wb in sb.windows(2) {
            let lb = wb[0].1.distance_to(&wb[1].1);
            let slack = (la + lb).max(merge);
            let gap = segment_gap(&wa[0].1, &wa[1].1, &wb[0].1, &wb[1].1);
            if gap <= slack * 0.5 {
                seeds.push((0.5 * (wa[0].0 + wa[1].0), 0.5 * (wb[0].0 + wb[1].0), (wa[0].0, wa[1].0), (wb[0].0, wb[1].0)));
            }
        }
    }

    let mut found: Vec<(f64, f64, Vector)> = Vec::new();
    for (mut t, mut s, (ta0, ta1), (sb0, sb1)) in seeds {
        let wa = (ta1 - ta0) * 2.0;
        let wb = (sb1 - sb0) * 2.0;
        for _ in 0..4 {
            let bs = b.point_at(s);
            t = minimize(|x| a.point_at(x).distance_squared_to(&bs), (t - wa, t + wa), a.domain(), settings).t;
            let at = a.point_at(t);
            s = minimize(|y| b.point_at(y).distance_squared_to(&at), (s - wb, s + wb), b.domain(), settings).t;
        }
        let (t, s) = newton_polish(a, b, t, s);
        let pa = a.point_at(t);
        if pa.distance_squared_to(&b.point_at(s)) > tolerance {
            continue;
        }
        if found.iter().any(|(_, _, q)| q.approx_eq(&pa, merge)) {
            continue;
        }
        found.push((t, s, pa));
    }
    found.into_iter().map(|(t, s, _)| (t, s)).collect()
}

fn newton_polish<A, B>(a: &A, b: &B, mut t: f64, mut s: f64) -> (f64, f64)
where
    A: ParametricCurve + ?Sized,
    B: ParametricCurve + ?Sized,
{
    let (ta, tb) = a.domain();
    let (sa, sb) = b.domain();
    let mut gap = a.point_at(t).distance_squared_to(&b.point_at(s));
    for _ in 0..8 {
        let r = a.point_at(t) - b.point_at(s);
        let da = a.derivative_at(t);
        let db = b.derivative_at(s);
        let jac = Matrix2::new(da.x, -db.x, da.y, -db.y);
        let Some(inv) = jac.try_inverse() else {
            break;
        };
        let step = inv * Vector2::new(r.x, r.y);
        let (nt, ns) = ((t - step[0]).clamp(ta, tb), (s - step[1]).clamp(sa, sb));
        let ngap = a.point_at(nt).distance_squared_to(&b.point_at(ns));
        if ngap >= gap {
            break;
        }
        t = nt;
        s = ns;
        gap = ngap;
    }
    (t, s)
}

/// Smallest distance between two segments.
fn segment_gap(a0: &Vector, a1: &Vector, b0: &Vector, b1: &Vector) -> f64 {
    let d1 = *a1 - *a0;
    let d2 = *b1 - *b0;
    let denom = d1.cross(&d2);
    if denom.abs() > f64::EPSILON * d1.length() * d2.length() {
        let w = *b0 - *a0;
        let u = w.cross(&d2) / denom;
        let v = w.cross(&d1) / denom;
        if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) {
            return 0.0;
        }
    }
    [
        point_segment_distance_squared(a0, b0, b1),
        point_segment_distance_squared(a1, b0, b1),
        point_segment_distance_squared(b0, a0, a1),
        point_segment_distance_squared(b1, a0, a1),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
    .sqrt()
}

//! Reference distributions used for p-value lookup.
//!
//! Thin adapters over `statrs` that never fail: invalid parameters yield `NaN` so
//! that callers can propagate indeterminate results unchanged. The studentized
//! range distribution is not available in `statrs` and is integrated here
//! directly.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};
use statrs::function::erf::erfc;
use statrs::function::gamma::ln_gamma;
use std::f64::consts::{LN_2, SQRT_2};

/// CDF of Student's t distribution with `df` degrees of freedom.
pub fn student_t_cdf(x: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.cdf(x),
        Err(_) => f64::NAN,
    }
}

/// Quantile function of Student's t distribution, for `0 < p < 1`.
pub fn student_t_inv(p: f64, df: f64) -> f64 {
    if !(p > 0.0 && p < 1.0) {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// CDF of the F distribution.
pub fn f_cdf(x: f64, df1: f64, df2: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    match FisherSnedecor::new(df1, df2) {
        Ok(dist) => dist.cdf(x),
        Err(_) => f64::NAN,
    }
}

/// CDF of the standard normal distribution.
pub fn normal_cdf(z: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.cdf(z),
        Err(_) => f64::NAN,
    }
}

/// CDF of the chi-square distribution.
pub fn chi_square_cdf(x: f64, df: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    match ChiSquared::new(df) {
        Ok(dist) => dist.cdf(x),
        Err(_) => f64::NAN,
    }
}

/// Upper tail probability `P(Q > q)` of the studentized range for `k` means
/// and `df` error degrees of freedom.
pub fn studentized_range_tail(q: f64, k: f64, df: f64) -> f64 {
    let cdf = ptukey(q, 1.0, k, df);
    if cdf.is_nan() {
        return f64::NAN;
    }
    (1.0 - cdf).clamp(0.0, 1.0)
}

#[inline]
fn phi(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

const WPROB_LEGENDRE_NODES: [f64; 6] = [
    0.981560634246719250690549090149,
    0.904117256370474856678465866119,
    0.769902674194304687036893833213,
    0.587317954286617447296702418941,
    0.367831498998180193752691536644,
    0.125233408511468915472441369464,
];

const WPROB_LEGENDRE_WEIGHTS: [f64; 6] = [
    0.047175336386511827194615961485,
    0.106939325995318430960254718194,
    0.160078328543346226334652529543,
    0.203167426723065921749064455810,
    0.233492536538354808760849898925,
    0.249147045813402785000562436043,
];

const PTUKEY_LEGENDRE_NODES: [f64; 8] = [
    0.989400934991649932596154173450,
    0.944575023073232576077988415535,
    0.865631202387831743880467897712,
    0.755404408355003033895101194847,
    0.617876244402643748446671764049,
    0.458016777657227386342419442984,
    0.281603550779258913230460501460,
    0.950125098376374401853193354250e-1,
];

const PTUKEY_LEGENDRE_WEIGHTS: [f64; 8] = [
    0.271524594117540948517805724560e-1,
    0.622535239386478928628438369944e-1,
    0.951585116824927848099251076022e-1,
    0.124628971255533872052476282192,
    0.149595988816576732081501730547,
    0.169156519395002538189312079030,
    0.182603415044923588866763667969,
    0.189450610455068496285396723208,
];

/// Probability that the range of `cc` standard normal samples is below `w`
/// (raised to `rr` independent ranges), via Hartley's form.
fn wprob(w: f64, rr: f64, cc: f64) -> f64 {
    const UPPER: f64 = 8.0;
    let qsqz = w * 0.5;

    if qsqz >= UPPER {
        return 1.0;
    }

    // (2 * phi(w/2) - 1)^cc, dropped below ~2e-22
    let mut pr_w = 2.0 * phi(qsqz) - 1.0;
    pr_w = if pr_w >= (-50.0 / cc).exp() {
        pr_w.powf(cc)
    } else {
        0.0
    };

    let intervals = if w > 3.0 { 2 } else { 3 };
    let binc = (UPPER - qsqz) / intervals as f64;
    let mut blb = qsqz;
    let mut bub = blb + binc;
    let cc1 = cc - 1.0;
    let mut integral = 0.0;

    for _ in 0..intervals {
        let a = 0.5 * (bub + blb);
        let b = 0.5 * (bub - blb);
        let mut interval_sum = 0.0;

        for jj in 1..=12 {
            let (j, xx) = if jj > 6 {
                let j = 12 - jj;
                (j, WPROB_LEGENDRE_NODES[j])
            } else {
                let j = jj - 1;
                (j, -WPROB_LEGENDRE_NODES[j])
            };
            let ac = a + b * xx;
            let qexpo = ac * ac;
            if qexpo > 60.0 {
                break;
            }

            let inner = phi(ac) - phi(ac - w);
            if inner >= (-30.0 / cc1).exp() {
                interval_sum += WPROB_LEGENDRE_WEIGHTS[j] * (-0.5 * qexpo).exp() * inner.powf(cc1);
            }
        }

        interval_sum *= (2.0 * b) * cc / (2.0 * std::f64::consts::PI).sqrt();
        integral += interval_sum;
        blb = bub;
        bub += binc;
    }

    pr_w += integral;
    if pr_w <= (-30.0 / rr).exp() {
        return 0.0;
    }

    pr_w.powf(rr).min(1.0)
}

/// Lower-tail CDF of the studentized range distribution.
///
/// Copenhaver & Holland (1988), integrating the range probability against the
/// chi density of the error variance with Gauss-Legendre quadrature.
fn ptukey(q: f64, rr: f64, cc: f64, df: f64) -> f64 {
    if q.is_nan() || rr.is_nan() || cc.is_nan() || df.is_nan() {
        return f64::NAN;
    }
    if q <= 0.0 {
        return 0.0;
    }
    if df < 2.0 || rr < 1.0 || cc < 2.0 {
        return f64::NAN;
    }
    if !q.is_finite() {
        return 1.0;
    }
    if df > 25_000.0 {
        return wprob(q, rr, cc);
    }

    let f2 = df * 0.5;
    let f21 = f2 - 1.0;
    let ff4 = df * 0.25;
    let ulen: f64 = if df <= 100.0 {
        1.0
    } else if df <= 800.0 {
        0.5
    } else if df <= 5000.0 {
        0.25
    } else {
        0.125
    };
    let f2lf = (f2 * df.ln()) - (df * LN_2) - ln_gamma(f2) + ulen.ln();

    let mut ans = 0.0;
    for i in 1..=50 {
        let twa1 = (2 * i - 1) as f64 * ulen;
        let mut interval_sum = 0.0;

        for jj in 1..=16 {
            let (j, upper) = if jj > 8 { (jj - 9, true) } else { (jj - 1, false) };
            let offset = PTUKEY_LEGENDRE_NODES[j] * ulen;
            let t1 = if upper {
                f2lf + f21 * (twa1 + offset).ln() - (offset + twa1) * ff4
            } else {
                f2lf + f21 * (twa1 - offset).ln() + (offset - twa1) * ff4
            };

            // exp(t1) < 9e-14 contributes nothing
            if t1 >= -30.0 {
                let qsqz = if upper {
                    q * ((offset + twa1) * 0.5).sqrt()
                } else {
                    q * ((twa1 - offset) * 0.5).sqrt()
                };
                interval_sum += wprob(qsqz, rr, cc) * PTUKEY_LEGENDRE_WEIGHTS[j] * t1.exp();
            }
        }

        // at least 1/ulen intervals so the left tail is not cut short
        if i as f64 * ulen >= 1.0 && interval_sum <= 1.0e-14 {
            break;
        }
        ans += interval_sum;
    }

    ans.min(1.0)
}

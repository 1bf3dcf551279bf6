//! Properties of the width algebra.

use fir_ir::{BigInt, Width};

fn samples() -> Vec<Width> {
    let mut widths: Vec<Width> = [0i64, 1, 2, 7, 8, 63, 64, 65, 1000]
        .into_iter()
        .map(Width::known)
        .collect();
    widths.push(Width::Known(BigInt::from(u64::MAX) * 4));
    widths
}

#[test]
fn add_then_sub_is_identity() {
    for a in samples() {
        for b in samples() {
            assert_eq!(&(&a + &b) - &b, a, "({a:?} + {b:?}) - {b:?}");
        }
    }
}

#[test]
fn unknown_absorbs_every_operation() {
    let u = Width::Unknown;
    for a in samples().into_iter().chain([Width::Unknown]) {
        assert_eq!(&a + &u, Width::Unknown);
        assert_eq!(&u + &a, Width::Unknown);
        assert_eq!(&a - &u, Width::Unknown);
        assert_eq!(&u - &a, Width::Unknown);
        assert_eq!(a.max(&u), Width::Unknown);
        assert_eq!(u.max(&a), Width::Unknown);
        assert_eq!(a.min(&u), Width::Unknown);
        assert_eq!(u.min(&a), Width::Unknown);
    }
}

#[test]
fn known_operands_give_exact_results() {
    for a in samples() {
        for b in samples() {
            let (x, y) = (a.value().unwrap(), b.value().unwrap());
            assert_eq!(&a + &b, Width::Known(x + y));
            assert_eq!(a.max(&b), Width::Known(x.max(y).clone()));
            assert_eq!(a.min(&b), Width::Known(x.min(y).clone()));
        }
    }
}

#[test]
fn subtraction_may_go_negative() {
    let w = Width::known(3) - Width::known(8);
    assert_eq!(w, Width::known(-5));
    assert!(w.is_negative());
}

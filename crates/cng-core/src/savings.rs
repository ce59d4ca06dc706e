//! Savings engine
//!
//! Turns one refuel's raw inputs into a complete [`TripMetrics`] record.
//! Pure arithmetic: no I/O, no logging, no rounding between steps.

use crate::error::{Error, Result};
use crate::models::{TripInputs, TripMetrics};

/// Fixed CNG overhead (currency units) subtracted from every trip's savings.
///
/// The one tunable in the formula; its derivation is not recorded.
pub const FIXED_OVERHEAD: f64 = 10.0;

/// Petrol mileage (km per litre) assumed when the user does not give one
pub const DEFAULT_PETROL_MILEAGE: f64 = 18.4;

/// Petrol price (currency per litre) offered as the comparison default by the shells
pub const DEFAULT_PETROL_PRICE: f64 = 95.0;

/// Compute the full metrics record for one refuel.
///
/// Fails with [`Error::InvalidInput`] when a denominator (`cng_price_per_kg`,
/// `distance_covered`, `petrol_mileage`, or the derived `cng_amount_filled`)
/// would be zero, when a cost or price is negative, when any input is not
/// a finite number, or when a derived value under- or overflows.
pub fn compute_trip_metrics(inputs: &TripInputs) -> Result<TripMetrics> {
    validate(inputs)?;

    let TripInputs {
        cng_price_per_kg,
        total_cng_cost,
        distance_covered,
        petrol_price,
        petrol_mileage,
    } = *inputs;

    let cng_amount_filled = total_cng_cost / cng_price_per_kg;
    let cng_mileage = distance_covered / cng_amount_filled;
    let cng_fuel_cost = total_cng_cost;
    let petrol_fuel_cost = (distance_covered / petrol_mileage) * petrol_price;
    let savings = petrol_fuel_cost - cng_fuel_cost - FIXED_OVERHEAD;
    let cng_price_per_km = total_cng_cost / distance_covered;
    let petrol_price_per_km = petrol_fuel_cost / distance_covered;

    let metrics = TripMetrics {
        cng_price_per_kg,
        total_cng_cost,
        cng_amount_filled,
        distance_covered,
        cng_mileage,
        petrol_price,
        petrol_mileage,
        cng_fuel_cost,
        petrol_fuel_cost,
        savings,
        cng_price_per_km,
        petrol_price_per_km,
    };
    check_derived(&metrics)?;
    Ok(metrics)
}

/// Reject records whose derived values under- or overflowed.
///
/// Finite inputs can still produce a zero fill (e.g. a subnormal cost over a
/// large price) or an infinite cost at extreme magnitudes.
fn check_derived(m: &TripMetrics) -> Result<()> {
    if m.cng_amount_filled <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "cng_amount_filled underflowed to {} (total_cng_cost too small for cng_price_per_kg)",
            m.cng_amount_filled
        )));
    }

    for (name, value) in [
        ("cng_amount_filled", m.cng_amount_filled),
        ("cng_mileage", m.cng_mileage),
        ("petrol_fuel_cost", m.petrol_fuel_cost),
        ("savings", m.savings),
        ("cng_price_per_km", m.cng_price_per_km),
        ("petrol_price_per_km", m.petrol_price_per_km),
    ] {
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{} is out of range ({}); inputs are too extreme",
                name, value
            )));
        }
    }
    Ok(())
}

fn validate(inputs: &TripInputs) -> Result<()> {
    let fields = [
        ("cng_price_per_kg", inputs.cng_price_per_kg),
        ("total_cng_cost", inputs.total_cng_cost),
        ("distance_covered", inputs.distance_covered),
        ("petrol_price", inputs.petrol_price),
        ("petrol_mileage", inputs.petrol_mileage),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }
    }

    // Denominators: zero would divide by zero, negative is meaningless
    for (name, value) in [
        ("cng_price_per_kg", inputs.cng_price_per_kg),
        ("distance_covered", inputs.distance_covered),
        ("petrol_mileage", inputs.petrol_mileage),
    ] {
        if value <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "{} must be greater than zero (division by zero), got {}",
                name, value
            )));
        }
    }

    for (name, value) in [
        ("total_cng_cost", inputs.total_cng_cost),
        ("petrol_price", inputs.petrol_price),
    ] {
        if value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "{} must not be negative, got {}",
                name, value
            )));
        }
    }

    // cng_amount_filled becomes the mileage denominator
    if inputs.total_cng_cost == 0.0 {
        return Err(Error::InvalidInput(
            "total_cng_cost must be greater than zero: no CNG filled means mileage is undefined (division by zero)"
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= TOLERANCE * scale,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_reference_trip() {
        let m = compute_trip_metrics(&TripInputs::new(75.0, 300.0, 120.0, 95.0)).unwrap();

        assert_close(m.cng_amount_filled, 4.0);
        assert_close(m.cng_mileage, 30.0);
        assert_close(m.cng_fuel_cost, 300.0);
        assert_close(m.petrol_fuel_cost, (120.0 / 18.4) * 95.0);
        assert_close(m.savings, (120.0 / 18.4) * 95.0 - 300.0 - 10.0);
        assert_close(m.cng_price_per_km, 2.5);
        assert_close(m.petrol_price_per_km, ((120.0 / 18.4) * 95.0) / 120.0);

        assert!((m.petrol_fuel_cost - 619.565).abs() < 1e-3);
        assert!((m.savings - 309.565).abs() < 1e-3);
        assert!((m.petrol_price_per_km - 5.163).abs() < 1e-3);
    }

    #[test]
    fn test_default_petrol_mileage() {
        let inputs = TripInputs::new(80.0, 400.0, 150.0, 100.0);
        assert_eq!(inputs.petrol_mileage, DEFAULT_PETROL_MILEAGE);

        let m = compute_trip_metrics(&inputs).unwrap();
        assert_eq!(m.petrol_mileage, 18.4);
    }

    #[test]
    fn test_custom_petrol_mileage() {
        let inputs = TripInputs::new(80.0, 400.0, 150.0, 100.0).with_petrol_mileage(15.0);
        let m = compute_trip_metrics(&inputs).unwrap();
        assert_close(m.petrol_fuel_cost, 1000.0);
        assert_close(m.savings, 1000.0 - 400.0 - FIXED_OVERHEAD);
    }

    #[test]
    fn test_savings_can_be_negative() {
        // Cheap petrol, short distance: CNG loses once the overhead is applied
        let m = compute_trip_metrics(&TripInputs::new(90.0, 450.0, 50.0, 20.0)).unwrap();
        assert!(m.savings < 0.0);
        assert!(m.check_invariants(TOLERANCE).is_ok());
    }

    #[test]
    fn test_zero_petrol_price_is_valid() {
        let m = compute_trip_metrics(&TripInputs::new(75.0, 300.0, 120.0, 0.0)).unwrap();
        assert_eq!(m.petrol_fuel_cost, 0.0);
        assert_eq!(m.petrol_price_per_km, 0.0);
        assert_close(m.savings, -310.0);
    }

    #[test]
    fn test_invariants_hold_across_inputs() {
        let prices = [0.5, 75.0, 89.9, 1234.0];
        let costs = [0.01, 300.0, 999.99];
        let distances = [0.1, 120.0, 5000.0];
        let petrol_prices = [0.0, 95.0, 110.5];
        let mileages = [0.5, 18.4, 42.0];

        for &p in &prices {
            for &c in &costs {
                for &d in &distances {
                    for &pp in &petrol_prices {
                        for &pm in &mileages {
                            let inputs = TripInputs::new(p, c, d, pp).with_petrol_mileage(pm);
                            let m = compute_trip_metrics(&inputs).unwrap();
                            assert_eq!(m.check_invariants(TOLERANCE), Ok(()), "{:?}", inputs);
                            assert_eq!(m.inputs(), inputs);
                        }
                    }
                }
            }
        }
    }

    fn assert_rejected_naming(inputs: TripInputs, field: &str) {
        match compute_trip_metrics(&inputs) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains(field), "{}", msg),
            other => panic!("expected InvalidInput naming {}, got {:?}", field, other),
        }
    }

    #[test]
    fn test_underflowed_fill_rejected() {
        // 1e-320 / 1e10 rounds to zero, which would make the mileage infinite
        assert_rejected_naming(TripInputs::new(1e10, 1e-320, 120.0, 95.0), "cng_amount_filled");
        // Smallest subnormal cost: the fill is positive but the mileage overflows
        assert_rejected_naming(TripInputs::new(1.0, 5e-324, 120.0, 95.0), "cng_mileage");
    }

    #[test]
    fn test_overflowed_petrol_cost_rejected() {
        let inputs = TripInputs::new(75.0, 300.0, 1e300, 95.0).with_petrol_mileage(1e-10);
        assert_rejected_naming(inputs, "petrol_fuel_cost");
    }

    #[test]
    fn test_extreme_magnitudes_are_finite_or_rejected() {
        let cases = [
            TripInputs::new(1e-300, 1e-300, 120.0, 95.0),
            TripInputs::new(1e10, 1e-320, 120.0, 95.0),
            TripInputs::new(1.0, 5e-324, 120.0, 95.0),
            TripInputs::new(75.0, 300.0, 1e300, 95.0).with_petrol_mileage(1e-10),
            TripInputs::new(75.0, 300.0, 1e12, 1e3).with_petrol_mileage(0.01),
            TripInputs::new(75.0, 1e300, 120.0, 95.0),
            TripInputs::new(75.0, 300.0, 1e-300, 95.0),
            TripInputs::new(75.0, 300.0, 120.0, f64::MAX).with_petrol_mileage(0.5),
        ];

        for inputs in cases {
            match compute_trip_metrics(&inputs) {
                Ok(m) => {
                    assert!(m.cng_amount_filled > 0.0, "{:?}", inputs);
                    assert_eq!(m.check_invariants(TOLERANCE), Ok(()), "{:?}", inputs);
                    for v in [
                        m.cng_mileage,
                        m.petrol_fuel_cost,
                        m.savings,
                        m.cng_price_per_km,
                        m.petrol_price_per_km,
                    ] {
                        assert!(v.is_finite(), "{:?} -> {:?}", inputs, m);
                    }
                }
                Err(Error::InvalidInput(_)) => {}
                Err(other) => panic!("unexpected error {:?} for {:?}", other, inputs),
            }
        }
    }

    #[test]
    fn test_zero_denominators_rejected() {
        let cases = [
            (TripInputs::new(0.0, 300.0, 120.0, 95.0), "cng_price_per_kg"),
            (TripInputs::new(75.0, 300.0, 0.0, 95.0), "distance_covered"),
            (
                TripInputs::new(75.0, 300.0, 120.0, 95.0).with_petrol_mileage(0.0),
                "petrol_mileage",
            ),
        ];

        for (inputs, field) in cases {
            match compute_trip_metrics(&inputs) {
                Err(Error::InvalidInput(msg)) => assert!(msg.contains(field), "{}", msg),
                other => panic!("expected InvalidInput for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_zero_cost_rejected() {
        let result = compute_trip_metrics(&TripInputs::new(75.0, 0.0, 120.0, 95.0));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_negative_values_rejected() {
        assert!(matches!(
            compute_trip_metrics(&TripInputs::new(-75.0, 300.0, 120.0, 95.0)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_trip_metrics(&TripInputs::new(75.0, -300.0, 120.0, 95.0)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_trip_metrics(&TripInputs::new(75.0, 300.0, 120.0, -1.0)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            compute_trip_metrics(&TripInputs::new(f64::NAN, 300.0, 120.0, 95.0)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_trip_metrics(&TripInputs::new(75.0, 300.0, f64::INFINITY, 95.0)),
            Err(Error::InvalidInput(_))
        ));
    }
}

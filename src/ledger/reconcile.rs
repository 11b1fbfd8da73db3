use rust_decimal::Decimal;

/// Outcome of comparing a calculated balance against the bank's figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub reconciled: bool,
    /// `calculated - asserted`; signed so the caller can see which side is
    /// ahead.
    pub difference: Decimal,
    pub calculated: Decimal,
    pub asserted: Decimal,
}

/// Whether two balances agree to within `epsilon` (strictly less than).
pub fn is_balance_reconciled(calculated: Decimal, asserted: Decimal, epsilon: Decimal) -> bool {
    (calculated - asserted).abs() < epsilon
}

/// Compare a calculated balance against the bank statement's figure.
pub fn reconcile(calculated: Decimal, asserted: Decimal, epsilon: Decimal) -> Reconciliation {
    Reconciliation {
        reconciled: is_balance_reconciled(calculated, asserted, epsilon),
        difference: calculated - asserted,
        calculated,
        asserted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn exact_match_reconciles() {
        assert!(is_balance_reconciled(dec("1000.00"), dec("1000.00"), dec("0.01")));
    }

    #[test]
    fn difference_inside_tolerance_reconciles() {
        assert!(is_balance_reconciled(dec("1000.00"), dec("1000.01"), dec("0.02")));
        assert!(is_balance_reconciled(dec("1000.01"), dec("1000.00"), dec("0.02")));
    }

    #[test]
    fn difference_equal_to_tolerance_does_not_reconcile() {
        assert!(!is_balance_reconciled(dec("1000.00"), dec("1000.01"), dec("0.01")));
    }

    #[test]
    fn reconcile_reports_the_signed_difference() {
        let result = reconcile(dec("999.95"), dec("1000.00"), dec("0.01"));
        assert!(!result.reconciled);
        assert_eq!(result.difference, dec("-0.05"));
        assert_eq!(result.calculated, dec("999.95"));
        assert_eq!(result.asserted, dec("1000.00"));
    }
}

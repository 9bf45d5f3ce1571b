/// Order pricing helpers.
///
/// Service tiers are priced per 1000 units; monetary values are stored as
/// whole `i64` units of the panel currency.

/// Total price of `quantity` units at `rate` per 1000, rounded to the
/// nearest whole unit (half up).
pub fn order_total(rate: i64, quantity: i32) -> i64 {
    let raw = rate as i128 * quantity as i128;
    ((raw + 500) / 1000) as i64
}

/// Quantity bounds check for a service tier.
pub fn quantity_in_bounds(quantity: i32, min: i32, max: i32) -> bool {
    quantity >= min && quantity <= max
}

/// Balance snapshots for a batch of debits applied in order: the ledger row
/// written for each debit carries the balance after that specific debit, not
/// the batch's final balance.
pub fn running_balances(balance: i64, debits: &[i64]) -> Vec<i64> {
    debits
        .iter()
        .scan(balance, |balance, debit| {
            *balance -= debit;
            Some(*balance)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total() {
        assert_eq!(order_total(10_000, 500), 5_000);
        assert_eq!(order_total(10_000, 1000), 10_000);
        assert_eq!(order_total(1_500, 100), 150);
    }

    #[test]
    fn test_order_total_rounds_half_up() {
        // 7 * 250 / 1000 = 1.75 -> 2
        assert_eq!(order_total(7, 250), 2);
        // 7 * 200 / 1000 = 1.4 -> 1
        assert_eq!(order_total(7, 200), 1);
        // exactly .5 rounds up
        assert_eq!(order_total(1, 500), 1);
    }

    #[test]
    fn test_order_total_large_values_do_not_overflow() {
        let total = order_total(i64::MAX / 2_000_000, 2_000_000);
        assert!(total > 0);
    }

    #[test]
    fn test_running_balances_walk_line_by_line() {
        assert_eq!(running_balances(20_000, &[5_000, 3_000]), [15_000, 12_000]);
        assert_eq!(running_balances(100, &[]), Vec::<i64>::new());
    }

    #[test]
    fn test_quantity_in_bounds() {
        assert!(quantity_in_bounds(100, 100, 1000));
        assert!(quantity_in_bounds(1000, 100, 1000));
        assert!(!quantity_in_bounds(99, 100, 1000));
        assert!(!quantity_in_bounds(1001, 100, 1000));
    }
}

//! Servicio de pricing
//!
//! Cálculo puro del precio de una reserva: rango de fechas × tarifa diaria.
//! Sin efectos secundarios; la tarifa se lee del vehículo al momento de la
//! llamada y queda congelada en el registro de la reserva.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::utils::errors::AppError;

/// Fracción del total que se cobra como depósito (30%)
const DEPOSIT_RATE: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Resultado del cálculo de precio
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub total_days: i64,
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
}

/// Calcular el precio de una reserva para `[start, end)`.
///
/// Falla con error de validación si el rango no es positivo.
pub fn price(daily_rate: Decimal, start: NaiveDate, end: NaiveDate) -> Result<Quote, AppError> {
    let total_days = (end - start).num_days();
    if total_days <= 0 {
        return Err(AppError::Validation(format!(
            "Invalid date range: {} to {} yields {} days",
            start, end, total_days
        )));
    }

    let total_amount = daily_rate * Decimal::from(total_days);
    let deposit_amount = (total_amount * DEPOSIT_RATE).round_dp(2);

    Ok(Quote {
        total_days,
        total_amount,
        deposit_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_basic_quote() {
        let quote = price(dec("100.00"), date(2025, 1, 10), date(2025, 1, 15)).unwrap();
        assert_eq!(quote.total_days, 5);
        assert_eq!(quote.total_amount, dec("500.00"));
        assert_eq!(quote.deposit_amount, dec("150.00"));
    }

    #[test]
    fn test_deposit_rounds_to_cents() {
        // 3 días × 33.33 = 99.99; 30% = 29.997 -> 30.00
        let quote = price(dec("33.33"), date(2025, 1, 1), date(2025, 1, 4)).unwrap();
        assert_eq!(quote.total_amount, dec("99.99"));
        assert_eq!(quote.deposit_amount, dec("30.00"));
    }

    #[test]
    fn test_pricing_is_deterministic() {
        let a = price(dec("75.50"), date(2025, 6, 1), date(2025, 6, 8)).unwrap();
        let b = price(dec("75.50"), date(2025, 6, 1), date(2025, 6, 8)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total_amount, dec("75.50") * Decimal::from(a.total_days));
    }

    #[test]
    fn test_rejects_empty_range() {
        let err = price(dec("100.00"), date(2025, 1, 10), date(2025, 1, 10)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = price(dec("100.00"), date(2025, 1, 15), date(2025, 1, 10)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

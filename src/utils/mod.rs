/*
 * Utility functions and helpers
 */

use ethers::types::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use crate::models::{AmountUnits, QuoterError, Result};

fn pow10(exp: u32) -> Result<U256> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or_else(|| QuoterError::CalculationError(format!("10^{exp} overflows U256")))
}

/// Converts a human readable amount into smallest units, truncating extra precision.
pub fn to_units(amount: Decimal, decimals: u8) -> Result<AmountUnits> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(QuoterError::CalculationError(format!("Negative amount: {amount}")));
    }

    let truncated = amount.round_dp_with_strategy(u32::from(decimals), RoundingStrategy::ToZero);
    let scale = truncated.scale();
    let mantissa = u128::try_from(truncated.mantissa())
        .map_err(|e| QuoterError::CalculationError(format!("Invalid mantissa: {e}")))?;

    U256::from(mantissa)
        .checked_mul(pow10(u32::from(decimals) - scale)?)
        .ok_or_else(|| QuoterError::CalculationError(format!("{amount} overflows U256")))
}

/// Formats smallest units as a decimal string without trailing zeros.
pub fn format_units(amount: AmountUnits, decimals: u8) -> Result<String> {
    let unit = pow10(u32::from(decimals))?;
    let (whole, fraction) = amount.div_mod(unit);
    if fraction.is_zero() {
        return Ok(whole.to_string());
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = usize::from(decimals));
    Ok(format!("{whole}.{}", fraction.trim_end_matches('0')))
}

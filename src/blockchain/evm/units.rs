//! Amount scaling and address parsing.

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;

use crate::transfer::ValidationError;

/// Convert a user-facing amount to integer base units: `amount × 10^scale`,
/// truncated toward zero.
///
/// Works on the decimal's mantissa and exponent in 256-bit integers, so the
/// result is exact whenever it fits.
pub fn to_base_units(amount: Decimal, scale: u32) -> Result<U256, ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount(amount));
    }

    let overflow = || ValidationError::AmountOverflow { amount, scale };
    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let exponent = amount.scale();

    if scale >= exponent {
        let factor = pow10(scale - exponent).ok_or_else(overflow)?;
        mantissa.checked_mul(factor).ok_or_else(overflow)
    } else {
        // More fractional digits than the asset has: drop the excess.
        let divisor = pow10(exponent - scale).ok_or_else(overflow)?;
        Ok(mantissa / divisor)
    }
}

fn pow10(exp: u32) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

/// Parse a hex address leniently: optional `0x`/`0X` prefix, short values
/// left-padded to 20 bytes. Non-hex or over-long input is rejected.
pub fn parse_address(value: &str) -> Result<Address, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidAddress {
        address: value.to_string(),
        reason: reason.to_string(),
    };

    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if digits.is_empty() {
        return Err(invalid("no hex digits"));
    }
    if digits.len() > 40 {
        return Err(invalid("longer than 20 bytes"));
    }

    let padded = format!("{digits:0>40}");
    let bytes = alloy::hex::decode(padded).map_err(|e| invalid(&e.to_string()))?;
    Ok(Address::from_slice(&bytes))
}

use rust_decimal::Decimal;

/// Boolean results are always one of these two decimals.
pub const TRUE: Decimal = Decimal::ONE;
pub const FALSE: Decimal = Decimal::ZERO;

/// Zero is false, anything else is true.
pub fn truthy(value: &Decimal) -> bool {
    !value.is_zero()
}

pub fn from_bool(value: bool) -> Decimal {
    if value { TRUE } else { FALSE }
}

/// Reads a bound value; scientific notation such as `1e5` is accepted too.
pub fn parse_value(text: &str) -> Result<Decimal, rust_decimal::Error> {
    match Decimal::from_str_exact(text) {
        Err(_) if text.contains(['e', 'E']) => Decimal::from_scientific(text),
        parsed => parsed,
    }
}

//! Domain-level constants.

// =============================================================================
// Exchange rates
// =============================================================================

/// Separator between base and quote currency in a pair name ("USD-EUR")
pub const PAIR_SEPARATOR: char = '-';

/// Length of an ISO 4217 currency code
pub const CURRENCY_CODE_LENGTH: usize = 3;

//! Currency ledger over the host's economy system.
//!
//! The ledger never assumes a specific economy shape, only
//! balance/debit/credit semantics. A reading of `None` means "could not
//! determine the balance", never "zero": callers permit the attempt and
//! let the debit fail naturally. Each host call is assumed atomic; the
//! ledger adds no locking of its own and never issues overlapping
//! mutations for one transaction.

use std::sync::Arc;

use log::debug;

use crate::travel::errors::LedgerError;
use crate::travel::hosts::{EconomyError, EconomyHost};

#[derive(Clone)]
pub struct CurrencyLedger {
    economy: Arc<dyn EconomyHost>,
}

impl CurrencyLedger {
    pub fn new(economy: Arc<dyn EconomyHost>) -> Self {
        Self { economy }
    }

    /// Best-effort balance read.
    pub fn balance(&self) -> Option<i64> {
        self.economy.balance()
    }

    /// Remove `amount` from the balance. Amounts of zero or less are
    /// no-ops so free destinations never touch the economy host.
    pub fn debit(&self, amount: i64) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Ok(());
        }
        if let Some(available) = self.balance() {
            if available < amount {
                return Err(LedgerError::InsufficientFunds {
                    available,
                    required: amount,
                });
            }
        }
        self.economy.withdraw(amount).map_err(map_economy_error)?;
        debug!("debited {}", amount);
        Ok(())
    }

    /// Additive inverse of [`debit`](Self::debit); used purely for
    /// refund-on-failure.
    pub fn credit(&self, amount: i64) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Ok(());
        }
        self.economy.deposit(amount).map_err(map_economy_error)?;
        debug!("credited {}", amount);
        Ok(())
    }
}

fn map_economy_error(e: EconomyError) -> LedgerError {
    match e {
        EconomyError::NotSupported => LedgerError::NotSupported,
        EconomyError::Unavailable(message) => LedgerError::Host(message),
    }
}

use super::account::{AccountNumber, AccountSnapshot, Interest};
use super::registry::{AccountRegistry, RegistryError};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OperationType {
    /// Opens a savings account. Needs `holder`, `amount` (the initial deposit) and `rate`.
    Savings,

    /// Opens a current account. Needs `holder`, `amount` (the initial deposit) and `overdraft`.
    Current,

    /// Credits `amount` to the account.
    Deposit,

    /// Debits `amount` from the account if its withdrawal rule allows it.
    Withdrawal,

    /// Credits interest to a savings account at its own rate.
    Interest,
}

#[derive(Error, Debug)]
pub(crate) enum OperationError {
    #[error("Invalid operation - {0}")]
    Registry(#[from] RegistryError),

    #[error("Invalid input - {operation:?} needs a value for `{field}`")]
    MissingField {
        field: &'static str,
        operation: OperationType,
    },

    #[error("Invalid input - overdraft limit cannot be negative, got {0}")]
    NegativeOverdraft(Decimal),
}

type OperationResult<T> = Result<T, OperationError>;

/// One row of a batch script
#[derive(Deserialize, Debug, Clone)]
pub struct Operation {
    #[serde(rename = "type")]
    operation_type: OperationType,

    account: AccountNumber,

    #[serde(default)]
    holder: Option<String>,

    #[serde(default)]
    amount: Option<Decimal>,

    #[serde(default)]
    rate: Option<Decimal>,

    #[serde(default)]
    overdraft: Option<Decimal>,
}

/// What a successful operation did
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    Opened(AccountSnapshot),
    Balance(Decimal),
    Credited(Interest),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub applied: usize,
    pub rejected: usize,
}

impl Operation {
    pub(crate) fn apply(self, registry: &mut AccountRegistry) -> OperationResult<Outcome> {
        let outcome = match self.operation_type {
            OperationType::Savings => Outcome::Opened(registry.create_savings(
                self.account,
                self.require(self.holder.clone(), "holder")?,
                self.require(self.amount, "amount")?,
                self.require(self.rate, "rate")?,
            )),
            OperationType::Current => {
                let overdraft_limit = self.require(self.overdraft, "overdraft")?;
                if overdraft_limit < dec!(0) {
                    return Err(OperationError::NegativeOverdraft(overdraft_limit));
                }
                Outcome::Opened(registry.create_current(
                    self.account,
                    self.require(self.holder.clone(), "holder")?,
                    self.require(self.amount, "amount")?,
                    overdraft_limit,
                ))
            }
            OperationType::Deposit => Outcome::Balance(
                registry.deposit(self.account, self.require(self.amount, "amount")?)?,
            ),
            OperationType::Withdrawal => Outcome::Balance(
                registry.withdraw(self.account, self.require(self.amount, "amount")?)?,
            ),
            OperationType::Interest => Outcome::Credited(registry.add_interest(self.account)?),
        };
        Ok(outcome)
    }

    fn require<T>(&self, value: Option<T>, field: &'static str) -> OperationResult<T> {
        value.ok_or(OperationError::MissingField {
            field,
            operation: self.operation_type,
        })
    }
}

/// Applies every row of a CSV batch script in order.
///
/// Rejected operations are logged and skipped; a row that cannot be parsed
/// stops the replay.
pub fn replay<R: Read>(reader: R, registry: &mut AccountRegistry) -> anyhow::Result<ReplayStats> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stats = ReplayStats::default();

    for result in rdr.deserialize() {
        let operation: Operation = result?;
        match operation.apply(registry) {
            Ok(outcome) => {
                debug!("{outcome:?}");
                stats.applied += 1;
            }
            Err(e) => {
                warn!("{e}");
                stats.rejected += 1;
            }
        }
    }

    info!(
        "Replayed {} operations, {} rejected",
        stats.applied + stats.rejected,
        stats.rejected
    );
    Ok(stats)
}

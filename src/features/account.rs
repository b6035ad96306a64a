use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct AccountNumber(i32);

impl From<i32> for AccountNumber {
    fn from(number: i32) -> Self {
        Self(number)
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rounds to cents, half away from zero, for display.
pub(crate) fn rounded(amount: &Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum AccountError {
    #[error(
        "Insufficient balance! Cannot withdraw {:.2} from a balance of {:.2}",
        rounded(.requested),
        rounded(.available)
    )]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error(
        "Overdraft limit exceeded! Withdrawing {:.2} from {:.2} would go past the limit of {:.2}",
        rounded(.requested),
        rounded(.available),
        rounded(.limit)
    )]
    OverdraftLimitExceeded {
        requested: Decimal,
        available: Decimal,
        limit: Decimal,
    },

    #[error("Interest only applies to savings accounts, {0} is a current account")]
    InterestNotApplicable(AccountNumber),

    #[error("Amount out of range! The {operation} would overflow the balance of account {account}")]
    Overflow {
        operation: &'static str,
        account: AccountNumber,
    },
}

pub(crate) type AccountResult<T> = Result<T, AccountError>;

/// The withdrawal rule an account follows, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccountKind {
    /// Interest is a percentage of the balance, only credited on request.
    Savings { interest_rate: Decimal },

    /// The balance may go as far as `-overdraft_limit`, never below.
    Current { overdraft_limit: Decimal },
}

impl AccountKind {
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Savings { .. } => "savings",
            AccountKind::Current { .. } => "current",
        }
    }
}

/// Interest credited to a savings account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interest {
    pub interest: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct Account {
    number: AccountNumber,
    holder: String,
    balance: Decimal,
    kind: AccountKind,
}

/// Read-only view of an account for presentation
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    #[serde(rename = "account")]
    pub number: AccountNumber,

    pub holder: String,

    #[serde(rename = "type")]
    pub kind: &'static str,

    #[serde(serialize_with = "round_serialize")]
    pub balance: Decimal,
}

fn round_serialize<S>(amount: &Decimal, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Serialize to 4 decimal
    let rounded_amount = amount.round_dp(4).to_string();
    s.serialize_str(rounded_amount.as_str())
}

impl fmt::Display for AccountSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account Number: {}, Holder: {}, Type: {}, Balance: {:.2}",
            self.number,
            self.holder,
            self.kind,
            rounded(&self.balance)
        )
    }
}

impl Account {
    pub(crate) fn savings(
        number: AccountNumber,
        holder: impl Into<String>,
        initial_deposit: Decimal,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            number,
            holder: holder.into(),
            balance: initial_deposit,
            kind: AccountKind::Savings { interest_rate },
        }
    }

    pub(crate) fn current(
        number: AccountNumber,
        holder: impl Into<String>,
        initial_deposit: Decimal,
        overdraft_limit: Decimal,
    ) -> Self {
        Self {
            number,
            holder: holder.into(),
            balance: initial_deposit,
            kind: AccountKind::Current { overdraft_limit },
        }
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    fn overflow(&self, operation: &'static str) -> AccountError {
        AccountError::Overflow {
            operation,
            account: self.number,
        }
    }

    /// Credits `amount` as given. Non-positive amounts are let through and
    /// only logged.
    pub(crate) fn deposit(&mut self, amount: Decimal) -> AccountResult<Decimal> {
        if amount <= dec!(0) {
            warn!(
                "Non-positive deposit of {} into account {}",
                amount, self.number
            );
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| self.overflow("deposit"))?;
        Ok(self.balance)
    }

    pub(crate) fn withdraw(&mut self, amount: Decimal) -> AccountResult<Decimal> {
        if let AccountKind::Savings { .. } = self.kind {
            if amount > self.balance {
                return Err(AccountError::InsufficientBalance {
                    requested: amount,
                    available: self.balance,
                });
            }
        }

        let remaining = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| self.overflow("withdrawal"))?;

        if let AccountKind::Current { overdraft_limit } = self.kind {
            if remaining < -overdraft_limit {
                return Err(AccountError::OverdraftLimitExceeded {
                    requested: amount,
                    available: self.balance,
                    limit: overdraft_limit,
                });
            }
        }

        self.balance = remaining;
        Ok(self.balance)
    }

    pub(crate) fn add_interest(&mut self) -> AccountResult<Interest> {
        let interest_rate = match self.kind {
            AccountKind::Savings { interest_rate } => interest_rate,
            AccountKind::Current { .. } => {
                return Err(AccountError::InterestNotApplicable(self.number))
            }
        };

        let interest = self
            .balance
            .checked_mul(interest_rate)
            .and_then(|product| product.checked_div(dec!(100)))
            .ok_or_else(|| self.overflow("interest"))?;
        self.balance = self
            .balance
            .checked_add(interest)
            .ok_or_else(|| self.overflow("interest"))?;
        Ok(Interest {
            interest,
            balance: self.balance,
        })
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            number: self.number,
            holder: self.holder.clone(),
            kind: self.kind.label(),
            balance: self.balance,
        }
    }
}

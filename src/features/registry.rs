use super::account::{Account, AccountError, AccountNumber, AccountSnapshot, Interest};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum RegistryError {
    #[error("Account {0} not found!")]
    AccountNotFound(AccountNumber),

    #[error("No accounts found!")]
    NoAccounts,

    #[error(transparent)]
    Rejected(#[from] AccountError),
}

pub(crate) type RegistryResult<T> = Result<T, RegistryError>;

/// Keeps every account opened during this run, in the order they were opened.
///
/// Lookups scan from the front, so when two accounts share a number the
/// older one wins and the newer one is unreachable.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    pub(crate) fn new() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }

    pub(crate) fn create_account(&mut self, account: Account) -> AccountSnapshot {
        if self.find(account.number()).is_some() {
            warn!(
                "Account {} already exists, the new one will be shadowed",
                account.number()
            );
        }

        info!(
            "Opened {} account {} with balance {}",
            account.kind().label(),
            account.number(),
            account.balance()
        );
        let snapshot = account.snapshot();
        self.accounts.push(account);
        snapshot
    }

    pub(crate) fn create_savings(
        &mut self,
        number: AccountNumber,
        holder: impl Into<String>,
        initial_deposit: Decimal,
        interest_rate: Decimal,
    ) -> AccountSnapshot {
        self.create_account(Account::savings(
            number,
            holder,
            initial_deposit,
            interest_rate,
        ))
    }

    pub(crate) fn create_current(
        &mut self,
        number: AccountNumber,
        holder: impl Into<String>,
        initial_deposit: Decimal,
        overdraft_limit: Decimal,
    ) -> AccountSnapshot {
        self.create_account(Account::current(
            number,
            holder,
            initial_deposit,
            overdraft_limit,
        ))
    }

    pub(crate) fn deposit(
        &mut self,
        number: AccountNumber,
        amount: Decimal,
    ) -> RegistryResult<Decimal> {
        let balance = self.find_mut(number)?.deposit(amount).map_err(|e| {
            warn!("Deposit into {} rejected: {}", number, e);
            e
        })?;
        debug!("Deposited {} into {}, balance {}", amount, number, balance);
        Ok(balance)
    }

    pub(crate) fn withdraw(
        &mut self,
        number: AccountNumber,
        amount: Decimal,
    ) -> RegistryResult<Decimal> {
        let balance = self.find_mut(number)?.withdraw(amount).map_err(|e| {
            warn!("Withdrawal from {} rejected: {}", number, e);
            e
        })?;
        debug!("Withdrew {} from {}, balance {}", amount, number, balance);
        Ok(balance)
    }

    pub(crate) fn add_interest(&mut self, number: AccountNumber) -> RegistryResult<Interest> {
        let credited = self.find_mut(number)?.add_interest()?;
        debug!(
            "Credited interest {} to {}, balance {}",
            credited.interest, number, credited.balance
        );
        Ok(credited)
    }

    pub(crate) fn details(&self, number: AccountNumber) -> RegistryResult<AccountSnapshot> {
        self.find(number)
            .map(Account::snapshot)
            .ok_or(RegistryError::AccountNotFound(number))
    }

    pub(crate) fn all_details(&self) -> RegistryResult<Vec<AccountSnapshot>> {
        if self.accounts.is_empty() {
            return Err(RegistryError::NoAccounts);
        }

        Ok(self.accounts.iter().map(Account::snapshot).collect())
    }

    pub(crate) fn snapshots(&self) -> Vec<AccountSnapshot> {
        self.accounts.iter().map(Account::snapshot).collect()
    }

    fn find(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts.iter().find(|account| account.number() == number)
    }

    fn find_mut(&mut self, number: AccountNumber) -> RegistryResult<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|account| account.number() == number)
            .ok_or(RegistryError::AccountNotFound(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn registry_with_alice_and_bob() -> AccountRegistry {
        let mut registry = AccountRegistry::new();
        registry.create_savings(AccountNumber::from(1001), "Alice", dec!(500), dec!(5));
        registry.create_current(AccountNumber::from(2002), "Bob", dec!(100), dec!(50));
        registry
    }

    #[test]
    fn create_returns_snapshot_of_new_account() {
        let mut registry = AccountRegistry::new();
        let snapshot =
            registry.create_savings(AccountNumber::from(1001), "Alice", dec!(500), dec!(5));

        assert_eq!(snapshot.number, AccountNumber::from(1001));
        assert_eq!(snapshot.holder, "Alice");
        assert_eq!(snapshot.kind, "savings");
        assert_eq!(snapshot.balance, dec!(500));
    }

    #[test_case(1001, dec!(50), dec!(550) ; "savings")]
    #[test_case(2002, dec!(-10), dec!(90) ; "current with negative amount")]
    fn deposit_by_number(number: i32, amount: Decimal, expected: Decimal) {
        let mut registry = registry_with_alice_and_bob();
        assert_eq!(registry.deposit(number.into(), amount), Ok(expected));
        assert_eq!(registry.details(number.into()).unwrap().balance, expected);
    }

    #[test]
    fn unknown_account_is_reported_without_mutation() {
        let mut registry = registry_with_alice_and_bob();
        let before = registry.snapshots();
        let missing = AccountNumber::from(3003);

        assert_eq!(
            registry.deposit(missing, dec!(10)),
            Err(RegistryError::AccountNotFound(missing))
        );
        assert_eq!(
            registry.withdraw(missing, dec!(10)),
            Err(RegistryError::AccountNotFound(missing))
        );
        assert_eq!(
            registry.details(missing),
            Err(RegistryError::AccountNotFound(missing))
        );
        assert_eq!(
            registry.add_interest(missing),
            Err(RegistryError::AccountNotFound(missing))
        );
        assert_eq!(registry.snapshots(), before);
    }

    #[test]
    fn empty_registry() {
        let mut registry = AccountRegistry::new();

        assert_eq!(registry.all_details(), Err(RegistryError::NoAccounts));
        assert_eq!(
            registry.withdraw(AccountNumber::from(1001), dec!(1)),
            Err(RegistryError::AccountNotFound(AccountNumber::from(1001)))
        );
        assert!(registry.snapshots().is_empty());
    }

    #[test]
    fn withdraw_rejection_is_wrapped() {
        let mut registry = registry_with_alice_and_bob();

        assert_eq!(registry.withdraw(AccountNumber::from(2002), dec!(140)), Ok(dec!(-40)));
        assert_eq!(
            registry.withdraw(AccountNumber::from(2002), dec!(20)),
            Err(RegistryError::Rejected(AccountError::OverdraftLimitExceeded {
                requested: dec!(20),
                available: dec!(-40),
                limit: dec!(50),
            }))
        );
        assert_eq!(registry.details(AccountNumber::from(2002)).unwrap().balance, dec!(-40));
    }

    #[test]
    fn interest_by_number() {
        let mut registry = registry_with_alice_and_bob();

        let credited = registry.add_interest(AccountNumber::from(1001)).unwrap();
        assert_eq!(credited.interest, dec!(25));
        assert_eq!(credited.balance, dec!(525));

        assert!(matches!(
            registry.add_interest(AccountNumber::from(2002)),
            Err(RegistryError::Rejected(AccountError::InterestNotApplicable(_)))
        ));
    }

    #[test]
    fn all_details_keep_insertion_order() {
        let mut registry = AccountRegistry::new();
        registry.create_current(AccountNumber::from(3), "Carol", dec!(0), dec!(0));
        registry.create_savings(AccountNumber::from(1), "Alice", dec!(10), dec!(1));
        registry.create_current(AccountNumber::from(2), "Bob", dec!(20), dec!(5));

        registry.deposit(AccountNumber::from(2), dec!(100)).unwrap();
        registry.withdraw(AccountNumber::from(3), dec!(0)).unwrap();

        let holders: Vec<_> = registry
            .all_details()
            .unwrap()
            .into_iter()
            .map(|snapshot| snapshot.holder)
            .collect();
        assert_eq!(holders, ["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn duplicate_number_is_shadowed_by_first_account() {
        let mut registry = AccountRegistry::new();
        registry.create_savings(AccountNumber::from(7), "First", dec!(10), dec!(1));
        registry.create_current(AccountNumber::from(7), "Second", dec!(20), dec!(5));

        registry.deposit(AccountNumber::from(7), dec!(5)).unwrap();

        let all = registry.all_details().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].balance, dec!(15));
        assert_eq!(all[1].balance, dec!(20));
        assert_eq!(registry.details(AccountNumber::from(7)).unwrap().holder, "First");
    }

    #[test]
    fn overflowing_operations_leave_the_registry_usable() {
        let mut registry = AccountRegistry::new();
        let large = dec!(10000000000000000000);
        registry.create_savings(AccountNumber::from(1), "Zed", Decimal::MAX, dec!(5));
        registry.create_savings(AccountNumber::from(2), "Yan", large, dec!(100000000000));

        assert!(matches!(
            registry.deposit(AccountNumber::from(1), dec!(1)),
            Err(RegistryError::Rejected(AccountError::Overflow { .. }))
        ));
        assert!(matches!(
            registry.add_interest(AccountNumber::from(2)),
            Err(RegistryError::Rejected(AccountError::Overflow { .. }))
        ));

        assert_eq!(registry.withdraw(AccountNumber::from(1), dec!(1)), Ok(Decimal::MAX - dec!(1)));
        assert_eq!(registry.details(AccountNumber::from(2)).unwrap().balance, large);
    }

    #[test]
    fn negative_account_numbers_are_valid_keys() {
        let mut registry = AccountRegistry::new();
        registry.create_current(AccountNumber::from(-5), "Neg", dec!(10), dec!(1));

        assert_eq!(registry.deposit(AccountNumber::from(-5), dec!(2)), Ok(dec!(12)));
        assert_eq!(
            registry.details(AccountNumber::from(5)),
            Err(RegistryError::AccountNotFound(AccountNumber::from(5)))
        );
    }
}

use super::account::{rounded, AccountNumber};
use super::registry::{AccountRegistry, RegistryError};
use anyhow::Context;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use thiserror::Error;

const MENU: &str = "
Banking Application:
1. Create Savings Account
2. Create Current Account
3. Deposit
4. Withdraw
5. View Account Details
6. View All Accounts
7. Exit";

#[derive(Error, Debug)]
pub(crate) enum InputError {
    #[error("Invalid choice! Please try again.")]
    InvalidChoice(String),

    #[error("Invalid {field}: `{value}` is not a number")]
    InvalidValue { field: &'static str, value: String },

    #[error("Invalid overdraft limit: {:.2} cannot be negative", rounded(.0))]
    NegativeOverdraft(Decimal),

    #[error("Unexpected end of input")]
    EndOfInput,

    #[error(transparent)]
    Io(#[from] io::Error),
}

type InputResult<T> = Result<T, InputError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    CreateSavings,
    CreateCurrent,
    Deposit,
    Withdraw,
    Details,
    AllDetails,
    Exit,
}

impl FromStr for Choice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Choice::*;

        let choice = match s.trim() {
            "1" => CreateSavings,
            "2" => CreateCurrent,
            "3" => Deposit,
            "4" => Withdraw,
            "5" => Details,
            "6" => AllDetails,
            "7" => Exit,
            other => return Err(InputError::InvalidChoice(other.to_owned())),
        };
        Ok(choice)
    }
}

/// Line-oriented menu loop driving an [`AccountRegistry`].
///
/// Every prompt reads one line and asks again until the answer parses.
/// Running out of input behaves like choosing Exit.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn run(&mut self, registry: &mut AccountRegistry) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;

            let step = self
                .prompt("Enter your choice: ")
                .and_then(|line| line.parse::<Choice>())
                .and_then(|choice| self.dispatch(choice, registry));

            match step {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => return Ok(()),
                Err(e) => {
                    if self.interrupted(e)? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Reports a failed prompt. Returns true when the loop has to stop.
    fn interrupted(&mut self, error: InputError) -> anyhow::Result<bool> {
        match error {
            InputError::EndOfInput => {
                writeln!(self.output, "\nExiting...")?;
                Ok(true)
            }
            InputError::Io(e) => Err(e).context("Failed to read from the console"),
            other => {
                debug!("Rejected console input: {other:?}");
                writeln!(self.output, "{other}")?;
                Ok(false)
            }
        }
    }

    fn dispatch(
        &mut self,
        choice: Choice,
        registry: &mut AccountRegistry,
    ) -> InputResult<ControlFlow<()>> {
        match choice {
            Choice::CreateSavings => {
                let number = self.prompt_account_number()?;
                let holder = self.prompt("Enter Account Holder Name: ")?;
                let deposit = self.prompt_amount("Enter Initial Deposit: ", "initial deposit")?;
                let rate = self.prompt_amount("Enter Interest Rate: ", "interest rate")?;
                registry.create_savings(number, holder, deposit, rate);
                writeln!(self.output, "Account created successfully!")?;
            }
            Choice::CreateCurrent => {
                let number = self.prompt_account_number()?;
                let holder = self.prompt("Enter Account Holder Name: ")?;
                let deposit = self.prompt_amount("Enter Initial Deposit: ", "initial deposit")?;
                let limit = self.prompt_overdraft_limit()?;
                registry.create_current(number, holder, deposit, limit);
                writeln!(self.output, "Account created successfully!")?;
            }
            Choice::Deposit => {
                let number = self.prompt_account_number()?;
                let amount = self.prompt_amount("Enter Amount to Deposit: ", "amount")?;
                match registry.deposit(number, amount) {
                    Ok(balance) => writeln!(
                        self.output,
                        "Deposited {:.2}. New balance: {:.2}",
                        rounded(&amount),
                        rounded(&balance)
                    )?,
                    Err(e) => self.report(e)?,
                }
            }
            Choice::Withdraw => {
                let number = self.prompt_account_number()?;
                let amount = self.prompt_amount("Enter Amount to Withdraw: ", "amount")?;
                match registry.withdraw(number, amount) {
                    Ok(balance) => writeln!(
                        self.output,
                        "Withdrawn {:.2}. New balance: {:.2}",
                        rounded(&amount),
                        rounded(&balance)
                    )?,
                    Err(e) => self.report(e)?,
                }
            }
            Choice::Details => {
                let number = self.prompt_account_number()?;
                match registry.details(number) {
                    Ok(snapshot) => writeln!(self.output, "{snapshot}")?,
                    Err(e) => self.report(e)?,
                }
            }
            Choice::AllDetails => match registry.all_details() {
                Ok(snapshots) => {
                    writeln!(self.output, "All Accounts:")?;
                    for snapshot in snapshots {
                        writeln!(self.output, "{snapshot}")?;
                    }
                }
                Err(e) => self.report(e)?,
            },
            Choice::Exit => {
                writeln!(self.output, "Exiting...")?;
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn report(&mut self, error: RegistryError) -> io::Result<()> {
        writeln!(self.output, "{error}")
    }

    fn prompt(&mut self, label: &str) -> InputResult<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::EndOfInput);
        }
        Ok(line.trim().to_owned())
    }

    /// Repeats `label` until `parse` accepts the answer.
    fn prompt_until<T>(
        &mut self,
        label: &str,
        parse: impl Fn(String) -> InputResult<T>,
    ) -> InputResult<T> {
        loop {
            let value = self.prompt(label)?;
            match parse(value) {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    debug!("Rejected console input: {e:?}");
                    writeln!(self.output, "{e}")?;
                }
            }
        }
    }

    fn prompt_account_number(&mut self) -> InputResult<AccountNumber> {
        self.prompt_until("Enter Account Number: ", |value| {
            value
                .parse::<i32>()
                .map(AccountNumber::from)
                .map_err(|_| InputError::InvalidValue {
                    field: "account number",
                    value,
                })
        })
    }

    fn prompt_amount(&mut self, label: &str, field: &'static str) -> InputResult<Decimal> {
        self.prompt_until(label, |value| parse_amount(value, field))
    }

    fn prompt_overdraft_limit(&mut self) -> InputResult<Decimal> {
        self.prompt_until("Enter Overdraft Limit: ", |value| {
            let limit = parse_amount(value, "overdraft limit")?;
            if limit < dec!(0) {
                return Err(InputError::NegativeOverdraft(limit));
            }
            Ok(limit)
        })
    }
}

fn parse_amount(value: String, field: &'static str) -> InputResult<Decimal> {
    Decimal::from_str(&value).map_err(|_| InputError::InvalidValue { field, value })
}

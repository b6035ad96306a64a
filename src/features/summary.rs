use super::registry::AccountRegistry;
use clap::ValueEnum;
use std::io::Write;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    Text,
    Csv,
    Json,
}

/// Writes every account in the registry, oldest first.
pub fn write_summary<W: Write>(
    format: SummaryFormat,
    registry: &AccountRegistry,
    mut writer: W,
) -> anyhow::Result<()> {
    let snapshots = registry.snapshots();

    match format {
        SummaryFormat::Text if snapshots.is_empty() => writeln!(writer, "No accounts found!")?,
        SummaryFormat::Text => {
            for snapshot in &snapshots {
                writeln!(writer, "{snapshot}")?;
            }
        }
        SummaryFormat::Csv => {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer);
            wtr.write_record(["account", "holder", "type", "balance"])?;
            for snapshot in &snapshots {
                wtr.serialize(snapshot)?;
            }
            wtr.flush()?;
        }
        SummaryFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &snapshots)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::account::AccountNumber;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn summary(format: SummaryFormat, registry: &AccountRegistry) -> String {
        let mut out = Vec::new();
        write_summary(format, registry, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn registry() -> AccountRegistry {
        let mut registry = AccountRegistry::new();
        registry.create_savings(AccountNumber::from(1001), "Alice", dec!(525.123456), dec!(5));
        registry.create_current(AccountNumber::from(2002), "Bob", dec!(-40), dec!(50));
        registry
    }

    #[test_case(SummaryFormat::Text, "No accounts found!\n")]
    #[test_case(SummaryFormat::Csv, "account,holder,type,balance\n")]
    #[test_case(SummaryFormat::Json, "[]\n")]
    fn empty_registry(format: SummaryFormat, expected: &str) {
        assert_eq!(summary(format, &AccountRegistry::new()), expected);
    }

    #[test]
    fn csv_rounds_balances() {
        assert_eq!(
            summary(SummaryFormat::Csv, &registry()),
            "account,holder,type,balance\n1001,Alice,savings,525.1235\n2002,Bob,current,-40\n"
        );
    }

    #[test]
    fn json_keeps_insertion_order() {
        let json: serde_json::Value =
            serde_json::from_str(&summary(SummaryFormat::Json, &registry())).unwrap();

        assert_eq!(json[0]["account"], 1001);
        assert_eq!(json[0]["balance"], "525.1235");
        assert_eq!(json[1]["holder"], "Bob");
        assert_eq!(json[1]["type"], "current");
    }

    #[test]
    fn text_lists_every_account() {
        let text = summary(SummaryFormat::Text, &registry());
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("Account Number: 1001, Holder: Alice"));
    }
}

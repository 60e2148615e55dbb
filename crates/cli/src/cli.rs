use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::{Path, PathBuf};

/// crash-enrich: decorate crash report events with process and system details
///
/// Captures a snapshot of a crashed (still frozen) process, classifies the
/// module the exception hit and merges exception, process and system
/// details into the MessagePack event attachment of the crash report.
/// Attachments whose filename is not the event filename are left alone.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Id of the crashed process.
    #[arg(short, long)]
    pub pid: u32,

    /// Address of the faulting instruction, decimal or `0x`-prefixed hex.
    #[arg(short = 'a', long, value_parser = parse_address, requires = "exception_code")]
    pub exception_address: Option<u64>,

    /// Platform exception code or signal number.
    #[arg(short = 'e', long, value_parser = parse_code, requires = "exception_address")]
    pub exception_code: Option<u32>,

    /// Platform exception flags.
    #[arg(long, value_parser = parse_code, requires = "exception_address")]
    pub exception_flags: Option<u32>,

    /// Path to configuration file.
    ///
    /// If not provided, the default locations are checked. They are
    /// `/etc/crash-enrich/config.toml` and `/etc/crash-enrich/config.d/*.toml`,
    /// where the latter being a glob pattern. If they don't exist, the default
    /// configuration is used.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    /// Attachments of the crash report.
    pub attachments: Vec<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

fn parse_address(value: &str) -> Result<u64, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("`{value}` is not a valid address"))
}

fn parse_code(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("`{value}` is not a valid code"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use proptest::prelude::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn exception_needs_address_and_code() {
        assert!(Cli::try_parse_from(["crash-enrich", "-p", "1", "-a", "0x10"]).is_err());
        assert!(Cli::try_parse_from(["crash-enrich", "-p", "1", "-e", "11"]).is_err());

        let cli = Cli::try_parse_from([
            "crash-enrich",
            "--pid",
            "7",
            "--exception-address",
            "0x7ffe1000",
            "--exception-code",
            "0xC0000005",
            "/tmp/__sentry-event",
        ])
        .unwrap();
        assert_eq!(cli.pid, 7);
        assert_eq!(cli.exception_address, Some(0x7ffe_1000));
        assert_eq!(cli.exception_code, Some(0xC000_0005));
        assert_eq!(cli.exception_flags, None);
        assert_eq!(cli.attachments, [PathBuf::from("/tmp/__sentry-event")]);
    }

    fn address_candidates() -> impl Strategy<Value = String> {
        prop_oneof![
            2 => any::<u64>().prop_map(|i| format!("{i:#x}")),
            2 => any::<u64>().prop_map(|i| i.to_string()),
            1 => ".*",
        ]
    }

    proptest! {
        #[test]
        fn test_parse_address(value in address_candidates()) {
            match parse_address(&value) {
                Ok(address) => prop_assert!(
                    value.starts_with(['0', '+']) || value == address.to_string()
                ),
                Err(err) => prop_assert_eq!(err, format!("`{}` is not a valid address", value)),
            }
        }

        #[test]
        fn hex_and_decimal_agree(code in any::<u32>()) {
            prop_assert_eq!(parse_code(&format!("{code:#x}")), Ok(code));
            prop_assert_eq!(parse_code(&code.to_string()), Ok(code));
        }
    }
}

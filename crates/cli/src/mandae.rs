//! `expedicao mandae` - intake workbook generation.

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;

use expedicao_config::Settings;

use crate::{create_file, output_dir, read_table, CliError};

/// `--date` if given, otherwise the local calendar date.
fn today(date: Option<&str>) -> Result<NaiveDate, CliError> {
    match date {
        None => Ok(chrono::Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
            CliError::args(format!("invalid --date '{}': {}", s, e)).with_hint("use YYYY-MM-DD")
        }),
    }
}

pub(crate) fn cmd_mandae(
    settings: &Settings,
    input: PathBuf,
    out: Option<PathBuf>,
    date: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let today = today(date.as_deref())?;
    let table = read_table(&input)?;

    // Validation happens here; nothing is written for a rejected file
    let artifact = expedicao_io::export_mandae(&table, today)?;

    let dir = output_dir(out, settings)?;
    let path = dir.join(&artifact.filename);
    let mut writer = create_file(&path)?;
    writer
        .write_all(&artifact.bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| CliError::output(format!("cannot write {}: {}", path.display(), e)))?;

    if quiet {
        println!("{}", path.display());
    } else {
        println!("Planilha gerada: {} ({} pedidos)", path.display(), artifact.rows);
        println!("{}", artifact.mime);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::EXIT_USAGE;

    #[test]
    fn explicit_date() {
        assert_eq!(
            today(Some("2024-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn bad_date_is_usage_error() {
        let err = today(Some("01/03/2024")).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert_eq!(err.hint.as_deref(), Some("use YYYY-MM-DD"));
    }
}

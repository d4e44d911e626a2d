//! `expedicao track` - batch tracking lookup.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use expedicao_config::Settings;
use expedicao_io::export::CSV_MIME;
use expedicao_tracking::pipeline::{self, RESULT_HEADER};
use expedicao_tracking::{ClientConfig, TrackingClient, RESULT_FILENAME};

use crate::util::render_table;
use crate::{create_file, output_dir, read_table, CliError};

/// Widest a preview column may get before it is truncated.
const PREVIEW_MAX_WIDTH: usize = 60;

pub(crate) struct TrackArgs {
    pub input: PathBuf,
    pub out: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
    pub quiet: bool,
    pub no_preview: bool,
}

/// Flags win over settings.
fn client_config(settings: &Settings, base_url: Option<String>, timeout: Option<u64>) -> ClientConfig {
    let tracking = &settings.tracking;
    ClientConfig {
        base_url: base_url.unwrap_or_else(|| tracking.base_url.clone()),
        user_agent: tracking.user_agent.clone(),
        timeout: Duration::from_secs(timeout.unwrap_or(tracking.timeout_secs)),
    }
}

pub(crate) fn cmd_track(settings: &Settings, args: TrackArgs) -> Result<(), CliError> {
    let mut client = TrackingClient::new(client_config(settings, args.base_url, args.timeout))
        .map_err(|e| CliError::general(e.to_string()))?;

    let table = read_table(&args.input)?;
    let orders = pipeline::prepare(table).map_err(CliError::input)?;
    let dir = output_dir(args.out, settings)?;

    log::info!("tracking {} orders", orders.len());
    let quiet = args.quiet;
    let results = pipeline::run(&orders, &mut client, |i, n, result| {
        if !quiet {
            eprintln!("[{i}/{n}] {} → {}", result.code, result.status);
        }
    });

    let path = dir.join(RESULT_FILENAME);
    let mut writer = create_file(&path)?;
    pipeline::write_results(&results, &mut writer).map_err(CliError::export)?;
    writer
        .flush()
        .map_err(|e| CliError::output(format!("cannot write {}: {}", path.display(), e)))?;

    if !args.no_preview {
        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|r| vec![r.order_id.clone(), r.code.clone(), r.status.to_string()])
            .collect();
        print!("{}", render_table(&RESULT_HEADER, &rows, PREVIEW_MAX_WIDTH));
        println!();
    }

    println!("{} ({})", path.display(), CSV_MIME);
    if !quiet {
        eprintln!("Consulta finalizada: {} pedidos", results.len());
    }
    Ok(())
}

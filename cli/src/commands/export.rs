use anyhow::Result;
use tracing::info;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ExportArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./incendios.csv".into());

    let incidents = super::load_filtered(cli, &args.archive, &args.filter.to_filter())?;

    info!("[export] writing {} incidents to {}", incidents.len(), out_path.display());
    incidents.write_csv(&out_path)?;

    Ok(())
}

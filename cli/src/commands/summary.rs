use anyhow::Result;
use incendios::{cause_distribution, yearly_area};
use serde_json::json;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::SummaryArgs) -> Result<()> {
    let incidents = super::load_filtered(cli, &args.archive, &args.filter.to_filter())?;

    let trend = yearly_area(&incidents)?;
    let causes = cause_distribution(&incidents)?;

    if args.json {
        let report = json!({ "incidents": incidents.len(), "years": trend, "causes": causes });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Superficie quemada por año");
    for year in &trend {
        println!("  {}  {:>6} incendios  {:>12.1} ha", year.year, year.incidents, year.hectares);
    }

    println!("Distribución por causa");
    for cause in &causes {
        println!("  {:<30} {:>6}  {:>5.1}%", cause.cause, cause.incidents, cause.share * 100.0);
    }

    Ok(())
}

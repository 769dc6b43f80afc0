use anyhow::Result;
use incendios::columns::{CAUSA, COMUNIDAD, PROVINCIA};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let incidents = super::load(cli, &args.archive)?;

    println!("archive:   {}", args.archive.display());
    println!("incidents: {}", incidents.len());
    println!("mappable:  {}", incidents.is_mappable());
    println!("columns:   {}", incidents.column_names().join(", "));

    match incidents.time_range()? {
        Some((first, last)) => println!("period:    {} .. {}", first.date(), last.date()),
        None => println!("period:    (no time index)"),
    }

    for column in [CAUSA, COMUNIDAD, PROVINCIA] {
        let values = incidents.distinct(column)?;
        if !values.is_empty() {
            println!("{column}: {} distinct ({})", values.len(), values.iter().take(10).cloned().collect::<Vec<_>>().join(", "));
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use incendios::{map_points, map_view, points_to_geojson};
use tracing::info;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::MapArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./incendios.geojson".into());

    let incidents = super::load_filtered(cli, &args.archive, &args.filter.to_filter())?;
    if !incidents.is_empty() && !incidents.is_mappable() {
        eprintln!("The dataset has no latitude/longitude columns; nothing to map.");
    }

    let points = map_points(&incidents, args.limit)?;
    let view = map_view(&points);
    info!("[map] {} markers centered at ({:.4}, {:.4})", points.len(), view.center.y(), view.center.x());

    let geojson = serde_json::to_string(&points_to_geojson(&points))?;
    std::fs::write(&out_path, geojson)
        .with_context(|| format!("[map] Failed to write {}", out_path.display()))?;

    Ok(())
}

use std::collections::HashSet;

use polars::frame::DataFrame;

/// Returns the first candidate present in `columns`, in candidate priority order.
///
/// Matching is exact and case-sensitive; variants in casing have to be listed
/// as separate candidates.
pub fn detect_column<'a, C, S>(columns: &[C], candidates: &'a [S]) -> Option<&'a str>
where
    C: AsRef<str>,
    S: AsRef<str>,
{
    let present = columns.iter().map(AsRef::<str>::as_ref).collect::<HashSet<&str>>();
    candidates.iter().map(AsRef::<str>::as_ref).find(|candidate| present.contains(candidate))
}

/// [`detect_column`] over a snapshot of the DataFrame's column names.
pub fn detect_in<'a, S: AsRef<str>>(df: &DataFrame, candidates: &'a [S]) -> Option<&'a str> {
    let names = df.get_column_names().into_iter().map(|name| name.as_str()).collect::<Vec<_>>();
    detect_column(&names, candidates)
}

#[cfg(test)]
mod tests {
    use polars::df;

    use super::*;

    #[test]
    fn first_candidate_in_priority_order() {
        let columns = ["Latitud", "lat", "LAT"];
        assert_eq!(detect_column(&columns, &["lat", "latitude", "Latitud"]), Some("lat"));
        assert_eq!(detect_column(&columns, &["Latitud", "lat"]), Some("Latitud"));
        assert_eq!(detect_column(&columns, &["LAT", "lat"]), Some("LAT"));
    }

    #[test]
    fn case_sensitive_and_exact() {
        let columns = ["Lat", "latitude_deg"];
        assert_eq!(detect_column(&columns, &["lat", "LAT", "latitude"]), None);
        assert_eq!(detect_column::<&str, &str>(&[], &["lat"]), None);
        assert_eq!(detect_column(&columns, &[] as &[&str]), None);
    }

    #[test]
    fn owned_candidates() {
        let candidates = vec!["fecha".to_string(), "Fecha".to_string()];
        let columns = vec!["Fecha".to_string()];
        assert_eq!(detect_column(&columns, &candidates), Some("Fecha"));
    }

    #[test]
    fn detects_in_frame() {
        let frame = df!("Latitud" => [40.1], "Longitud" => [-3.6]).unwrap();
        assert_eq!(detect_in(&frame, &["lat", "Latitud"]), Some("Latitud"));
        assert_eq!(detect_in(&frame, &["lng", "long"]), None);
    }
}

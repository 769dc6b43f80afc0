mod aliases;
mod detect;

pub use aliases::ColumnAliases;
pub use detect::{detect_column, detect_in};

pub const LAT: &str = "lat";
pub const LNG: &str = "lng";
/// Time index of a normalized table.
pub const FECHA: &str = "fecha";
/// Burned area in hectares.
pub const SUPERFICIE: &str = "superficie";
pub const CAUSA: &str = "causa";
pub const CAUSA_TEXTO: &str = "causa_texto";
pub const IDCOMUNIDAD: &str = "idcomunidad";
pub const COMUNIDAD: &str = "comunidad";
pub const IDPROVINCIA: &str = "idprovincia";
pub const PROVINCIA: &str = "provincia";
pub const MUNICIPIO: &str = "municipio";

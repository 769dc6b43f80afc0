#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Region,     // idcomunidad -> comunidad
    Province,   // idprovincia -> provincia
    Cause,      // causa -> causa_texto
}

impl LookupKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            LookupKind::Region => "region",
            LookupKind::Province => "province",
            LookupKind::Cause => "cause",
        }
    }

    pub fn order() -> [LookupKind; 3] {
        [LookupKind::Region, LookupKind::Province, LookupKind::Cause]
    }

    /// (code, label) header pair expected in the lookup file.
    pub fn source_columns(&self) -> (&'static str, &'static str) {
        match self {
            LookupKind::Region => ("idcomunidad", "comunidad"),
            LookupKind::Province => ("idprovincia", "provincia"),
            LookupKind::Cause => ("causa", "causa_label"),
        }
    }

    /// Normalized incident column holding the code.
    pub fn code_column(&self) -> &'static str {
        match self {
            LookupKind::Region => crate::schema::IDCOMUNIDAD,
            LookupKind::Province => crate::schema::IDPROVINCIA,
            LookupKind::Cause => crate::schema::CAUSA,
        }
    }

    /// Normalized incident column receiving the translated label.
    pub fn label_column(&self) -> &'static str {
        match self {
            LookupKind::Region => crate::schema::COMUNIDAD,
            LookupKind::Province => crate::schema::PROVINCIA,
            LookupKind::Cause => crate::schema::CAUSA_TEXTO,
        }
    }

    /// Label used for codes missing from the lookup.
    pub fn default_label(&self) -> &'static str {
        match self {
            LookupKind::Region | LookupKind::Province => "Desconocido",
            LookupKind::Cause => "No especificado",
        }
    }
}

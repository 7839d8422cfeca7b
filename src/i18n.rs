//! User-facing strings in English and Spanish

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Es => "Español",
        }
    }

    pub fn t(self, text: Text) -> &'static str {
        use Text::*;
        match self {
            Locale::En => match text {
                AppTitle => "Palestine Support Badges",
                Label => "Label",
                Message => "Message",
                Color => "Color",
                Logo => "Logo",
                NoLogo => "No logo",
                Preview => "Preview",
                History => "History",
                ClearHistory => "Clear history",
                Language => "Language",
                NoHistoryYet => "No history yet",
                Copied => "Copied!",
                SavedToHistory => "Saved to history",
                HistoryCleared => "History cleared",
                EntryLoaded => "Loaded from history",
                EntryNotFound => "No such history entry",
                Downloaded => "Downloaded",
                Theme => "Theme",
                FetchFailed => "Fetch failed",
                InvalidImage => "Invalid badge image",
                ExportFailed => "Export failed",
                CopyFailed => "Copy failed",
                StorageUnavailable => "Storage unavailable",
                DownloadFailed => "Download failed",
                ConfigurationError => "Configuration error",
                Error => "Error",
            },
            Locale::Es => match text {
                AppTitle => "Badges de Apoyo a Palestina",
                Label => "Etiqueta",
                Message => "Mensaje",
                Color => "Color",
                Logo => "Logo",
                NoLogo => "Sin logo",
                Preview => "Previsualizar",
                History => "Historial",
                ClearHistory => "Borrar historial",
                Language => "Idioma",
                NoHistoryYet => "Aún sin historial",
                Copied => "¡Copiado!",
                SavedToHistory => "Guardado en historial",
                HistoryCleared => "Historial borrado",
                EntryLoaded => "Cargado desde el historial",
                EntryNotFound => "No existe esa entrada",
                Downloaded => "Descargado",
                Theme => "Tema",
                FetchFailed => "Error al descargar",
                InvalidImage => "Imagen de badge no válida",
                ExportFailed => "Error al exportar",
                CopyFailed => "Error al copiar",
                StorageUnavailable => "Almacenamiento no disponible",
                DownloadFailed => "Error al guardar",
                ConfigurationError => "Error de configuración",
                Error => "Error",
            },
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        match lang.as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            _ => Err(format!("unsupported language: {}", s)),
        }
    }
}

/// Translatable strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AppTitle,
    Label,
    Message,
    Color,
    Logo,
    NoLogo,
    Preview,
    History,
    ClearHistory,
    Language,
    NoHistoryYet,
    Copied,
    SavedToHistory,
    HistoryCleared,
    EntryLoaded,
    EntryNotFound,
    Downloaded,
    Theme,
    FetchFailed,
    InvalidImage,
    ExportFailed,
    CopyFailed,
    StorageUnavailable,
    DownloadFailed,
    ConfigurationError,
    Error,
}

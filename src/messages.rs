//! User-facing copy.
//!
//! English is the default; Spanish matches the catalog site's own wording.

use crate::api::ApiError;

/// Every string the controller shows to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub no_results: &'static str,
    pub search_error: &'static str,
    pub list_error: &'static str,
    pub versions_of: &'static str,
    pub loading_versions: &'static str,
    pub recommended: &'static str,
    pub hack: &'static str,
    pub translation: &'static str,
    pub searching: &'static str,
    pub downloading: &'static str,
    pub downloaded: &'static str,
    pub no_versions: &'static str,
    pub load_versions_error: &'static str,
    pub load_versions_generic_error: &'static str,
    pub not_found_hash: &'static str,
    pub server_json_error: &'static str,
    pub search_game_error: &'static str,
    pub invalid_hash: &'static str,
    pub games_found: &'static str,
    pub in_console: &'static str,
    pub for_query: &'static str,
    pub consoles: &'static str,
    pub versions: &'static str,
    pub action: &'static str,
    pub first: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub last: &'static str,
    pub page_of: (&'static str, &'static str),
}

impl Default for Messages {
    fn default() -> Self {
        Self::english()
    }
}

impl Messages {
    pub fn english() -> Self {
        Self {
            no_results: "No games found",
            search_error: "Search failed",
            list_error: "Could not load the catalog",
            versions_of: "Versions of:",
            loading_versions: "Loading versions...",
            recommended: "Recommended",
            hack: "HACK",
            translation: "TRANSLATION",
            searching: "Searching the database...",
            downloading: "Downloading...",
            downloaded: "Downloaded!",
            no_versions: "No versions available.",
            load_versions_error: "Could not load the versions",
            load_versions_generic_error: "Error loading the versions",
            not_found_hash: "The hash was not found in the database.",
            server_json_error: "Could not retrieve the data from the server.",
            search_game_error: "Error searching for the game.",
            invalid_hash: "Invalid hash. It must be hexadecimal and at least 8 characters long.",
            games_found: "games found",
            in_console: "in",
            for_query: "for",
            consoles: "Consoles",
            versions: "Versions",
            action: "Versions",
            first: "« First",
            previous: "‹ Previous",
            next: "Next ›",
            last: "Last »",
            page_of: ("Page", "of"),
        }
    }

    pub fn spanish() -> Self {
        Self {
            no_results: "No se encontraron juegos",
            search_error: "Error en la búsqueda",
            list_error: "No se pudo cargar el catálogo",
            versions_of: "Versiones de:",
            loading_versions: "Cargando versiones...",
            recommended: "Recomendada",
            hack: "HACK",
            translation: "TRADUCCIÓN",
            searching: "Buscando en la base de datos...",
            downloading: "Descargando...",
            downloaded: "¡Descargado!",
            no_versions: "No hay versiones disponibles.",
            load_versions_error: "No se pudieron cargar las versiones",
            load_versions_generic_error: "Error al cargar las versiones",
            not_found_hash: "No se encontró el hash en la base de datos.",
            server_json_error: "No se pudo descargar el JSON desde la URL.",
            search_game_error: "Error al buscar el juego.",
            invalid_hash: "Hash inválido. Debe ser hexadecimal y tener al menos 8 caracteres.",
            games_found: "juegos encontrados",
            in_console: "en",
            for_query: "para",
            consoles: "Consolas",
            versions: "Versiones",
            action: "Acción",
            first: "« Primero",
            previous: "‹ Anterior",
            next: "Siguiente ›",
            last: "Último »",
            page_of: ("Página", "de"),
        }
    }

    /// Message table for a locale code; unknown codes fall back to English
    pub fn for_locale(locale: &str) -> Self {
        match locale.to_ascii_lowercase().split(['-', '_']).next() {
            Some("es") => Self::spanish(),
            _ => Self::english(),
        }
    }

    /// `"Page X of Y"`
    pub fn page_label(&self, page: u32, total_pages: u32) -> String {
        format!("{} {} {} {}", self.page_of.0, page, self.page_of.1, total_pages)
    }

    /// `"N versions"` badge
    pub fn versions_badge(&self, count: u32) -> String {
        format!("{} {}", count, self.versions.to_lowercase())
    }

    /// Map a failed download resolution to its user-facing message.
    ///
    /// 404 and 500 get distinct copy; an unsuccessful payload shows the
    /// server's own message; anything else is generic.
    pub fn download_failure(&self, err: &ApiError) -> String {
        match err.status() {
            Some(404) => self.not_found_hash.to_string(),
            Some(500) => self.server_json_error.to_string(),
            _ => match err {
                ApiError::Unsuccessful(Some(message)) => message.clone(),
                _ => self.search_game_error.to_string(),
            },
        }
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    EmptyQuery,
    TooShort { min_chars: usize },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuery => f.write_str("Por favor, ingresa un término de búsqueda"),
            Self::TooShort { min_chars } => write!(
                f,
                "El término de búsqueda debe tener al menos {min_chars} caracteres"
            ),
        }
    }
}

impl std::error::Error for QueryError {}

/// Failure of one search attempt. Every variant ends up as the text of the
/// Error panel; none of them is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The endpoint answered with a non-2xx status.
    Http { status: u16, status_text: String },
    /// The request never produced a response.
    Connection { endpoint: String },
    Unexpected(String),
}

impl SearchError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Connection { .. } => "connection",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status,
                status_text,
            } => write!(
                f,
                "Error del servidor: Error HTTP: {status} - {status_text}"
            ),
            Self::Connection { endpoint } => write!(
                f,
                "Error de conexión: No se pudo conectar con el servidor. Verifica que la API esté ejecutándose en {endpoint}"
            ),
            Self::Unexpected(message) => write!(f, "Error inesperado: {message}"),
        }
    }
}

impl std::error::Error for SearchError {}

use std::fmt;

/// Failures that stop a pipeline before any artifact is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Bytes could not be decoded or split into semicolon-separated records.
    Unreadable(String),
    /// Required columns absent from the header row (display names).
    MissingColumns(Vec<String>),
    /// A required column has a blank cell.
    EmptyField { column: String, line: u64 },
}

impl InputError {
    pub(crate) fn unreadable(err: impl fmt::Display) -> Self {
        Self::Unreadable(err.to_string())
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(detail) => write!(
                f,
                "Erro ao ler o arquivo. Verifique se está no formato correto. ({detail})"
            ),
            Self::MissingColumns(columns) => {
                let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
                write!(f, "O arquivo precisa conter as colunas {}.", quoted.join(", "))
            }
            Self::EmptyField { column, line } => write!(
                f,
                "Existem linhas com {} vazio (linha {line}). Corrija antes de continuar.",
                column.to_uppercase()
            ),
        }
    }
}

impl std::error::Error for InputError {}

/// Failures while rendering or writing an output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    Csv(String),
    Xlsx(String),
    Io(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(msg) => write!(f, "CSV write error: {msg}"),
            Self::Xlsx(msg) => write!(f, "XLSX write error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

/// Either stage of a pipeline failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Input(InputError),
    Export(ExportError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(err) => err.fmt(f),
            Self::Export(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl From<InputError> for Error {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}

impl From<ExportError> for Error {
    fn from(err: ExportError) -> Self {
        Self::Export(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_name() {
        let err = InputError::MissingColumns(vec!["Pedido".into(), "Envio codigo".into()]);
        assert_eq!(
            err.to_string(),
            "O arquivo precisa conter as colunas 'Pedido', 'Envio codigo'."
        );
    }

    #[test]
    fn empty_field_names_column_and_line() {
        let err = InputError::EmptyField { column: "Destinatário".into(), line: 4 };
        let msg = err.to_string();
        assert!(msg.contains("DESTINATÁRIO"), "{msg}");
        assert!(msg.contains("linha 4"), "{msg}");
    }
}

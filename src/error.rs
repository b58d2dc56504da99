/// Error taxonomy for the dashboard pipeline.
///
/// Exit codes follow the usual split: `2` for configuration/input problems
/// the user can fix before retrying, `4` for runtime failures (warehouse,
/// data, terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required connection configuration absent or incomplete.
    Config,
    /// Warehouse unreachable or the statement was rejected.
    Connection,
    /// An identifier column required by the reshape is not in the table.
    MissingColumn,
    /// Requested product is not among the table's value columns.
    UnknownProduct,
    /// Malformed values coming back from the warehouse (dates, numbers).
    Data,
    /// Terminal setup/draw failures in the TUI.
    Terminal,
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Build the reshape precondition failure, naming every absent column.
    pub fn missing_columns(missing: &[String]) -> Self {
        Self::new(
            ErrorKind::MissingColumn,
            format!("Missing identifier column(s): {}.", missing.join(", ")),
        )
    }

    pub fn unknown_product(product: &str, known: &[String]) -> Self {
        Self::new(
            ErrorKind::UnknownProduct,
            format!(
                "Unknown product '{product}'. Known products: {}.",
                known.join(", ")
            ),
        )
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Terminal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::Config | ErrorKind::UnknownProduct => 2,
            ErrorKind::Connection
            | ErrorKind::MissingColumn
            | ErrorKind::Data
            | ErrorKind::Terminal => 4,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

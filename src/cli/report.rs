use crate::error::AppError;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Success => "SUCCESS",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            Severity::Success | Severity::Info | Severity::Warn => 0,
            Severity::Error => 1,
            Severity::Fatal => 2,
        }
    }
}

/// Classified outcome of one command, rendered for the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub severity: Severity,
    pub message: String,
    pub rows: Option<u64>,
    pub lines: Vec<String>,
}

impl Report {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            rows: None,
            lines: Vec::new(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, message)
    }

    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn render(&self) -> String {
        let mut out = format!("[{}] {}", self.severity.label(), self.message);
        for line in &self.lines {
            out.push_str("\n  ");
            out.push_str(line);
        }
        out
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.severity.exit_code())
    }
}

impl From<AppError> for Report {
    fn from(err: AppError) -> Self {
        if matches!(err, AppError::Database(_) | AppError::Io(_)) {
            tracing::error!("{}", err);
        }
        Report::new(err.severity(), err.to_string())
    }
}

use thiserror::Error;

/// Errors that can occur while loading, fitting or exporting a catch series.
#[derive(Error, Debug)]
pub enum CatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Analysis error: {0}")]
    AnalysisError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Solver did not converge after {iterations} iterations (SSE {sse:.6}); try different seeds")]
    NonConvergence { iterations: usize, sse: f64 },
}

impl From<calamine::Error> for CatchError {
    fn from(e: calamine::Error) -> Self {
        CatchError::Excel(e.to_string())
    }
}

impl From<calamine::XlsxError> for CatchError {
    fn from(e: calamine::XlsxError) -> Self {
        CatchError::Excel(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CatchError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        CatchError::Excel(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CatchError::from(io_err);
        let msg = err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_excel_error_display() {
        let err = CatchError::Excel("bad sheet".to_string());
        assert_eq!(err.to_string(), "Excel error: bad sheet");
    }

    #[test]
    fn test_parse_error_display() {
        let err = CatchError::ParseError("missing column 'year'".to_string());
        assert_eq!(err.to_string(), "Parse error: missing column 'year'");
    }

    #[test]
    fn test_validation_error_display() {
        let err = CatchError::ValidationError("duplicate year 1960".to_string());
        assert_eq!(err.to_string(), "Validation error: duplicate year 1960");
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = CatchError::InsufficientData("need 3 points".to_string());
        assert_eq!(err.to_string(), "Insufficient data: need 3 points");
    }

    #[test]
    fn test_non_convergence_display() {
        let err = CatchError::NonConvergence {
            iterations: 200,
            sse: 12.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("200 iterations"));
        assert!(msg.contains("12.500000"));
    }

    #[test]
    fn test_toml_error_from_conversion() {
        let result: Result<toml::Value, _> = toml::from_str("not = = valid");
        let err: CatchError = result.unwrap_err().into();
        assert!(matches!(err, CatchError::Toml(_)));
        assert!(err.to_string().contains("Config error"));
    }

    #[test]
    fn test_json_error_from_conversion() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("not valid json{{{");
        let json_err = result.unwrap_err();
        let err: CatchError = json_err.into();
        assert!(matches!(err, CatchError::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }
}

use thiserror::Error;

/// error types shared by the stoichiometry, thermo and root-finding managers
#[derive(Debug, Error)]
pub enum KineticsError {
    /// malformed or contradictory setup input; the offending entry is not registered
    #[error("{context}: configuration error: {message}")]
    ConfigurationError {
        context: &'static str,
        message: String,
    },
    /// internal bookkeeping is inconsistent with the request (out-of-range index, undersized buffer)
    #[error("{context}: invariant violation: {message}")]
    InvariantViolation {
        context: &'static str,
        message: String,
    },
    /// soft failure of the root finder; `best` is the best estimate found
    #[error(
        "root finder did not converge in {iterations} iterations: best x = {best}, residual = {residual}"
    )]
    RootFindNotConverged {
        best: f64,
        residual: f64,
        iterations: usize,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl KineticsError {
    pub fn config(context: &'static str, message: impl Into<String>) -> Self {
        KineticsError::ConfigurationError {
            context,
            message: message.into(),
        }
    }

    pub fn invariant(context: &'static str, message: impl Into<String>) -> Self {
        KineticsError::InvariantViolation {
            context,
            message: message.into(),
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, KineticsError::ConfigurationError { .. })
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, KineticsError::InvariantViolation { .. })
    }
}

/// checks that a caller-supplied buffer holds at least `needed` entries
pub(crate) fn check_len(
    context: &'static str,
    what: &str,
    len: usize,
    needed: usize,
) -> Result<(), KineticsError> {
    if len < needed {
        return Err(KineticsError::invariant(
            context,
            format!("{} has length {}, at least {} required", what, len, needed),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = KineticsError::config("RootFind::solve", "xmin and xmax are bad: 1 0");
        assert!(e.is_configuration_error());
        assert_eq!(
            e.to_string(),
            "RootFind::solve: configuration error: xmin and xmax are bad: 1 0"
        );
        let e = check_len("update", "cp_R", 2, 5).unwrap_err();
        assert!(e.is_invariant_violation());
        assert!(e.to_string().contains("cp_R has length 2"));
        assert!(check_len("update", "cp_R", 5, 5).is_ok());
    }
}

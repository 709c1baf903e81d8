use sqlx::error::ErrorKind;
use thiserror::Error;

/// Typed repository failure.
///
/// Callers pick an HTTP status from the variant instead of collapsing every
/// non-success into a generic 500: `NotFound` maps to 404, `Conflict` to a
/// client-visible constraint error, and only `Database` stays an opaque
/// server failure.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("no matching row")]
    NotFound,

    #[error("constraint violated: {constraint}")]
    Conflict { constraint: String },

    #[error("database failure: {0}")]
    Database(sqlx::Error),
}

impl RepoError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepoError::Conflict { .. })
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return RepoError::NotFound;
        }

        let constraint = match &err {
            sqlx::Error::Database(db) => match db.kind() {
                ErrorKind::ForeignKeyViolation => Some("foreign key"),
                ErrorKind::UniqueViolation => Some("unique"),
                ErrorKind::NotNullViolation => Some("not null"),
                ErrorKind::CheckViolation => Some("check"),
                _ => None,
            },
            _ => None,
        };

        match constraint {
            Some(kind) => RepoError::Conflict {
                constraint: kind.to_string(),
            },
            None => RepoError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = RepoError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepoError::NotFound));
    }

    #[test]
    fn conflict_predicate() {
        let conflict = RepoError::Conflict {
            constraint: "foreign key".to_string(),
        };
        assert!(conflict.is_conflict());
        assert!(!RepoError::NotFound.is_conflict());
    }
}

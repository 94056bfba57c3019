use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CastorError {
    #[error("MongoDB driver error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid server address {addr:?}: expected host:port")]
    BadServerAddress { addr: String },

    #[error("no document found for name {name:?}")]
    NotFound { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_address_names_the_offending_value() {
        let err = CastorError::BadServerAddress {
            addr: "mongodb://oops".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid server address \"mongodb://oops\": expected host:port"
        );
    }

    #[test]
    fn not_found_names_the_filter_value() {
        let err = CastorError::NotFound {
            name: "Ash".to_string(),
        };
        assert_eq!(err.to_string(), "no document found for name \"Ash\"");
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WrangleError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("invalid JSON on line {line} of {path}: {source}")]
    JsonLine {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} is a JSON array, not newline-delimited JSON records")]
    ArrayFraming { path: String },

    #[error("unparseable timestamp in {field} for post {post_id}: \"{value}\"")]
    Timestamp {
        field: &'static str,
        post_id: i64,
        value: String,
        #[source]
        source: chrono::format::ParseError,
    },

    #[error("unrecognized category-flag token for post {post_id}: {flag}=\"{value}\"")]
    FlagToken {
        flag: &'static str,
        post_id: i64,
        value: String,
    },

    #[error("flat column \"{column}\" is contributed by more than one input table")]
    ColumnCollision { column: String },
}

pub mod clean;
pub mod error;
pub mod export;
pub mod load;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod types;

pub use clean::clean_archive;
pub use error::WrangleError;
pub use export::{write_label_counts_csv, write_label_means_csv, write_master_csv};
pub use load::{load_archive, load_metadata, load_predictions};
pub use merge::{merge_records, merged_header};
pub use normalize::normalize_metadata;
pub use pipeline::{run_wrangle, WrangleInputs, WrangleSummary};
pub use report::{label_frequency, label_means, top_by_mean_favorites, LabelCount, LabelSummary};

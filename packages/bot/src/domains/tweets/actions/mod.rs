//! Tweet domain actions - recording tweets and resolving reference links

mod record_tweet;
mod resolve_references;

pub use record_tweet::{record_tweet, RecordError};
pub use resolve_references::{
    choose_reference_dates, resolve_reference, resolve_references, ResolvedReferences,
};

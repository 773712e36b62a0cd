mod enumerator;
mod record;

pub use enumerator::{CandidateFilter, PluginEnumerator, INACTIVE_CLASSIFIER};
pub use record::{collapse_summary, last_release, PluginRecord};

#[cfg(test)]
pub(crate) use enumerator::tests::FakeSource;

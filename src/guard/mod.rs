pub mod classify;
pub mod decision;
pub mod payload;

pub use classify::Classifier;
pub use decision::{Classification, Verdict};
pub use payload::{PATH_SOURCES, PathSource, WriteIntent};

/// Evaluate one raw hook payload.
///
/// Fail-open: input that is not JSON yields [`Verdict::Allow`]. Returns the
/// extracted intent (empty when parsing failed) alongside the verdict so the
/// caller can log it.
pub fn check_payload(classifier: &Classifier, input: &str) -> (WriteIntent, Verdict) {
    let Some(intent) = WriteIntent::parse(input) else {
        return (WriteIntent::default(), Verdict::Allow);
    };
    let verdict: Verdict = classifier.classify(&intent.file_path).into();
    (intent, verdict)
}

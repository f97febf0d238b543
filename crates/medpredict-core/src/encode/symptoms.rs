//! Symptom feature encoding against the severity table.
//!
//! Each symptom name maps to an integer severity weight; the weights, in
//! input order, right-padded with zeros, form the fixed-length feature
//! vector the disease classifier was trained on.

/// Fixed feature-vector length the disease classifier expects.
pub const FEATURE_LEN: usize = 17;

/// Static mapping from symptom name to severity weight.
///
/// Entries keep the order they were loaded in; lookups scan linearly and
/// the first exact match wins.
#[derive(Debug, Clone, Default)]
pub struct SeverityTable {
    entries: Vec<(String, u32)>,
}

impl SeverityTable {
    /// Creates a table from ordered (symptom, weight) pairs.
    #[must_use]
    pub fn new(entries: Vec<(String, u32)>) -> Self {
        Self { entries }
    }

    /// Returns the weight for a symptom name, or 0 when unknown.
    ///
    /// Matching is exact; unknown symptoms are not an error.
    #[must_use]
    pub fn weight_of(&self, symptom: &str) -> u32 {
        self.entries
            .iter()
            .find(|(name, _)| name == symptom)
            .map_or(0, |&(_, weight)| weight)
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The symptom list cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// More symptoms were supplied than the feature vector can hold.
    #[error("Too many symptoms: got {count}, at most {FEATURE_LEN} are supported")]
    TooManySymptoms {
        /// Number of symptoms supplied.
        count: usize,
    },
}

/// Encodes a symptom list into the classifier's feature vector.
///
/// Weights are looked up in input order; unknown names encode to 0. The
/// result is right-padded with zeros to exactly [`FEATURE_LEN`] entries.
///
/// # Errors
///
/// Returns [`EncodeError::TooManySymptoms`] if more than [`FEATURE_LEN`]
/// symptoms are supplied.
pub fn encode_symptoms<S: AsRef<str>>(
    table: &SeverityTable,
    symptoms: &[S],
) -> Result<Vec<f64>, EncodeError> {
    if symptoms.len() > FEATURE_LEN {
        return Err(EncodeError::TooManySymptoms {
            count: symptoms.len(),
        });
    }

    let mut features: Vec<f64> = symptoms
        .iter()
        .map(|s| f64::from(table.weight_of(s.as_ref())))
        .collect();
    features.resize(FEATURE_LEN, 0.0);

    Ok(features)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table() -> SeverityTable {
        SeverityTable::new(vec![
            ("itching".to_string(), 1),
            ("skin_rash".to_string(), 3),
            ("chills".to_string(), 3),
            ("high_fever".to_string(), 7),
        ])
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let table = table();
        assert_eq!(table.weight_of("itching"), 1);
        assert_eq!(table.weight_of("high_fever"), 7);
        assert_eq!(table.weight_of("no_such_symptom"), 0);
        // Matching is exact, not case-insensitive.
        assert_eq!(table.weight_of("Itching"), 0);
    }

    #[test]
    fn test_first_match_wins() {
        let table = SeverityTable::new(vec![
            ("cough".to_string(), 4),
            ("cough".to_string(), 9),
        ]);
        assert_eq!(table.weight_of("cough"), 4);
    }

    #[test]
    fn test_encode_pads_to_feature_len() {
        let features = encode_symptoms(&table(), &["itching", "skin_rash"]).unwrap();

        assert_eq!(features.len(), FEATURE_LEN);
        assert_eq!(
            features,
            vec![1.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_encode_preserves_input_order() {
        let features = encode_symptoms(&table(), &["high_fever", "itching"]).unwrap();
        assert_eq!(&features[..3], &[7.0, 1.0, 0.0]);
    }

    #[test]
    fn test_encode_unknown_symptom_is_zero() {
        let features = encode_symptoms(&table(), &["mystery", "skin_rash"]).unwrap();
        assert_eq!(&features[..3], &[0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_encode_empty_list() {
        let features = encode_symptoms::<&str>(&table(), &[]).unwrap();
        assert_eq!(features, vec![0.0; FEATURE_LEN]);
    }

    #[test]
    fn test_encode_exactly_feature_len() {
        let symptoms = vec!["itching"; FEATURE_LEN];
        let features = encode_symptoms(&table(), &symptoms).unwrap();
        assert_eq!(features, vec![1.0; FEATURE_LEN]);
    }

    #[test]
    fn test_encode_rejects_oversized_list() {
        let symptoms = vec!["itching"; FEATURE_LEN + 1];
        let err = encode_symptoms(&table(), &symptoms).unwrap_err();

        assert_eq!(err, EncodeError::TooManySymptoms { count: 18 });
        assert_eq!(
            err.to_string(),
            "Too many symptoms: got 18, at most 17 are supported"
        );
    }

    #[test]
    fn test_empty_table() {
        let table = SeverityTable::default();
        assert!(table.is_empty());
        assert_eq!(table.weight_of("anything"), 0);

        let features = encode_symptoms(&table, &["anything"]).unwrap();
        assert_eq!(features, vec![0.0; FEATURE_LEN]);
    }
}

//! C3 linearization of model hierarchies.

use super::ModelId;

/// Linearize `id` given its direct `bases` (in declaration order) and a lookup
/// for the already-computed linearization of each base.
///
/// Returns `None` when no consistent order exists.
pub(crate) fn linearize<'a, F>(id: ModelId, bases: &[ModelId], lin_of: F) -> Option<Vec<ModelId>>
where
    F: Fn(ModelId) -> &'a [ModelId],
{
    let mut sequences: Vec<Vec<ModelId>> = bases.iter().map(|&b| lin_of(b).to_vec()).collect();
    sequences.push(bases.to_vec());

    let mut result = vec![id];
    loop {
        sequences.retain(|s| !s.is_empty());
        if sequences.is_empty() {
            return Some(result);
        }
        // The first head that does not appear in the tail of any sequence.
        let head = sequences
            .iter()
            .map(|s| s[0])
            .find(|candidate| !sequences.iter().any(|s| s[1..].contains(candidate)))?;
        result.push(head);
        for s in &mut sequences {
            if s[0] == head {
                s.remove(0);
            }
        }
    }
}

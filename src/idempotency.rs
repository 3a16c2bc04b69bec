//! Idempotency key helpers.
//!
//! Each submit intent gets its own key so the backend can discard duplicate
//! deliveries of the same attempt without merging two deliberate contributions.

use uuid::Uuid;

const CONTRIBUTION_PREFIX: &str = "campaign-contribute-";

pub fn new_contribution_key() -> String {
    format!("{CONTRIBUTION_PREFIX}{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed_and_unique() {
        let a = new_contribution_key();
        let b = new_contribution_key();
        assert!(a.starts_with(CONTRIBUTION_PREFIX));
        assert_eq!(a.len(), CONTRIBUTION_PREFIX.len() + 32);
        assert_ne!(a, b);
    }
}

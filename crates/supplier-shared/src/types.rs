//! Common types

use uuid::Uuid;

pub type EntityId = Uuid;

/// Fresh random (v4) identifier for a new row.
pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_v4_and_unique() {
        let a = new_id();
        let b = new_id();
        assert_eq!(a.get_version_num(), 4);
        assert_ne!(a, b);
    }
}

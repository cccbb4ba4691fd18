//! Three-state update for optional record fields.

/// How a partial update treats one optional field.
///
/// Keeps "leave the stored value alone" apart from "remove the stored value",
/// which a plain `Option<T>` cannot express.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value unchanged.
    #[default]
    Keep,
    /// Remove the stored value.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Applies the update to a stored optional value.
    pub fn apply(self, target: &mut Option<T>) {
        match self {
            FieldUpdate::Keep => {}
            FieldUpdate::Clear => *target = None,
            FieldUpdate::Set(value) => *target = Some(value),
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// A full replacement value: `Some` sets, `None` clears.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldUpdate::Set(v),
            None => FieldUpdate::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let mut stored = Some("old".to_string());
        FieldUpdate::Keep.apply(&mut stored);
        assert_eq!(stored.as_deref(), Some("old"));

        FieldUpdate::Set("new".to_string()).apply(&mut stored);
        assert_eq!(stored.as_deref(), Some("new"));

        FieldUpdate::Clear.apply(&mut stored);
        assert!(stored.is_none());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FieldUpdate::from(Some(1)), FieldUpdate::Set(1));
        assert_eq!(FieldUpdate::<i32>::from(None), FieldUpdate::Clear);
    }
}

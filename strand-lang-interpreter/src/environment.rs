use std::rc::Rc;

use crate::value::Value;

/// The run's variable namespace: an insertion-ordered name-to-value store
/// with linear lookup.  Reading a name that was never assigned yields
/// `Int(0)`, never an error.
#[derive(Debug, Default)]
pub struct Environment {
    variables: Vec<(Rc<str>, Value)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a variable.  Sequence values come back as another
    /// handle to the same storage, not a copy of the contents.
    pub fn get(&self, name: &str) -> Value {
        self.variables
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Int(0))
    }

    /// Bind a name, replacing (and thereby dropping) any previous value it
    /// held.
    pub fn set(&mut self, name: Rc<str>, value: Value) {
        match self.variables.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.variables.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Sequence;

    #[test]
    fn test_unset_variables_read_as_zero() {
        let env = Environment::new();
        assert_eq!(env.get("missing"), Value::Int(0));
    }

    #[test]
    fn test_set_then_get() {
        let mut env = Environment::new();
        env.set("x".into(), Value::Int(7));
        assert_eq!(env.get("x"), Value::Int(7));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_reassignment_keeps_one_slot_per_name() {
        let mut env = Environment::new();
        env.set("x".into(), Value::Int(1));
        env.set("x".into(), Value::Int(2));
        assert_eq!(env.get("x"), Value::Int(2));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_reassignment_releases_the_old_sequence() {
        let seq = Sequence::from_elements(vec![1, 2]);
        let mut env = Environment::new();
        env.set("x".into(), Value::Seq(seq.clone()));
        assert_eq!(seq.ref_count(), 2);

        env.set("x".into(), Value::Int(0));
        assert_eq!(seq.ref_count(), 1);
    }

    #[test]
    fn test_two_variables_can_share_one_sequence() {
        let seq = Sequence::from_elements(vec![1, 2]);
        let mut env = Environment::new();
        env.set("x".into(), Value::Seq(seq.clone()));
        env.set("y".into(), Value::Seq(seq.clone()));
        assert_eq!(seq.ref_count(), 3);

        let Value::Seq(from_x) = env.get("x") else {
            panic!("x should hold a sequence");
        };
        let Value::Seq(from_y) = env.get("y") else {
            panic!("y should hold a sequence");
        };
        assert!(from_x.shares_storage_with(&from_y));
    }
}

//! Process state read and written by `next_state`.

/// Values of the state variables of a process, indexed from zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct State {
    vars: Vec<i64>,
}

impl State {
    pub fn new(vars: impl Into<Vec<i64>>) -> Self {
        State { vars: vars.into() }
    }

    pub fn get(&self, var: usize) -> Option<i64> {
        self.vars.get(var).copied()
    }

    /// Overwrite `var`; returns `false` if there is no such variable.
    pub fn set(&mut self, var: usize, value: i64) -> bool {
        match self.vars.get_mut(var) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.vars
    }
}

impl From<Vec<i64>> for State {
    fn from(vars: Vec<i64>) -> Self {
        State { vars }
    }
}

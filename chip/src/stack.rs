use tinyvec::ArrayVec;

use crate::{definitions::cpu, error::StackError};

/// The stack is only used to store return addresses when subroutines are called. The original
/// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
/// `12` levels of nesting; modern implementations usually have more.
/// (here we are using `16`)
///
/// A push onto a full stack is dropped. The stack still reports it and keeps count of all the
/// dropped pushes.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    entries: ArrayVec<[u16; cpu::stack::SIZE]>,
    dropped: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will push the pointer onto the stack.
    pub fn push(&mut self, pointer: u16) -> Result<(), StackError> {
        if self.entries.try_push(pointer).is_some() {
            self.dropped += 1;
            Err(StackError::Full)
        } else {
            Ok(())
        }
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        self.entries.pop().ok_or(StackError::Empty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The amount of pushes dropped since the last reset.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn entries(&self) -> &[u16] {
        &self.entries
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }
}

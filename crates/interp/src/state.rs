use ownir_core::Label;

use crate::frame::Frame;

/// The evaluator's mutable state, owned by exactly one evaluation.
///
/// The active frame is kept apart from its callers so there is always one to operate on.
#[derive(Debug)]
pub(crate) struct State {
    pub frame: Frame,
    pub callers: Vec<Frame>,
    pub pc: usize,
    pub current_block: Label,
    pub previous_block: Option<Label>,
}

impl State {
    /// Positioned on the first line after the `@entry` marker.
    pub(crate) fn new() -> Self {
        Self {
            frame: Frame::root(),
            callers: Vec::new(),
            pc: 1,
            current_block: Label::entry(),
            previous_block: None,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.callers.len() + 1
    }

    /// Moves control to `label`, whose body starts at `pc`.
    pub(crate) fn enter(&mut self, label: Label, pc: usize) {
        let previous = std::mem::replace(&mut self.current_block, label);
        self.previous_block = Some(previous);
        self.pc = pc;
    }
}
